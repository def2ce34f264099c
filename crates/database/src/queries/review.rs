use charging::database::Result;
use model::{
    review::{ReviewRating, StationReview},
    station::Station,
    WithId,
};
use sqlx::{Executor, Postgres};
use utility::id::{Id, IdWrapper};

use crate::data_model::{
    review::{ReviewRatingRow, ReviewRow},
    with_id, with_ids,
};

use super::convert_error;

pub async fn for_station<'c, E>(
    executor: E,
    station_id: &Id<Station>,
) -> Result<Vec<WithId<StationReview>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, station_id, user_id, rating, comment, created_at
        FROM
            station_reviews
        WHERE station_id = $1
        ORDER BY created_at DESC;
        ",
    )
    .bind(station_id.raw())
    .fetch_all(executor)
    .await
    .and_then(|rows: Vec<ReviewRow>| with_ids(rows))
    .map_err(convert_error)
}

/// The rating-only projection used by the enrichment bulk lookup.
pub async fn ratings_for_stations<'c, E>(
    executor: E,
    station_ids: &[Id<Station>],
) -> Result<Vec<ReviewRating>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            station_id, rating
        FROM
            station_reviews
        WHERE station_id = ANY($1);
        ",
    )
    .bind(station_ids.raw())
    .fetch_all(executor)
    .await
    .map(|rows: Vec<ReviewRatingRow>| {
        rows.into_iter().map(ReviewRatingRow::to_model).collect()
    })
    .map_err(convert_error)
}

pub async fn insert<'c, E>(
    executor: E,
    station_id: &Id<Station>,
    user_id: &str,
    rating: u8,
    comment: Option<String>,
) -> Result<WithId<StationReview>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO station_reviews(station_id, user_id, rating, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING id, station_id, user_id, rating, comment, created_at;
        ",
    )
    .bind(station_id.raw())
    .bind(user_id)
    .bind(rating as i16)
    .bind(comment)
    .fetch_one(executor)
    .await
    .and_then(|row: ReviewRow| with_id(row))
    .map_err(convert_error)
}
