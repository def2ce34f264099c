use charging::database::Result;
use model::{amenities::StationAmenities, station::Station};
use sqlx::{Executor, Postgres};
use utility::id::{Id, IdWrapper};

use crate::data_model::amenities::AmenitiesRow;

use super::convert_error;

pub async fn for_stations<'c, E>(
    executor: E,
    station_ids: &[Id<Station>],
) -> Result<Vec<StationAmenities>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            station_id, has_washroom, has_food, has_coffee_tea, has_wifi,
            has_sitting_area, has_shade, nearby_atm, safety_rating
        FROM
            station_amenities
        WHERE station_id = ANY($1);
        ",
    )
    .bind(station_ids.raw())
    .fetch_all(executor)
    .await
    .map(|rows: Vec<AmenitiesRow>| {
        rows.into_iter().map(AmenitiesRow::to_model).collect()
    })
    .map_err(convert_error)
}
