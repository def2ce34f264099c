use charging::database::Result;
use model::{station::Station, WithDistance, WithId};
use sqlx::{Executor, Postgres};
use utility::{
    geo::{self, EARTH_RADIUS_KM},
    id::Id,
    let_also::LetAlso,
};

use crate::data_model::{
    station::{NearbyStationRow, StationRow},
    with_id, with_ids,
};

use super::convert_error;

pub async fn get<'c, E>(executor: E, id: Id<Station>) -> Result<WithId<Station>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, name, network, latitude, longitude, address, city, state,
            pincode, is_24x7, parking_type, source, trust_level,
            last_verified_at
        FROM
            stations
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .and_then(|row: StationRow| with_id(row))
    .map_err(convert_error)
}

pub async fn get_by_city<'c, E>(
    executor: E,
    city: &str,
) -> Result<Vec<WithId<Station>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, name, network, latitude, longitude, address, city, state,
            pincode, is_24x7, parking_type, source, trust_level,
            last_verified_at
        FROM
            stations
        WHERE city ILIKE $1
        ORDER BY trust_level DESC NULLS LAST;
        ",
    )
    .bind(city)
    .fetch_all(executor)
    .await
    .and_then(|rows: Vec<StationRow>| with_ids(rows))
    .map_err(convert_error)
}

/// The candidate source. Distances come back already computed and the result
/// is ordered ascending by distance, capped at `limit`.
pub async fn get_nearby<'c, E>(
    executor: E,
    center_latitude: f64,
    center_longitude: f64,
    radius_km: f64,
    limit: u32,
) -> Result<Vec<WithDistance<WithId<Station>>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let ((min_lat, min_lon), (max_lat, max_lon)) =
        geo::calculate_bounding_box(center_latitude, center_longitude, radius_km);

    sqlx::query_as(
        "
        WITH distance_calc AS (
            SELECT
                id,
                ($1 * ACOS(LEAST(1.0,
                    COS(RADIANS($2)) * COS(RADIANS(latitude)) *
                    COS(RADIANS(longitude) - RADIANS($3)) +
                    SIN(RADIANS($2)) * SIN(RADIANS(latitude))
                ))) AS distance_km
            FROM
                stations
            WHERE
                latitude BETWEEN $4 AND $5
                AND longitude BETWEEN $6 AND $7
        )
        SELECT
            s.id, s.name, s.network, s.latitude, s.longitude, s.address,
            s.city, s.state, s.pincode, s.is_24x7, s.parking_type, s.source,
            s.trust_level, s.last_verified_at, d.distance_km
        FROM
            stations s
            JOIN distance_calc d ON d.id = s.id
        WHERE
            d.distance_km < $8
        ORDER BY
            d.distance_km ASC
        LIMIT $9;
        ",
    )
    .bind(EARTH_RADIUS_KM)
    .bind(center_latitude)
    .bind(center_longitude)
    .bind(min_lat)
    .bind(max_lat)
    .bind(min_lon)
    .bind(max_lon)
    .bind(radius_km)
    .bind(limit as i64)
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<NearbyStationRow>| {
        rows.into_iter()
            .map(|row| {
                Ok(WithDistance::new(row.distance_km, with_id(row.station)?))
            })
            .collect::<core::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(convert_error)
    })
}
