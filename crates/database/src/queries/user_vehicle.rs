use charging::database::{DatabaseError, Result};
use model::{
    vehicle::{UserVehicle, Vehicle},
    WithId,
};
use sqlx::{Executor, Postgres};
use utility::id::Id;

use crate::data_model::{user_vehicle::UserVehicleRow, with_id, with_ids};

use super::convert_error;

const GARAGE_SELECT: &str = "
    SELECT
        uv.id, uv.user_id, uv.vehicle_id, uv.nickname, uv.is_default,
        v.brand AS vehicle_brand,
        v.model AS vehicle_model,
        v.variant AS vehicle_variant,
        v.vehicle_type AS vehicle_vehicle_type,
        v.battery_capacity_kwh AS vehicle_battery_capacity_kwh,
        v.ac_connector_type AS vehicle_ac_connector_type,
        v.ac_max_power_kw AS vehicle_ac_max_power_kw,
        v.dc_connector_type AS vehicle_dc_connector_type,
        v.dc_max_power_kw AS vehicle_dc_max_power_kw,
        v.efficiency_wh_per_km AS vehicle_efficiency_wh_per_km,
        v.image_url AS vehicle_image_url
    FROM
        user_vehicles uv
        JOIN vehicles v ON v.id = uv.vehicle_id
";

/// The user's garage with the catalog entry joined in, default vehicle
/// first, then newest first.
pub async fn get_for_user<'c, E>(
    executor: E,
    user_id: &str,
) -> Result<Vec<WithId<UserVehicle>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "
        {GARAGE_SELECT}
        WHERE uv.user_id = $1
        ORDER BY uv.is_default DESC, uv.created_at DESC;
        "
    ))
    .bind(user_id)
    .fetch_all(executor)
    .await
    .and_then(|rows: Vec<UserVehicleRow>| with_ids(rows))
    .map_err(convert_error)
}

pub async fn get<'c, E>(
    executor: E,
    id: &Id<UserVehicle>,
) -> Result<WithId<UserVehicle>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "
        {GARAGE_SELECT}
        WHERE uv.id = $1;
        "
    ))
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .and_then(|row: UserVehicleRow| with_id(row))
    .map_err(convert_error)
}

/// Returns the new entry's id; callers re-fetch through [`get`] to include
/// the joined catalog entry.
pub async fn insert<'c, E>(
    executor: E,
    user_id: &str,
    vehicle_id: &Id<Vehicle>,
    nickname: Option<String>,
    is_default: bool,
) -> Result<Id<UserVehicle>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar(
        "
        INSERT INTO user_vehicles(user_id, vehicle_id, nickname, is_default)
        VALUES ($1, $2, $3, $4)
        RETURNING id;
        ",
    )
    .bind(user_id)
    .bind(vehicle_id.raw())
    .bind(nickname)
    .bind(is_default)
    .fetch_one(executor)
    .await
    .map(|id: String| Id::new(id))
    .map_err(convert_error)
}

/// Partial update; `None` fields keep their current value. The user id is
/// part of the predicate so one user can not touch another user's garage.
pub async fn update<'c, E>(
    executor: E,
    id: &Id<UserVehicle>,
    user_id: &str,
    nickname: Option<String>,
    is_default: Option<bool>,
) -> Result<Id<UserVehicle>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar(
        "
        UPDATE user_vehicles
        SET nickname = COALESCE($3, nickname),
            is_default = COALESCE($4, is_default)
        WHERE id = $1 AND user_id = $2
        RETURNING id;
        ",
    )
    .bind(id.raw())
    .bind(user_id)
    .bind(nickname)
    .bind(is_default)
    .fetch_one(executor)
    .await
    .map(|id: String| Id::new(id))
    .map_err(convert_error)
}

pub async fn delete<'c, E>(
    executor: E,
    id: &Id<UserVehicle>,
    user_id: &str,
) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    let result = sqlx::query(
        "
        DELETE FROM user_vehicles
        WHERE id = $1 AND user_id = $2;
        ",
    )
    .bind(id.raw())
    .bind(user_id)
    .execute(executor)
    .await
    .map_err(convert_error)?;

    if result.rows_affected() == 0 {
        Err(DatabaseError::NotFound)
    } else {
        Ok(())
    }
}

pub async fn clear_default<'c, E>(executor: E, user_id: &str) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        UPDATE user_vehicles
        SET is_default = FALSE
        WHERE user_id = $1;
        ",
    )
    .bind(user_id)
    .execute(executor)
    .await
    .map(|_| ())
    .map_err(convert_error)
}
