use charging::database::Result;
use model::{
    vehicle::{Vehicle, VehicleType},
    WithId,
};
use sqlx::{Executor, Postgres};
use utility::id::Id;

use crate::data_model::{vehicle::VehicleRow, with_id, with_ids};

use super::convert_error;

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<Vehicle>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, brand, model, variant, vehicle_type, battery_capacity_kwh,
            ac_connector_type, ac_max_power_kw, dc_connector_type,
            dc_max_power_kw, efficiency_wh_per_km, image_url
        FROM
            vehicles
        ORDER BY brand ASC, model ASC;
        ",
    )
    .fetch_all(executor)
    .await
    .and_then(|rows: Vec<VehicleRow>| with_ids(rows))
    .map_err(convert_error)
}

pub async fn get<'c, E>(executor: E, id: Id<Vehicle>) -> Result<WithId<Vehicle>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, brand, model, variant, vehicle_type, battery_capacity_kwh,
            ac_connector_type, ac_max_power_kw, dc_connector_type,
            dc_max_power_kw, efficiency_wh_per_km, image_url
        FROM
            vehicles
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .and_then(|row: VehicleRow| with_id(row))
    .map_err(convert_error)
}

pub async fn get_by_type<'c, E>(
    executor: E,
    vehicle_type: VehicleType,
) -> Result<Vec<WithId<Vehicle>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, brand, model, variant, vehicle_type, battery_capacity_kwh,
            ac_connector_type, ac_max_power_kw, dc_connector_type,
            dc_max_power_kw, efficiency_wh_per_km, image_url
        FROM
            vehicles
        WHERE vehicle_type = $1
        ORDER BY brand ASC, model ASC;
        ",
    )
    .bind(vehicle_type.as_wire())
    .fetch_all(executor)
    .await
    .and_then(|rows: Vec<VehicleRow>| with_ids(rows))
    .map_err(convert_error)
}
