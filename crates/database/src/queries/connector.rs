use charging::database::Result;
use model::{connector::StationConnector, station::Station, WithId};
use sqlx::{Executor, Postgres};
use utility::id::{Id, IdWrapper};

use crate::data_model::{connector::ConnectorRow, with_ids};

use super::convert_error;

pub async fn for_stations<'c, E>(
    executor: E,
    station_ids: &[Id<Station>],
) -> Result<Vec<WithId<StationConnector>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, station_id, connector_type, power_kw, is_dc_fast, count,
            vehicle_type_supported
        FROM
            station_connectors
        WHERE station_id = ANY($1);
        ",
    )
    .bind(station_ids.raw())
    .fetch_all(executor)
    .await
    .and_then(|rows: Vec<ConnectorRow>| with_ids(rows))
    .map_err(convert_error)
}
