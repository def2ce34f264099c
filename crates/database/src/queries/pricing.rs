use charging::database::Result;
use model::{pricing::StationPricing, station::Station, WithId};
use sqlx::{Executor, Postgres};
use utility::id::{Id, IdWrapper};

use crate::data_model::{pricing::PricingRow, with_ids};

use super::convert_error;

/// Ordered by insertion time so that "the first tariff" is stable.
pub async fn for_stations<'c, E>(
    executor: E,
    station_ids: &[Id<Station>],
) -> Result<Vec<WithId<StationPricing>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, station_id, connector_type, pricing_model, price_value,
            parking_charges, remarks
        FROM
            station_pricing
        WHERE station_id = ANY($1)
        ORDER BY created_at ASC;
        ",
    )
    .bind(station_ids.raw())
    .fetch_all(executor)
    .await
    .and_then(|rows: Vec<PricingRow>| with_ids(rows))
    .map_err(convert_error)
}
