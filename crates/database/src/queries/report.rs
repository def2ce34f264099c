use charging::database::Result;
use model::{
    report::{ReportType, StationReport},
    station::Station,
    WithId,
};
use sqlx::{Executor, Postgres};
use utility::id::Id;

use crate::data_model::{report::ReportRow, with_id};

use super::convert_error;

/// New reports always start out pending.
pub async fn insert<'c, E>(
    executor: E,
    station_id: &Id<Station>,
    user_id: &str,
    report_type: ReportType,
    value: Option<String>,
) -> Result<WithId<StationReport>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO station_reports(station_id, user_id, report_type, value)
        VALUES ($1, $2, $3, $4)
        RETURNING id, station_id, user_id, report_type, value, status,
            created_at;
        ",
    )
    .bind(station_id.raw())
    .bind(user_id)
    .bind(report_type.as_wire())
    .bind(value)
    .fetch_one(executor)
    .await
    .and_then(|row: ReportRow| with_id(row))
    .map_err(convert_error)
}
