use async_trait::async_trait;
use charging::database::{ReportRepo, Result};
use chrono::{DateTime, Local};
use model::{
    report::{ReportStatus, ReportType, StationReport},
    station::Station,
    WithId,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{decode_error, DatabaseRow};
use crate::{queries::report, PgDatabaseAutocommit, PgDatabaseTransaction};

#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: String,
    pub station_id: String,
    pub user_id: String,
    pub report_type: String,
    pub value: Option<String>,
    pub status: String,
    pub created_at: DateTime<Local>,
}

impl DatabaseRow for ReportRow {
    type Model = StationReport;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> super::Result<Self::Model> {
        let report_type = ReportType::from_wire(&self.report_type)
            .ok_or_else(|| decode_error("report_type", &self.report_type))?;
        let status = ReportStatus::from_wire(&self.status)
            .ok_or_else(|| decode_error("status", &self.status))?;
        Ok(StationReport {
            station_id: Id::new(self.station_id),
            user_id: self.user_id,
            report_type,
            value: self.value,
            status,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl ReportRepo for PgDatabaseAutocommit {
    async fn insert_report(
        &mut self,
        station_id: &Id<Station>,
        user_id: &str,
        report_type: ReportType,
        value: Option<String>,
    ) -> Result<WithId<StationReport>> {
        report::insert(&self.pool, station_id, user_id, report_type, value).await
    }
}

#[async_trait]
impl<'a> ReportRepo for PgDatabaseTransaction<'a> {
    async fn insert_report(
        &mut self,
        station_id: &Id<Station>,
        user_id: &str,
        report_type: ReportType,
        value: Option<String>,
    ) -> Result<WithId<StationReport>> {
        report::insert(&mut *self.tx, station_id, user_id, report_type, value).await
    }
}
