use async_trait::async_trait;
use charging::database::{Result, VehicleRepo};
use model::{
    connector::ConnectorType,
    vehicle::{Vehicle, VehicleType},
    WithId,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{decode_error, DatabaseRow};
use crate::{queries::vehicle, PgDatabaseAutocommit, PgDatabaseTransaction};

#[derive(Debug, Clone, FromRow)]
pub struct VehicleRow {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub variant: Option<String>,
    pub vehicle_type: String,
    pub battery_capacity_kwh: f64,
    pub ac_connector_type: Option<String>,
    pub ac_max_power_kw: Option<f64>,
    pub dc_connector_type: Option<String>,
    pub dc_max_power_kw: Option<f64>,
    pub efficiency_wh_per_km: f64,
    pub image_url: Option<String>,
}

fn optional_connector(value: Option<&String>) -> super::Result<Option<ConnectorType>> {
    match value {
        Some(value) => ConnectorType::from_wire(value)
            .ok_or_else(|| decode_error("connector_type", value))
            .map(Some),
        None => Ok(None),
    }
}

impl DatabaseRow for VehicleRow {
    type Model = Vehicle;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> super::Result<Self::Model> {
        let vehicle_type = VehicleType::from_wire(&self.vehicle_type)
            .ok_or_else(|| decode_error("vehicle_type", &self.vehicle_type))?;
        let ac_connector_type = optional_connector(self.ac_connector_type.as_ref())?;
        let dc_connector_type = optional_connector(self.dc_connector_type.as_ref())?;
        Ok(Vehicle {
            brand: self.brand,
            model: self.model,
            variant: self.variant,
            vehicle_type,
            battery_capacity_kwh: self.battery_capacity_kwh,
            ac_connector_type,
            ac_max_power_kw: self.ac_max_power_kw,
            dc_connector_type,
            dc_max_power_kw: self.dc_max_power_kw,
            efficiency_wh_per_km: self.efficiency_wh_per_km,
            image_url: self.image_url,
        })
    }
}

#[async_trait]
impl VehicleRepo for PgDatabaseAutocommit {
    async fn vehicles(&mut self) -> Result<Vec<WithId<Vehicle>>> {
        vehicle::get_all(&self.pool).await
    }

    async fn vehicle(&mut self, id: Id<Vehicle>) -> Result<WithId<Vehicle>> {
        vehicle::get(&self.pool, id).await
    }

    async fn vehicles_by_type(
        &mut self,
        vehicle_type: VehicleType,
    ) -> Result<Vec<WithId<Vehicle>>> {
        vehicle::get_by_type(&self.pool, vehicle_type).await
    }
}

#[async_trait]
impl<'a> VehicleRepo for PgDatabaseTransaction<'a> {
    async fn vehicles(&mut self) -> Result<Vec<WithId<Vehicle>>> {
        vehicle::get_all(&mut *self.tx).await
    }

    async fn vehicle(&mut self, id: Id<Vehicle>) -> Result<WithId<Vehicle>> {
        vehicle::get(&mut *self.tx, id).await
    }

    async fn vehicles_by_type(
        &mut self,
        vehicle_type: VehicleType,
    ) -> Result<Vec<WithId<Vehicle>>> {
        vehicle::get_by_type(&mut *self.tx, vehicle_type).await
    }
}
