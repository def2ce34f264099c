use model::{
    connector::{ConnectorType, StationConnector},
    vehicle::VehicleType,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{decode_error, DatabaseRow};

#[derive(Debug, Clone, FromRow)]
pub struct ConnectorRow {
    pub id: String,
    pub station_id: String,
    pub connector_type: String,
    pub power_kw: f64,
    pub is_dc_fast: bool,
    pub count: i32,
    pub vehicle_type_supported: String,
}

impl DatabaseRow for ConnectorRow {
    type Model = StationConnector;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> super::Result<Self::Model> {
        let connector_type = ConnectorType::from_wire(&self.connector_type)
            .ok_or_else(|| decode_error("connector_type", &self.connector_type))?;
        let vehicle_type = VehicleType::from_wire(&self.vehicle_type_supported)
            .ok_or_else(|| {
                decode_error("vehicle_type_supported", &self.vehicle_type_supported)
            })?;
        Ok(StationConnector {
            station_id: Id::new(self.station_id),
            connector_type,
            power_kw: self.power_kw,
            is_dc_fast: self.is_dc_fast,
            count: self.count.max(0) as u32,
            vehicle_type,
        })
    }
}
