use model::{
    connector::ConnectorType,
    pricing::{PricingModel, StationPricing},
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{decode_error, DatabaseRow};

#[derive(Debug, Clone, FromRow)]
pub struct PricingRow {
    pub id: String,
    pub station_id: String,
    pub connector_type: Option<String>,
    pub pricing_model: String,
    pub price_value: f64,
    pub parking_charges: Option<f64>,
    pub remarks: Option<String>,
}

impl DatabaseRow for PricingRow {
    type Model = StationPricing;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> super::Result<Self::Model> {
        let connector_type = match &self.connector_type {
            Some(value) => Some(
                ConnectorType::from_wire(value)
                    .ok_or_else(|| decode_error("connector_type", value))?,
            ),
            None => None,
        };
        let pricing_model = PricingModel::from_wire(&self.pricing_model)
            .ok_or_else(|| decode_error("pricing_model", &self.pricing_model))?;
        Ok(StationPricing {
            station_id: Id::new(self.station_id),
            connector_type,
            pricing_model,
            price_value: self.price_value,
            parking_charges: self.parking_charges,
            remarks: self.remarks,
        })
    }
}
