use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{connector::ConnectorType, station::Station};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    PerKwh,
    PerMinute,
    FlatSession,
}

impl PricingModel {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "per_kwh" => Some(Self::PerKwh),
            "per_minute" => Some(Self::PerMinute),
            "flat_session" => Some(Self::FlatSession),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::PerKwh => "per_kwh",
            Self::PerMinute => "per_minute",
            Self::FlatSession => "flat_session",
        }
    }
}

/// One tariff a station charges, optionally scoped to a connector type.
/// Prices are in rupees.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationPricing {
    #[serde(skip)]
    pub station_id: Id<Station>,
    pub connector_type: Option<ConnectorType>,
    pub pricing_model: PricingModel,
    pub price_value: f64,
    pub parking_charges: Option<f64>,
    pub remarks: Option<String>,
}

impl HasId for StationPricing {
    type IdType = String;
}
