use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    amenities::StationAmenities,
    connector::{ConnectorType, StationConnector},
    pricing::StationPricing,
    review::StationReview,
    station::Station,
    WithId,
};

/// How well a vehicle's charge ports match the connectors of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityStatus {
    /// The vehicle's AC or DC connector type is available.
    Compatible,
    /// Only the (slower) AC connector type is available.
    Partial,
    Incompatible,
}

/// A station joined with its related records and the per-request computed
/// fields. Built fresh for every request, never persisted.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedStation {
    #[serde(flatten)]
    pub station: WithId<Station>,
    pub connectors: Vec<WithId<StationConnector>>,
    pub pricing: Vec<WithId<StationPricing>>,
    pub amenities: Option<StationAmenities>,
    pub avg_rating: Option<f64>,
    pub total_reviews: usize,
    pub compatibility_status: Option<CompatibilityStatus>,
    pub estimated_cost: Option<f64>,
    pub estimated_charge_time_minutes: Option<f64>,
    /// Only included in the single-station detail view.
    pub reviews: Option<Vec<WithId<StationReview>>>,
}

impl EnrichedStation {
    pub fn has_connector_type(&self, connector_type: ConnectorType) -> bool {
        self.connectors
            .iter()
            .any(|connector| connector.content.connector_type == connector_type)
    }

    pub fn has_dc_fast(&self, wanted: bool) -> bool {
        self.connectors
            .iter()
            .any(|connector| connector.content.is_dc_fast == wanted)
    }

    pub fn max_connector_power_kw(&self) -> Option<f64> {
        self.connectors
            .iter()
            .map(|connector| connector.content.power_kw)
            .fold(None, |max, power| match max {
                Some(current) if current >= power => Some(current),
                _ => Some(power),
            })
    }

    /// The price of the first tariff entry, used for price sorting and cost
    /// estimation.
    pub fn first_price(&self) -> Option<&StationPricing> {
        self.pricing.first().map(|pricing| &pricing.content)
    }
}
