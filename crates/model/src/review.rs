use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::station::Station;

/// A user review of a station. Ratings run from 1 to 5.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationReview {
    #[serde(skip)]
    pub station_id: Id<Station>,
    pub user_id: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Local>,
}

impl HasId for StationReview {
    type IdType = String;
}

/// Projection used by the enrichment bulk lookup. Only the rating is needed
/// to compute per-station aggregates.
#[derive(Debug, Clone)]
pub struct ReviewRating {
    pub station_id: Id<Station>,
    pub rating: u8,
}
