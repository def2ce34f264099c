use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::ExampleData;

/// Where a station record originally came from. Affects how much the data is
/// trusted, not how it is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Seed,
    Crowdsourced,
    CpoApi,
    Government,
}

impl DataSource {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "seed" => Some(Self::Seed),
            "crowdsourced" => Some(Self::Crowdsourced),
            "cpo_api" => Some(Self::CpoApi),
            "government" => Some(Self::Government),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Crowdsourced => "crowdsourced",
            Self::CpoApi => "cpo_api",
            Self::Government => "government",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: String,
    pub network: Option<String>,
    #[serde(flatten)]
    pub location: Location,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: Option<String>,
    pub is_24x7: bool,
    pub parking_type: Option<String>,
    pub source: DataSource,
    /// 0..=100. Consumers fall back to 50 when absent.
    pub trust_level: Option<i16>,
    pub last_verified_at: Option<DateTime<Local>>,
}

impl HasId for Station {
    type IdType = String;
}

impl ExampleData for Station {
    fn example_data() -> Self {
        Station {
            name: "Tata Power EZ Charge - Connaught Place".to_owned(),
            network: Some("Tata Power".to_owned()),
            location: Location {
                latitude: 28.6315,
                longitude: 77.2167,
            },
            address: "Block A, Inner Circle".to_owned(),
            city: "New Delhi".to_owned(),
            state: "Delhi".to_owned(),
            pincode: Some("110001".to_owned()),
            is_24x7: true,
            parking_type: Some("open".to_owned()),
            source: DataSource::Seed,
            trust_level: Some(85),
            last_verified_at: None,
        }
    }
}
