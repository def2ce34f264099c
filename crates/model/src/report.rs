use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::station::Station;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Offline,
    PriceChange,
    Busy,
    IncorrectInfo,
    Other,
}

impl ReportType {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "offline" => Some(Self::Offline),
            "price_change" => Some(Self::PriceChange),
            "busy" => Some(Self::Busy),
            "incorrect_info" => Some(Self::IncorrectInfo),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::PriceChange => "price_change",
            Self::Busy => "busy",
            Self::IncorrectInfo => "incorrect_info",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ReportStatus {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// A crowdsourced correction submitted against a station. Moderation happens
/// elsewhere; new reports always start out pending.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationReport {
    #[serde(skip)]
    pub station_id: Id<Station>,
    pub user_id: String,
    pub report_type: ReportType,
    pub value: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Local>,
}

impl HasId for StationReport {
    type IdType = String;
}
