use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{station::Station, vehicle::VehicleType};

/// Charging connector standards common at Indian stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ConnectorType {
    #[serde(rename = "Type 2 AC")]
    Type2Ac,
    #[serde(rename = "Bharat AC001")]
    BharatAc001,
    #[serde(rename = "CCS2")]
    Ccs2,
    #[serde(rename = "CHAdeMO")]
    Chademo,
    #[serde(rename = "Bharat DC001")]
    BharatDc001,
    #[serde(rename = "GB/T DC")]
    GbtDc,
}

impl ConnectorType {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "Type 2 AC" => Some(Self::Type2Ac),
            "Bharat AC001" => Some(Self::BharatAc001),
            "CCS2" => Some(Self::Ccs2),
            "CHAdeMO" => Some(Self::Chademo),
            "Bharat DC001" => Some(Self::BharatDc001),
            "GB/T DC" => Some(Self::GbtDc),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Type2Ac => "Type 2 AC",
            Self::BharatAc001 => "Bharat AC001",
            Self::Ccs2 => "CCS2",
            Self::Chademo => "CHAdeMO",
            Self::BharatDc001 => "Bharat DC001",
            Self::GbtDc => "GB/T DC",
        }
    }
}

/// A physical charge point offered at a station.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationConnector {
    #[serde(skip)]
    pub station_id: Id<Station>,
    pub connector_type: ConnectorType,
    pub power_kw: f64,
    pub is_dc_fast: bool,
    pub count: u32,
    pub vehicle_type: VehicleType,
}

impl HasId for StationConnector {
    type IdType = String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_wire_names_roundtrip() {
        for connector in [
            ConnectorType::Type2Ac,
            ConnectorType::BharatAc001,
            ConnectorType::Ccs2,
            ConnectorType::Chademo,
            ConnectorType::BharatDc001,
            ConnectorType::GbtDc,
        ] {
            assert_eq!(ConnectorType::from_wire(connector.as_wire()), Some(connector));
        }
        assert_eq!(ConnectorType::from_wire("Tesla NACS"), None);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&ConnectorType::GbtDc).unwrap();
        assert_eq!(json, "\"GB/T DC\"");
        let parsed: ConnectorType = serde_json::from_str("\"CHAdeMO\"").unwrap();
        assert_eq!(parsed, ConnectorType::Chademo);
    }
}
