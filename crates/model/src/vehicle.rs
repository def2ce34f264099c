use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{connector::ConnectorType, ExampleData, WithId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum VehicleType {
    #[serde(rename = "2W")]
    TwoWheeler,
    #[serde(rename = "4W")]
    FourWheeler,
}

impl VehicleType {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "2W" => Some(Self::TwoWheeler),
            "4W" => Some(Self::FourWheeler),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::TwoWheeler => "2W",
            Self::FourWheeler => "4W",
        }
    }
}

/// An entry in the vehicle catalog. Immutable reference data.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub variant: Option<String>,
    pub vehicle_type: VehicleType,
    pub battery_capacity_kwh: f64,
    pub ac_connector_type: Option<ConnectorType>,
    pub ac_max_power_kw: Option<f64>,
    pub dc_connector_type: Option<ConnectorType>,
    pub dc_max_power_kw: Option<f64>,
    pub efficiency_wh_per_km: f64,
    pub image_url: Option<String>,
}

impl HasId for Vehicle {
    type IdType = String;
}

impl Vehicle {
    /// Does any of the vehicle's charge ports accept the given connector?
    pub fn accepts(&self, connector_type: ConnectorType) -> bool {
        self.ac_connector_type == Some(connector_type)
            || self.dc_connector_type == Some(connector_type)
    }

    pub fn accepts_via_ac(&self, connector_type: ConnectorType) -> bool {
        self.ac_connector_type == Some(connector_type)
    }
}

impl ExampleData for Vehicle {
    fn example_data() -> Self {
        Vehicle {
            brand: "Tata".to_owned(),
            model: "Nexon EV".to_owned(),
            variant: Some("Long Range".to_owned()),
            vehicle_type: VehicleType::FourWheeler,
            battery_capacity_kwh: 40.5,
            ac_connector_type: Some(ConnectorType::Type2Ac),
            ac_max_power_kw: Some(7.2),
            dc_connector_type: Some(ConnectorType::Ccs2),
            dc_max_power_kw: Some(50.0),
            efficiency_wh_per_km: 140.0,
            image_url: None,
        }
    }
}

/// A vehicle in a user's garage. `vehicle` is joined in when the catalog
/// entry is fetched alongside.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserVehicle {
    pub user_id: String,
    pub vehicle_id: Id<Vehicle>,
    pub nickname: Option<String>,
    pub is_default: bool,
    pub vehicle: Option<WithId<Vehicle>>,
}

impl HasId for UserVehicle {
    type IdType = String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_type_wire_names_roundtrip() {
        assert_eq!(VehicleType::from_wire("2W"), Some(VehicleType::TwoWheeler));
        assert_eq!(VehicleType::from_wire("4W"), Some(VehicleType::FourWheeler));
        assert_eq!(VehicleType::from_wire("3W"), None);
        assert_eq!(VehicleType::TwoWheeler.as_wire(), "2W");
    }

    #[test]
    fn accepts_checks_both_ports() {
        let vehicle = Vehicle::example_data();
        assert!(vehicle.accepts(ConnectorType::Ccs2));
        assert!(vehicle.accepts(ConnectorType::Type2Ac));
        assert!(!vehicle.accepts(ConnectorType::Chademo));
        assert!(vehicle.accepts_via_ac(ConnectorType::Type2Ac));
        assert!(!vehicle.accepts_via_ac(ConnectorType::Ccs2));
    }
}
