use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::station::Station;

/// Amenity tags as used in filter queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AmenityTag {
    Washroom,
    Food,
    CoffeeTea,
    Wifi,
    SittingArea,
    Shade,
    Atm,
}

impl AmenityTag {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "washroom" => Some(Self::Washroom),
            "food" => Some(Self::Food),
            "coffee_tea" => Some(Self::CoffeeTea),
            "wifi" => Some(Self::Wifi),
            "sitting_area" => Some(Self::SittingArea),
            "shade" => Some(Self::Shade),
            "atm" => Some(Self::Atm),
            _ => None,
        }
    }
}

/// At most one amenities record exists per station.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationAmenities {
    #[serde(skip)]
    pub station_id: Id<Station>,
    pub has_washroom: bool,
    pub has_food: bool,
    pub has_coffee_tea: bool,
    pub has_wifi: bool,
    pub has_sitting_area: bool,
    pub has_shade: bool,
    pub nearby_atm: bool,
    pub safety_rating: Option<i16>,
}

impl StationAmenities {
    pub fn has(&self, tag: AmenityTag) -> bool {
        match tag {
            AmenityTag::Washroom => self.has_washroom,
            AmenityTag::Food => self.has_food,
            AmenityTag::CoffeeTea => self.has_coffee_tea,
            AmenityTag::Wifi => self.has_wifi,
            AmenityTag::SittingArea => self.has_sitting_area,
            AmenityTag::Shade => self.has_shade,
            AmenityTag::Atm => self.nearby_atm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amenities() -> StationAmenities {
        StationAmenities {
            station_id: Id::new("station-1".to_owned()),
            has_washroom: true,
            has_food: false,
            has_coffee_tea: true,
            has_wifi: false,
            has_sitting_area: true,
            has_shade: false,
            nearby_atm: true,
            safety_rating: Some(4),
        }
    }

    #[test]
    fn has_maps_each_tag_to_its_flag() {
        let record = amenities();
        assert!(record.has(AmenityTag::Washroom));
        assert!(!record.has(AmenityTag::Food));
        assert!(record.has(AmenityTag::CoffeeTea));
        assert!(!record.has(AmenityTag::Wifi));
        assert!(record.has(AmenityTag::SittingArea));
        assert!(!record.has(AmenityTag::Shade));
        assert!(record.has(AmenityTag::Atm));
    }

    #[test]
    fn tag_wire_names_parse() {
        assert_eq!(AmenityTag::from_wire("coffee_tea"), Some(AmenityTag::CoffeeTea));
        assert_eq!(AmenityTag::from_wire("sauna"), None);
    }
}
