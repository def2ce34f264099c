use model::amenities::StationAmenities;
use sqlx::prelude::FromRow;
use utility::id::Id;

/// No surrogate id is exposed for amenities; the station id is the key.
#[derive(Debug, Clone, FromRow)]
pub struct AmenitiesRow {
    pub station_id: String,
    pub has_washroom: bool,
    pub has_food: bool,
    pub has_coffee_tea: bool,
    pub has_wifi: bool,
    pub has_sitting_area: bool,
    pub has_shade: bool,
    pub nearby_atm: bool,
    pub safety_rating: Option<i16>,
}

impl AmenitiesRow {
    pub fn to_model(self) -> StationAmenities {
        StationAmenities {
            station_id: Id::new(self.station_id),
            has_washroom: self.has_washroom,
            has_food: self.has_food,
            has_coffee_tea: self.has_coffee_tea,
            has_wifi: self.has_wifi,
            has_sitting_area: self.has_sitting_area,
            has_shade: self.has_shade,
            nearby_atm: self.nearby_atm,
            safety_rating: self.safety_rating,
        }
    }
}
