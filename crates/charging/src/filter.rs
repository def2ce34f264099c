//! Post-enrichment filtering and ranking.
//!
//! Filters are AND-combined predicates over the enriched set; sorting is
//! stable so that ties keep their relative distance order.

use model::{
    amenities::AmenityTag, connector::ConnectorType, enriched::EnrichedStation,
    WithDistance,
};

/// Default trust level for the `best` score when a station carries none.
const DEFAULT_TRUST_LEVEL: f64 = 50.0;

/// Predicate set for the nearby-station list. Unset fields do not filter.
#[derive(Debug, Default, Clone)]
pub struct StationFilters {
    /// Case-insensitive substring match on name, address, city or network.
    pub query: Option<String>,
    pub connector_type: Option<ConnectorType>,
    pub dc_fast: Option<bool>,
    /// Exact network name.
    pub network: Option<String>,
    pub open_24x7: Option<bool>,
    pub min_power_kw: Option<f64>,
    /// Every listed amenity must be present. A station without an amenities
    /// record fails any non-empty amenity filter.
    pub amenities: Vec<AmenityTag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Distance,
    Price,
    Rating,
    Best,
}

impl SortKey {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "distance" => Some(Self::Distance),
            "price" => Some(Self::Price),
            "rating" => Some(Self::Rating),
            "best" => Some(Self::Best),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Price => "price",
            Self::Rating => "rating",
            Self::Best => "best",
        }
    }
}

/// Retains the stations satisfying every supplied predicate.
pub fn filter_stations(
    stations: Vec<WithDistance<EnrichedStation>>,
    filters: &StationFilters,
) -> Vec<WithDistance<EnrichedStation>> {
    stations
        .into_iter()
        .filter(|station| matches_filters(&station.content, filters))
        .collect()
}

fn matches_filters(station: &EnrichedStation, filters: &StationFilters) -> bool {
    if let Some(query) = &filters.query {
        if !matches_query(station, query) {
            return false;
        }
    }
    if let Some(connector_type) = filters.connector_type {
        if !station.has_connector_type(connector_type) {
            return false;
        }
    }
    if let Some(dc_fast) = filters.dc_fast {
        if !station.has_dc_fast(dc_fast) {
            return false;
        }
    }
    if let Some(network) = &filters.network {
        if station.station.content.network.as_deref() != Some(network.as_str()) {
            return false;
        }
    }
    if let Some(open_24x7) = filters.open_24x7 {
        if station.station.content.is_24x7 != open_24x7 {
            return false;
        }
    }
    if let Some(min_power_kw) = filters.min_power_kw {
        let meets_threshold = station
            .max_connector_power_kw()
            .is_some_and(|power| power >= min_power_kw);
        if !meets_threshold {
            return false;
        }
    }
    if !filters.amenities.is_empty() {
        let Some(amenities) = &station.amenities else {
            return false;
        };
        if !filters.amenities.iter().all(|tag| amenities.has(*tag)) {
            return false;
        }
    }
    true
}

fn matches_query(station: &EnrichedStation, query: &str) -> bool {
    let needle = query.to_lowercase();
    let content = &station.station.content;
    [
        Some(content.name.as_str()),
        Some(content.address.as_str()),
        Some(content.city.as_str()),
        content.network.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Sorts in place. `radius_km` is the search radius, used to normalize the
/// distance term of the `best` score.
pub fn sort_stations(
    stations: &mut [WithDistance<EnrichedStation>],
    sort_key: SortKey,
    radius_km: f64,
) {
    match sort_key {
        SortKey::Distance => stations.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortKey::Price => stations.sort_by(|a, b| {
            sort_price(&a.content)
                .partial_cmp(&sort_price(&b.content))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortKey::Rating => stations.sort_by(|a, b| {
            sort_rating(&b.content)
                .partial_cmp(&sort_rating(&a.content))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortKey::Best => stations.sort_by(|a, b| {
            best_score(b, radius_km)
                .partial_cmp(&best_score(a, radius_km))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
    }
}

/// Unpriced stations sort after every priced one.
fn sort_price(station: &EnrichedStation) -> f64 {
    station
        .first_price()
        .map(|pricing| pricing.price_value)
        .unwrap_or(f64::INFINITY)
}

/// Unrated stations sort last under the descending rating order.
fn sort_rating(station: &EnrichedStation) -> f64 {
    station.avg_rating.unwrap_or(0.0)
}

/// Blend of trust, rating and proximity; higher is better.
fn best_score(station: &WithDistance<EnrichedStation>, radius_km: f64) -> f64 {
    let trust = station
        .content
        .station
        .content
        .trust_level
        .map(|level| level as f64)
        .unwrap_or(DEFAULT_TRUST_LEVEL);
    let rating = station.content.avg_rating.unwrap_or(0.0);
    trust / 100.0 + rating / 5.0 - station.distance_km / radius_km
}

#[cfg(test)]
mod tests {
    use model::{
        amenities::StationAmenities,
        connector::StationConnector,
        pricing::{PricingModel, StationPricing},
        station::{DataSource, Location, Station},
        vehicle::VehicleType,
        WithId,
    };
    use utility::id::Id;

    use super::*;

    struct StationSpec {
        id: &'static str,
        distance_km: f64,
        price: Option<f64>,
        avg_rating: Option<f64>,
        trust_level: Option<i16>,
        dc_fast: bool,
        power_kw: f64,
    }

    impl Default for StationSpec {
        fn default() -> Self {
            Self {
                id: "station",
                distance_km: 1.0,
                price: None,
                avg_rating: None,
                trust_level: Some(80),
                dc_fast: false,
                power_kw: 7.2,
            }
        }
    }

    fn build(spec: StationSpec) -> WithDistance<EnrichedStation> {
        let station_id: Id<Station> = Id::new(spec.id.to_owned());
        let connectors = vec![WithId::new(
            Id::new(format!("{}-connector", spec.id)),
            StationConnector {
                station_id: station_id.clone(),
                connector_type: ConnectorType::Ccs2,
                power_kw: spec.power_kw,
                is_dc_fast: spec.dc_fast,
                count: 2,
                vehicle_type: VehicleType::FourWheeler,
            },
        )];
        let pricing = spec
            .price
            .map(|price_value| {
                vec![WithId::new(
                    Id::new(format!("{}-pricing", spec.id)),
                    StationPricing {
                        station_id: station_id.clone(),
                        connector_type: None,
                        pricing_model: PricingModel::PerKwh,
                        price_value,
                        parking_charges: None,
                        remarks: None,
                    },
                )]
            })
            .unwrap_or_default();
        WithDistance::new(
            spec.distance_km,
            EnrichedStation {
                station: WithId::new(
                    station_id,
                    Station {
                        name: format!("{} charging hub", spec.id),
                        network: Some("Tata Power".to_owned()),
                        location: Location {
                            latitude: 28.6,
                            longitude: 77.2,
                        },
                        address: "MG Road".to_owned(),
                        city: "Bengaluru".to_owned(),
                        state: "Karnataka".to_owned(),
                        pincode: None,
                        is_24x7: true,
                        parking_type: None,
                        source: DataSource::Seed,
                        trust_level: spec.trust_level,
                        last_verified_at: None,
                    },
                ),
                connectors,
                pricing,
                amenities: None,
                avg_rating: spec.avg_rating,
                total_reviews: spec.avg_rating.map(|_| 3).unwrap_or(0),
                compatibility_status: None,
                estimated_cost: None,
                estimated_charge_time_minutes: None,
                reviews: None,
            },
        )
    }

    fn ids(stations: &[WithDistance<EnrichedStation>]) -> Vec<String> {
        stations
            .iter()
            .map(|station| station.content.station.id.raw())
            .collect()
    }

    #[test]
    fn dc_fast_filter_drops_ac_only_stations() {
        let stations = vec![
            build(StationSpec {
                id: "slow",
                dc_fast: false,
                ..Default::default()
            }),
            build(StationSpec {
                id: "fast",
                dc_fast: true,
                ..Default::default()
            }),
        ];
        let filters = StationFilters {
            dc_fast: Some(true),
            ..Default::default()
        };
        assert_eq!(ids(&filter_stations(stations, &filters)), vec!["fast"]);
    }

    #[test]
    fn text_query_matches_city_case_insensitively() {
        let stations = vec![build(StationSpec::default())];
        let filters = StationFilters {
            query: Some("BENGA".to_owned()),
            ..Default::default()
        };
        assert_eq!(filter_stations(stations, &filters).len(), 1);
    }

    #[test]
    fn min_power_filter_uses_the_best_connector() {
        let stations = vec![
            build(StationSpec {
                id: "weak",
                power_kw: 7.2,
                ..Default::default()
            }),
            build(StationSpec {
                id: "strong",
                power_kw: 60.0,
                ..Default::default()
            }),
        ];
        let filters = StationFilters {
            min_power_kw: Some(25.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter_stations(stations, &filters)), vec!["strong"]);
    }

    #[test]
    fn amenity_filter_fails_stations_without_a_record() {
        let mut with_wifi = build(StationSpec {
            id: "wifi",
            ..Default::default()
        });
        with_wifi.content.amenities = Some(StationAmenities {
            station_id: Id::new("wifi".to_owned()),
            has_washroom: false,
            has_food: false,
            has_coffee_tea: false,
            has_wifi: true,
            has_sitting_area: false,
            has_shade: false,
            nearby_atm: false,
            safety_rating: None,
        });
        let stations = vec![build(StationSpec::default()), with_wifi];
        let filters = StationFilters {
            amenities: vec![AmenityTag::Wifi],
            ..Default::default()
        };
        assert_eq!(ids(&filter_stations(stations, &filters)), vec!["wifi"]);
    }

    #[test]
    fn price_sort_puts_unpriced_stations_last() {
        let mut stations = vec![
            build(StationSpec {
                id: "unpriced",
                price: None,
                ..Default::default()
            }),
            build(StationSpec {
                id: "expensive",
                price: Some(22.0),
                ..Default::default()
            }),
            build(StationSpec {
                id: "cheap",
                price: Some(12.0),
                ..Default::default()
            }),
        ];
        sort_stations(&mut stations, SortKey::Price, 10.0);
        assert_eq!(ids(&stations), vec!["cheap", "expensive", "unpriced"]);
    }

    #[test]
    fn rating_sort_puts_unrated_stations_last() {
        let mut stations = vec![
            build(StationSpec {
                id: "good",
                avg_rating: Some(4.5),
                ..Default::default()
            }),
            build(StationSpec {
                id: "unrated",
                avg_rating: None,
                ..Default::default()
            }),
            build(StationSpec {
                id: "okay",
                avg_rating: Some(3.0),
                ..Default::default()
            }),
        ];
        sort_stations(&mut stations, SortKey::Rating, 10.0);
        assert_eq!(ids(&stations), vec!["good", "okay", "unrated"]);
    }

    #[test]
    fn best_sort_blends_trust_rating_and_proximity() {
        let mut stations = vec![
            // 0.9 + 0.0 - 0.5 = 0.4
            build(StationSpec {
                id: "trusted_far",
                trust_level: Some(90),
                avg_rating: None,
                distance_km: 5.0,
                ..Default::default()
            }),
            // 0.5 (default trust) + 0.9 - 0.1 = 1.3
            build(StationSpec {
                id: "loved_near",
                trust_level: None,
                avg_rating: Some(4.5),
                distance_km: 1.0,
                ..Default::default()
            }),
        ];
        sort_stations(&mut stations, SortKey::Best, 10.0);
        assert_eq!(ids(&stations), vec!["loved_near", "trusted_far"]);
    }

    #[test]
    fn filter_and_sort_are_idempotent() {
        let make = || {
            vec![
                build(StationSpec {
                    id: "a",
                    price: Some(18.0),
                    distance_km: 3.0,
                    ..Default::default()
                }),
                build(StationSpec {
                    id: "b",
                    price: Some(18.0),
                    distance_km: 1.0,
                    ..Default::default()
                }),
                build(StationSpec {
                    id: "c",
                    price: None,
                    distance_km: 2.0,
                    ..Default::default()
                }),
            ]
        };
        let filters = StationFilters::default();
        let mut once = filter_stations(make(), &filters);
        sort_stations(&mut once, SortKey::Price, 10.0);
        let mut twice = filter_stations(make(), &filters);
        sort_stations(&mut twice, SortKey::Price, 10.0);
        sort_stations(&mut twice, SortKey::Price, 10.0);
        // ties keep their relative order, so re-sorting changes nothing
        assert_eq!(ids(&once), vec!["a", "b", "c"]);
        assert_eq!(ids(&once), ids(&twice));
    }
}
