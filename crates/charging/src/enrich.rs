//! The enrichment engine: joins bulk-fetched related records onto a batch of
//! candidate stations and computes the vehicle-dependent fields.
//!
//! Pure and order-preserving: the output list has the same length and order
//! as the candidate list. All fetching happens in [`crate::client::Client`].

use std::collections::HashMap;

use model::{
    amenities::StationAmenities,
    connector::StationConnector,
    enriched::{CompatibilityStatus, EnrichedStation},
    pricing::{PricingModel, StationPricing},
    review::ReviewRating,
    station::Station,
    vehicle::Vehicle,
    WithDistance, WithId,
};
use utility::id::Id;

/// Cost and time estimates assume a 0% -> 60% charge, not a true
/// state-of-charge delta. Deliberately not caller-configurable.
pub const CHARGE_TARGET_FRACTION: f64 = 0.6;

/// Assumed charger efficiency for time estimates.
pub const CHARGER_EFFICIENCY: f64 = 0.9;

/// The four bulk-fetched record sets scoped to one candidate batch.
#[derive(Debug, Default)]
pub struct RelatedRecords {
    pub connectors: Vec<WithId<StationConnector>>,
    pub pricing: Vec<WithId<StationPricing>>,
    pub amenities: Vec<StationAmenities>,
    pub review_ratings: Vec<ReviewRating>,
}

/// Joins the related records onto the candidates and computes per-station
/// aggregates, plus compatibility and estimates when a vehicle is given.
///
/// Rows whose station id is not part of the candidate batch are ignored.
pub fn enrich_stations(
    candidates: Vec<WithDistance<WithId<Station>>>,
    related: RelatedRecords,
    vehicle: Option<&Vehicle>,
) -> Vec<WithDistance<EnrichedStation>> {
    // One indexed lookup structure per relation, built once per request.
    let mut connectors_by_station = index_by_station(
        related.connectors,
        |connector| connector.content.station_id.clone(),
    );
    let mut pricing_by_station =
        index_by_station(related.pricing, |pricing| pricing.content.station_id.clone());
    let mut amenities_by_station = index_by_station(related.amenities, |amenities| {
        amenities.station_id.clone()
    });
    let mut ratings_by_station = index_by_station(related.review_ratings, |rating| {
        rating.station_id.clone()
    });

    candidates
        .into_iter()
        .map(|candidate| {
            candidate.map(|station| {
                let connectors = connectors_by_station
                    .remove(&station.id)
                    .unwrap_or_default();
                let pricing =
                    pricing_by_station.remove(&station.id).unwrap_or_default();
                let amenities = amenities_by_station
                    .remove(&station.id)
                    .and_then(|mut records| records.pop());
                let ratings =
                    ratings_by_station.remove(&station.id).unwrap_or_default();
                enrich_one(station, connectors, pricing, amenities, &ratings, vehicle)
            })
        })
        .collect()
}

/// Single-station variant used by the detail view, where no distance is
/// carried. Related rows for other stations are ignored here as well.
pub fn enrich_station(
    station: WithId<Station>,
    related: RelatedRecords,
    vehicle: Option<&Vehicle>,
) -> EnrichedStation {
    let id = &station.id;
    let connectors = related
        .connectors
        .into_iter()
        .filter(|connector| &connector.content.station_id == id)
        .collect::<Vec<_>>();
    let pricing = related
        .pricing
        .into_iter()
        .filter(|pricing| &pricing.content.station_id == id)
        .collect::<Vec<_>>();
    let amenities = related
        .amenities
        .into_iter()
        .find(|amenities| &amenities.station_id == id);
    let ratings = related
        .review_ratings
        .into_iter()
        .filter(|rating| &rating.station_id == id)
        .collect::<Vec<_>>();
    enrich_one(station, connectors, pricing, amenities, &ratings, vehicle)
}

fn enrich_one(
    station: WithId<Station>,
    connectors: Vec<WithId<StationConnector>>,
    pricing: Vec<WithId<StationPricing>>,
    amenities: Option<StationAmenities>,
    ratings: &[ReviewRating],
    vehicle: Option<&Vehicle>,
) -> EnrichedStation {
    let avg_rating = average_rating(ratings);
    let total_reviews = ratings.len();

    let (compatibility_status, estimated_cost, estimated_charge_time) = match vehicle
    {
        Some(vehicle) if !connectors.is_empty() => (
            Some(classify_compatibility(vehicle, &connectors)),
            estimate_cost(vehicle, pricing.first()),
            estimate_charge_time_minutes(vehicle, &connectors),
        ),
        _ => (None, None, None),
    };

    EnrichedStation {
        station,
        connectors,
        pricing,
        amenities,
        avg_rating,
        total_reviews,
        compatibility_status,
        estimated_cost,
        estimated_charge_time_minutes: estimated_charge_time,
        reviews: None,
    }
}

fn index_by_station<T, F>(rows: Vec<T>, station_id: F) -> HashMap<Id<Station>, Vec<T>>
where
    F: Fn(&T) -> Id<Station>,
{
    let mut index: HashMap<Id<Station>, Vec<T>> = HashMap::new();
    for row in rows {
        index.entry(station_id(&row)).or_default().push(row);
    }
    index
}

/// Arithmetic mean of the ratings; `None` for zero reviews.
pub fn average_rating(ratings: &[ReviewRating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: u32 = ratings.iter().map(|rating| rating.rating as u32).sum();
    Some(sum as f64 / ratings.len() as f64)
}

/// `Compatible` if any connector matches the vehicle's AC or DC type,
/// `Partial` if only the AC type is found, `Incompatible` otherwise.
fn classify_compatibility(
    vehicle: &Vehicle,
    connectors: &[WithId<StationConnector>],
) -> CompatibilityStatus {
    let full = connectors
        .iter()
        .any(|connector| vehicle.accepts(connector.content.connector_type));
    if full {
        return CompatibilityStatus::Compatible;
    }
    let partial = connectors
        .iter()
        .any(|connector| vehicle.accepts_via_ac(connector.content.connector_type));
    if partial {
        CompatibilityStatus::Partial
    } else {
        CompatibilityStatus::Incompatible
    }
}

/// Only computed when the station's first tariff is energy-based.
fn estimate_cost(
    vehicle: &Vehicle,
    first_pricing: Option<&WithId<StationPricing>>,
) -> Option<f64> {
    let pricing = first_pricing?;
    if pricing.content.pricing_model != PricingModel::PerKwh {
        return None;
    }
    let energy_needed_kwh = vehicle.battery_capacity_kwh * CHARGE_TARGET_FRACTION;
    Some(energy_needed_kwh * pricing.content.price_value)
}

/// Time at the highest-powered connector matching the vehicle, in minutes.
/// `None` when no connector matches.
fn estimate_charge_time_minutes(
    vehicle: &Vehicle,
    connectors: &[WithId<StationConnector>],
) -> Option<f64> {
    let best_power_kw = connectors
        .iter()
        .filter(|connector| vehicle.accepts(connector.content.connector_type))
        .map(|connector| connector.content.power_kw)
        .fold(None, |max: Option<f64>, power| match max {
            Some(current) if current >= power => Some(current),
            _ => Some(power),
        })?;
    let energy_needed_kwh = vehicle.battery_capacity_kwh * CHARGE_TARGET_FRACTION;
    Some(energy_needed_kwh / (best_power_kw * CHARGER_EFFICIENCY) * 60.0)
}

#[cfg(test)]
mod tests {
    use model::{
        connector::ConnectorType,
        station::{DataSource, Location},
        vehicle::VehicleType,
        ExampleData,
    };

    use super::*;

    fn station(id: &str, name: &str) -> WithId<Station> {
        WithId::new(
            Id::new(id.to_owned()),
            Station {
                name: name.to_owned(),
                network: Some("Tata Power".to_owned()),
                location: Location {
                    latitude: 28.6315,
                    longitude: 77.2167,
                },
                address: "Inner Circle".to_owned(),
                city: "New Delhi".to_owned(),
                state: "Delhi".to_owned(),
                pincode: None,
                is_24x7: true,
                parking_type: None,
                source: DataSource::Seed,
                trust_level: Some(80),
                last_verified_at: None,
            },
        )
    }

    fn candidate(id: &str, distance_km: f64) -> WithDistance<WithId<Station>> {
        WithDistance::new(distance_km, station(id, id))
    }

    fn connector(
        station_id: &str,
        connector_type: ConnectorType,
        power_kw: f64,
    ) -> WithId<StationConnector> {
        WithId::new(
            Id::new(format!("{station_id}-{power_kw}")),
            StationConnector {
                station_id: Id::new(station_id.to_owned()),
                connector_type,
                power_kw,
                is_dc_fast: power_kw >= 25.0,
                count: 1,
                vehicle_type: VehicleType::FourWheeler,
            },
        )
    }

    fn pricing(
        station_id: &str,
        model: PricingModel,
        price_value: f64,
    ) -> WithId<StationPricing> {
        WithId::new(
            Id::new(format!("{station_id}-pricing")),
            StationPricing {
                station_id: Id::new(station_id.to_owned()),
                connector_type: None,
                pricing_model: model,
                price_value,
                parking_charges: None,
                remarks: None,
            },
        )
    }

    fn rating(station_id: &str, rating: u8) -> ReviewRating {
        ReviewRating {
            station_id: Id::new(station_id.to_owned()),
            rating,
        }
    }

    /// A 40 kWh CCS2/Type 2 AC vehicle, as used by the cost example.
    fn test_vehicle() -> Vehicle {
        Vehicle {
            battery_capacity_kwh: 40.0,
            ..Vehicle::example_data()
        }
    }

    #[test]
    fn output_preserves_input_length_and_order() {
        let candidates =
            vec![candidate("a", 1.0), candidate("b", 2.0), candidate("c", 3.0)];
        let enriched =
            enrich_stations(candidates, RelatedRecords::default(), None);
        let ids: Vec<String> = enriched
            .iter()
            .map(|station| station.content.station.id.raw())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn zero_reviews_leave_avg_rating_unset() {
        let related = RelatedRecords {
            review_ratings: vec![rating("other", 5)],
            ..Default::default()
        };
        let enriched = enrich_stations(vec![candidate("a", 1.0)], related, None);
        assert_eq!(enriched[0].content.avg_rating, None);
        assert_eq!(enriched[0].content.total_reviews, 0);
    }

    #[test]
    fn avg_rating_is_arithmetic_mean() {
        let related = RelatedRecords {
            review_ratings: vec![rating("a", 5), rating("a", 4), rating("a", 3)],
            ..Default::default()
        };
        let enriched = enrich_stations(vec![candidate("a", 1.0)], related, None);
        assert_eq!(enriched[0].content.avg_rating, Some(4.0));
        assert_eq!(enriched[0].content.total_reviews, 3);
    }

    #[test]
    fn rows_outside_the_candidate_batch_are_ignored() {
        let related = RelatedRecords {
            connectors: vec![connector("stranger", ConnectorType::Ccs2, 50.0)],
            pricing: vec![pricing("stranger", PricingModel::PerKwh, 10.0)],
            ..Default::default()
        };
        let enriched = enrich_stations(vec![candidate("a", 1.0)], related, None);
        assert!(enriched[0].content.connectors.is_empty());
        assert!(enriched[0].content.pricing.is_empty());
    }

    #[test]
    fn compatibility_matrix() {
        let vehicle = test_vehicle();
        let cases = [
            // exact DC match
            (ConnectorType::Ccs2, CompatibilityStatus::Compatible),
            // exact AC match counts as fully compatible too
            (ConnectorType::Type2Ac, CompatibilityStatus::Compatible),
            // nothing matches
            (ConnectorType::Chademo, CompatibilityStatus::Incompatible),
        ];
        for (connector_type, expected) in cases {
            let related = RelatedRecords {
                connectors: vec![connector("a", connector_type, 30.0)],
                ..Default::default()
            };
            let enriched =
                enrich_stations(vec![candidate("a", 1.0)], related, Some(&vehicle));
            assert_eq!(
                enriched[0].content.compatibility_status,
                Some(expected),
                "connector {connector_type:?}"
            );
        }
    }

    #[test]
    fn ac_match_is_fully_compatible_even_without_dc_port() {
        let vehicle = Vehicle {
            dc_connector_type: None,
            ..test_vehicle()
        };
        let related = RelatedRecords {
            connectors: vec![
                connector("a", ConnectorType::Chademo, 50.0),
                connector("a", ConnectorType::Type2Ac, 7.2),
            ],
            ..Default::default()
        };
        let enriched =
            enrich_stations(vec![candidate("a", 1.0)], related, Some(&vehicle));
        // Type 2 AC matches the AC port, which still counts as compatible.
        assert_eq!(
            enriched[0].content.compatibility_status,
            Some(CompatibilityStatus::Compatible)
        );
    }

    #[test]
    fn no_connectors_means_no_vehicle_fields() {
        let vehicle = test_vehicle();
        let related = RelatedRecords {
            pricing: vec![pricing("a", PricingModel::PerKwh, 10.0)],
            ..Default::default()
        };
        let enriched =
            enrich_stations(vec![candidate("a", 1.0)], related, Some(&vehicle));
        assert_eq!(enriched[0].content.compatibility_status, None);
        assert_eq!(enriched[0].content.estimated_cost, None);
        assert_eq!(enriched[0].content.estimated_charge_time_minutes, None);
    }

    #[test]
    fn cost_covers_sixty_percent_charge_at_per_kwh_price() {
        let vehicle = test_vehicle();
        let related = RelatedRecords {
            connectors: vec![connector("a", ConnectorType::Ccs2, 50.0)],
            pricing: vec![pricing("a", PricingModel::PerKwh, 10.0)],
            ..Default::default()
        };
        let enriched =
            enrich_stations(vec![candidate("a", 1.0)], related, Some(&vehicle));
        // 40 kWh * 0.6 * 10 rupees
        assert_eq!(enriched[0].content.estimated_cost, Some(240.0));
    }

    #[test]
    fn cost_skipped_for_non_energy_pricing() {
        let vehicle = test_vehicle();
        let related = RelatedRecords {
            connectors: vec![connector("a", ConnectorType::Ccs2, 50.0)],
            pricing: vec![pricing("a", PricingModel::FlatSession, 100.0)],
            ..Default::default()
        };
        let enriched =
            enrich_stations(vec![candidate("a", 1.0)], related, Some(&vehicle));
        assert_eq!(enriched[0].content.estimated_cost, None);
    }

    #[test]
    fn charge_time_uses_fastest_matching_connector() {
        let vehicle = test_vehicle();
        let related = RelatedRecords {
            connectors: vec![
                connector("a", ConnectorType::Type2Ac, 7.2),
                connector("a", ConnectorType::Ccs2, 50.0),
                // faster, but the vehicle can not use it
                connector("a", ConnectorType::GbtDc, 120.0),
            ],
            ..Default::default()
        };
        let enriched =
            enrich_stations(vec![candidate("a", 1.0)], related, Some(&vehicle));
        // 24 kWh / (50 kW * 0.9) * 60 min
        let expected = 24.0 / 45.0 * 60.0;
        let actual = enriched[0].content.estimated_charge_time_minutes.unwrap();
        assert!((actual - expected).abs() < 1e-9, "got {actual}");
    }

    #[test]
    fn charge_time_unset_without_matching_connector() {
        let vehicle = test_vehicle();
        let related = RelatedRecords {
            connectors: vec![connector("a", ConnectorType::Chademo, 50.0)],
            ..Default::default()
        };
        let enriched =
            enrich_stations(vec![candidate("a", 1.0)], related, Some(&vehicle));
        assert_eq!(enriched[0].content.estimated_charge_time_minutes, None);
    }

    #[test]
    fn empty_candidate_batch_yields_empty_result() {
        let enriched = enrich_stations(vec![], RelatedRecords::default(), None);
        assert!(enriched.is_empty());
    }
}
