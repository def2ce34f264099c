pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Returns `((min_lat, min_lon), (max_lat, max_lon))` in degrees for a circle
/// of `radius_km` around the given center. Used as a cheap prefilter before
/// the exact distance calculation at database level.
pub fn calculate_bounding_box(
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> ((f64, f64), (f64, f64)) {
    let lat_rad = to_radians(latitude);
    let lon_rad = to_radians(longitude);

    let min_lat = lat_rad - radius_km / EARTH_RADIUS_KM;
    let max_lat = lat_rad + radius_km / EARTH_RADIUS_KM;

    // longitude degrees shrink with latitude
    let min_lon = lon_rad - radius_km / (EARTH_RADIUS_KM * lat_rad.cos());
    let max_lon = lon_rad + radius_km / (EARTH_RADIUS_KM * lat_rad.cos());

    (
        (to_degrees(min_lat), to_degrees(min_lon)),
        (to_degrees(max_lat), to_degrees(max_lon)),
    )
}

/// Great-circle distance between two coordinates in kilometers.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    // Connaught Place and India Gate, New Delhi. Roughly 2.5 km apart.
    const CONNAUGHT_PLACE: (f64, f64) = (28.6315, 77.2167);
    const INDIA_GATE: (f64, f64) = (28.6129, 77.2295);

    #[test]
    fn haversine_distance_matches_known_pair() {
        let distance = haversine_distance(
            CONNAUGHT_PLACE.0,
            CONNAUGHT_PLACE.1,
            INDIA_GATE.0,
            INDIA_GATE.1,
        );
        assert!(distance > 2.0 && distance < 3.0, "got {distance}");
    }

    #[test]
    fn haversine_distance_is_zero_for_same_point() {
        let distance = haversine_distance(
            CONNAUGHT_PLACE.0,
            CONNAUGHT_PLACE.1,
            CONNAUGHT_PLACE.0,
            CONNAUGHT_PLACE.1,
        );
        assert!(distance.abs() < 1e-9);
    }

    #[test]
    fn bounding_box_contains_points_within_radius() {
        let ((min_lat, min_lon), (max_lat, max_lon)) =
            calculate_bounding_box(CONNAUGHT_PLACE.0, CONNAUGHT_PLACE.1, 5.0);
        assert!(min_lat < INDIA_GATE.0 && INDIA_GATE.0 < max_lat);
        assert!(min_lon < INDIA_GATE.1 && INDIA_GATE.1 < max_lon);
        assert!(min_lat < CONNAUGHT_PLACE.0 && CONNAUGHT_PLACE.0 < max_lat);
    }
}
