use pathstep_core::{geopoint::GeoPoint, road_graph::ParallelEdgePolicy};

pub fn parse_parallel_edge_policy(input: &str) -> Result<ParallelEdgePolicy, String> {
    input.parse().map_err(|error| format!("{}", error))
}

/// Parses `lat,lng` in degrees.
pub fn parse_coordinates(input: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = input
        .split_once(',')
        .ok_or_else(|| String::from("Expected coordinates as lat,lng"))?;

    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("Invalid latitude '{}'", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("Invalid longitude '{}'", lng.trim()))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Latitude {} is out of range", lat));
    }

    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("Longitude {} is out of range", lng));
    }

    Ok(GeoPoint::new(lat, lng))
}
