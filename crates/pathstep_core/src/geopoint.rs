use rstar::{AABB, PointDistance, RTreeObject};
use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_KM;

/// A geographic coordinate in degrees.
///
/// Serialized as a `[lat, lng]` pair, which is the shape clients send and
/// receive when drawing on a map.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance in kilometers.
    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lat, lng]: [f64; 2]) -> Self {
        GeoPoint { lat, lng }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lat, point.lng]
    }
}

impl RTreeObject for GeoPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lng, self.lat])
    }
}

/// Squared planar distance in `[lng, lat]` degrees, the envelope's own units.
impl PointDistance for GeoPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let delta_lng = point[0] - self.lng;
        let delta_lat = point[1] - self.lat;
        delta_lng * delta_lng + delta_lat * delta_lat
    }
}

pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();

    let delta_lat = lat2_rad - lat1_rad;
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use rstar::Envelope;

    use super::*;

    #[test]
    fn distance_to_itself_is_zero() {
        let hanoi = GeoPoint::new(21.0285, 105.8542);
        assert_eq!(hanoi.haversine_distance(&hanoi), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let expected = EARTH_RADIUS_KM * 1_f64.to_radians();
        assert!((a.haversine_distance(&b) - expected).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let paris = GeoPoint::new(48.8566, 2.3522);
        let brussels = GeoPoint::new(50.8503, 4.3517);
        let there = paris.haversine_distance(&brussels);
        let back = brussels.haversine_distance(&paris);
        assert!((there - back).abs() < 1e-9);
        assert!((there - 264.0).abs() < 2.0, "got {there}");
    }

    #[test]
    fn tree_distance_matches_envelope_units() {
        let point = GeoPoint::new(1.0, 2.0);
        let envelope = point.envelope();
        let query = [5.0, 4.0];
        assert_eq!(point.distance_2(&query), 18.0);
        assert_eq!(envelope.distance_2(&query), point.distance_2(&query));
    }

    #[test]
    fn serializes_as_lat_lng_pair() {
        let point = GeoPoint::new(21.0285, 105.8542);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, "[21.0285,105.8542]");

        let parsed: GeoPoint = serde_json::from_str("[1.5,2.5]").unwrap();
        assert_eq!(parsed, GeoPoint::new(1.5, 2.5));
    }
}
