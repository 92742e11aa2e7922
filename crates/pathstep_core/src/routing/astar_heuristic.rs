use crate::{geopoint::GeoPoint, types::Weight};

/// Lower-bound estimate of the remaining cost between two points.
///
/// Implementations must be admissible and consistent for the incremental
/// search to return shortest paths.
pub trait DistanceHeuristic {
    fn estimate(&self, from: &GeoPoint, to: &GeoPoint) -> Weight;
}

/// Straight-line distance on a sphere of radius 6371 km.
#[derive(Debug, Default, Clone, Copy)]
pub struct HaversineHeuristic;

impl DistanceHeuristic for HaversineHeuristic {
    fn estimate(&self, from: &GeoPoint, to: &GeoPoint) -> Weight {
        from.haversine_distance(to)
    }
}

/// Turns the search into Dijkstra.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroHeuristic;

impl DistanceHeuristic for ZeroHeuristic {
    fn estimate(&self, _from: &GeoPoint, _to: &GeoPoint) -> Weight {
        0.0
    }
}
