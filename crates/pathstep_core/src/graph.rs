use crate::{geopoint::GeoPoint, types::NodeId, types::Weight};

/// Read-only view over a directed, weighted road network.
///
/// A graph is immutable once built and can be shared between any number of
/// searches.
pub trait Graph {
    type NeighborIterator<'a>: Iterator<Item = NodeId>
    where
        Self: 'a;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// Distinct successors of `node`, in the order their first edge was added.
    fn neighbors(&self, node: NodeId) -> Self::NeighborIterator<'_>;

    /// Weight of the representative edge from `start` to `end`, if any.
    fn edge_weight(&self, start: NodeId, end: NodeId) -> Option<Weight>;

    fn node_coordinates(&self, node: NodeId) -> Option<&GeoPoint>;
}
