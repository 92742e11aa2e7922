use rstar::RTree;
use rstar::primitives::GeomWithData;
use tracing::info;

use crate::{geopoint::GeoPoint, road_graph::RoadGraph, types::NodeId};

type LocationIndexObject = GeomWithData<GeoPoint, NodeId>;

/// Planar candidates re-ranked by great-circle distance.
const NEAREST_CANDIDATES: usize = 8;

/// Spatial index resolving client coordinates to the closest graph node.
pub struct LocationIndex {
    tree: RTree<LocationIndexObject>,
}

impl LocationIndex {
    pub fn build_from_graph(graph: &RoadGraph) -> LocationIndex {
        let tree = RTree::bulk_load(
            graph
                .nodes_iter()
                .map(|(node_id, coordinates)| LocationIndexObject::new(*coordinates, node_id))
                .collect(),
        );

        info!(nodes = tree.size(), "Built location index");

        LocationIndex { tree }
    }

    /// `None` only when the index is empty.
    pub fn nearest_node(&self, coordinates: &GeoPoint) -> Option<NodeId> {
        self.tree
            .nearest_neighbor_iter(&[coordinates.lng(), coordinates.lat()])
            .take(NEAREST_CANDIDATES)
            .min_by(|a, b| {
                a.geom()
                    .haversine_distance(coordinates)
                    .total_cmp(&b.geom().haversine_distance(coordinates))
            })
            .map(|nearest| nearest.data)
    }
}
