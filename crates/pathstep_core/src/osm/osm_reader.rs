use std::path::Path;

use fxhash::FxHashMap;
use osmpbf::{Element, ElementReader, Way};
use tracing::{debug, info};

use crate::{
    error::GraphError,
    geopoint::GeoPoint,
    graph::Graph,
    road_graph::{ParallelEdgePolicy, RoadGraph, RoadGraphBuilder},
    types::NodeId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Both,
    Forward,
    Backward,
}

impl Direction {
    fn from_tags<'a>(mut tags: impl Iterator<Item = (&'a str, &'a str)>) -> Direction {
        match tags.find(|(key, _)| *key == "oneway").map(|(_, value)| value) {
            Some("yes" | "true" | "1") => Direction::Forward,
            Some("-1" | "reverse") => Direction::Backward,
            _ => Direction::Both,
        }
    }
}

struct OsmWay {
    refs: Vec<i64>,
    direction: Direction,
}

/// Raw road data collected from an OSM extract before it becomes a graph.
#[derive(Default)]
struct OsmData {
    node_coordinates: FxHashMap<i64, GeoPoint>,
    ways: Vec<OsmWay>,
}

impl OsmData {
    fn add_node(&mut self, osm_id: i64, lat: f64, lng: f64) {
        self.node_coordinates.insert(osm_id, GeoPoint::new(lat, lng));
    }

    fn add_way<'a>(&mut self, refs: Vec<i64>, tags: impl Iterator<Item = (&'a str, &'a str)> + Clone) {
        if refs.len() < 2 {
            return;
        }

        if !tags.clone().any(|(key, _)| key == "highway") {
            return;
        }

        self.ways.push(OsmWay {
            refs,
            direction: Direction::from_tags(tags),
        });
    }

    fn add_osm_way(&mut self, way: &Way) {
        let tags: Vec<(&str, &str)> = way.tags().collect();
        self.add_way(way.refs().collect(), tags.iter().copied());
    }

    /// Only nodes referenced by a road become graph nodes. Ids are assigned
    /// in order of first appearance along the ways.
    fn into_road_graph(self, parallel_edge_policy: ParallelEdgePolicy) -> RoadGraph {
        let segments: usize = self.ways.iter().map(|way| way.refs.len() - 1).sum();
        let mut builder = RoadGraphBuilder::with_capacity(self.node_coordinates.len(), segments * 2)
            .with_parallel_edge_policy(parallel_edge_policy);
        let mut osm_to_node: FxHashMap<i64, NodeId> = FxHashMap::default();

        for way in &self.ways {
            for pair in way.refs.windows(2) {
                let (Some(start_coordinates), Some(end_coordinates)) = (
                    self.node_coordinates.get(&pair[0]),
                    self.node_coordinates.get(&pair[1]),
                ) else {
                    continue;
                };

                let start = *osm_to_node
                    .entry(pair[0])
                    .or_insert_with(|| builder.add_node(*start_coordinates));
                let end = *osm_to_node
                    .entry(pair[1])
                    .or_insert_with(|| builder.add_node(*end_coordinates));

                let length = start_coordinates.haversine_distance(end_coordinates);

                match way.direction {
                    Direction::Both => builder.add_road(start, end, length),
                    Direction::Forward => builder.add_edge(start, end, length),
                    Direction::Backward => builder.add_edge(end, start, length),
                }
            }
        }

        debug!(
            road_nodes = builder.node_count(),
            osm_nodes = self.node_coordinates.len(),
            "Compacted OSM nodes"
        );

        builder.build()
    }
}

pub struct OsmReader {
    parallel_edge_policy: ParallelEdgePolicy,
}

impl Default for OsmReader {
    fn default() -> Self {
        OsmReader::new(ParallelEdgePolicy::default())
    }
}

impl OsmReader {
    pub fn new(parallel_edge_policy: ParallelEdgePolicy) -> Self {
        OsmReader {
            parallel_edge_policy,
        }
    }

    /// Reads the road network of an OSM PBF extract. Edge weights are the
    /// haversine length of each way segment in kilometers.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<RoadGraph, GraphError> {
        let path = path.as_ref();
        let display_path = path.display().to_string();
        info!(path = %display_path, "Reading OSM file");

        let reader =
            ElementReader::from_path(path).map_err(|source| GraphError::GraphUnavailable {
                path: display_path.clone(),
                source,
            })?;

        let mut osm_data = OsmData::default();
        let mut node_count = 0_usize;

        reader
            .for_each(|element| match element {
                Element::Node(node) => {
                    osm_data.add_node(node.id(), node.lat(), node.lon());
                    node_count += 1;
                    if node_count % 100_000 == 0 {
                        debug!("Processed {} nodes", node_count);
                    }
                }
                Element::DenseNode(node) => {
                    osm_data.add_node(node.id(), node.lat(), node.lon());
                    node_count += 1;
                    if node_count % 100_000 == 0 {
                        debug!("Processed {} nodes", node_count);
                    }
                }
                Element::Way(way) => osm_data.add_osm_way(&way),
                _ => {}
            })
            .map_err(|source| GraphError::GraphUnavailable {
                path: display_path.clone(),
                source,
            })?;

        let graph = osm_data.into_road_graph(self.parallel_edge_policy);

        if graph.is_empty() {
            return Err(GraphError::EmptyGraph(display_path));
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Finished reading OSM file"
        );

        Ok(graph)
    }
}
