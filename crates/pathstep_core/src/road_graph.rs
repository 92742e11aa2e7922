use std::str::FromStr;

use fxhash::FxHashMap;

use crate::{
    error::GraphError,
    geopoint::GeoPoint,
    graph::Graph,
    types::{NodeId, Weight},
};

/// How a single edge is chosen when several connect the same pair of nodes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParallelEdgePolicy {
    /// Keep the edge that was added first.
    #[default]
    First,
    /// Keep the edge with the smallest weight.
    Shortest,
}

impl FromStr for ParallelEdgePolicy {
    type Err = GraphError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(ParallelEdgePolicy::First),
            "shortest" => Ok(ParallelEdgePolicy::Shortest),
            other => Err(GraphError::UnknownParallelEdgePolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RoadEdge {
    end_node: NodeId,
    weight: Weight,
}

/// Adjacency list of directed edges with a coordinate per node.
///
/// Parallel edges are collapsed at build time, so every `(start, end)` pair
/// has exactly one representative edge.
pub struct RoadGraph {
    coordinates: Vec<GeoPoint>,
    adjacency_list: Vec<Vec<RoadEdge>>,
    edges: usize,
}

impl RoadGraph {
    pub fn builder() -> RoadGraphBuilder {
        RoadGraphBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = (NodeId, &GeoPoint)> {
        self.coordinates.iter().enumerate()
    }

    /// Center of the box enclosing every node, `None` for an empty graph.
    pub fn bounding_box_center(&self) -> Option<GeoPoint> {
        let first = self.coordinates.first()?;

        let (min, max) = self.coordinates.iter().fold(
            (*first, *first),
            |(min, max), point| {
                (
                    GeoPoint::new(min.lat.min(point.lat), min.lng.min(point.lng)),
                    GeoPoint::new(max.lat.max(point.lat), max.lng.max(point.lng)),
                )
            },
        );

        Some(GeoPoint::new(
            (min.lat + max.lat) / 2.0,
            (min.lng + max.lng) / 2.0,
        ))
    }
}

pub struct RoadGraphNeighbors<'a> {
    edges: std::slice::Iter<'a, RoadEdge>,
}

impl Iterator for RoadGraphNeighbors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        self.edges.next().map(|edge| edge.end_node)
    }
}

impl Graph for RoadGraph {
    type NeighborIterator<'a> = RoadGraphNeighbors<'a>;

    fn node_count(&self) -> usize {
        self.coordinates.len()
    }

    fn edge_count(&self) -> usize {
        self.edges
    }

    fn neighbors(&self, node: NodeId) -> Self::NeighborIterator<'_> {
        let edges = self
            .adjacency_list
            .get(node)
            .map(|edges| edges.as_slice())
            .unwrap_or_default();

        RoadGraphNeighbors {
            edges: edges.iter(),
        }
    }

    fn edge_weight(&self, start: NodeId, end: NodeId) -> Option<Weight> {
        self.adjacency_list
            .get(start)?
            .iter()
            .find(|edge| edge.end_node == end)
            .map(|edge| edge.weight)
    }

    fn node_coordinates(&self, node: NodeId) -> Option<&GeoPoint> {
        self.coordinates.get(node)
    }
}

#[derive(Default)]
pub struct RoadGraphBuilder {
    coordinates: Vec<GeoPoint>,
    edges: Vec<(NodeId, NodeId, Weight)>,
    parallel_edge_policy: ParallelEdgePolicy,
}

impl RoadGraphBuilder {
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        RoadGraphBuilder {
            coordinates: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            parallel_edge_policy: ParallelEdgePolicy::default(),
        }
    }

    pub fn with_parallel_edge_policy(mut self, policy: ParallelEdgePolicy) -> Self {
        self.parallel_edge_policy = policy;
        self
    }

    pub fn node_count(&self) -> usize {
        self.coordinates.len()
    }

    pub fn add_node(&mut self, coordinates: GeoPoint) -> NodeId {
        let node_id = self.coordinates.len();
        self.coordinates.push(coordinates);
        node_id
    }

    /// Adds a directed edge. Weights are in kilometers.
    pub fn add_edge(&mut self, start: NodeId, end: NodeId, weight: Weight) {
        self.edges.push((start, end, weight));
    }

    /// Adds an edge in both directions.
    pub fn add_road(&mut self, start: NodeId, end: NodeId, weight: Weight) {
        self.add_edge(start, end, weight);
        self.add_edge(end, start, weight);
    }

    pub fn build(self) -> RoadGraph {
        let mut adjacency_list: Vec<Vec<RoadEdge>> = vec![vec![]; self.coordinates.len()];
        // (start, end) -> index in adjacency_list[start]
        let mut representatives: FxHashMap<(NodeId, NodeId), usize> = FxHashMap::default();

        for (start, end, weight) in self.edges {
            if start >= adjacency_list.len() {
                adjacency_list.resize_with(start + 1, Vec::new);
            }

            match representatives.get(&(start, end)) {
                Some(&index) => {
                    let edge = &mut adjacency_list[start][index];
                    if self.parallel_edge_policy == ParallelEdgePolicy::Shortest
                        && weight < edge.weight
                    {
                        edge.weight = weight;
                    }
                }
                None => {
                    representatives.insert((start, end), adjacency_list[start].len());
                    adjacency_list[start].push(RoadEdge {
                        end_node: end,
                        weight,
                    });
                }
            }
        }

        RoadGraph {
            coordinates: self.coordinates,
            edges: representatives.len(),
            adjacency_list,
        }
    }
}
