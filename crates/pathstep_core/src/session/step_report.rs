use serde::Serialize;

use crate::{
    geopoint::GeoPoint,
    graph::Graph,
    routing::search_event::SearchEvent,
    types::{NodeId, Weight},
};

/// A search step expressed in coordinates, ready to be drawn by a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepReport {
    /// `[current, next]`
    Exploring { points: Vec<GeoPoint> },
    Settled { points: Vec<GeoPoint> },
    Done {
        points: Vec<GeoPoint>,
        explored: usize,
        distance: Weight,
    },
    Exhausted,
    Finished,
    Error { message: String },
}

impl StepReport {
    pub fn from_event(graph: &impl Graph, event: SearchEvent) -> StepReport {
        let report = match event {
            SearchEvent::Exploring { current, next } => {
                points(graph, &[current, next]).map(|points| StepReport::Exploring { points })
            }
            SearchEvent::Settled { node } => {
                points(graph, &[node]).map(|points| StepReport::Settled { points })
            }
            SearchEvent::Done {
                path,
                explored,
                distance,
            } => points(graph, &path).map(|points| StepReport::Done {
                points,
                explored: explored.len(),
                distance,
            }),
            SearchEvent::Exhausted => Ok(StepReport::Exhausted),
            SearchEvent::Finished => Ok(StepReport::Finished),
            SearchEvent::Failed { message } => Ok(StepReport::Error { message }),
        };

        report.unwrap_or_else(|message| StepReport::Error { message })
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            StepReport::Exploring { .. } | StepReport::Settled { .. }
        )
    }
}

fn points(graph: &impl Graph, nodes: &[NodeId]) -> Result<Vec<GeoPoint>, String> {
    nodes
        .iter()
        .map(|&node| {
            graph
                .node_coordinates(node)
                .copied()
                .ok_or_else(|| format!("Node {} has no coordinate data", node))
        })
        .collect()
}
