use std::sync::Arc;

use axum::{Json, extract::State};
use pathstep_core::{geopoint::GeoPoint, graph::Graph};
use serde::Serialize;

use crate::{error::ApiError, state::AppState};

#[derive(Serialize)]
pub struct GraphResponse {
    nodes: usize,
    edges: usize,
    center: Option<GeoPoint>,
}

pub async fn get_graph_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GraphResponse>, ApiError> {
    let graph = state.sessions.graph();

    Ok(Json(GraphResponse {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        center: graph.bounding_box_center(),
    }))
}
