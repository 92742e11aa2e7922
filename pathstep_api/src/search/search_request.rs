use pathstep_core::{geopoint::GeoPoint, types::NodeId};
use serde::Deserialize;

use crate::{error::ApiError, state::AppState};

#[derive(Deserialize)]
pub struct SearchRequestBody {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

impl SearchRequestBody {
    /// Snaps both coordinates to their closest graph nodes.
    pub fn resolve(&self, state: &AppState) -> Result<(NodeId, NodeId), ApiError> {
        let start = nearest_node(state, &self.start)?;
        let end = nearest_node(state, &self.end)?;
        Ok((start, end))
    }
}

fn nearest_node(state: &AppState, coordinates: &GeoPoint) -> Result<NodeId, ApiError> {
    if !coordinates.lat().is_finite()
        || !coordinates.lng().is_finite()
        || coordinates.lat().abs() > 90.0
        || coordinates.lng().abs() > 180.0
    {
        return Err(ApiError::BadRequest(format!(
            "Invalid coordinates [{}, {}]",
            coordinates.lat(),
            coordinates.lng()
        )));
    }

    state.index.nearest_node(coordinates).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "No road near [{}, {}]",
            coordinates.lat(),
            coordinates.lng()
        ))
    })
}
