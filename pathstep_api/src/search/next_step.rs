use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use pathstep_core::session::step_report::StepReport;
use tracing::{debug, error};

use crate::{error::ApiError, state::AppState};

pub async fn next_step_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<StepReport>, ApiError> {
    let report = state.sessions.next(&session_id).await?;

    match report {
        StepReport::Error { message } => {
            error!(session_id = %session_id, "Search failed: {}", message);
            Err(ApiError::InternalServerError(message))
        }
        report => {
            debug!(session_id = %session_id, status = ?report, "Next step");
            Ok(Json(report))
        }
    }
}
