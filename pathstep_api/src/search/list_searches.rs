use std::sync::Arc;

use axum::{Json, extract::State};
use pathstep_core::session::session_manager::SessionSummary;

use crate::{error::ApiError, pagination::PaginatedResponse, state::AppState};

pub async fn list_searches_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PaginatedResponse<SessionSummary>>, ApiError> {
    let sessions = state.sessions.list().await;

    Ok(Json(PaginatedResponse::single_page(sessions)))
}
