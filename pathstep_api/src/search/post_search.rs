use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::info;

use crate::{error::ApiError, search::search_request::SearchRequestBody, state::AppState};

#[derive(Serialize)]
pub struct PostSearchResponse {
    status: &'static str,
    session_id: String,
}

impl PostSearchResponse {
    pub fn started(session_id: String) -> Self {
        PostSearchResponse {
            status: "started",
            session_id,
        }
    }
}

impl IntoResponse for PostSearchResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn post_search_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequestBody>,
) -> Result<PostSearchResponse, ApiError> {
    let (start, end) = body.resolve(&state)?;

    info!(
        start = ?body.start,
        end = ?body.end,
        start_node = start,
        end_node = end,
        "Resolved search endpoints"
    );

    let session_id = state.sessions.create(start, end).await;

    Ok(PostSearchResponse::started(session_id))
}
