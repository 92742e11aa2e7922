use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{error::ApiError, search::search_request::SearchRequestBody, state::AppState};

use super::post_search::PostSearchResponse;

pub async fn put_search_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(body): Json<SearchRequestBody>,
) -> Result<PostSearchResponse, ApiError> {
    let (start, end) = body.resolve(&state)?;

    state.sessions.restart(&session_id, start, end).await;

    Ok(PostSearchResponse::started(session_id))
}
