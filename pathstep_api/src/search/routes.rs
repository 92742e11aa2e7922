use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};

use crate::{
    search::{
        delete_search::delete_search_handler, list_searches::list_searches_handler,
        next_step::next_step_handler, post_search::post_search_handler,
        put_search::put_search_handler,
    },
    state::AppState,
};

pub fn search_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_searches_handler).post(post_search_handler))
        .route(
            "/{session_id}",
            put(put_search_handler).delete(delete_search_handler),
        )
        .route("/{session_id}/next", get(next_step_handler))
}
