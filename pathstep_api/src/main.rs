mod config;
mod error;
mod graph;
mod pagination;
mod search;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use axum::routing::get;
use axum::{Router, serve};
use pathstep_core::location_index::LocationIndex;
use pathstep_core::osm::osm_reader::OsmReader;
use pathstep_core::session::session_manager::SessionManager;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, info};

use crate::config::ApiConfig;
use crate::graph::get_graph::get_graph_handler;
use crate::search::routes::search_routes;
use crate::state::AppState;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./.env.local").ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = ApiConfig::from_env()?;

    let graph = OsmReader::new(config.parallel_edge_policy)
        .read(&config.graph_path)
        .context("Graph unavailable, no searches possible")?;
    let index = LocationIndex::build_from_graph(&graph);

    let state = Arc::new(AppState {
        sessions: SessionManager::new(Arc::new(graph)).with_max_sessions(config.max_sessions),
        index,
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Cannot bind {}", config.bind_address))?;

    info!("Listening on {}", config.bind_address);

    serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/graph", get(get_graph_handler))
        .nest("/searches", search_routes())
        .layer(ServiceBuilder::new().layer(cors_layer))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use pathstep_core::geopoint::GeoPoint;
    use pathstep_core::road_graph::RoadGraph;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn app_for(graph: RoadGraph) -> Router {
        let index = LocationIndex::build_from_graph(&graph);
        app(Arc::new(AppState {
            sessions: SessionManager::new(Arc::new(graph)),
            index,
        }))
    }

    fn test_app() -> Router {
        let mut builder = RoadGraph::builder();
        let a = builder.add_node(GeoPoint::new(0.0, 0.0));
        let b = builder.add_node(GeoPoint::new(0.0, 1.0));
        let c = builder.add_node(GeoPoint::new(1.0, 1.0));
        let d = builder.add_node(GeoPoint::new(1.0, 0.0));
        builder.add_edge(a, b, 1.0);
        builder.add_edge(b, c, 1.0);
        builder.add_edge(a, d, 1.5);
        builder.add_edge(d, c, 1.0);
        app_for(builder.build())
    }

    async fn start_search(app: &Router, start: [f64; 2], end: [f64; 2]) -> String {
        let (status, started) = send(
            app,
            "POST",
            "/searches",
            Some(json!({ "start": start, "end": end })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        started["session_id"].as_str().unwrap().to_string()
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    #[tokio::test]
    async fn steps_through_a_search() {
        let app = test_app();

        let (status, started) = send(
            &app,
            "POST",
            "/searches",
            Some(json!({ "start": [0.01, 0.01], "end": [0.99, 1.01] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["status"], "started");
        let session_id = started["session_id"].as_str().unwrap().to_string();

        let next = format!("/searches/{}/next", session_id);

        let (_, step) = send(&app, "GET", &next, None).await;
        assert_eq!(step, json!({ "status": "exploring", "points": [[0.0, 0.0], [0.0, 1.0]] }));

        send(&app, "GET", &next, None).await;
        send(&app, "GET", &next, None).await;

        let (status, done) = send(&app, "GET", &next, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(done["status"], "done");
        assert_eq!(done["points"], json!([[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]));
        assert_eq!(done["distance"], json!(2.0));

        let (_, finished) = send(&app, "GET", &next, None).await;
        assert_eq!(finished, json!({ "status": "finished" }));
    }

    #[tokio::test]
    async fn next_without_a_search_is_a_bad_request() {
        let app = test_app();

        let (status, body) = send(&app, "GET", "/searches/unknown/next", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Search not started" }));
    }

    #[tokio::test]
    async fn restart_and_discard() {
        let app = test_app();

        let (status, _) = send(
            &app,
            "PUT",
            "/searches/mine",
            Some(json!({ "start": [1.0, 0.0], "end": [1.0, 1.0] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, listed) = send(&app, "GET", "/searches", None).await;
        assert_eq!(listed["total"], 1);
        assert_eq!(listed["data"][0]["session_id"], "mine");
        assert_eq!(listed["data"][0]["state"], "ready");

        let (status, _) = send(&app, "DELETE", "/searches/mine", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "DELETE", "/searches/mine", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_invalid_coordinates() {
        let app = test_app();

        let (status, _) = send(
            &app,
            "POST",
            "/searches",
            Some(json!({ "start": [120.0, 0.0], "end": [1.0, 1.0] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unreachable_destination_is_exhausted() {
        let mut builder = RoadGraph::builder();
        let a = builder.add_node(GeoPoint::new(0.0, 0.0));
        let b = builder.add_node(GeoPoint::new(0.0, 1.0));
        builder.add_node(GeoPoint::new(5.0, 5.0));
        builder.add_road(a, b, 1.0);
        let app = app_for(builder.build());

        let session_id = start_search(&app, [0.0, 0.0], [5.0, 5.0]).await;
        let next = format!("/searches/{}/next", session_id);

        let mut last = Value::Null;
        for _ in 0..10 {
            let (status, step) = send(&app, "GET", &next, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_ne!(step["status"], "done");
            last = step;
            if last["status"] == "exhausted" {
                break;
            }
        }
        assert_eq!(last, json!({ "status": "exhausted" }));

        for _ in 0..2 {
            let (status, step) = send(&app, "GET", &next, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(step, json!({ "status": "exhausted" }));
        }
    }

    #[tokio::test]
    async fn failed_search_is_a_server_error() {
        let mut builder = RoadGraph::builder();
        let a = builder.add_node(GeoPoint::new(-5.0, -5.0));
        let b = builder.add_node(GeoPoint::new(-5.0, -4.0));
        builder.add_edge(a, b, -1.0);
        let app = app_for(builder.build());

        let session_id = start_search(&app, [-5.0, -5.0], [-5.0, -4.0]).await;
        let next = format!("/searches/{}/next", session_id);

        for _ in 0..2 {
            let (status, body) = send(&app, "GET", &next, None).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({ "error": "AStar: invalid weight -1 on edge 0 -> 1" }));
        }
    }

    #[tokio::test]
    async fn graph_metadata() {
        let app = test_app();

        let (status, graph) = send(&app, "GET", "/graph", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(graph, json!({ "nodes": 4, "edges": 4, "center": [0.5, 0.5] }));
    }
}
