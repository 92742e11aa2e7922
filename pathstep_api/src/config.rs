use std::path::PathBuf;

use anyhow::Context;
use pathstep_core::road_graph::ParallelEdgePolicy;
use pathstep_core::session::session_manager::DEFAULT_MAX_SESSIONS;

const GRAPH_PATH: &str = "PATHSTEP_GRAPH_PATH";
const BIND_ADDRESS: &str = "PATHSTEP_BIND_ADDRESS";
const PARALLEL_EDGES: &str = "PATHSTEP_PARALLEL_EDGES";
const MAX_SESSIONS: &str = "PATHSTEP_MAX_SESSIONS";

const DEFAULT_GRAPH_PATH: &str = "./data/map.osm.pbf";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub graph_path: PathBuf,
    pub bind_address: String,
    pub parallel_edge_policy: ParallelEdgePolicy,
    pub max_sessions: usize,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let parallel_edge_policy = match lookup(PARALLEL_EDGES) {
            Some(value) => value
                .parse()
                .with_context(|| format!("Invalid {}", PARALLEL_EDGES))?,
            None => ParallelEdgePolicy::default(),
        };

        let max_sessions = match lookup(MAX_SESSIONS) {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}", MAX_SESSIONS))?,
            None => DEFAULT_MAX_SESSIONS,
        };

        Ok(ApiConfig {
            graph_path: lookup(GRAPH_PATH)
                .unwrap_or_else(|| DEFAULT_GRAPH_PATH.to_string())
                .into(),
            bind_address: lookup(BIND_ADDRESS).unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            parallel_edge_policy,
            max_sessions,
        })
    }
}
