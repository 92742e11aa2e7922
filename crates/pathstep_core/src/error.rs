use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Graph unavailable: failed to read {path}")]
    GraphUnavailable {
        path: String,
        #[source]
        source: osmpbf::Error,
    },
    #[error("Graph unavailable: {0} contains no road nodes")]
    EmptyGraph(String),
    #[error("Unknown parallel edge policy '{0}', expected 'first' or 'shortest'")]
    UnknownParallelEdgePolicy(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Search not started")]
    SessionNotStarted,
}
