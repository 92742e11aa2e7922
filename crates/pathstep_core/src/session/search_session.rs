use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    error::SessionError,
    graph::Graph,
    routing::{
        astar_heuristic::{DistanceHeuristic, HaversineHeuristic},
        incremental_astar::{IncrementalAStar, SearchState},
    },
    session::step_report::StepReport,
    types::NodeId,
};

/// Holds at most one in-flight search over a shared graph.
pub struct SearchSession<G: Graph, H: DistanceHeuristic + Clone = HaversineHeuristic> {
    graph: Arc<G>,
    heuristic: H,
    search: Option<IncrementalAStar<G, H>>,
}

impl<G: Graph> SearchSession<G, HaversineHeuristic> {
    pub fn new(graph: Arc<G>) -> Self {
        Self::with_heuristic(graph, HaversineHeuristic)
    }
}

impl<G: Graph, H: DistanceHeuristic + Clone> SearchSession<G, H> {
    pub fn with_heuristic(graph: Arc<G>, heuristic: H) -> Self {
        SearchSession {
            graph,
            heuristic,
            search: None,
        }
    }

    /// Starts a new search, dropping the previous one.
    pub fn begin(&mut self, start: NodeId, end: NodeId) {
        info!(start, end, "Starting search");

        self.search = Some(IncrementalAStar::with_heuristic(
            Arc::clone(&self.graph),
            start,
            end,
            self.heuristic.clone(),
        ));
    }

    pub fn next(&mut self) -> Result<StepReport, SessionError> {
        let search = self.search.as_mut().ok_or(SessionError::SessionNotStarted)?;

        let event = search.advance();
        debug!(status = event.status(), step = search.steps(), "Next step");

        Ok(StepReport::from_event(self.graph.as_ref(), event))
    }

    pub fn state(&self) -> Option<SearchState> {
        self.search.as_ref().map(|search| search.state())
    }

    pub fn search(&self) -> Option<&IncrementalAStar<G, H>> {
        self.search.as_ref()
    }
}
