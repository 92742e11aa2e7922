use crate::types::{NodeId, Weight};

/// What a single call to
/// [`IncrementalAStar::advance`](super::incremental_astar::IncrementalAStar::advance) did.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// `next` got a cheaper path through `current`.
    Exploring { current: NodeId, next: NodeId },
    /// `node` was expanded without improving any neighbor.
    Settled { node: NodeId },
    /// The destination was reached.
    Done {
        path: Vec<NodeId>,
        explored: Vec<NodeId>,
        distance: Weight,
    },
    /// The frontier emptied before reaching the destination.
    Exhausted,
    Failed { message: String },
    /// Returned for every call after `Done`.
    Finished,
}

impl SearchEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            SearchEvent::Exploring { .. } | SearchEvent::Settled { .. }
        )
    }

    pub fn status(&self) -> &'static str {
        match self {
            SearchEvent::Exploring { .. } => "exploring",
            SearchEvent::Settled { .. } => "settled",
            SearchEvent::Done { .. } => "done",
            SearchEvent::Exhausted => "exhausted",
            SearchEvent::Failed { .. } => "error",
            SearchEvent::Finished => "finished",
        }
    }
}
