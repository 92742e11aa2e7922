use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use jiff::Timestamp;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::SessionError,
    graph::Graph,
    routing::{
        astar_heuristic::{DistanceHeuristic, HaversineHeuristic},
        incremental_astar::SearchState,
    },
    session::{search_session::SearchSession, step_report::StepReport},
    types::NodeId,
};

pub type SessionId = String;

pub const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub created_at: Timestamp,
    pub state: Option<SearchState>,
}

struct SessionEntry<G: Graph, H: DistanceHeuristic + Clone> {
    created_at: Timestamp,
    /// Creation order, survives restarts
    sequence: u64,
    session: Mutex<SearchSession<G, H>>,
}

/// Searches keyed by session id.
///
/// Every session is guarded by its own lock, so clients step their searches
/// independently while sharing one read-only graph. At most `max_sessions`
/// are kept; creating one more evicts the oldest.
pub struct SessionManager<G: Graph, H: DistanceHeuristic + Clone = HaversineHeuristic> {
    graph: Arc<G>,
    heuristic: H,
    max_sessions: usize,
    next_sequence: AtomicU64,
    sessions: RwLock<HashMap<SessionId, Arc<SessionEntry<G, H>>>>,
}

impl<G: Graph> SessionManager<G, HaversineHeuristic> {
    pub fn new(graph: Arc<G>) -> Self {
        Self::with_heuristic(graph, HaversineHeuristic)
    }
}

impl<G: Graph, H: DistanceHeuristic + Clone> SessionManager<G, H> {
    pub fn with_heuristic(graph: Arc<G>, heuristic: H) -> Self {
        SessionManager {
            graph,
            heuristic,
            max_sessions: DEFAULT_MAX_SESSIONS,
            next_sequence: AtomicU64::new(0),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Never below one.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub fn graph(&self) -> &Arc<G> {
        &self.graph
    }

    /// Starts a search in a new session.
    pub async fn create(&self, start: NodeId, end: NodeId) -> SessionId {
        let session_id = Uuid::new_v4().to_string();
        self.restart(&session_id, start, end).await;
        session_id
    }

    /// Starts a new search in `session_id`, replacing whatever ran there.
    ///
    /// A replaced session keeps its creation time.
    pub async fn restart(&self, session_id: &str, start: NodeId, end: NodeId) {
        let mut session =
            SearchSession::with_heuristic(Arc::clone(&self.graph), self.heuristic.clone());
        session.begin(start, end);

        let mut sessions = self.sessions.write().await;

        let (created_at, sequence, replaced) = match sessions.get(session_id) {
            Some(previous) => (previous.created_at, previous.sequence, true),
            None => {
                while sessions.len() >= self.max_sessions {
                    Self::evict_oldest(&mut sessions);
                }
                let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
                (Timestamp::now(), sequence, false)
            }
        };

        sessions.insert(
            session_id.to_string(),
            Arc::new(SessionEntry {
                created_at,
                sequence,
                session: Mutex::new(session),
            }),
        );

        info!(session_id, replaced, "Search session started");
    }

    fn evict_oldest(sessions: &mut HashMap<SessionId, Arc<SessionEntry<G, H>>>) {
        let oldest = sessions
            .iter()
            .min_by_key(|(_, entry)| entry.sequence)
            .map(|(session_id, _)| session_id.clone());

        if let Some(session_id) = oldest {
            sessions.remove(&session_id);
            info!(%session_id, "Evicted oldest search session");
        }
    }

    pub async fn next(&self, session_id: &str) -> Result<StepReport, SessionError> {
        let entry = self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or(SessionError::SessionNotStarted)?;

        let mut session = entry.session.lock();
        session.next()
    }

    /// Returns `false` when there was nothing to discard.
    pub async fn discard(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            info!(session_id, "Search session discarded");
        }
        removed
    }

    pub async fn list(&self) -> Vec<SessionSummary> {
        let mut sessions: Vec<SessionSummary> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(session_id, entry)| SessionSummary {
                session_id: session_id.clone(),
                created_at: entry.created_at,
                state: entry.session.lock().state(),
            })
            .collect();

        sessions.sort_by(|session1, session2| session2.created_at.cmp(&session1.created_at));
        sessions
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
