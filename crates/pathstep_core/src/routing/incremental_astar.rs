use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::Arc;

use fxhash::FxHashMap;
use serde::Serialize;
use tracing::{debug, error};

use crate::{
    geopoint::GeoPoint,
    graph::Graph,
    routing::astar_heuristic::{DistanceHeuristic, HaversineHeuristic},
    routing::search_event::SearchEvent,
    types::{NodeId, Weight},
};

/// https://en.wikipedia.org/wiki/A*_search_algorithm

#[derive(Copy, Clone, Debug)]
struct HeapItem {
    node_id: NodeId,

    /// g_score is the path cost from the start when the item was pushed
    g_score: Weight,

    /// f_score = g_score + h_score
    f_score: Weight,

    /// Insertion order, breaks ties between equal f_scores
    sequence: u64,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip both to make this a min-heap, first pushed first popped
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    /// Constructed, not stepped yet.
    Ready,
    Exploring,
    /// The destination was popped and the path is available.
    Done,
    /// The frontier emptied without reaching the destination.
    Exhausted,
    Failed,
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchState::Done | SearchState::Exhausted | SearchState::Failed
        )
    }
}

/// An A* search that is driven one step at a time.
///
/// Every call to [`advance`](Self::advance) performs at most one frontier
/// expansion. All relaxations of an expansion are applied immediately and
/// reported one per call, so a client can animate them before the next node
/// is popped. The frontier, costs and predecessors survive between calls.
pub struct IncrementalAStar<G: Graph, H: DistanceHeuristic = HaversineHeuristic> {
    graph: Arc<G>,
    heuristic: H,

    start: NodeId,
    end: NodeId,

    heap: BinaryHeap<HeapItem>,
    cost_so_far: FxHashMap<NodeId, Weight>,
    came_from: FxHashMap<NodeId, Option<NodeId>>,
    explored: Vec<NodeId>,

    /// Relaxations of the latest expansion that were not reported yet
    pending: VecDeque<(NodeId, NodeId)>,

    state: SearchState,
    failure: Option<String>,
    steps: usize,
    sequence: u64,
}

impl<G: Graph> IncrementalAStar<G, HaversineHeuristic> {
    pub fn new(graph: Arc<G>, start: NodeId, end: NodeId) -> Self {
        Self::with_heuristic(graph, start, end, HaversineHeuristic)
    }
}

impl<G: Graph, H: DistanceHeuristic> IncrementalAStar<G, H> {
    pub fn with_heuristic(graph: Arc<G>, start: NodeId, end: NodeId, heuristic: H) -> Self {
        let mut search = IncrementalAStar {
            graph,
            heuristic,
            start,
            end,
            heap: BinaryHeap::with_capacity(1024),
            cost_so_far: FxHashMap::default(),
            came_from: FxHashMap::default(),
            explored: Vec::new(),
            pending: VecDeque::new(),
            state: SearchState::Ready,
            failure: None,
            steps: 0,
            sequence: 0,
        };

        search.cost_so_far.insert(start, 0.0);
        search.came_from.insert(start, None);
        search.push(start, 0.0, 0.0);

        search
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn graph(&self) -> &Arc<G> {
        &self.graph
    }

    pub fn cost_so_far(&self, node: NodeId) -> Option<Weight> {
        self.cost_so_far.get(&node).copied()
    }

    /// `Some(None)` for the start node, `None` for nodes not reached yet.
    pub fn came_from(&self, node: NodeId) -> Option<Option<NodeId>> {
        self.came_from.get(&node).copied()
    }

    /// Expanded nodes, in visit order.
    pub fn explored(&self) -> &[NodeId] {
        &self.explored
    }

    /// Frontier entries, stale ones included.
    pub fn frontier_len(&self) -> usize {
        self.heap.len()
    }

    /// Number of `advance` calls that did work.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Moves the search forward by one step.
    ///
    /// Once a terminal state is reached the search is never resumed: later
    /// calls return `Finished` after `Done`, and repeat `Exhausted` or
    /// `Failed` otherwise, without touching any state.
    pub fn advance(&mut self) -> SearchEvent {
        match self.state {
            SearchState::Done => return SearchEvent::Finished,
            SearchState::Exhausted => return SearchEvent::Exhausted,
            SearchState::Failed => {
                return SearchEvent::Failed {
                    message: self.failure.clone().unwrap_or_default(),
                };
            }
            SearchState::Ready | SearchState::Exploring => {}
        }

        self.steps += 1;

        match self.step() {
            Ok(event) => event,
            Err(message) => self.fail(message),
        }
    }

    fn step(&mut self) -> Result<SearchEvent, String> {
        if self.state == SearchState::Ready {
            self.check_endpoints()?;
            self.state = SearchState::Exploring;
        }

        if let Some((current, next)) = self.pending.pop_front() {
            return Ok(SearchEvent::Exploring { current, next });
        }

        let Some(current) = self.pop() else {
            debug!(
                start = self.start,
                end = self.end,
                explored = self.explored.len(),
                "AStar: frontier exhausted"
            );
            self.state = SearchState::Exhausted;
            return Ok(SearchEvent::Exhausted);
        };

        self.explored.push(current);

        if current == self.end {
            let path = self.build_path()?;
            let distance = self.cost_so_far(self.end).unwrap_or_default();

            debug!(
                start = self.start,
                end = self.end,
                explored = self.explored.len(),
                steps = self.steps,
                distance,
                "AStar: destination reached"
            );

            self.state = SearchState::Done;
            return Ok(SearchEvent::Done {
                path,
                explored: self.explored.clone(),
                distance,
            });
        }

        self.expand(current)?;

        Ok(match self.pending.pop_front() {
            Some((current, next)) => SearchEvent::Exploring { current, next },
            None => SearchEvent::Settled { node: current },
        })
    }

    fn check_endpoints(&self) -> Result<(), String> {
        for node in [self.start, self.end] {
            if self.graph.node_coordinates(node).is_none() {
                return Err(format!("AStar: node {} has no coordinate data", node));
            }
        }

        Ok(())
    }

    /// Pops the next node to expand, discarding entries whose cost was
    /// improved after they were pushed.
    fn pop(&mut self) -> Option<NodeId> {
        while let Some(HeapItem {
            node_id, g_score, ..
        }) = self.heap.pop()
        {
            let is_stale = self
                .cost_so_far
                .get(&node_id)
                .is_some_and(|&cost| g_score > cost);

            if !is_stale {
                return Some(node_id);
            }
        }

        None
    }

    fn push(&mut self, node_id: NodeId, g_score: Weight, f_score: Weight) {
        self.heap.push(HeapItem {
            node_id,
            g_score,
            f_score,
            sequence: self.sequence,
        });
        self.sequence += 1;
    }

    fn expand(&mut self, current: NodeId) -> Result<(), String> {
        let graph = Arc::clone(&self.graph);

        let current_cost = self
            .cost_so_far(current)
            .ok_or_else(|| format!("AStar: node {} was expanded without a cost", current))?;

        let end_coordinates: GeoPoint = *graph
            .node_coordinates(self.end)
            .ok_or_else(|| format!("AStar: node {} has no coordinate data", self.end))?;

        for next in graph.neighbors(current) {
            let edge_weight = graph
                .edge_weight(current, next)
                .ok_or_else(|| format!("AStar: no edge from {} to {}", current, next))?;

            if !edge_weight.is_finite() || edge_weight < 0.0 {
                return Err(format!(
                    "AStar: invalid weight {} on edge {} -> {}",
                    edge_weight, current, next
                ));
            }

            let next_cost = current_cost + edge_weight;

            let improves = self
                .cost_so_far
                .get(&next)
                .is_none_or(|&cost| next_cost < cost);

            if !improves {
                continue;
            }

            let next_coordinates = graph
                .node_coordinates(next)
                .ok_or_else(|| format!("AStar: node {} has no coordinate data", next))?;

            let h_score = self.heuristic.estimate(next_coordinates, &end_coordinates);

            self.cost_so_far.insert(next, next_cost);
            self.came_from.insert(next, Some(current));
            self.push(next, next_cost, next_cost + h_score);
            self.pending.push_back((current, next));
        }

        Ok(())
    }

    fn build_path(&self) -> Result<Vec<NodeId>, String> {
        let mut path: Vec<NodeId> = Vec::with_capacity(32);
        let mut node = Some(self.end);

        while let Some(current) = node {
            if path.len() > self.came_from.len() {
                return Err(format!(
                    "AStar: predecessor cycle while rebuilding the path to {}",
                    self.end
                ));
            }

            path.push(current);
            node = self
                .came_from(current)
                .ok_or_else(|| format!("AStar: node {} has no predecessor", current))?;
        }

        path.reverse();

        Ok(path)
    }

    fn fail(&mut self, message: String) -> SearchEvent {
        error!(start = self.start, end = self.end, "{}", message);

        self.state = SearchState::Failed;
        self.pending.clear();
        self.failure = Some(message.clone());

        SearchEvent::Failed { message }
    }
}
