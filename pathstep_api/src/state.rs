use pathstep_core::location_index::LocationIndex;
use pathstep_core::road_graph::RoadGraph;
use pathstep_core::session::session_manager::SessionManager;

pub struct AppState {
    pub sessions: SessionManager<RoadGraph>,
    pub index: LocationIndex,
}
