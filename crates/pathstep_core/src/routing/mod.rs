pub mod astar_heuristic;
pub mod incremental_astar;
pub mod search_event;
