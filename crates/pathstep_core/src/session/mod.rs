pub mod search_session;
pub mod session_manager;
pub mod step_report;
