pub(crate) mod constants;
pub mod error;
pub mod geopoint;
pub mod graph;
pub mod location_index;
pub mod osm;
pub mod road_graph;
pub mod routing;
pub mod session;
pub mod types;
