pub mod osm_reader;
