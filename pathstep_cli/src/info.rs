use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use pathstep_core::{graph::Graph, osm::osm_reader::OsmReader, road_graph::ParallelEdgePolicy};

use crate::parsers;

#[derive(Args)]
pub struct InfoArgs {
    /// OSM PBF extract to inspect
    #[arg(short, long)]
    graph: PathBuf,

    /// Which edge to keep between two nodes: first or shortest
    #[arg(long, default_value = "first", value_parser = parsers::parse_parallel_edge_policy)]
    parallel_edges: ParallelEdgePolicy,
}

pub fn run(args: InfoArgs) -> Result<(), anyhow::Error> {
    let graph = OsmReader::new(args.parallel_edges)
        .read(&args.graph)
        .context("Graph unavailable")?;

    println!("Nodes: {}", graph.node_count());
    println!("Edges: {}", graph.edge_count());

    if let Some(center) = graph.bounding_box_center() {
        println!("Center: {:.6}, {:.6}", center.lat(), center.lng());
    }

    Ok(())
}
