use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Args;
use pathstep_core::{
    geopoint::GeoPoint,
    graph::Graph,
    location_index::LocationIndex,
    osm::osm_reader::OsmReader,
    road_graph::ParallelEdgePolicy,
    session::{search_session::SearchSession, step_report::StepReport},
};
use tracing::info;

use crate::parsers;

#[derive(Args)]
pub struct TraceArgs {
    /// OSM PBF extract to search on
    #[arg(short, long)]
    graph: PathBuf,

    /// Start coordinates as lat,lng
    #[arg(long, value_parser = parsers::parse_coordinates, allow_hyphen_values = true)]
    from: GeoPoint,

    /// Destination coordinates as lat,lng
    #[arg(long, value_parser = parsers::parse_coordinates, allow_hyphen_values = true)]
    to: GeoPoint,

    /// Stop after this many steps even if the search is not finished
    #[arg(long)]
    max_steps: Option<usize>,

    /// Which edge to keep between two nodes: first or shortest
    #[arg(long, default_value = "first", value_parser = parsers::parse_parallel_edge_policy)]
    parallel_edges: ParallelEdgePolicy,

    /// Print every step as a JSON line instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: TraceArgs) -> Result<(), anyhow::Error> {
    let graph = OsmReader::new(args.parallel_edges)
        .read(&args.graph)
        .context("Graph unavailable")?;
    let index = LocationIndex::build_from_graph(&graph);

    let start = index
        .nearest_node(&args.from)
        .ok_or_else(|| anyhow!("No road near {:?}", args.from))?;
    let end = index
        .nearest_node(&args.to)
        .ok_or_else(|| anyhow!("No road near {:?}", args.to))?;

    let mut session = SearchSession::new(Arc::new(graph));
    session.begin(start, end);
    if let Some(search) = session.search() {
        info!(
            start = search.start(),
            end = search.end(),
            nodes = search.graph().node_count(),
            "Tracing search"
        );
    }

    let mut steps = 0_usize;
    let mut relaxed = 0_usize;

    loop {
        if args.max_steps.is_some_and(|max_steps| steps >= max_steps) {
            info!("Stopped after {} steps", steps);
            return Ok(());
        }

        let report = session.next()?;
        steps += 1;

        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        }

        match report {
            StepReport::Exploring { .. } => relaxed += 1,
            StepReport::Settled { .. } => {}
            StepReport::Done {
                points,
                explored,
                distance,
            } => {
                if !args.json {
                    print_path(&points, explored, relaxed, steps, distance);
                }
                return Ok(());
            }
            StepReport::Exhausted | StepReport::Finished => {
                if !args.json {
                    println!("No path found after {} steps", steps);
                }
                return Ok(());
            }
            StepReport::Error { message } => return Err(anyhow!(message)),
        }
    }
}

fn print_path(points: &[GeoPoint], explored: usize, relaxed: usize, steps: usize, distance: f64) {
    println!(
        "Found a path of {:.3} km through {} nodes ({} expanded, {} relaxations, {} steps)",
        distance,
        points.len(),
        explored,
        relaxed,
        steps
    );

    for point in points {
        println!("  {:.6}, {:.6}", point.lat(), point.lng());
    }
}
