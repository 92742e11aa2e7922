use clap::{Parser, Subcommand};

use mimalloc::MiMalloc;

use crate::{info::InfoArgs, trace::TraceArgs};

mod info;
mod parsers;
mod trace;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replays a search step by step
    #[command(visible_alias = "t")]
    Trace {
        #[command(flatten)]
        args: TraceArgs,
    },
    /// Prints statistics about a road graph
    Info {
        #[command(flatten)]
        args: InfoArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Trace { args } => trace::run(args)?,
        Commands::Info { args } => info::run(args)?,
    }

    Ok(())
}
