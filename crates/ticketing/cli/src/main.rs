//! Text front end for the trip-ticketing system.
//!
//! A thin interactive shell over the engines: it tokenizes command
//! lines, parses numerics and timestamps at the boundary, and renders
//! engine results and errors. A failed operation never ends the
//! session.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod render;
mod repl;
mod seed;

use app::App;

/// Trip ticketing shell
#[derive(Parser)]
#[command(name = "ticketing")]
#[command(about = "Multi-tenant trip ticketing workflow", long_about = None)]
#[command(version)]
struct Cli {
    /// Load the demo dataset and log in as its admin
    #[arg(long)]
    seed: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let app = App::new();
    let session = if cli.seed {
        Some(seed::load(&app)?)
    } else {
        None
    };

    repl::run(&app, session)
}
