use clap::Parser;
use surftemp_processor::cli::{run, Cli};
use surftemp_processor::error::Result;
use tracing::Level;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let max_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .init();

    run(cli)
}
