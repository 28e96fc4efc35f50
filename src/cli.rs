//! CLI argument parsing with clap.

use clap::Parser;

/// Fitness photo transformation relay server.
#[derive(Parser, Debug)]
#[command(name = "fitgen", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Listening port override.
    #[arg(short, long)]
    pub port: Option<u16>,
}
