use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "player-data-api")]
#[command(about = "HTTP gateway for per-player points, inventory and challenges")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Load environment from this file instead of ./.env")]
    pub env_file: Option<PathBuf>,

    #[arg(long, help = "Listening port (overrides PORT)")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Validate configuration and print it with secrets redacted")]
    CheckConfig,
}
