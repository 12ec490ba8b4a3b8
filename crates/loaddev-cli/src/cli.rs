use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use loaddev_server::ServiceKind;

/// Top-level CLI parser for the `loaddev` binary.
#[derive(Debug, Parser)]
#[command(name = "loaddev", version, about = "LoadDev - handload development services")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra TOML config file, layered above loaddev.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run entity HTTP services.
    Serve(ServeArgs),
    /// Run the API gateway.
    Gateway(GatewayArgs),
    /// Open the database and apply migrations.
    Migrate,
    /// Print the resolved configuration with secrets masked.
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Which services to expose: rifles, loads, components, all
    #[arg(long, default_value = "all")]
    pub service: ServiceKind,

    /// Listen port (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Args)]
pub struct GatewayArgs {
    /// Listen port (overrides gateway.port)
    #[arg(long)]
    pub port: Option<u16>,
}
