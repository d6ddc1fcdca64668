use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Clone)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v for debug, -vv for trace)"
    )]
    pub verbose: u8,

    /// Path to the YAML configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "CONFIG_PATH",
        default_value = "config.yaml",
        help = "Configuration file path"
    )]
    pub config_path: PathBuf,

    /// Port to listen on, overriding the configuration file
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Command {
    /// Serve the estimator API (default)
    Serve,
    /// Load and validate the pricing catalog, then exit
    ValidateCatalog,
}
