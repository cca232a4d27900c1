//! CLI argument definitions

use clap::Parser;

use super::commands::Commands;

#[derive(Parser)]
#[command(name = "labshuttle")]
#[command(about = "Create and transfer NeuroBlueprint project folders", version)]
pub(crate) struct Cli {
    /// Project name, used to locate the project config
    pub(crate) project: String,

    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Enable debug output (show processing details)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}
