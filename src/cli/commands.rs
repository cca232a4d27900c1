//! CLI subcommand definitions

use clap::{Args, Subcommand};

use crate::config::{ConnectionMethod, TransferVerbosity};
use crate::names::Level;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create or replace the project config
    Init(InitArgs),
    /// Create subject / session / datatype folders in the local project
    Create(CreateArgs),
    /// Format raw names into canonical form without touching the project
    Format {
        /// Name level to format at
        #[arg(value_enum)]
        level: Level,
        /// Raw names, e.g. "001@TO@003" or "sub-001_@DATE@"
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Check every existing folder name against the naming convention
    Validate {
        /// Stop at the first violation instead of listing them all
        #[arg(long)]
        strict: bool,
    },
    /// Suggest the next free subject number
    NextSub,
    /// Suggest the next free session number within a subject
    NextSes {
        /// Subject to look inside, e.g. sub-001
        sub: String,
    },
    /// Copy data from the local to the central store
    Upload(TransferArgs),
    /// Copy data from the central to the local store
    Download(TransferArgs),
}

#[derive(Args)]
pub(crate) struct InitArgs {
    /// Folder holding the local copy of the project
    #[arg(long)]
    pub(crate) local_path: std::path::PathBuf,

    /// Folder holding the central copy, as a path on the central machine
    #[arg(long)]
    pub(crate) central_path: std::path::PathBuf,

    /// How the central store is reached
    #[arg(long, value_enum, default_value = "local-filesystem")]
    pub(crate) connection_method: ConnectionMethod,

    /// Hostname of the central machine (ssh only)
    #[arg(long)]
    pub(crate) central_host_id: Option<String>,

    /// Username on the central machine (ssh only)
    #[arg(long)]
    pub(crate) central_host_username: Option<String>,

    /// Overwrite older files on the target during transfers
    #[arg(long)]
    pub(crate) overwrite_old_files: bool,

    /// rclone verbosity during transfers
    #[arg(long, value_enum, default_value = "v")]
    pub(crate) transfer_verbosity: TransferVerbosity,

    /// Show rclone progress during transfers
    #[arg(long)]
    pub(crate) show_transfer_progress: bool,

    /// Digit width for suggested numbers in an empty project
    #[arg(long, default_value_t = crate::consts::DEFAULT_NUM_DIGITS)]
    pub(crate) default_digits: usize,
}

#[derive(Args)]
pub(crate) struct CreateArgs {
    /// Subject names, raw or canonical (repeatable)
    #[arg(long = "sub", required = true, num_args = 1..)]
    pub(crate) sub_names: Vec<String>,

    /// Session names to create under every subject (repeatable)
    #[arg(long = "ses", num_args = 1..)]
    pub(crate) ses_names: Vec<String>,

    /// Datatype folders to create in every session, or "all"
    #[arg(long = "datatype", num_args = 1.., default_values_t = vec!["all".to_string()])]
    pub(crate) datatypes: Vec<String>,
}

#[derive(Args)]
pub(crate) struct TransferArgs {
    /// Subjects to transfer; omit for all. @*@ matches any characters
    #[arg(long = "sub", num_args = 1..)]
    pub(crate) sub_names: Vec<String>,

    /// Sessions to transfer; omit for all
    #[arg(long = "ses", num_args = 1..)]
    pub(crate) ses_names: Vec<String>,

    /// Datatypes to transfer, or "all"
    #[arg(long = "datatype", num_args = 1.., default_values_t = vec!["all".to_string()])]
    pub(crate) datatypes: Vec<String>,

    /// Show what would be transferred without copying anything
    #[arg(long)]
    pub(crate) dry_run: bool,
}
