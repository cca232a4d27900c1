use std::path::PathBuf;

use thiserror::Error;

use crate::names::Level;

/// Top-level error for command handlers
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    Formatting(#[from] NameFormattingError),

    #[error("{0}")]
    Convention(#[from] NeuroBlueprintError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Transfer(#[from] TransferError),

    #[error("Unknown datatype \"{input}\". Must be one of: ephys, behav, funcimg, anat, or \"all\".")]
    UnknownDatatype { input: String },

    #[error("Failed to create folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Raw user input could not be parsed into canonical names.
/// Always fatal to the triggering call, never silently corrected.
#[derive(Debug, Error)]
pub(crate) enum NameFormattingError {
    #[error("{level} names cannot include spaces.")]
    ContainsSpaces { level: Level },

    #[error("Subject and session names cannot be empty.")]
    EmptyName,

    #[error(
        "Name \"{name}\" is not a sequence of key-value pairs. \
         Dashes and underscores must alternate, e.g. sub-001_id-a."
    )]
    MalformedTokens { name: String },

    #[error("Name \"{name}\" contains a token with an empty key or value.")]
    EmptyTokenPart { name: String },

    #[error("Name \"{name}\" contains disallowed characters. Keys and values must be alphanumeric.")]
    DisallowedCharacters { name: String },

    #[error("The tag {tag} must not appear more than once in \"{name}\".")]
    RepeatedTag { tag: &'static str, name: String },

    #[error(
        "Name \"{name}\" is not in the required format for the @TO@ tag. \
         The name must start with {level}-<number>@TO@<number>."
    )]
    MalformedRange { name: String, level: Level },

    #[error(
        "Range endpoints are out of order in \"{name}\": the number to the left \
         of @TO@ must not be larger than the number to the right."
    )]
    RangeOutOfOrder { name: String },

    #[error("Input names \"{first}\" and \"{second}\" resolve to the same {level} id.")]
    ConflictingNames {
        first: String,
        second: String,
        level: Level,
    },
}

/// A name violates the NeuroBlueprint convention, either on its own
/// or against the names already present in the project
#[derive(Debug, Error)]
pub(crate) enum NeuroBlueprintError {
    #[error("Name \"{name}\" does not begin with the required prefix: {level}-")]
    MissingPrefix { name: String, level: Level },

    #[error("Name \"{name}\" contains the key \"{key}\" more than once.")]
    DuplicateKey { name: String, key: String },

    #[error("The {level} name \"{name}\" must not contain a {other} key.")]
    OutOfLevelKey {
        name: String,
        level: Level,
        other: Level,
    },

    #[error(
        "A {level} already exists with the same {level} id as {new}. \
         The existing folder is {existing}."
    )]
    DuplicateEntity {
        new: String,
        existing: String,
        level: Level,
    },

    #[error(
        "Multiple {level} ids matching {new} exist: {matches:?}. \
         Ensure unique {level} ids appear only once across the project."
    )]
    MultipleMatches {
        new: String,
        matches: Vec<String>,
        level: Level,
    },

    #[error(
        "The number of value digits for the {level} level are not consistent \
         (found widths: {widths:?}). Cannot suggest a {level} number."
    )]
    InconsistentDigitWidth { level: Level, widths: Vec<usize> },

    #[error("Could not parse the {level} value of \"{name}\" as an integer.")]
    NonNumericValue { name: String, level: Level },

    #[error("Name \"{name}\" could not be parsed: {reason}")]
    Malformed { name: String, reason: String },
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("Could not determine the home directory.")]
    NoHomeDir,

    #[error(
        "No config file found for project \"{project}\" at {path}. \
         Run `labshuttle {project} init` first."
    )]
    NotFound { project: String, path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("{key} must be a full path with no ~ syntax.")]
    TildePath { key: &'static str },

    #[error("connection-method \"ssh\" requires central-host-id and central-host-username.")]
    MissingSshHost,
}

/// Failures spawning or running the external rclone transfer tool
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    #[error(
        "rclone not found. Install rclone to transfer or list central data, \
         e.g. `conda install -c conda-forge rclone`."
    )]
    RcloneNotFound,

    #[error("Failed to run rclone: {0}")]
    Spawn(std::io::Error),

    #[error("Failed to wait for rclone: {0}")]
    Wait(std::io::Error),

    #[error("Invalid UTF-8 from rclone: {0}")]
    Utf8(std::string::FromUtf8Error),

    #[error("rclone exited with code {code}. {stderr}")]
    Failed { code: i32, stderr: String },
}
