//! Drives the external `rclone` binary for everything that touches the
//! central store: remote setup at init, directory listing over SSH and the
//! upload/download copies themselves.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::config::{ConnectionMethod, ProjectConfig, TransferVerbosity};
use crate::error::TransferError;
use crate::names::Level;
use crate::names::tags::WILDCARD_TAG;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransferDirection {
    Upload,
    Download,
}

/// Per-call transfer behaviour, seeded from the project config
#[derive(Debug, Clone, Copy)]
pub(crate) struct TransferOptions {
    pub(crate) dry_run: bool,
    pub(crate) overwrite: bool,
    pub(crate) verbosity: TransferVerbosity,
    pub(crate) progress: bool,
}

impl TransferOptions {
    pub(crate) fn from_config(cfg: &ProjectConfig, dry_run: bool) -> Self {
        Self {
            dry_run,
            overwrite: cfg.overwrite_old_files,
            verbosity: cfg.transfer_verbosity,
            progress: cfg.show_transfer_progress,
        }
    }
}

/// Run rclone with captured output
fn run_rclone(args: &[String]) -> Result<Output, TransferError> {
    Command::new("rclone")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TransferError::RcloneNotFound
            } else {
                TransferError::Spawn(e)
            }
        })
}

fn check_status(output: Output) -> Result<String, TransferError> {
    if output.status.success() {
        String::from_utf8(output.stdout).map_err(TransferError::Utf8)
    } else {
        Err(TransferError::Failed {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Register the project's central store as an rclone remote.
///
/// Safe to repeat, `rclone config create` overwrites an existing remote of
/// the same name.
pub(crate) fn setup_central_as_rclone_target(cfg: &ProjectConfig) -> Result<(), TransferError> {
    let name = cfg.rclone_config_name();
    let args: Vec<String> = match cfg.connection_method {
        ConnectionMethod::LocalFilesystem => {
            vec!["config".into(), "create".into(), name, "local".into()]
        }
        ConnectionMethod::Ssh => {
            let host = cfg.central_host_id.clone().unwrap_or_default();
            let user = cfg.central_host_username.clone().unwrap_or_default();
            vec![
                "config".into(),
                "create".into(),
                name,
                "sftp".into(),
                "host".into(),
                host,
                "user".into(),
                user,
                "port".into(),
                "22".into(),
                "key_file_auto".into(),
                "true".into(),
            ]
        }
    };

    check_status(run_rclone(&args)?)?;
    Ok(())
}

/// A path on the central store, in rclone remote syntax when SSH-backed
pub(crate) fn central_target(cfg: &ProjectConfig, path: &Path) -> String {
    match cfg.connection_method {
        ConnectionMethod::LocalFilesystem => path.display().to_string(),
        ConnectionMethod::Ssh => format!("{}:{}", cfg.rclone_config_name(), path.display()),
    }
}

/// List `<prefix>-*` folder names directly below a central directory
pub(crate) fn list_central_dirs(
    cfg: &ProjectConfig,
    dir: &Path,
    level: Level,
) -> Result<Vec<String>, TransferError> {
    let args = vec![
        "lsf".to_string(),
        central_target(cfg, dir),
        "--dirs-only".to_string(),
    ];
    let stdout = check_status(run_rclone(&args)?)?;

    let wanted = format!("{}-", level.prefix());
    Ok(stdout
        .lines()
        .map(|line| line.trim_end_matches('/'))
        .filter(|name| name.starts_with(&wanted))
        .map(|name| name.to_string())
        .collect())
}

/// Copy the selected subjects/sessions/datatypes between the stores.
///
/// Formatted names may include the `@*@` wildcard. rclone output goes
/// straight to the terminal.
pub(crate) fn transfer_data(
    cfg: &ProjectConfig,
    direction: TransferDirection,
    sub_names: &[String],
    ses_names: &[String],
    datatypes: &[String],
    options: TransferOptions,
) -> Result<(), TransferError> {
    let local = cfg.local_root().display().to_string();
    let central = central_target(cfg, &cfg.central_root());
    let (source, dest) = match direction {
        TransferDirection::Upload => (local, central),
        TransferDirection::Download => (central, local),
    };

    let filters = build_include_filters(sub_names, ses_names, datatypes);
    let args = build_rclone_args(&source, &dest, &filters, options);

    let status = Command::new("rclone")
        .args(&args)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TransferError::RcloneNotFound
            } else {
                TransferError::Spawn(e)
            }
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(TransferError::Failed {
            code: status.code().unwrap_or(-1),
            stderr: String::new(),
        })
    }
}

/// `sub/ses/datatype/**` include patterns, one per combination. Empty
/// selections and `@*@` both become a `*` path component.
pub(crate) fn build_include_filters(
    sub_names: &[String],
    ses_names: &[String],
    datatypes: &[String],
) -> Vec<String> {
    let subs = components_or_wildcard(sub_names);
    let sess = components_or_wildcard(ses_names);
    let dts = components_or_wildcard(datatypes);

    let mut filters = Vec::with_capacity(subs.len() * sess.len() * dts.len());
    for sub in &subs {
        for ses in &sess {
            for dt in &dts {
                filters.push(format!("{sub}/{ses}/{dt}/**"));
            }
        }
    }
    filters
}

fn components_or_wildcard(names: &[String]) -> Vec<String> {
    if names.is_empty() {
        return vec!["*".to_string()];
    }
    names
        .iter()
        .map(|name| name.replace(WILDCARD_TAG, "*"))
        .collect()
}

pub(crate) fn build_rclone_args(
    source: &str,
    dest: &str,
    filters: &[String],
    options: TransferOptions,
) -> Vec<String> {
    let mut args = vec!["copy".to_string(), source.to_string(), dest.to_string()];

    for filter in filters {
        args.push("--include".to_string());
        args.push(filter.clone());
    }

    if options.dry_run {
        args.push("--dry-run".to_string());
    }
    if !options.overwrite {
        args.push("--ignore-existing".to_string());
    }
    match options.verbosity {
        TransferVerbosity::V => args.push("-v".to_string()),
        TransferVerbosity::Vv => args.push("-vv".to_string()),
    }
    if options.progress {
        args.push("--progress".to_string());
    }

    args
}
