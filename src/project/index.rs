//! Existing-name discovery across the local and central stores.
//!
//! Subject names are found at the top level of each store, session names
//! inside one subject folder. The central store is searched directly when it
//! is a local filesystem, and through `rclone lsf` when it is SSH-backed.

use std::path::{Path, PathBuf};

use crate::config::{ConnectionMethod, ProjectConfig};
use crate::error::TransferError;
use crate::names::Level;
use crate::project::transfer;
use crate::utils::debug_enabled;

/// Union of local and central folder names at one level, first-seen order,
/// duplicates removed. For sessions, pass the subject to search within.
pub(crate) fn union_of_local_and_central(
    cfg: &ProjectConfig,
    level: Level,
    sub: Option<&str>,
) -> Result<Vec<String>, TransferError> {
    let mut names = search_local(&scoped(cfg.local_root(), sub), level);
    for name in search_central(cfg, level, sub)? {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

fn scoped(root: PathBuf, sub: Option<&str>) -> PathBuf {
    match sub {
        Some(sub) => root.join(sub),
        None => root,
    }
}

/// Glob a directory for `<prefix>-*` folders, returning folder names only.
/// The directory part is escaped so project paths containing glob
/// metacharacters still match literally.
pub(crate) fn search_local(dir: &Path, level: Level) -> Vec<String> {
    let dir = glob::Pattern::escape(&dir.display().to_string());
    let pattern = format!("{}/{}-*", dir, level.prefix());

    let mut names = Vec::new();
    if let Ok(entries) = glob::glob(&pattern) {
        for entry in entries.flatten() {
            if entry.is_dir()
                && let Some(name) = entry.file_name().and_then(|name| name.to_str())
            {
                names.push(name.to_string());
            }
        }
    }
    names
}

fn search_central(
    cfg: &ProjectConfig,
    level: Level,
    sub: Option<&str>,
) -> Result<Vec<String>, TransferError> {
    match cfg.connection_method {
        ConnectionMethod::LocalFilesystem => {
            Ok(search_local(&scoped(cfg.central_root(), sub), level))
        }
        ConnectionMethod::Ssh => {
            let dir = scoped(cfg.central_root(), sub);
            match transfer::list_central_dirs(cfg, &dir, level) {
                Ok(names) => Ok(names),
                // A missing path on central is normal (e.g. a subject not
                // yet uploaded); surface it only under --debug.
                Err(TransferError::Failed { code, stderr }) => {
                    if debug_enabled() {
                        eprintln!("central listing of {} failed ({code}): {stderr}", dir.display());
                    }
                    Ok(Vec::new())
                }
                Err(err) => Err(err),
            }
        }
    }
}
