//! Folder tree creation in the local project.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::error::AppError;
use crate::names::validate::{self, CheckMode};
use crate::names::Level;
use crate::project::index;

/// Canonical datatype folders, created below the session level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DatatypeFolder {
    pub(crate) name: &'static str,
    pub(crate) level: Level,
}

pub(crate) const DATATYPE_FOLDERS: &[DatatypeFolder] = &[
    DatatypeFolder {
        name: "ephys",
        level: Level::Ses,
    },
    DatatypeFolder {
        name: "behav",
        level: Level::Ses,
    },
    DatatypeFolder {
        name: "funcimg",
        level: Level::Ses,
    },
    DatatypeFolder {
        name: "anat",
        level: Level::Ses,
    },
];

/// Map user datatype input to the canonical folders; "all" selects every
/// datatype.
pub(crate) fn resolve_datatypes(input: &[String]) -> Result<Vec<DatatypeFolder>, AppError> {
    if input.iter().any(|name| name == "all") {
        return Ok(DATATYPE_FOLDERS.to_vec());
    }

    let mut resolved = Vec::with_capacity(input.len());
    for name in input {
        let folder = DATATYPE_FOLDERS
            .iter()
            .find(|folder| folder.name == name)
            .ok_or_else(|| AppError::UnknownDatatype {
                input: name.clone(),
            })?;
        resolved.push(*folder);
    }
    Ok(resolved)
}

/// Result of a folder-tree creation
#[derive(Debug, Default)]
pub(crate) struct CreatedTree {
    /// Folders newly created, in creation order
    pub(crate) made: Vec<PathBuf>,
    /// Non-fatal findings (digit-width mismatches)
    pub(crate) warnings: Vec<String>,
}

/// Create subject / session / datatype folders under the local root.
///
/// Names must already be formatted. Candidates are validated against the
/// union of local and central names before anything is written: a duplicate
/// entity aborts the whole call, width mismatches are collected as
/// warnings. Folders that already exist are left untouched.
pub(crate) fn make_folder_trees(
    cfg: &ProjectConfig,
    sub_names: &[String],
    ses_names: &[String],
    datatypes: &[String],
) -> Result<CreatedTree, AppError> {
    let datatype_folders = if ses_names.is_empty() {
        Vec::new()
    } else {
        resolve_datatypes(datatypes)?
    };

    let mut tree = CreatedTree::default();

    // Every check runs before the first directory is written, so a
    // violation on a later subject leaves the tree untouched.
    let existing_subs = index::union_of_local_and_central(cfg, Level::Sub, None)?;
    tree.warnings.extend(validate::validate_names(
        sub_names,
        &existing_subs,
        Level::Sub,
        CheckMode::Warn,
    )?);

    if !ses_names.is_empty() {
        for sub in sub_names {
            let existing_ses = index::union_of_local_and_central(cfg, Level::Ses, Some(sub))?;
            tree.warnings.extend(validate::validate_names(
                ses_names,
                &existing_ses,
                Level::Ses,
                CheckMode::Warn,
            )?);
        }
    }

    for sub in sub_names {
        let sub_path = cfg.local_root().join(sub);
        make_folder(&sub_path, &mut tree.made)?;

        for ses in ses_names {
            let ses_path = sub_path.join(ses);
            make_folder(&ses_path, &mut tree.made)?;

            for datatype in &datatype_folders {
                if datatype.level == Level::Ses {
                    make_folder(&ses_path.join(datatype.name), &mut tree.made)?;
                }
            }
        }
    }

    Ok(tree)
}

fn make_folder(path: &Path, made: &mut Vec<PathBuf>) -> Result<(), AppError> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|source| AppError::CreateFolder {
            path: path.to_path_buf(),
            source,
        })?;
        made.push(path.to_path_buf());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NeuroBlueprintError;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn make_config(local: &Path, central: &Path) -> ProjectConfig {
        let toml = format!(
            "local-path = {:?}\ncentral-path = {:?}\nconnection-method = \"local-filesystem\"\n",
            local, central
        );
        let mut cfg: ProjectConfig = toml::from_str(&toml).unwrap();
        cfg.project_name = "test_project".to_string();
        cfg
    }

    #[test]
    fn resolve_all_selects_every_datatype() {
        let resolved = resolve_datatypes(&names(&["all"])).unwrap();
        assert_eq!(resolved.len(), DATATYPE_FOLDERS.len());
    }

    #[test]
    fn resolve_rejects_unknown_datatype() {
        assert!(matches!(
            resolve_datatypes(&names(&["behav", "astrology"])),
            Err(AppError::UnknownDatatype { .. })
        ));
    }

    #[test]
    fn creates_full_tree() {
        let local = tempfile::tempdir().unwrap();
        let central = tempfile::tempdir().unwrap();
        let cfg = make_config(local.path(), central.path());

        let tree = make_folder_trees(
            &cfg,
            &names(&["sub-001", "sub-002"]),
            &names(&["ses-001"]),
            &names(&["behav", "ephys"]),
        )
        .unwrap();

        assert!(cfg.local_root().join("sub-001/ses-001/behav").is_dir());
        assert!(cfg.local_root().join("sub-002/ses-001/ephys").is_dir());
        assert!(tree.warnings.is_empty());
        // 2 subs * (1 sub dir + 1 ses dir + 2 datatype dirs)
        assert_eq!(tree.made.len(), 8);
    }

    #[test]
    fn subject_only_creation_skips_datatypes() {
        let local = tempfile::tempdir().unwrap();
        let central = tempfile::tempdir().unwrap();
        let cfg = make_config(local.path(), central.path());

        let tree = make_folder_trees(&cfg, &names(&["sub-001"]), &[], &names(&["all"])).unwrap();
        assert_eq!(tree.made, vec![cfg.local_root().join("sub-001")]);
    }

    #[test]
    fn existing_folders_are_not_recreated() {
        let local = tempfile::tempdir().unwrap();
        let central = tempfile::tempdir().unwrap();
        let cfg = make_config(local.path(), central.path());

        make_folder_trees(&cfg, &names(&["sub-001"]), &[], &[]).unwrap();
        let second = make_folder_trees(&cfg, &names(&["sub-001"]), &[], &[]).unwrap();
        assert!(second.made.is_empty());
    }

    #[test]
    fn duplicate_entity_aborts_creation() {
        let local = tempfile::tempdir().unwrap();
        let central = tempfile::tempdir().unwrap();
        let cfg = make_config(local.path(), central.path());
        fs::create_dir_all(cfg.local_root().join("sub-001")).unwrap();

        let err = make_folder_trees(&cfg, &names(&["sub-001_id-a"]), &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            AppError::Convention(NeuroBlueprintError::DuplicateEntity { .. })
        ));
        assert!(!cfg.local_root().join("sub-001_id-a").exists());
    }

    #[test]
    fn duplicate_session_in_central_is_detected() {
        let local = tempfile::tempdir().unwrap();
        let central = tempfile::tempdir().unwrap();
        let cfg = make_config(local.path(), central.path());
        fs::create_dir_all(cfg.central_root().join("sub-001").join("ses-001")).unwrap();

        let err = make_folder_trees(
            &cfg,
            &names(&["sub-001"]),
            &names(&["ses-001_id-a"]),
            &[],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Convention(NeuroBlueprintError::DuplicateEntity { .. })
        ));
    }

    #[test]
    fn conflict_on_later_subject_leaves_nothing_created() {
        let local = tempfile::tempdir().unwrap();
        let central = tempfile::tempdir().unwrap();
        let cfg = make_config(local.path(), central.path());
        fs::create_dir_all(cfg.central_root().join("sub-002").join("ses-001")).unwrap();

        let err = make_folder_trees(
            &cfg,
            &names(&["sub-001", "sub-002"]),
            &names(&["ses-001_id-a"]),
            &[],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Convention(NeuroBlueprintError::DuplicateEntity { .. })
        ));
        assert!(!cfg.local_root().join("sub-001").exists());
        assert!(!cfg.local_root().join("sub-001/ses-001_id-a").exists());
    }

    #[test]
    fn width_mismatch_is_a_warning_not_an_error() {
        let local = tempfile::tempdir().unwrap();
        let central = tempfile::tempdir().unwrap();
        let cfg = make_config(local.path(), central.path());
        fs::create_dir_all(cfg.local_root().join("sub-001")).unwrap();

        let tree = make_folder_trees(&cfg, &names(&["sub-02"]), &[], &[]).unwrap();
        assert_eq!(tree.warnings.len(), 1);
        assert!(cfg.local_root().join("sub-02").is_dir());
    }
}
