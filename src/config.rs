//! Per-project configuration.
//!
//! Each project has one TOML file at `~/.labshuttle/<project>/config.toml`
//! (or under `$LABSHUTTLE_HOME` when set). The config names the local and
//! central storage roots and how to reach the central store.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_NUM_DIGITS, TOP_LEVEL_FOLDER,
};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ConnectionMethod {
    LocalFilesystem,
    Ssh,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TransferVerbosity {
    #[default]
    V,
    Vv,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct ProjectConfig {
    #[serde(skip)]
    pub(crate) project_name: String,

    pub(crate) local_path: PathBuf,
    pub(crate) central_path: PathBuf,
    pub(crate) connection_method: ConnectionMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) central_host_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) central_host_username: Option<String>,

    #[serde(default)]
    pub(crate) overwrite_old_files: bool,
    #[serde(default)]
    pub(crate) transfer_verbosity: TransferVerbosity,
    #[serde(default)]
    pub(crate) show_transfer_progress: bool,

    /// Digit width for suggested numbers when the project is empty
    #[serde(default = "default_num_digits")]
    pub(crate) default_digits: usize,
}

fn default_num_digits() -> usize {
    DEFAULT_NUM_DIGITS
}

/// Directory holding all per-project config folders
pub(crate) fn app_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

pub(crate) fn config_path(project: &str) -> Result<PathBuf, ConfigError> {
    Ok(app_dir()?.join(project).join(CONFIG_FILE_NAME))
}

impl ProjectConfig {
    pub(crate) fn load(project: &str) -> Result<Self, ConfigError> {
        let path = config_path(project)?;
        if !path.exists() {
            return Err(ConfigError::NotFound {
                project: project.to_string(),
                path,
            });
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut config: Self =
            toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;
        config.project_name = project.to_string();
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn save(&self) -> Result<PathBuf, ConfigError> {
        self.validate()?;

        let path = config_path(&self.project_name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (key, path) in [
            ("local-path", &self.local_path),
            ("central-path", &self.central_path),
        ] {
            if path.to_string_lossy().starts_with('~') {
                return Err(ConfigError::TildePath { key });
            }
        }

        if self.connection_method == ConnectionMethod::Ssh
            && (self.central_host_id.is_none() || self.central_host_username.is_none())
        {
            return Err(ConfigError::MissingSshHost);
        }

        Ok(())
    }

    /// Root of the local folder tree (subject folders live directly below)
    pub(crate) fn local_root(&self) -> PathBuf {
        self.local_path.join(TOP_LEVEL_FOLDER)
    }

    /// Root of the central folder tree, as a path on the central store
    pub(crate) fn central_root(&self) -> PathBuf {
        self.central_path.join(TOP_LEVEL_FOLDER)
    }

    /// Name of the rclone remote configured for this project's central store
    pub(crate) fn rclone_config_name(&self) -> String {
        let method = match self.connection_method {
            ConnectionMethod::LocalFilesystem => "local-filesystem",
            ConnectionMethod::Ssh => "ssh",
        };
        format!("central-{}-{method}", self.project_name)
    }
}
