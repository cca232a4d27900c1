/// Top-level folder holding all subject folders inside a project root
pub(crate) const TOP_LEVEL_FOLDER: &str = "rawdata";

/// Directory under the home folder where per-project configs are stored
pub(crate) const CONFIG_DIR_NAME: &str = ".labshuttle";

/// Per-project config filename
pub(crate) const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment override for the config directory (used by tests)
pub(crate) const CONFIG_DIR_ENV: &str = "LABSHUTTLE_HOME";

/// Digit width used for suggested numbers when a project has no
/// subjects or sessions yet (e.g. "sub-001")
pub(crate) const DEFAULT_NUM_DIGITS: usize = 3;
