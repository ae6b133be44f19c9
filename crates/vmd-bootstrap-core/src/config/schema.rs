//! Config structs grouped by concern, loaded from environment variables.

use super::env_keys::{observability as obv_keys, setup};
use super::loader::{env_bool, env_or};
use std::path::PathBuf;

/// Setup layout. Paths are relative to the project directory unless absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Required interpreter version, `major.minor`
    pub python_version: String,
    pub venv_dir: PathBuf,
    pub requirements: PathBuf,
    pub launch_script: String,
}

impl BootstrapConfig {
    pub fn from_env() -> Self {
        Self {
            python_version: env_or(setup::VMD_PYTHON_VERSION, &[], || {
                setup::DEFAULT_PYTHON_VERSION.to_string()
            }),
            venv_dir: PathBuf::from(env_or(setup::VMD_VENV_DIR, &[], || {
                setup::DEFAULT_VENV_DIR.to_string()
            })),
            requirements: PathBuf::from(env_or(setup::VMD_REQUIREMENTS, &[], || {
                setup::DEFAULT_REQUIREMENTS.to_string()
            })),
            launch_script: env_or(setup::VMD_LAUNCH_SCRIPT, &[], || {
                setup::DEFAULT_LAUNCH_SCRIPT.to_string()
            }),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            python_version: setup::DEFAULT_PYTHON_VERSION.to_string(),
            venv_dir: PathBuf::from(setup::DEFAULT_VENV_DIR),
            requirements: PathBuf::from(setup::DEFAULT_REQUIREMENTS),
            launch_script: setup::DEFAULT_LAUNCH_SCRIPT.to_string(),
        }
    }
}

/// Observability config: quiet, log_level, log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    /// Read once per process; later env changes are not observed.
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| Self {
            quiet: env_bool(obv_keys::VMD_QUIET, &[], false),
            log_level: env_or(obv_keys::VMD_LOG_LEVEL, &[], || {
                obv_keys::DEFAULT_LOG_LEVEL.to_string()
            }),
            log_json: env_bool(obv_keys::VMD_LOG_JSON, &[], false),
        })
    }
}
