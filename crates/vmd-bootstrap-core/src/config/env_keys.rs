//! Environment variable keys and defaults.
//!
//! Primary keys use the `VMD_*` prefix.

/// Setup layout: interpreter version and project-relative paths
pub mod setup {
    /// Required interpreter version as `major.minor`.
    pub const VMD_PYTHON_VERSION: &str = "VMD_PYTHON_VERSION";
    pub const DEFAULT_PYTHON_VERSION: &str = "3.11";

    pub const VMD_VENV_DIR: &str = "VMD_VENV_DIR";
    pub const DEFAULT_VENV_DIR: &str = "venv";

    pub const VMD_REQUIREMENTS: &str = "VMD_REQUIREMENTS";
    pub const DEFAULT_REQUIREMENTS: &str = "requirements.txt";

    /// Script the user runs after setup completes.
    pub const VMD_LAUNCH_SCRIPT: &str = "VMD_LAUNCH_SCRIPT";
    pub const DEFAULT_LAUNCH_SCRIPT: &str = "./run.sh";
}

/// Observability and logging
pub mod observability {
    pub const VMD_QUIET: &str = "VMD_QUIET";
    pub const VMD_LOG_LEVEL: &str = "VMD_LOG_LEVEL";
    pub const VMD_LOG_JSON: &str = "VMD_LOG_JSON";
    pub const DEFAULT_LOG_LEVEL: &str = "vmd_bootstrap=info,vmd_bootstrap_env=info";
}
