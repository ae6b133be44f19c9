use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use vmd_bootstrap_core::config::BootstrapConfig;

/// vmd-bootstrap - set up the Voice to MD development environment
///
/// With no subcommand, runs the full setup: interpreter check, virtual
/// environment creation and dependency installation.
#[derive(Parser, Debug)]
#[command(name = "vmd-bootstrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Reinstall even if the environment is already up to date
    #[arg(long, default_value = "false")]
    pub force: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Layout overrides. Unset flags fall back to VMD_* variables, then defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Project directory holding the manifest (default: current directory)
    #[arg(long, global = true, env = "VMD_PROJECT_DIR", value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Required Python version as MAJOR.MINOR (default: from env or 3.11)
    #[arg(long, global = true, value_name = "X.Y")]
    pub python_version: Option<String>,

    /// Virtual environment directory (default: from env or venv)
    #[arg(long, global = true, value_name = "DIR")]
    pub venv_dir: Option<PathBuf>,

    /// Dependency manifest (default: from env or requirements.txt)
    #[arg(long, global = true, value_name = "FILE")]
    pub requirements: Option<PathBuf>,

    /// Script shown in the completion message (default: from env or ./run.sh)
    #[arg(long, global = true, value_name = "PATH")]
    pub launch_script: Option<String>,
}

impl LayoutArgs {
    /// Overlay flags onto a config loaded from the environment.
    pub fn apply(&self, mut cfg: BootstrapConfig) -> BootstrapConfig {
        if let Some(v) = &self.python_version {
            cfg.python_version = v.clone();
        }
        if let Some(v) = &self.venv_dir {
            cfg.venv_dir = v.clone();
        }
        if let Some(v) = &self.requirements {
            cfg.requirements = v.clone();
        }
        if let Some(v) = &self.launch_script {
            cfg.launch_script = v.clone();
        }
        cfg
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the full setup (the default when no subcommand is given)
    Setup {
        /// Reinstall even if the environment is already up to date
        #[arg(long, default_value = "false")]
        force: bool,
    },

    /// Only check that the required Python interpreter is available
    Check,

    /// Remove the virtual environment directory
    Clean {
        /// Show what would be removed without deleting
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f', default_value = "false")]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_setup_with_defaults() {
        let cli = Cli::try_parse_from(["vmd-bootstrap"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.force);
        assert!(cli.layout.python_version.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "vmd-bootstrap",
            "--python-version",
            "3.12",
            "--venv-dir",
            ".venv",
            "setup",
            "--force",
        ])
        .unwrap();
        let cfg = cli.layout.apply(BootstrapConfig::default());
        assert_eq!(cfg.python_version, "3.12");
        assert_eq!(cfg.venv_dir, PathBuf::from(".venv"));
        assert_eq!(cfg.requirements, PathBuf::from("requirements.txt"));
        assert!(matches!(cli.command, Some(Commands::Setup { force: true })));
    }

    #[test]
    fn test_flag_beats_env_value() {
        std::env::set_var("VMD_PYTHON_VERSION", "3.10");
        std::env::set_var("VMD_VENV_DIR", ".venv-from-env");
        let cli =
            Cli::try_parse_from(["vmd-bootstrap", "--python-version", "3.12"]).unwrap();
        let cfg = cli.layout.apply(BootstrapConfig::from_env());
        assert_eq!(cfg.python_version, "3.12");
        assert_eq!(cfg.venv_dir, PathBuf::from(".venv-from-env"));
    }

    #[test]
    fn test_dotenv_values_reach_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "VMD_REQUIREMENTS=deps/app.txt\nVMD_LAUNCH_SCRIPT=./start-app.sh\n",
        )
        .unwrap();
        vmd_bootstrap_core::config::load_dotenv_from_dir(dir.path());
        let cli = Cli::try_parse_from(["vmd-bootstrap"]).unwrap();
        let cfg = cli.layout.apply(BootstrapConfig::from_env());
        assert_eq!(cfg.requirements, PathBuf::from("deps/app.txt"));
        assert_eq!(cfg.launch_script, "./start-app.sh");

        let cli = Cli::try_parse_from(["vmd-bootstrap", "--launch-script", "./other.sh"]).unwrap();
        assert_eq!(cli.layout.apply(BootstrapConfig::from_env()).launch_script, "./other.sh");
    }

    #[test]
    fn test_clean_flags() {
        let cli = Cli::try_parse_from(["vmd-bootstrap", "clean", "--dry-run"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Clean {
                dry_run: true,
                force: false
            })
        ));
    }
}
