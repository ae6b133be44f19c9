//! vmd-bootstrap CLI library: argument handling, command dispatch, exit codes.

mod cli;
pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::Path;

use cli::{Cli, Commands};
use vmd_bootstrap_core::config::{load_dotenv_from_dir, BootstrapConfig};
use vmd_bootstrap_env::runner::{StepRunner, SystemRunner};
use vmd_bootstrap_env::{BootstrapError, BootstrapOptions};

/// Run the CLI: parse args, load `.env` from the project directory, init
/// tracing, dispatch.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let project_dir = match &cli.layout.project_dir {
        Some(dir) => std::path::absolute(dir)
            .with_context(|| format!("Cannot resolve {}", dir.display()))?,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    // Before tracing init and config: .env may set VMD_LOG_LEVEL and layout keys
    load_dotenv_from_dir(&project_dir);
    vmd_bootstrap_core::observability::init_tracing();

    let cfg = cli.layout.apply(BootstrapConfig::from_env());
    tracing::debug!(?cfg, project_dir = %project_dir.display(), "resolved configuration");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    dispatch(
        resolve_command(&cli),
        &project_dir,
        &cfg,
        &SystemRunner,
        &mut stdin.lock(),
        &mut stdout.lock(),
    )
}

/// The subcommand to run, with the top-level `--force` folded in.
fn resolve_command(cli: &Cli) -> Commands {
    match cli.command.clone() {
        None => Commands::Setup { force: cli.force },
        Some(Commands::Setup { force }) => Commands::Setup {
            force: force || cli.force,
        },
        Some(Commands::Clean { dry_run, force }) => Commands::Clean {
            dry_run,
            force: force || cli.force,
        },
        Some(Commands::Check) => Commands::Check,
    }
}

fn dispatch(
    command: Commands,
    project_dir: &Path,
    cfg: &BootstrapConfig,
    runner: &dyn StepRunner,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Setup { force } => {
            let mut options = BootstrapOptions::from_config(project_dir, cfg)?;
            options.force = force;
            commands::setup::run_setup(options, &cfg.launch_script, runner, out)?;
        }
        Commands::Check => {
            let options = BootstrapOptions::from_config(project_dir, cfg)?;
            commands::check::run_check(options, runner, out)?;
        }
        // Only the layout matters here; the interpreter version is not consulted
        Commands::Clean { dry_run, force } => {
            let env_dir = project_dir.join(&cfg.venv_dir);
            commands::clean::cmd_clean(&env_dir, dry_run, force, input, out)?;
        }
    }
    Ok(())
}

/// Process exit code for a failed run.
///
/// A failing tool's own exit code is propagated; everything else exits 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BootstrapError>() {
        Some(e) => e.exit_code(),
        None => 1,
    }
}

/// Print a failed run to `w`.
///
/// A missing interpreter gets remediation text. A failing tool already
/// printed its own output, so nothing is added for it.
pub fn report_error(err: &anyhow::Error, w: &mut dyn Write) {
    match err.downcast_ref::<BootstrapError>() {
        Some(BootstrapError::InterpreterMissing { version, remediation }) => {
            let _ = writeln!(w, "Error: Python {version} is required but was not found on PATH.");
            let _ = writeln!(w);
            let _ = writeln!(w, "Install it with:");
            let _ = writeln!(w, "    {remediation}");
            let _ = writeln!(w);
            let _ = writeln!(w, "Then run this setup again.");
        }
        Some(e @ BootstrapError::StepFailed { .. }) => {
            tracing::debug!(error = %e, "setup aborted");
        }
        _ => {
            let _ = writeln!(w, "Error: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmd_bootstrap_env::runner::Step;

    #[test]
    fn test_exit_code_for_tool_failure() {
        let err = anyhow::Error::from(BootstrapError::StepFailed {
            step: Step::InstallDependencies,
            code: Some(42),
        });
        assert_eq!(exit_code(&err), 42);
        let mut buf = Vec::new();
        report_error(&err, &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_report_missing_interpreter() {
        let err = anyhow::Error::from(BootstrapError::InterpreterMissing {
            version: "3.11".into(),
            remediation: "brew install python@3.11".into(),
        });
        assert_eq!(exit_code(&err), 1);
        let mut buf = Vec::new();
        report_error(&err, &mut buf);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Python 3.11 is required"));
        assert!(text.contains("brew install python@3.11"));
    }

    #[test]
    fn test_top_level_force_reaches_clean() {
        let cli = Cli::try_parse_from(["vmd-bootstrap", "--force", "clean"]).unwrap();
        assert!(matches!(
            resolve_command(&cli),
            Commands::Clean {
                dry_run: false,
                force: true
            }
        ));

        let cli = Cli::try_parse_from(["vmd-bootstrap", "--force", "setup"]).unwrap();
        assert!(matches!(resolve_command(&cli), Commands::Setup { force: true }));

        let cli = Cli::try_parse_from(["vmd-bootstrap"]).unwrap();
        assert!(matches!(resolve_command(&cli), Commands::Setup { force: false }));
    }

    #[test]
    fn test_clean_ignores_invalid_python_version() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join("venv");
        std::fs::create_dir_all(env.join("bin")).unwrap();
        std::fs::write(env.join("bin").join("python"), b"#!").unwrap();
        let cfg = BootstrapConfig {
            python_version: "3.11.4".to_string(),
            ..BootstrapConfig::default()
        };

        let mut out = Vec::new();
        dispatch(
            Commands::Clean {
                dry_run: false,
                force: true,
            },
            dir.path(),
            &cfg,
            &SystemRunner,
            &mut std::io::empty(),
            &mut out,
        )
        .unwrap();
        assert!(!env.exists());

        let err = dispatch(
            Commands::Check,
            dir.path(),
            &cfg,
            &SystemRunner,
            &mut std::io::empty(),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BootstrapError>(),
            Some(BootstrapError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_other_errors_use_exit_one() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(exit_code(&err), 1);
        let mut buf = Vec::new();
        report_error(&err, &mut buf);
        assert_eq!(String::from_utf8(buf).unwrap(), "Error: boom\n");
    }
}
