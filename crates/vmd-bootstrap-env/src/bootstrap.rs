//! The bootstrap sequence.
//!
//! Strictly ordered, stops at the first failure, never rolls back:
//! interpreter check, manifest check, environment creation, activation,
//! installer upgrade, dependency installation, verification.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use vmd_bootstrap_core::config::BootstrapConfig;
use vmd_bootstrap_core::manifest::Manifest;

use crate::activation::Activation;
use crate::builder::create_environment;
use crate::error::BootstrapError;
use crate::info_log;
use crate::installer;
use crate::interpreter::{self, Interpreter, PythonVersion};
use crate::layout::EnvLayout;
use crate::marker::{self, CompletionMarker};
use crate::runner::StepRunner;

#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub project_dir: PathBuf,
    pub python_version: PythonVersion,
    /// Relative to `project_dir` unless absolute
    pub venv_dir: PathBuf,
    /// Relative to `project_dir` unless absolute
    pub requirements: PathBuf,
    /// Reinstall even when the completion marker matches
    pub force: bool,
    /// Search path for the interpreter; the process PATH when `None`
    pub search_path: Option<OsString>,
}

impl BootstrapOptions {
    pub fn from_config(project_dir: &Path, cfg: &BootstrapConfig) -> Result<Self, BootstrapError> {
        Self {
            project_dir: project_dir.to_path_buf(),
            python_version: cfg.python_version.parse()?,
            venv_dir: cfg.venv_dir.clone(),
            requirements: cfg.requirements.clone(),
            force: false,
            search_path: None,
        }
        .into_absolute()
    }

    /// Anchor `project_dir` to the current directory.
    ///
    /// Child tools run with `project_dir` as their working directory, so every
    /// path handed to them must not depend on it.
    pub fn into_absolute(mut self) -> Result<Self, BootstrapError> {
        if self.project_dir.is_relative() {
            self.project_dir = std::path::absolute(&self.project_dir).map_err(|e| {
                BootstrapError::io(format!("Resolve {}", self.project_dir.display()), e)
            })?;
        }
        Ok(self)
    }

    pub fn env_root(&self) -> PathBuf {
        self.project_dir.join(&self.venv_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join(&self.requirements)
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub interpreter: Interpreter,
    pub env_dir: PathBuf,
    /// The completion marker matched; nothing was reinstalled
    pub up_to_date: bool,
    pub package_count: usize,
    /// Declared packages not found after installation
    pub missing: Vec<String>,
}

fn locate_for(opts: &BootstrapOptions, runner: &dyn StepRunner) -> Result<Interpreter, BootstrapError> {
    interpreter::locate(
        opts.python_version,
        opts.search_path.as_deref(),
        &opts.project_dir,
        runner,
    )
}

pub struct Bootstrapper<'a> {
    options: BootstrapOptions,
    runner: &'a dyn StepRunner,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(options: BootstrapOptions, runner: &'a dyn StepRunner) -> Self {
        Self { options, runner }
    }

    pub fn options(&self) -> &BootstrapOptions {
        &self.options
    }

    /// Step 1 alone: resolve the required interpreter.
    pub fn check_interpreter(&self) -> Result<Interpreter, BootstrapError> {
        let opts = self.options.clone().into_absolute()?;
        locate_for(&opts, self.runner)
    }

    pub fn run(&self) -> Result<BootstrapReport, BootstrapError> {
        let opts = self.options.clone().into_absolute()?;

        let interpreter = locate_for(&opts, self.runner)?;
        info_log!(
            "Found Python {} at {}",
            interpreter.reported_version,
            interpreter.path.display()
        );

        let manifest_path = opts.manifest_path();
        if !manifest_path.is_file() {
            return Err(BootstrapError::ManifestMissing {
                path: manifest_path,
            });
        }
        let manifest_content = std::fs::read_to_string(&manifest_path)
            .map_err(|e| BootstrapError::io(format!("Read {}", manifest_path.display()), e))?;
        let manifest = Manifest::parse(&manifest_path, &manifest_content);

        let layout = EnvLayout::new(opts.env_root());

        if !opts.force && layout.is_populated() {
            if let Some(m) = marker::read(layout.root()) {
                if m.matches(&manifest_content, &interpreter.reported_version) {
                    info_log!(
                        "Environment at {} is up to date (installed {})",
                        layout.root().display(),
                        m.completed_at.to_rfc3339()
                    );
                    return Ok(BootstrapReport {
                        interpreter,
                        env_dir: layout.root().to_path_buf(),
                        up_to_date: true,
                        package_count: manifest.package_count(),
                        missing: Vec::new(),
                    });
                }
            }
        }
        if layout.root().exists() {
            marker::clear(layout.root())?;
        }

        info_log!("Creating virtual environment at {}", layout.root().display());
        create_environment(&interpreter, &layout, &opts.project_dir, self.runner)?;

        let activation = match &opts.search_path {
            Some(p) => Activation::new(&layout, Some(p.clone()))?,
            None => Activation::from_process(&layout)?,
        };
        tracing::debug!(virtual_env = %activation.virtual_env.display(), "environment activated");

        info_log!("Upgrading pip");
        installer::upgrade_installer(&layout, &activation, &opts.project_dir, self.runner)?;

        info_log!(
            "Installing {} package(s) from {}",
            manifest.package_count(),
            manifest_path.display()
        );
        installer::install_manifest(
            &layout,
            &activation,
            &manifest_path,
            &opts.project_dir,
            self.runner,
        )?;

        let missing =
            match installer::installed_packages(&layout, &activation, &opts.project_dir, self.runner) {
                Ok(installed) => installer::missing_packages(&manifest, &installed),
                Err(e) => {
                    tracing::warn!(error = %e, "could not verify installed packages");
                    Vec::new()
                }
            };
        for name in &missing {
            tracing::warn!(package = %name, "declared in manifest but not installed");
        }

        marker::write(
            layout.root(),
            &CompletionMarker::new(&manifest_content, &interpreter.reported_version),
        )?;

        Ok(BootstrapReport {
            interpreter,
            env_dir: layout.root().to_path_buf(),
            up_to_date: false,
            package_count: manifest.package_count(),
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(project_dir: &str) -> BootstrapOptions {
        BootstrapOptions {
            project_dir: PathBuf::from(project_dir),
            python_version: PythonVersion { major: 3, minor: 11 },
            venv_dir: PathBuf::from("venv"),
            requirements: PathBuf::from("requirements.txt"),
            force: false,
            search_path: None,
        }
    }

    #[test]
    fn test_relative_project_dir_is_anchored_once() {
        let opts = options("proj").into_absolute().unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(opts.project_dir, cwd.join("proj"));
        assert_eq!(opts.env_root(), cwd.join("proj").join("venv"));
        assert_eq!(opts.manifest_path(), cwd.join("proj").join("requirements.txt"));
    }

    #[test]
    fn test_absolute_project_dir_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path().to_str().unwrap()).into_absolute().unwrap();
        assert_eq!(opts.project_dir, dir.path());
    }

    #[test]
    fn test_from_config_anchors_project_dir() {
        let opts =
            BootstrapOptions::from_config(Path::new("proj"), &BootstrapConfig::default()).unwrap();
        assert!(opts.project_dir.is_absolute());
        assert!(opts.env_root().ends_with("proj/venv"));
    }
}
