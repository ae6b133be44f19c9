//! Environment activation for child processes.
//!
//! Equivalent of sourcing `bin/activate`, applied per spawned command: the
//! bootstrapper's children see the isolated environment, the invoking shell
//! never does.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::error::BootstrapError;
use crate::layout::EnvLayout;

/// Resolved activation: variables to set and remove on every child command.
#[derive(Debug, Clone)]
pub struct Activation {
    pub virtual_env: PathBuf,
    pub path: OsString,
    pub removed_env: Vec<&'static str>,
}

impl Activation {
    /// Build from the environment layout and the PATH it should be prepended to.
    pub fn new(layout: &EnvLayout, current_path: Option<OsString>) -> Result<Self, BootstrapError> {
        let mut dirs = vec![layout.bin_dir()];
        if let Some(p) = current_path {
            dirs.extend(std::env::split_paths(&p));
        }
        let path = std::env::join_paths(dirs)?;
        Ok(Self {
            virtual_env: layout.root().to_path_buf(),
            path,
            removed_env: vec!["PYTHONHOME"],
        })
    }

    /// Activation using this process's PATH.
    pub fn from_process(layout: &EnvLayout) -> Result<Self, BootstrapError> {
        Self::new(layout, std::env::var_os("PATH"))
    }

    pub fn apply(&self, cmd: &mut Command) {
        cmd.env("VIRTUAL_ENV", &self.virtual_env);
        cmd.env("PATH", &self.path);
        for k in &self.removed_env {
            cmd.env_remove(k);
        }
    }

    /// A command for `program`, activated.
    pub fn command(&self, program: impl Into<PathBuf>) -> Command {
        let mut cmd = Command::new(program.into());
        self.apply(&mut cmd);
        cmd
    }
}
