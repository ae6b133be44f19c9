//! Bootstrap failures.
//!
//! `InterpreterMissing` is the one anticipated precondition failure and carries
//! remediation text. `StepFailed` carries the failing tool's exit code so the
//! binary can exit with it unchanged.

use std::path::PathBuf;

use thiserror::Error;

use crate::runner::Step;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Python {version} was not found on PATH")]
    InterpreterMissing { version: String, remediation: String },

    #[error("{step} failed with exit code {}", describe_code(.code))]
    StepFailed { step: Step, code: Option<i32> },

    #[error("{step}: failed to launch {program}: {source}")]
    Spawn {
        step: Step,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dependency manifest not found: {}", .path.display())]
    ManifestMissing { path: PathBuf },

    #[error("Invalid Python version '{0}' (expected MAJOR.MINOR, e.g. 3.11)")]
    InvalidVersion(String),

    #[error("Cannot build PATH for the activated environment: {0}")]
    ActivationPath(#[from] std::env::JoinPathsError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
}

impl BootstrapError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code for this failure: the failing tool's own code when there is one.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StepFailed { code: Some(c), .. } if *c != 0 => *c,
            _ => 1,
        }
    }
}
