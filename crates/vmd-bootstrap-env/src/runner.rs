//! StepRunner trait: the seam between the bootstrap sequence and external tools.
//!
//! `SystemRunner` spawns real processes with inherited stdio so tool output
//! reaches the console unchanged. Tests substitute a recording runner.

use std::fmt;
use std::io;
use std::process::{Command, Stdio};

use crate::error::BootstrapError;

/// One external-tool invocation in the bootstrap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    InterpreterCheck,
    CreateEnvironment,
    UpgradeInstaller,
    InstallDependencies,
    VerifyPackages,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::InterpreterCheck => "interpreter check",
            Step::CreateEnvironment => "environment creation",
            Step::UpgradeInstaller => "installer upgrade",
            Step::InstallDependencies => "dependency installation",
            Step::VerifyPackages => "package verification",
        };
        f.write_str(s)
    }
}

/// Exit status of a finished step. `code` is `None` when the process was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    pub success: bool,
    pub code: Option<i32>,
}

impl StepStatus {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
        }
    }
}

impl From<std::process::ExitStatus> for StepStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: StepStatus,
    pub stdout: String,
    pub stderr: String,
}

pub trait StepRunner {
    /// Run to completion, streaming the tool's output to the console.
    fn run(&self, step: Step, cmd: &mut Command) -> io::Result<StepStatus>;

    /// Run to completion and capture stdout/stderr.
    fn capture(&self, step: Step, cmd: &mut Command) -> io::Result<CapturedOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl StepRunner for SystemRunner {
    fn run(&self, step: Step, cmd: &mut Command) -> io::Result<StepStatus> {
        tracing::debug!(%step, command = %describe(cmd), "running");
        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.into())
    }

    fn capture(&self, step: Step, cmd: &mut Command) -> io::Result<CapturedOutput> {
        tracing::debug!(%step, command = %describe(cmd), "capturing");
        let out = cmd.stdin(Stdio::null()).output()?;
        Ok(CapturedOutput {
            status: out.status.into(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

/// Run a step and turn spawn errors and non-zero exits into [`BootstrapError`].
pub fn run_step(
    runner: &dyn StepRunner,
    step: Step,
    cmd: &mut Command,
) -> Result<(), BootstrapError> {
    let status = runner.run(step, cmd).map_err(|source| BootstrapError::Spawn {
        step,
        program: cmd.get_program().to_string_lossy().into_owned(),
        source,
    })?;
    if status.success {
        Ok(())
    } else {
        Err(BootstrapError::StepFailed {
            step,
            code: status.code,
        })
    }
}

/// Program and arguments as a single display string.
pub fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
