//! Isolated environment creation (`<interpreter> -m venv <dir>`).

use std::path::Path;
use std::process::Command;

use crate::error::BootstrapError;
use crate::interpreter::Interpreter;
use crate::layout::EnvLayout;
use crate::runner::{run_step, Step, StepRunner};

/// Materialize the environment at `layout.root()`.
///
/// Re-running over an existing environment upgrades it in place; nothing is
/// removed first, so a failed run leaves whatever the tool produced.
pub fn create_environment(
    interpreter: &Interpreter,
    layout: &EnvLayout,
    project_dir: &Path,
    runner: &dyn StepRunner,
) -> Result<(), BootstrapError> {
    let mut cmd = Command::new(&interpreter.path);
    cmd.arg("-m").arg("venv").arg(layout.root());
    cmd.current_dir(project_dir);
    run_step(runner, Step::CreateEnvironment, &mut cmd)?;

    if !layout.is_populated() {
        return Err(BootstrapError::io(
            format!("venv reported success but {} is missing", layout.python().display()),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }
    Ok(())
}
