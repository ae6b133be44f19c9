//! `vmd-bootstrap check`: interpreter check only.

use anyhow::Result;
use std::io::Write;

use vmd_bootstrap_env::interpreter::Interpreter;
use vmd_bootstrap_env::runner::StepRunner;
use vmd_bootstrap_env::{BootstrapOptions, Bootstrapper};

pub fn run_check(
    options: BootstrapOptions,
    runner: &dyn StepRunner,
    out: &mut dyn Write,
) -> Result<Interpreter> {
    let interpreter = Bootstrapper::new(options, runner).check_interpreter()?;
    writeln!(
        out,
        "✓ Python {} at {}",
        interpreter.reported_version,
        interpreter.path.display()
    )?;
    Ok(interpreter)
}
