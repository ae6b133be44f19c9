//! `vmd-bootstrap` / `vmd-bootstrap setup`: the full environment setup.

use anyhow::Result;
use std::io::Write;

use vmd_bootstrap_env::runner::StepRunner;
use vmd_bootstrap_env::{BootstrapOptions, BootstrapReport, Bootstrapper};

use super::banner;

pub const START_TITLE: &str = "Voice to MD: setting up the development environment";
pub const DONE_TITLE: &str = "Setup complete";

/// Run the setup, printing the start banner before and the completion banner
/// only after every step succeeded.
pub fn run_setup(
    options: BootstrapOptions,
    launch_script: &str,
    runner: &dyn StepRunner,
    out: &mut dyn Write,
) -> Result<BootstrapReport> {
    banner(out, START_TITLE)?;
    out.flush()?;

    let bootstrapper = Bootstrapper::new(options, runner);
    let report = bootstrapper.run()?;

    writeln!(out)?;
    banner(out, DONE_TITLE)?;
    if report.up_to_date {
        writeln!(out, "Environment already up to date, nothing reinstalled.")?;
    }
    writeln!(
        out,
        "Environment: {} (Python {})",
        report.env_dir.display(),
        report.interpreter.reported_version
    )?;
    writeln!(
        out,
        "Packages:    {} from {}",
        report.package_count,
        bootstrapper.options().requirements.display()
    )?;
    if !report.missing.is_empty() {
        writeln!(out, "Not found after install: {}", report.missing.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "Start the app with:")?;
    writeln!(out, "    {launch_script}")?;
    Ok(report)
}
