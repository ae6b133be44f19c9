//! Command handlers. Each writes its human-facing output to the given writer.

pub mod check;
pub mod clean;
pub mod setup;

use std::io::Write;

const RULE: &str = "==================================================";

/// Framed status banner.
pub(crate) fn banner(out: &mut dyn Write, title: &str) -> std::io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, " {title}")?;
    writeln!(out, "{RULE}")
}
