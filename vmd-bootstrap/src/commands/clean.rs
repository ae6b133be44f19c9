//! `vmd-bootstrap clean`: remove the virtual environment directory.

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

/// Outcome of a clean request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    NothingToRemove,
    DryRun,
    Cancelled,
    Removed { bytes: u64 },
}

pub fn cmd_clean(
    env_dir: &Path,
    dry_run: bool,
    force: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<CleanOutcome> {
    if !env_dir.exists() {
        writeln!(out, "No virtual environment found at {}", env_dir.display())?;
        return Ok(CleanOutcome::NothingToRemove);
    }

    let size = dir_size(env_dir);
    writeln!(
        out,
        "🗂  Virtual environment: {} ({})",
        env_dir.display(),
        format_size(size)
    )?;

    if dry_run {
        writeln!(out, "(Dry run: no files removed. Remove --dry-run to delete.)")?;
        return Ok(CleanOutcome::DryRun);
    }

    if !force {
        write!(out, "\nRemove it? [y/N] ")?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            writeln!(out, "Cancelled.")?;
            return Ok(CleanOutcome::Cancelled);
        }
    }

    fs::remove_dir_all(env_dir)
        .with_context(|| format!("Failed to remove {}", env_dir.display()))?;
    writeln!(out, "✓ Removed {}, freed {}", env_dir.display(), format_size(size))?;
    Ok(CleanOutcome::Removed { bytes: size })
}

/// Compute total size of a directory recursively.
fn dir_size(path: &Path) -> u64 {
    let mut total: u64 = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            if meta.is_dir() {
                total += dir_size(&entry.path());
            } else {
                total += meta.len();
            }
        }
    }
    total
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_env() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("venv").join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("python"), vec![0u8; 2048]).unwrap();
        dir
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_clean_missing_env() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let outcome = cmd_clean(
            &dir.path().join("venv"),
            false,
            true,
            &mut std::io::empty(),
            &mut out,
        )
        .unwrap();
        assert_eq!(outcome, CleanOutcome::NothingToRemove);
    }

    #[test]
    fn test_clean_dry_run_keeps_files() {
        let dir = populated_env();
        let env = dir.path().join("venv");
        let mut out = Vec::new();
        let outcome = cmd_clean(&env, true, false, &mut std::io::empty(), &mut out).unwrap();
        assert_eq!(outcome, CleanOutcome::DryRun);
        assert!(env.exists());
        assert!(String::from_utf8(out).unwrap().contains("2.0 KB"));
    }

    #[test]
    fn test_clean_prompt_declined() {
        let dir = populated_env();
        let env = dir.path().join("venv");
        let mut input = std::io::Cursor::new("n\n");
        let mut out = Vec::new();
        let outcome = cmd_clean(&env, false, false, &mut input, &mut out).unwrap();
        assert_eq!(outcome, CleanOutcome::Cancelled);
        assert!(env.exists());
    }

    #[test]
    fn test_clean_prompt_accepted() {
        let dir = populated_env();
        let env = dir.path().join("venv");
        let mut input = std::io::Cursor::new("yes\n");
        let mut out = Vec::new();
        let outcome = cmd_clean(&env, false, false, &mut input, &mut out).unwrap();
        assert_eq!(outcome, CleanOutcome::Removed { bytes: 2048 });
        assert!(!env.exists());
    }
}
