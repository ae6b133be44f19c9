//! Dependency installation inside the activated environment.
//!
//! pip always runs as `<env python> -m pip` so the environment's own installer
//! is used even when its `pip` script is missing or stale.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use vmd_bootstrap_core::manifest::{normalize_name, Manifest};

use crate::activation::Activation;
use crate::error::BootstrapError;
use crate::layout::EnvLayout;
use crate::runner::{run_step, Step, StepRunner};

fn pip(layout: &EnvLayout, activation: &Activation, project_dir: &Path) -> std::process::Command {
    let mut cmd = activation.command(layout.python());
    cmd.arg("-m").arg("pip").current_dir(project_dir);
    cmd
}

/// `python -m pip install --upgrade pip`
pub fn upgrade_installer(
    layout: &EnvLayout,
    activation: &Activation,
    project_dir: &Path,
    runner: &dyn StepRunner,
) -> Result<(), BootstrapError> {
    let mut cmd = pip(layout, activation, project_dir);
    cmd.args(["install", "--upgrade", "pip"]);
    run_step(runner, Step::UpgradeInstaller, &mut cmd)
}

/// `python -m pip install -r <manifest>`
pub fn install_manifest(
    layout: &EnvLayout,
    activation: &Activation,
    manifest: &Path,
    project_dir: &Path,
    runner: &dyn StepRunner,
) -> Result<(), BootstrapError> {
    let mut cmd = pip(layout, activation, project_dir);
    cmd.args(["install", "--disable-pip-version-check", "-r"])
        .arg(manifest);
    run_step(runner, Step::InstallDependencies, &mut cmd)
}

#[derive(Debug, Deserialize)]
struct ListedPackage {
    name: String,
}

/// Parse `pip list --format=json` output into normalized names.
pub fn parse_pip_list(json: &str) -> Result<HashSet<String>, serde_json::Error> {
    let listed: Vec<ListedPackage> = serde_json::from_str(json)?;
    Ok(listed.into_iter().map(|p| normalize_name(&p.name)).collect())
}

/// Normalized names of every distribution installed in the environment.
pub fn installed_packages(
    layout: &EnvLayout,
    activation: &Activation,
    project_dir: &Path,
    runner: &dyn StepRunner,
) -> Result<HashSet<String>, BootstrapError> {
    let mut cmd = pip(layout, activation, project_dir);
    cmd.args(["list", "--format=json", "--disable-pip-version-check"]);
    let out = runner
        .capture(Step::VerifyPackages, &mut cmd)
        .map_err(|source| BootstrapError::Spawn {
            step: Step::VerifyPackages,
            program: layout.python().display().to_string(),
            source,
        })?;
    if !out.status.success {
        return Err(BootstrapError::StepFailed {
            step: Step::VerifyPackages,
            code: out.status.code,
        });
    }
    parse_pip_list(&out.stdout).map_err(|e| {
        BootstrapError::io(
            "Unreadable `pip list` output",
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })
}

/// Manifest requirements without an installed distribution.
///
/// Requirements carrying an environment marker are skipped: the installer may
/// have excluded them on this platform.
pub fn missing_packages(manifest: &Manifest, installed: &HashSet<String>) -> Vec<String> {
    manifest
        .requirements()
        .filter(|r| !r.has_marker && !installed.contains(&r.name))
        .map(|r| r.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pip_list_normalizes() {
        let json = r#"[{"name": "Openai_Whisper", "version": "20231117"}, {"name": "pip", "version": "24.0"}]"#;
        let names = parse_pip_list(json).unwrap();
        assert!(names.contains("openai-whisper"));
        assert!(names.contains("pip"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_parse_pip_list_rejects_garbage() {
        assert!(parse_pip_list("WARNING: not json").is_err());
    }

    #[test]
    fn test_missing_packages_skips_markers() {
        let manifest = Manifest::parse(
            Path::new("requirements.txt"),
            "numpy\nrumps; sys_platform == \"darwin\"\nsounddevice\n",
        );
        let installed: HashSet<String> = ["numpy".to_string()].into_iter().collect();
        assert_eq!(missing_packages(&manifest, &installed), vec!["sounddevice"]);
    }
}
