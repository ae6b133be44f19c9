//! Required interpreter lookup.
//!
//! The interpreter is resolved on the search path by its versioned name
//! (`python3.11`) and checked with `--version`; a binary that reports another
//! `major.minor` counts as missing.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::BootstrapError;
use crate::runner::{Step, StepRunner};

/// `major.minor` interpreter version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BootstrapError::InvalidVersion(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl PythonVersion {
    /// Executable name looked up on PATH.
    pub fn executable_name(&self) -> String {
        if cfg!(target_os = "windows") {
            // Windows installers ship `python.exe` only; the `--version` check does the filtering.
            "python".to_string()
        } else {
            format!("python{}.{}", self.major, self.minor)
        }
    }

    /// Install command for the current platform.
    pub fn remediation(&self) -> String {
        if cfg!(target_os = "macos") {
            format!("brew install python@{self}")
        } else if cfg!(target_os = "windows") {
            format!("winget install Python.Python.{self}")
        } else {
            format!("sudo apt install python{self} python{self}-venv")
        }
    }

    fn missing(&self) -> BootstrapError {
        BootstrapError::InterpreterMissing {
            version: self.to_string(),
            remediation: self.remediation(),
        }
    }
}

/// A resolved interpreter that satisfies the requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub path: PathBuf,
    /// Full version as reported, e.g. `3.11.9`
    pub reported_version: String,
}

/// Extract `major.minor[.patch]` from `python --version` output.
pub fn parse_version_output(output: &str) -> Option<(PythonVersion, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"Python\s+(\d+)\.(\d+)((?:\.\d+)?\S*)").expect("valid regex")
    });
    let caps = re.captures(output)?;
    let version = PythonVersion {
        major: caps[1].parse().ok()?,
        minor: caps[2].parse().ok()?,
    };
    let full = format!("{}.{}{}", &caps[1], &caps[2], &caps[3]);
    Some((version, full))
}

/// Resolve the required interpreter on `search_path` (the process PATH when `None`).
pub fn locate(
    required: PythonVersion,
    search_path: Option<&OsStr>,
    cwd: &Path,
    runner: &dyn StepRunner,
) -> Result<Interpreter, BootstrapError> {
    let name = required.executable_name();
    let path = match search_path {
        Some(paths) => which::which_in(&name, Some(paths), cwd),
        None => which::which(&name),
    }
    .map_err(|e| {
        tracing::debug!(executable = %name, error = %e, "interpreter not on PATH");
        required.missing()
    })?;

    let mut cmd = Command::new(&path);
    cmd.arg("--version");
    let out = runner.capture(Step::InterpreterCheck, &mut cmd).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "interpreter version check failed to start");
        required.missing()
    })?;
    if !out.status.success {
        tracing::debug!(path = %path.display(), code = ?out.status.code, "interpreter version check failed");
        return Err(required.missing());
    }

    // Python 2 prints its version on stderr
    let reported = parse_version_output(&out.stdout).or_else(|| parse_version_output(&out.stderr));
    match reported {
        Some((found, full)) if found == required => Ok(Interpreter {
            path,
            reported_version: full,
        }),
        Some((found, _)) => {
            tracing::warn!(
                path = %path.display(),
                found = %found,
                required = %required,
                "interpreter on PATH reports a different version"
            );
            Err(required.missing())
        }
        None => {
            tracing::warn!(path = %path.display(), "could not read interpreter version");
            Err(required.missing())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CapturedOutput, StepStatus};
    use std::io;

    struct VersionRunner(&'static str);

    impl StepRunner for VersionRunner {
        fn run(&self, _step: Step, _cmd: &mut Command) -> io::Result<StepStatus> {
            unreachable!()
        }

        fn capture(&self, step: Step, cmd: &mut Command) -> io::Result<CapturedOutput> {
            assert_eq!(step, Step::InterpreterCheck);
            assert_eq!(cmd.get_args().collect::<Vec<_>>(), vec!["--version"]);
            Ok(CapturedOutput {
                status: StepStatus::ok(),
                stdout: self.0.to_string(),
                stderr: String::new(),
            })
        }
    }

    #[test]
    fn test_parse_required_version() {
        let v: PythonVersion = "3.11".parse().unwrap();
        assert_eq!(v, PythonVersion { major: 3, minor: 11 });
        assert_eq!(v.to_string(), "3.11");
        assert!("3".parse::<PythonVersion>().is_err());
        assert!("three.eleven".parse::<PythonVersion>().is_err());
    }

    #[test]
    fn test_parse_version_output() {
        let (v, full) = parse_version_output("Python 3.11.9\n").unwrap();
        assert_eq!(v, PythonVersion { major: 3, minor: 11 });
        assert_eq!(full, "3.11.9");
        let (_, full) = parse_version_output("Python 3.13.0rc2").unwrap();
        assert_eq!(full, "3.13.0rc2");
        assert!(parse_version_output("command not found").is_none());
    }

    #[test]
    fn test_remediation_names_version() {
        let v = PythonVersion { major: 3, minor: 11 };
        assert!(v.remediation().contains("3.11"));
    }

    #[test]
    fn test_locate_missing_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let v = PythonVersion { major: 3, minor: 11 };
        let err = locate(
            v,
            Some(dir.path().as_os_str()),
            dir.path(),
            &VersionRunner("Python 3.11.9"),
        )
        .unwrap_err();
        match err {
            BootstrapError::InterpreterMissing { version, remediation } => {
                assert_eq!(version, "3.11");
                assert_eq!(remediation, v.remediation());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    fn fake_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_found_on_search_path() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_executable(dir.path(), "python3.11");
        let v = PythonVersion { major: 3, minor: 11 };
        let found = locate(
            v,
            Some(dir.path().as_os_str()),
            dir.path(),
            &VersionRunner("Python 3.11.4"),
        )
        .unwrap();
        assert_eq!(found.path, exe);
        assert_eq!(found.reported_version, "3.11.4");
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_rejects_wrong_version() {
        let dir = tempfile::tempdir().unwrap();
        fake_executable(dir.path(), "python3.11");
        let v = PythonVersion { major: 3, minor: 11 };
        let err = locate(
            v,
            Some(dir.path().as_os_str()),
            dir.path(),
            &VersionRunner("Python 3.10.12"),
        )
        .unwrap_err();
        assert!(matches!(err, BootstrapError::InterpreterMissing { .. }));
    }
}
