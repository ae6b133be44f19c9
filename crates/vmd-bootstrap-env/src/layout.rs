//! Paths inside an isolated environment directory.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLayout {
    root: PathBuf,
}

impl EnvLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables.
    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(target_os = "windows") {
            self.root.join("Scripts")
        } else {
            self.root.join("bin")
        }
    }

    pub fn python(&self) -> PathBuf {
        if cfg!(target_os = "windows") {
            self.bin_dir().join("python.exe")
        } else {
            self.bin_dir().join("python")
        }
    }

    /// The environment has been materialized (its interpreter exists).
    pub fn is_populated(&self) -> bool {
        self.python().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_unix_layout() {
        let layout = EnvLayout::new("/work/venv");
        assert_eq!(layout.bin_dir(), PathBuf::from("/work/venv/bin"));
        assert_eq!(layout.python(), PathBuf::from("/work/venv/bin/python"));
    }

    #[test]
    fn test_is_populated() {
        let dir = tempfile::tempdir().unwrap();
        let layout = EnvLayout::new(dir.path().join("venv"));
        assert!(!layout.is_populated());
        std::fs::create_dir_all(layout.bin_dir()).unwrap();
        std::fs::write(layout.python(), "").unwrap();
        assert!(layout.is_populated());
    }
}
