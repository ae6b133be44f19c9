//! Requirement manifest (`requirements.txt`) parsing.
//!
//! Only what the bootstrapper needs: which distributions are declared, so the
//! installed set can be checked after `pip install -r`. Resolution and version
//! matching stay with the installer.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// A named requirement, e.g. `openai-whisper==20231117` or `torch>=2; sys_platform == "darwin"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Normalized distribution name (lowercase, `-`/`_`/`.` runs collapsed to `-`)
    pub name: String,
    /// The requirement as written, inline comment removed
    pub spec_line: String,
    /// 1-based line where the requirement starts
    pub line_no: usize,
    /// Carries an environment marker (`; ...`) and may legitimately be skipped
    pub has_marker: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    Requirement(Requirement),
    /// Installer option such as `--index-url ...` or `-r base.txt`
    Option(String),
    /// Direct reference without a recoverable name (bare URL or local path)
    Unnamed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn parse(path: &Path, content: &str) -> Self {
        let mut entries = Vec::new();
        let mut pending = String::new();
        let mut start_line = 0;

        for (idx, raw) in content.lines().enumerate() {
            if pending.is_empty() {
                start_line = idx + 1;
            }
            let line = strip_comment(raw);
            if let Some(cont) = line.strip_suffix('\\') {
                pending.push_str(cont.trim());
                pending.push(' ');
                continue;
            }
            pending.push_str(line.trim());
            let logical = std::mem::take(&mut pending);
            if let Some(entry) = parse_entry(logical.trim(), start_line) {
                entries.push(entry);
            }
        }
        if let Some(entry) = parse_entry(pending.trim(), start_line) {
            entries.push(entry);
        }

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.entries.iter().filter_map(|e| match e {
            ManifestEntry::Requirement(r) => Some(r),
            _ => None,
        })
    }

    /// Number of declared packages, named or not.
    pub fn package_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !matches!(e, ManifestEntry::Option(_)))
            .count()
    }
}

/// Normalize a distribution name the way package indexes compare them.
pub fn normalize_name(name: &str) -> String {
    static SEP: OnceLock<Regex> = OnceLock::new();
    let sep = SEP.get_or_init(|| Regex::new(r"[-_.]+").expect("valid regex"));
    sep.replace_all(&name.to_lowercase(), "-").into_owned()
}

fn strip_comment(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return "";
    }
    // `#` only starts a comment at line start or after whitespace (URLs use `#egg=`)
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(pos) => line[..pos].trim_end(),
        None => line.trim_end(),
    }
}

fn parse_entry(line: &str, line_no: usize) -> Option<ManifestEntry> {
    static NAME: OnceLock<Regex> = OnceLock::new();
    if line.is_empty() {
        return None;
    }
    if line.starts_with('-') {
        return Some(ManifestEntry::Option(line.to_string()));
    }
    let name_re =
        NAME.get_or_init(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)").expect("valid regex"));

    let has_marker = line.contains(';');
    let head = line.split(';').next().unwrap_or(line).trim();
    let looks_like_reference = head.contains("://") || head.starts_with('.') || head.starts_with('/');

    // `name @ https://...` keeps its name; a bare URL or path does not
    if let Some((name_part, _)) = head.split_once(" @ ") {
        if let Some(m) = name_re.captures(name_part.trim()).and_then(|c| c.get(1)) {
            return Some(requirement(m.as_str(), line, line_no, has_marker));
        }
    }
    if looks_like_reference {
        return Some(ManifestEntry::Unnamed(line.to_string()));
    }
    match name_re.captures(head).and_then(|c| c.get(1)) {
        Some(m) => Some(requirement(m.as_str(), line, line_no, has_marker)),
        None => Some(ManifestEntry::Unnamed(line.to_string())),
    }
}

fn requirement(name: &str, line: &str, line_no: usize, has_marker: bool) -> ManifestEntry {
    ManifestEntry::Requirement(Requirement {
        name: normalize_name(name),
        spec_line: line.to_string(),
        line_no,
        has_marker,
    })
}
