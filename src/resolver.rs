//! Applicability checks and target resolution.
//!
//! The host uses [`availability`] to decide whether to show an entry for
//! a target, and [`resolve_target`] to find out what a launch operates on.

use crate::config::{Config, LaunchEntry, Platform};
use crate::error::{LaunchError, Result};
use std::path::{Path, PathBuf};

/// Whether a target is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// A file or directory an entry operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub kind: TargetKind,
}

impl Target {
    /// Builds a target, asking the filesystem whether `path` is a directory.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = if path.is_dir() {
            TargetKind::Directory
        } else {
            TargetKind::File
        };
        Target { path, kind }
    }

    /// A file target, without touching the filesystem.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Target {
            path: path.into(),
            kind: TargetKind::File,
        }
    }

    /// A directory target, without touching the filesystem.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Target {
            path: path.into(),
            kind: TargetKind::Directory,
        }
    }

    /// Whether the target is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == TargetKind::Directory
    }
}

/// Where the host gets the target from.
#[derive(Debug, Clone)]
pub enum TargetSource {
    /// Explicit selection, e.g. from the sidebar. The first path is used.
    Paths(Vec<PathBuf>),
    /// File-scoped invocation on the active file, if any.
    ActiveFile(Option<PathBuf>),
    Nothing,
}

/// Resolves the target for a launch.
///
/// An explicit path always wins. Otherwise a file-scoped invocation falls
/// back to the active file, which must exist on disk.
pub fn resolve_target(source: &TargetSource) -> Result<Target> {
    match source {
        TargetSource::Paths(paths) => match paths.first() {
            Some(path) => Ok(Target::from_path(path)),
            None => Err(LaunchError::NoTarget),
        },
        TargetSource::ActiveFile(Some(path)) if path.exists() => Ok(Target::from_path(path)),
        TargetSource::ActiveFile(_) | TargetSource::Nothing => Err(LaunchError::NoTarget),
    }
}

/// Whether `entry` can be offered for `target` on `platform`.
pub fn is_applicable(entry: &LaunchEntry, target: &Target, platform: Platform) -> bool {
    if !entry.supports(platform) {
        return false;
    }

    match target.kind {
        // Directories are never filtered by suffix
        TargetKind::Directory => !entry.exclude_folders,
        TargetKind::File => matches_filter(&entry.file_filter, &target.path),
    }
}

/// Case-insensitive suffix match, an empty filter matches everything.
fn matches_filter(filter: &[String], path: &Path) -> bool {
    if filter.is_empty() {
        return true;
    }
    let path = path.to_string_lossy().to_lowercase();
    filter
        .iter()
        .any(|suffix| path.ends_with(&suffix.to_lowercase()))
}

/// Result of checking an entry key against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    NotApplicable,
    UnknownKey,
}

/// Looks up `key` and checks it against `target`.
pub fn availability(
    config: &Config,
    key: &str,
    target: &Target,
    platform: Platform,
) -> Availability {
    match config.entry(key) {
        None => Availability::UnknownKey,
        Some(entry) if is_applicable(entry, target, platform) => Availability::Available,
        Some(_) => Availability::NotApplicable,
    }
}

/// Menu enablement: unknown keys are simply disabled.
pub fn is_enabled(config: &Config, key: &str, target: &Target, platform: Platform) -> bool {
    availability(config, key, target, platform) == Availability::Available
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn entry(platforms: &[&str], filter: &[&str], exclude_folders: bool) -> LaunchEntry {
        LaunchEntry {
            platforms: platforms.iter().map(|s| s.to_string()).collect(),
            file_filter: filter.iter().map(|s| s.to_string()).collect(),
            exclude_folders,
            ..LaunchEntry::default()
        }
    }

    #[test]
    fn test_platform_mismatch_is_never_applicable() {
        let e = entry(&["windows", "osx"], &[], false);
        assert!(!is_applicable(&e, &Target::file("/a.txt"), Platform::Linux));
        assert!(!is_applicable(&e, &Target::directory("/a"), Platform::Linux));
        assert!(is_applicable(&e, &Target::file("/a.txt"), Platform::Osx));

        let none = entry(&[], &[], false);
        assert!(!is_applicable(&none, &Target::file("/a.txt"), Platform::Linux));
    }

    #[test]
    fn test_wildcard_platform() {
        let e = entry(&["*"], &[], false);
        for platform in [Platform::Windows, Platform::Osx, Platform::Linux] {
            assert!(is_applicable(&e, &Target::file("/a"), platform));
        }
    }

    #[test]
    fn test_directory_ignores_filter() {
        let e = entry(&["*"], &[".txt"], false);
        assert!(is_applicable(&e, &Target::directory("/docs"), Platform::Linux));

        let excluded = entry(&["*"], &[], true);
        assert!(!is_applicable(&excluded, &Target::directory("/docs"), Platform::Linux));
        assert!(is_applicable(&excluded, &Target::file("/docs/a"), Platform::Linux));
    }

    #[test]
    fn test_file_filter_is_case_insensitive_suffix() {
        let e = entry(&["*"], &[".txt", ".MD"], false);
        assert!(is_applicable(&e, &Target::file("/docs/notes.txt"), Platform::Linux));
        assert!(is_applicable(&e, &Target::file("/docs/NOTES.TXT"), Platform::Linux));
        assert!(is_applicable(&e, &Target::file("/docs/readme.md"), Platform::Linux));
        assert!(!is_applicable(&e, &Target::file("/docs/image.png"), Platform::Linux));
        assert!(!is_applicable(&e, &Target::file("/docs/notes.txt.bak"), Platform::Linux));
    }

    #[test]
    fn test_availability_distinguishes_unknown_key() {
        let config = Config::from_json(
            r#"{"open_with": {"grep": {
                "cmd": "grep_tool \"${PATH}\"",
                "platform": ["*"],
                "filter": [".txt"]
            }}}"#,
        )
        .unwrap();

        let notes = Target::file("/docs/notes.txt");
        let image = Target::file("/docs/image.png");
        assert_eq!(availability(&config, "grep", &notes, Platform::Linux), Availability::Available);
        assert_eq!(
            availability(&config, "grep", &image, Platform::Linux),
            Availability::NotApplicable
        );
        assert_eq!(
            availability(&config, "nope", &notes, Platform::Linux),
            Availability::UnknownKey
        );
        assert!(is_enabled(&config, "grep", &notes, Platform::Linux));
        assert!(!is_enabled(&config, "nope", &notes, Platform::Linux));
    }

    #[test]
    fn test_resolve_explicit_path_first() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        let target = resolve_target(&TargetSource::Paths(vec![
            dir.path().to_path_buf(),
            file.clone(),
        ]))
        .unwrap();
        assert_eq!(target, Target::directory(dir.path()));

        // Explicit paths are not required to exist
        let source = TargetSource::Paths(vec![PathBuf::from("/no/such")]);
        let missing = resolve_target(&source).unwrap();
        assert_eq!(missing.kind, TargetKind::File);
    }

    #[test]
    fn test_resolve_active_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("open.rs");
        fs::write(&file, "fn main() {}").unwrap();

        let target = resolve_target(&TargetSource::ActiveFile(Some(file.clone()))).unwrap();
        assert_eq!(target, Target::file(&file));

        let gone = dir.path().join("deleted.rs");
        assert!(matches!(
            resolve_target(&TargetSource::ActiveFile(Some(gone))),
            Err(LaunchError::NoTarget)
        ));
        assert!(matches!(
            resolve_target(&TargetSource::ActiveFile(None)),
            Err(LaunchError::NoTarget)
        ));
    }

    #[test]
    fn test_resolve_nothing() {
        assert!(matches!(resolve_target(&TargetSource::Nothing), Err(LaunchError::NoTarget)));
        assert!(matches!(
            resolve_target(&TargetSource::Paths(Vec::new())),
            Err(LaunchError::NoTarget)
        ));
    }
}
