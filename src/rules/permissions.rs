//! Filesystem checks on the command a sudoers line grants.
//!
//! A command that a non-root user can replace or modify is as good as a shell
//! for that user. These rules look at the owner and mode of the command file
//! and of the directory that holds it.

use crate::rules::PathRule;
use std::io;
use std::path::Path;

const S_IWGRP: u32 = 0o020;
const S_IWOTH: u32 = 0o002;

/// Owner and mode bits of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStat {
    pub uid: u32,
    pub mode: u32,
}

impl PathStat {
    /// Reads metadata for `path`, following symlinks.
    #[cfg(unix)]
    pub fn of(path: &Path) -> io::Result<PathStat> {
        use std::os::unix::fs::MetadataExt;

        let metadata = std::fs::metadata(path)?;
        Ok(PathStat {
            uid: metadata.uid(),
            mode: metadata.mode(),
        })
    }

    #[cfg(not(unix))]
    pub fn of(_path: &Path) -> io::Result<PathStat> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "ownership checks require a Unix platform",
        ))
    }

    pub fn is_root_owned(&self) -> bool {
        self.uid == 0
    }

    pub fn group_writable(&self) -> bool {
        self.mode & S_IWGRP != 0
    }

    pub fn world_writable(&self) -> bool {
        self.mode & S_IWOTH != 0
    }
}

/// Issue text for a metadata lookup that failed.
pub fn inspect_error(path: &Path, err: &io::Error) -> String {
    format!("WARNING: Could not inspect '{}': {err}", path.display())
}

/// Resolves the stat a rule should use: the caller's, or a fresh lookup.
fn resolve(path: &Path, stat: Option<&PathStat>) -> Result<PathStat, String> {
    match stat {
        Some(s) => Ok(*s),
        None => PathStat::of(path).map_err(|e| inspect_error(path, &e)),
    }
}

/// Flags command files not owned by root.
pub struct FileOwnerRule;

impl PathRule for FileOwnerRule {
    fn id(&self) -> &'static str {
        "PERM001"
    }

    fn check_path(&self, path: &Path, stat: Option<&PathStat>) -> Vec<String> {
        let st = match resolve(path, stat) {
            Ok(st) => st,
            Err(issue) => return vec![issue],
        };

        if st.is_root_owned() {
            vec![]
        } else {
            vec![format!(
                "CRITICAL: File '{}' is not owned by root (owner uid: {}). Mutable by non-root.",
                path.display(),
                st.uid
            )]
        }
    }
}

/// Flags command files writable by their group or by others.
pub struct FileWriteRule;

impl PathRule for FileWriteRule {
    fn id(&self) -> &'static str {
        "PERM002"
    }

    fn check_path(&self, path: &Path, stat: Option<&PathStat>) -> Vec<String> {
        let st = match resolve(path, stat) {
            Ok(st) => st,
            Err(issue) => return vec![issue],
        };

        let mut issues = Vec::new();
        if st.group_writable() {
            issues.push(format!(
                "CRITICAL: File '{}' is writable by group. Potential for modification.",
                path.display()
            ));
        }
        if st.world_writable() {
            issues.push(format!(
                "CRITICAL: File '{}' is writable by others. Potential for modification.",
                path.display()
            ));
        }
        issues
    }
}

/// Flags a containing directory that lets non-root users swap the command.
///
/// The `stat` argument describes the command file, not its directory, so the
/// directory is always looked up here. A missing directory yields nothing.
pub struct ParentDirectoryRule;

impl ParentDirectoryRule {
    /// Checks a directory whose metadata is already known.
    pub fn check_directory(dir: &Path, st: &PathStat) -> Vec<String> {
        let mut issues = Vec::new();
        if !st.is_root_owned() {
            issues.push(format!(
                "HIGH: Parent directory '{}' is not owned by root. Risk of file replacement.",
                dir.display()
            ));
        }
        if st.world_writable() {
            issues.push(format!(
                "HIGH: Parent directory '{}' is writable by others. Risk of file replacement.",
                dir.display()
            ));
        }
        issues
    }
}

impl PathRule for ParentDirectoryRule {
    fn id(&self) -> &'static str {
        "PERM003"
    }

    fn check_path(&self, path: &Path, _stat: Option<&PathStat>) -> Vec<String> {
        let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return vec![];
        };
        if !dir.exists() {
            return vec![];
        }

        match PathStat::of(dir) {
            Ok(st) => Self::check_directory(dir, &st),
            Err(e) => vec![inspect_error(dir, &e)],
        }
    }
}
