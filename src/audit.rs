//! Audit orchestration.
//!
//! An [`Auditor`] owns the registered line and path rules. It runs the line
//! rules over every line of a file and, when permission checking is on, the
//! path rules over the command each line grants. [`run_audit`] wraps the whole
//! pipeline: collect target files, audit them in parallel via [rayon], and
//! assemble an [`AuditReport`].

use crate::catalogue::BinaryCatalogue;
use crate::config::Config;
use crate::finding::{AuditReport, FileAuditResult, Finding};
use crate::rules::permissions::inspect_error;
use crate::rules::{self, LineRule, PathRule, PathStat};
use rayon::prelude::*;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use walkdir::WalkDir;

// At most one leading RunAs group on the command portion of a line.
static RE_LEADING_RUNAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\([^)]*\)\s*").unwrap());

/// Why a file could not be audited.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("File not found.")]
    NotFound,
    #[error("Permission denied. Run with sudo?")]
    PermissionDenied,
    #[error("Error reading file: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for AuditError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => AuditError::NotFound,
            io::ErrorKind::PermissionDenied => AuditError::PermissionDenied,
            _ => AuditError::Io(err),
        }
    }
}

/// The rule engine.
///
/// Rules are read-only after construction, so one `Auditor` can audit many
/// files concurrently.
///
/// ```
/// use std::sync::Arc;
/// use sudoers_audit::audit::Auditor;
/// use sudoers_audit::catalogue::BinaryCatalogue;
///
/// let auditor = Auditor::new(Arc::new(BinaryCatalogue::gtfobins()));
/// let issues = auditor.analyze_line("user ALL=(ALL) NOPASSWD: /bin/sh");
/// assert!(issues.iter().any(|i| i.contains("NOPASSWD")));
/// assert!(issues.iter().any(|i| i.contains("sh: https://gtfobins.github.io/gtfobins/sh/#sudo")));
/// ```
pub struct Auditor {
    line_rules: Vec<Box<dyn LineRule>>,
    path_rules: Vec<Box<dyn PathRule>>,
    // Engine-emitted PERM000 (command not found) and PERM999 (metadata error).
    report_not_found: bool,
    report_inspect_errors: bool,
}

impl Auditor {
    /// An auditor running every registered rule against `catalogue`.
    pub fn new(catalogue: Arc<BinaryCatalogue>) -> Self {
        Self::with_rules(rules::all_line_rules(catalogue), rules::all_path_rules())
    }

    /// An auditor with the configured catalogue and without disabled rules.
    pub fn from_config(config: &Config) -> Self {
        let mut auditor = Self::new(Arc::new(config.catalogue()));
        auditor.line_rules.retain(|r| config.is_rule_enabled(r.id()));
        auditor.path_rules.retain(|r| config.is_rule_enabled(r.id()));
        auditor.report_not_found = config.is_rule_enabled("PERM000");
        auditor.report_inspect_errors = config.is_rule_enabled("PERM999");
        auditor
    }

    /// An auditor with explicit rule sets.
    pub fn with_rules(line_rules: Vec<Box<dyn LineRule>>, path_rules: Vec<Box<dyn PathRule>>) -> Self {
        Auditor {
            line_rules,
            path_rules,
            report_not_found: true,
            report_inspect_errors: true,
        }
    }

    /// Ids of the active line rules, in execution order.
    pub fn line_rule_ids(&self) -> Vec<&'static str> {
        self.line_rules.iter().map(|r| r.id()).collect()
    }

    /// Ids of the active path rules, in execution order.
    pub fn path_rule_ids(&self) -> Vec<&'static str> {
        self.path_rules.iter().map(|r| r.id()).collect()
    }

    /// Runs every line rule over one line.
    ///
    /// The line is trimmed first; blank lines and comments yield nothing.
    pub fn analyze_line(&self, line: &str) -> Vec<String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return vec![];
        }

        self.line_rules
            .iter()
            .flat_map(|rule| rule.check(line))
            .collect()
    }

    /// Runs every path rule over one command path.
    ///
    /// Relative paths yield nothing (the relative-path line rule covers
    /// them). A path missing from this host yields a single `LOW` issue
    /// (PERM000) and a metadata failure a single `WARNING` (PERM999); neither
    /// runs the path rules. Disabling PERM000 or PERM999 drops that issue.
    pub fn check_file_permissions(&self, path: &Path) -> Vec<String> {
        if !path.is_absolute() {
            return vec![];
        }

        match path.try_exists() {
            Ok(true) => {}
            Ok(false) if self.report_not_found => {
                return vec![format!(
                    "LOW: Command '{}' not found on this system. Permission checks skipped.",
                    path.display()
                )]
            }
            Ok(false) => return vec![],
            Err(e) => return self.inspect_failure(path, &e),
        }

        let stat = match PathStat::of(path) {
            Ok(stat) => stat,
            Err(e) => return self.inspect_failure(path, &e),
        };

        tracing::debug!(path = %path.display(), uid = stat.uid, mode = %format!("{:o}", stat.mode), "checking command permissions");

        self.path_rules
            .iter()
            .flat_map(|rule| rule.check_path(path, Some(&stat)))
            .collect()
    }

    fn inspect_failure(&self, path: &Path, err: &io::Error) -> Vec<String> {
        tracing::debug!(path = %path.display(), error = %err, "could not inspect command");
        if self.report_inspect_errors {
            vec![inspect_error(path, err)]
        } else {
            vec![]
        }
    }

    /// Audits one file.
    ///
    /// A read failure yields a result carrying only the error. Otherwise
    /// every line is analyzed in order and lines with issues become
    /// [`Finding`]s.
    pub fn audit_file(&self, path: &Path, check_permissions: bool) -> FileAuditResult {
        let content = match read_sudoers(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "could not audit file");
                return FileAuditResult::failed(path, e.to_string());
            }
        };

        tracing::debug!(file = %path.display(), "auditing");
        let findings = self.audit_content(&content, check_permissions);
        FileAuditResult::ok(path, findings)
    }

    /// Audits already-loaded sudoers text.
    pub fn audit_content(&self, content: &str, check_permissions: bool) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_number = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Continuation lines are analyzed on their own.
            if line.ends_with('\\') {
                tracing::trace!(line_number, "line continues on the next line");
            }

            let mut issues = self.analyze_line(line);

            if check_permissions {
                if let Some(target) = permission_target(line) {
                    issues.extend(self.check_file_permissions(Path::new(&target)));
                }
            }

            if !issues.is_empty() {
                findings.push(Finding {
                    line_number,
                    line_content: line.to_string(),
                    issues,
                });
            }
        }

        findings
    }

    /// Audits many files in parallel. Results keep the order of `paths`.
    pub fn audit_paths(&self, paths: &[PathBuf], check_permissions: bool) -> Vec<FileAuditResult> {
        paths
            .par_iter()
            .map(|p| self.audit_file(p, check_permissions))
            .collect()
    }
}

fn read_sudoers(path: &Path) -> Result<String, AuditError> {
    Ok(std::fs::read_to_string(path)?)
}

/// The absolute command path a line grants, if any.
///
/// Takes the text after the first `=`, strips at most one leading RunAs
/// group, and returns the first token when it starts with `/`.
///
/// ```
/// use sudoers_audit::audit::permission_target;
///
/// assert_eq!(permission_target("bob ALL=(root) /usr/bin/less /var/log/syslog").as_deref(), Some("/usr/bin/less"));
/// assert_eq!(permission_target("bob ALL=(ALL) ALL"), None);
/// assert_eq!(permission_target("Defaults !visiblepw"), None);
/// ```
pub fn permission_target(line: &str) -> Option<String> {
    let (_, rhs) = line.split_once('=')?;
    let command = RE_LEADING_RUNAS.replace(rhs, "");
    command
        .split_whitespace()
        .next()
        .filter(|token| token.starts_with('/'))
        .map(str::to_string)
}

/// Expands an audit target into the files to audit.
///
/// A file yields itself. A directory is walked recursively and every regular
/// file in it is returned, sorted by path. Unreadable directory entries are
/// skipped.
pub fn collect_targets(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Runs a complete audit of a sudoers file or directory.
///
/// # Pipeline
///
/// 1. Builds an [`Auditor`] from `config` (catalogue changes, disabled rules).
/// 2. Expands `path` with [`collect_targets`].
/// 3. Audits the files **in parallel** using [rayon]; each file is scanned
///    sequentially so findings stay in line order.
/// 4. Assembles the final [`AuditReport`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use sudoers_audit::{audit, config::Config};
///
/// let config = Config::load(None).unwrap();
/// let report = audit::run_audit(Path::new("/etc/sudoers.d"), &config);
///
/// std::process::exit(if report.passed { 0 } else { 1 });
/// ```
pub fn run_audit(path: &Path, config: &Config) -> AuditReport {
    let auditor = Auditor::from_config(config);
    let targets = collect_targets(path);
    tracing::debug!(target_path = %path.display(), files = targets.len(), "collected audit targets");

    let results = auditor.audit_paths(&targets, config.permissions.enabled);

    AuditReport::from_results(
        &path.display().to_string(),
        results,
        config.strict.enabled,
    )
}
