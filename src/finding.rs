use std::fmt;
use std::path::{Path, PathBuf};

/// Severity keyword carried at the front of every issue string.
///
/// Issue strings are free text, but the engine guarantees they start with one
/// of these keywords (`CRITICAL: ...`). Reporting layers recover the severity
/// with [`Severity::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Warning,
    Low,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Warning,
        Severity::Low,
    ];

    /// The upper-case keyword used in issue strings.
    pub fn keyword(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Warning => "WARNING",
            Severity::Low => "LOW",
        }
    }

    /// Recovers the severity of an issue string.
    ///
    /// The keyword before the first `:` wins when it is a known keyword;
    /// otherwise the first keyword found anywhere in the text, scanning from
    /// most to least severe.
    ///
    /// ```
    /// use sudoers_audit::finding::Severity;
    ///
    /// assert_eq!(Severity::classify("HIGH: Wildcard '*' detected."), Some(Severity::High));
    /// assert_eq!(Severity::classify("no keyword here"), None);
    /// ```
    pub fn classify(issue: &str) -> Option<Severity> {
        if let Some((head, _)) = issue.split_once(':') {
            let head = head.trim();
            if let Some(sev) = Self::ALL.iter().find(|s| s.keyword() == head) {
                return Some(*sev);
            }
        }
        Self::ALL
            .iter()
            .find(|s| issue.contains(s.keyword()))
            .copied()
    }

    /// `true` for severities that fail an audit outside strict mode.
    pub fn is_blocking(self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Every issue detected on one source line.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    /// 1-based line number in the audited file.
    pub line_number: usize,
    /// The trimmed original text of the line.
    pub line_content: String,
    /// Issue strings in rule registration order.
    pub issues: Vec<String>,
}

/// Outcome of auditing one file.
///
/// A result either carries an `error` (the file could not be read) or zero or
/// more `findings`, never both. Use [`FileAuditResult::ok`] and
/// [`FileAuditResult::failed`] to build one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileAuditResult {
    /// Serialized lossily: file names need not be valid UTF-8.
    #[serde(serialize_with = "serialize_path_lossy")]
    pub file_path: PathBuf,
    pub findings: Vec<Finding>,
    pub error: Option<String>,
}

impl FileAuditResult {
    pub fn ok(file_path: &Path, findings: Vec<Finding>) -> Self {
        FileAuditResult {
            file_path: file_path.to_path_buf(),
            findings,
            error: None,
        }
    }

    pub fn failed(file_path: &Path, error: impl Into<String>) -> Self {
        FileAuditResult {
            file_path: file_path.to_path_buf(),
            findings: vec![],
            error: Some(error.into()),
        }
    }

    /// Iterates every issue string across all findings, in line order.
    pub fn issues(&self) -> impl Iterator<Item = &str> {
        self.findings
            .iter()
            .flat_map(|f| f.issues.iter().map(String::as_str))
    }

    pub fn issue_count(&self) -> usize {
        self.findings.iter().map(|f| f.issues.len()).sum()
    }
}

fn serialize_path_lossy<S: serde::Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Issue totals per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub warning: usize,
    pub low: usize,
    /// Issues carrying no recognised severity keyword.
    pub unclassified: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.warning + self.low + self.unclassified
    }

    /// The count for one severity.
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Warning => self.warning,
            Severity::Low => self.low,
        }
    }

    fn add(&mut self, issue: &str) {
        match Severity::classify(issue) {
            Some(Severity::Critical) => self.critical += 1,
            Some(Severity::High) => self.high += 1,
            Some(Severity::Medium) => self.medium += 1,
            Some(Severity::Warning) => self.warning += 1,
            Some(Severity::Low) => self.low += 1,
            None => self.unclassified += 1,
        }
    }
}

/// The full outcome of one audit run over a file or directory.
#[derive(Debug, serde::Serialize)]
pub struct AuditReport {
    /// The path the audit was started from.
    pub target: String,
    pub audit_timestamp: String,
    pub status: AuditStatus,
    pub passed: bool,
    pub files_scanned: usize,
    pub files_failed: usize,
    pub results: Vec<FileAuditResult>,
}

impl AuditReport {
    pub fn from_results(target: &str, results: Vec<FileAuditResult>, strict: bool) -> Self {
        let files_failed = results.iter().filter(|r| r.error.is_some()).count();
        let counts = count_issues(&results);
        let status = compute_status(&counts, files_failed, strict);
        let passed = !matches!(status, AuditStatus::Failed);

        AuditReport {
            target: target.to_string(),
            audit_timestamp: chrono::Utc::now().to_rfc3339(),
            status,
            passed,
            files_scanned: results.len(),
            files_failed,
            results,
        }
    }

    /// Counts every issue in the report by severity.
    pub fn count_by_severity(&self) -> SeverityCounts {
        count_issues(&self.results)
    }

    /// Number of lines that carry at least one issue.
    pub fn finding_count(&self) -> usize {
        self.results.iter().map(|r| r.findings.len()).sum()
    }
}

/// Overall verdict of an [`AuditReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Passed,
    Warning,
    Failed,
}

fn count_issues(results: &[FileAuditResult]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for issue in results.iter().flat_map(|r| r.issues()) {
        counts.add(issue);
    }
    counts
}

fn compute_status(counts: &SeverityCounts, files_failed: usize, strict: bool) -> AuditStatus {
    let blocking: usize = Severity::ALL
        .iter()
        .filter(|s| s.is_blocking())
        .map(|s| counts.get(*s))
        .sum();
    let has_blocking = blocking > 0;
    let has_other = counts.total() > blocking || files_failed > 0;

    if has_blocking {
        AuditStatus::Failed
    } else if has_other {
        if strict {
            AuditStatus::Failed
        } else {
            AuditStatus::Warning
        }
    } else {
        AuditStatus::Passed
    }
}
