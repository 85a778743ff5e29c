//! Human-readable colored text formatter.
//!
//! Produces a terminal-friendly report with ANSI color codes: one section per
//! audited file with its flagged lines and issues, followed by a one-line
//! summary.

use crate::finding::{AuditReport, AuditStatus, Severity};
use colored::{ColoredString, Colorize};

/// Formats an [`AuditReport`] as human-readable, ANSI-colored text.
///
/// Sections rendered (in order):
/// 1. **Header**: audit target and timestamp.
/// 2. **Files**: per file: read error, "no issues", or each flagged line
///    with its issues colored by severity.
/// 3. **Summary**: overall status and per-severity counts.
pub fn format(report: &AuditReport) -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "\n{}\n",
        format!("  Sudoers Audit: {}  ", report.target)
            .bold()
            .on_blue()
            .white()
    ));
    out.push_str(&format!("  Timestamp: {}\n\n", report.audit_timestamp));

    for result in &report.results {
        out.push_str(&format!(
            "{}\n",
            format!("--- {} ---", result.file_path.display()).bold()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("  {} {}\n\n", "ERROR".red().bold(), error));
            continue;
        }

        if result.findings.is_empty() {
            out.push_str(&format!("  {}\n\n", "PASS  no issues found".green()));
            continue;
        }

        for finding in &result.findings {
            out.push_str(&format!(
                "  Line {}: {}\n",
                finding.line_number.to_string().bold(),
                finding.line_content.dimmed()
            ));
            for issue in &finding.issues {
                out.push_str(&format!("    [!] {}\n", colorize(issue)));
            }
        }
        out.push('\n');
    }

    let status_str = match report.status {
        AuditStatus::Passed => "PASSED".green().bold().to_string(),
        AuditStatus::Warning => "WARNING".yellow().bold().to_string(),
        AuditStatus::Failed => "FAILED".red().bold().to_string(),
    };

    let counts = report.count_by_severity();
    out.push_str(&format!(
        "Result: {status_str}  |  {} files, {} unreadable  |  {} critical, {} high, {} medium, {} warning, {} low\n",
        report.files_scanned,
        report.files_failed,
        counts.critical,
        counts.high,
        counts.medium,
        counts.warning,
        counts.low,
    ));

    out
}

fn colorize(issue: &str) -> ColoredString {
    match Severity::classify(issue) {
        Some(Severity::Critical) => issue.red().bold(),
        Some(Severity::High) => issue.red(),
        Some(Severity::Medium) => issue.yellow(),
        Some(Severity::Warning) => issue.bright_yellow(),
        Some(Severity::Low) => issue.blue(),
        None => issue.normal(),
    }
}
