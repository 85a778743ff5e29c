//! JSON output formatter.
//!
//! Produces a pretty-printed JSON document containing run metadata, a
//! severity summary, and every per-file result.

use crate::finding::{AuditReport, AuditStatus, FileAuditResult, SeverityCounts};
use crate::output::OutputError;

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    target: &'a str,
    audit_timestamp: &'a str,
    status: AuditStatus,
    passed: bool,
    files_scanned: usize,
    files_failed: usize,
    summary: SeverityCounts,
    results: &'a [FileAuditResult],
}

/// Formats an [`AuditReport`] as pretty-printed JSON.
pub fn format(report: &AuditReport) -> Result<String, OutputError> {
    let output = JsonOutput {
        target: &report.target,
        audit_timestamp: &report.audit_timestamp,
        status: report.status,
        passed: report.passed,
        files_scanned: report.files_scanned,
        files_failed: report.files_failed,
        summary: report.count_by_severity(),
        results: &report.results,
    };

    Ok(serde_json::to_string_pretty(&output)?)
}
