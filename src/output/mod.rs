//! Output formatting for audit reports.
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / scripting  |
//! | [`Csv`](OutputFormat::Csv)       | [`csv`]    | Spreadsheets, one row per issue |
//! | [`Html`](OutputFormat::Html)     | [`html`]   | Standalone report page  |
//! | [`Sarif`](OutputFormat::Sarif)   | [`sarif`]  | CI/CD integration       |
//!
//! Every formatter classifies issues by the severity keyword that prefixes
//! them (see [`Severity::classify`](crate::finding::Severity::classify)).

pub mod csv;
pub mod html;
pub mod json;
pub mod pretty;
pub mod sarif;

use crate::finding::AuditReport;

/// Why a report could not be rendered.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("CSV flush failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported output formats for audit reports.
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text.
    Pretty,
    /// Machine-readable JSON.
    Json,
    /// Comma-separated values, one row per issue.
    Csv,
    /// Standalone HTML page.
    Html,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/) for CI/CD tool integration.
    Sarif,
}

/// Formats an [`AuditReport`] in the requested [`OutputFormat`].
///
/// # Examples
///
/// ```rust,no_run
/// use sudoers_audit::output::{format_report, OutputFormat};
/// # use sudoers_audit::finding::AuditReport;
/// # fn example(report: &AuditReport) {
/// let json = format_report(report, &OutputFormat::Json).expect("render report");
/// println!("{json}");
/// # }
/// ```
///
/// # Errors
///
/// Returns [`OutputError`] when a structured format fails to serialize.
pub fn format_report(report: &AuditReport, format: &OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format(report)),
        OutputFormat::Json => json::format(report),
        OutputFormat::Csv => csv::format(report),
        OutputFormat::Html => Ok(html::format(report)),
        OutputFormat::Sarif => sarif::format(report),
    }
}
