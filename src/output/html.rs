//! Standalone HTML report.

use crate::finding::{AuditReport, FileAuditResult, Severity};
use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; margin: 2rem; background: #f4f4f9; }
    .container { max-width: 1200px; margin: 0 auto; background: white; padding: 2rem; border-radius: 8px; box-shadow: 0 2px 5px rgba(0,0,0,0.1); }
    h1 { border-bottom: 2px solid #eee; padding-bottom: 0.5rem; }
    .file-section { margin-top: 2rem; border: 1px solid #ddd; border-radius: 4px; overflow: hidden; }
    .file-header { background: #f8f8f8; padding: 0.5rem 1rem; font-weight: bold; border-bottom: 1px solid #ddd; }
    .finding { padding: 1rem; border-bottom: 1px solid #eee; }
    .finding:last-child { border-bottom: none; }
    .clean { color: green; }
    .line-info { font-family: monospace; background: #f0f0f0; padding: 0.2rem 0.4rem; border-radius: 3px; }
    .critical { color: #d32f2f; font-weight: bold; }
    .high { color: #f57c00; font-weight: bold; }
    .medium { color: #fbc02d; font-weight: bold; }
    .warning { color: #ffa000; font-weight: bold; }
    .low { color: #1976d2; }
    .error { color: #c62828; padding: 1rem; }
"#;

/// Formats an [`AuditReport`] as a self-contained HTML page.
///
/// File paths, line contents and issue texts are escaped by [`maud`].
pub fn format(report: &AuditReport) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Sudoers Audit Report" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                div class="container" {
                    h1 { "Sudoers Audit Report" }
                    p {
                        "Target: " code { (report.target) }
                        br;
                        "Generated on: " (report.audit_timestamp)
                    }
                    @for result in &report.results {
                        (file_section(result))
                    }
                }
            }
        }
    };

    markup.into_string()
}

fn file_section(result: &FileAuditResult) -> Markup {
    html! {
        div class="file-section" {
            div class="file-header" { (result.file_path.display().to_string()) }
            @if let Some(error) = &result.error {
                div class="error" { "Error: " (error) }
            } @else if result.findings.is_empty() {
                div class="finding clean" { "No issues found." }
            } @else {
                @for finding in &result.findings {
                    div class="finding" {
                        div {
                            "Line " span class="line-info" { (finding.line_number) } ": "
                            code { (finding.line_content) }
                        }
                        ul {
                            @for issue in &finding.issues {
                                li class=(severity_class(issue)) { (issue) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn severity_class(issue: &str) -> &'static str {
    match Severity::classify(issue) {
        Some(Severity::Critical) => "critical",
        Some(Severity::High) => "high",
        Some(Severity::Medium) => "medium",
        Some(Severity::Warning) => "warning",
        Some(Severity::Low) => "low",
        None => "",
    }
}
