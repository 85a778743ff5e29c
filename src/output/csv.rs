//! CSV output formatter.
//!
//! One row per issue with the header `File,Line Number,Line Content,Issue`.
//! A file that could not be read becomes a single row with `N/A` line
//! columns and an `ERROR:` issue.

use crate::finding::AuditReport;
use crate::output::OutputError;

/// Formats an [`AuditReport`] as CSV.
pub fn format(report: &AuditReport) -> Result<String, OutputError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    write_rows(&mut writer, report)?;
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_rows(writer: &mut ::csv::Writer<Vec<u8>>, report: &AuditReport) -> ::csv::Result<()> {
    writer.write_record(["File", "Line Number", "Line Content", "Issue"])?;

    for result in &report.results {
        let file = result.file_path.display().to_string();

        if let Some(ref error) = result.error {
            let issue = format!("ERROR: {error}");
            writer.write_record([file.as_str(), "N/A", "N/A", issue.as_str()])?;
            continue;
        }

        for finding in &result.findings {
            let line_number = finding.line_number.to_string();
            for issue in &finding.issues {
                writer.write_record([
                    file.as_str(),
                    line_number.as_str(),
                    finding.line_content.as_str(),
                    issue.as_str(),
                ])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
