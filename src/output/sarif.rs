use crate::finding::{AuditReport, Severity};
use crate::output::OutputError;
use crate::rules::{self, RuleInfo};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::HashMap;

/// Rule id for issue texts no registered rule claims.
const UNKNOWN_RULE: &str = "SUDO000";

pub fn format(report: &AuditReport) -> Result<String, OutputError> {
    let rule_index: HashMap<&str, i64> = rules::all_rules()
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id, i as i64))
        .collect();

    let descriptors: Vec<ReportingDescriptor> =
        rules::all_rules().iter().map(descriptor).collect();

    let mut results: Vec<SarifResult> = Vec::new();
    for file in report.results.iter().filter(|r| r.error.is_none()) {
        let uri = file.file_path.to_string_lossy().replace('\\', "/");

        for finding in &file.findings {
            for issue in &finding.issues {
                let rule_id = rules::rule_for_issue(issue)
                    .map(|r| r.id)
                    .unwrap_or(UNKNOWN_RULE);

                let level = match Severity::classify(issue) {
                    Some(sev) if sev.is_blocking() => ResultLevel::Error,
                    Some(Severity::Low) => ResultLevel::Note,
                    _ => ResultLevel::Warning,
                };

                let mut result = SarifResult::builder()
                    .message(Message::builder().text(issue.clone()).build())
                    .build();

                result.rule_id = Some(rule_id.to_string());
                result.level = Some(level);
                result.rule_index = rule_index.get(rule_id).copied();

                let mut location = Location::builder().build();
                let mut physical = PhysicalLocation::builder().build();
                physical.artifact_location =
                    Some(ArtifactLocation::builder().uri(uri.clone()).build());
                physical.region = Some(
                    Region::builder()
                        .start_line(finding.line_number as i64)
                        .build(),
                );
                location.physical_location = Some(physical);
                result.locations = Some(vec![location]);

                results.push(result);
            }
        }
    }

    let driver = ToolComponent::builder()
        .name("sudoers-audit")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(descriptors)
        .build();

    let tool = Tool::builder().driver(driver).build();

    let run = Run::builder().tool(tool).results(results).build();

    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    Ok(serde_json::to_string_pretty(&sarif)?)
}

fn descriptor(info: &RuleInfo) -> ReportingDescriptor {
    let mut rule = ReportingDescriptor::builder()
        .id(info.id.to_string())
        .build();
    rule.name = Some(info.name.to_string());
    rule.short_description = Some(
        MultiformatMessageString::builder()
            .text(info.message.to_string())
            .build(),
    );
    rule.help = Some(
        MultiformatMessageString::builder()
            .text(info.remediation.to_string())
            .build(),
    );
    rule
}
