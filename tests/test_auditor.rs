use std::path::{Path, PathBuf};
use std::sync::Arc;
use sudoers_audit::audit::{self, collect_targets, permission_target, Auditor};
use sudoers_audit::catalogue::BinaryCatalogue;
use sudoers_audit::config::Config;
use sudoers_audit::finding::AuditStatus;
use sudoers_audit::rules::LineRule;

fn auditor() -> Auditor {
    Auditor::new(Arc::new(BinaryCatalogue::gtfobins()))
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

// ── audit_file ────────────────────────────────────────────────────────────────

#[test]
fn clean_fixture_has_no_findings() {
    let result = auditor().audit_file(&fixture("clean.sudoers"), false);
    assert!(result.error.is_none());
    assert!(result.findings.is_empty(), "{:?}", result.findings);
}

#[test]
fn mixed_fixture_flags_expected_lines() {
    let result = auditor().audit_file(&fixture("malicious_mixed.sudoers"), false);
    assert!(result.error.is_none());

    let lines: Vec<usize> = result.findings.iter().map(|f| f.line_number).collect();
    assert_eq!(lines, vec![2, 3, 4, 5, 6, 7, 8, 9, 10]);

    let counts: Vec<usize> = result.findings.iter().map(|f| f.issues.len()).collect();
    assert_eq!(counts, vec![2, 1, 1, 3, 2, 2, 2, 3, 2]);
    assert_eq!(result.issue_count(), 18);
}

#[test]
fn mixed_fixture_line_content_is_trimmed_source() {
    let result = auditor().audit_file(&fixture("malicious_mixed.sudoers"), false);
    let finding = &result.findings[3];
    assert_eq!(finding.line_number, 5);
    assert_eq!(finding.line_content, "alice ALL=(ALL) NOPASSWD: /usr/bin/vim");
}

#[test]
fn mixed_fixture_negated_su_is_not_relative() {
    let result = auditor().audit_file(&fixture("malicious_mixed.sudoers"), false);
    let dave = result.findings.iter().find(|f| f.line_number == 8).unwrap();
    assert!(dave.issues.iter().any(|i| i.starts_with("HIGH: 'ALL=(ALL) ALL'")));
    assert!(dave.issues.iter().any(|i| i.contains("Negation")));
    assert!(!dave.issues.iter().any(|i| i.contains("Relative")));
}

#[test]
fn all_command_fixture() {
    let result = auditor().audit_file(&fixture("malicious_all_cmd.sudoers"), false);
    assert_eq!(result.findings.len(), 2);
    for finding in &result.findings {
        assert!(finding.issues[0].starts_with("CRITICAL: 'ALL' command granted"));
    }
}

#[test]
fn gtfobins_fixture() {
    let result = auditor().audit_file(&fixture("malicious_gtfobins.sudoers"), false);
    assert_eq!(result.findings.len(), 2);
    assert_eq!(
        result.findings[1].issues,
        vec!["WARNING: GTFOBins detected (bash: https://gtfobins.github.io/gtfobins/bash/#sudo, vim: https://gtfobins.github.io/gtfobins/vim/#sudo). Known shell escape/privesc vectors."]
    );
}

#[test]
fn continuation_lines_are_analyzed_alone() {
    let result = auditor().audit_file(&fixture("continuation.sudoers"), false);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].line_number, 3);
    assert!(result.findings[0].issues[0].contains("'WEB'"));
}

#[test]
fn crlf_line_endings() {
    let result = auditor().audit_file(&fixture("crlf.sudoers"), false);
    let lines: Vec<usize> = result.findings.iter().map(|f| f.line_number).collect();
    assert_eq!(lines, vec![1, 4]);
    assert!(!result.findings[1].line_content.ends_with('\r'));
}

#[test]
fn missing_file_is_an_error_without_findings() {
    let result = auditor().audit_file(Path::new("/nonexistent/sudoers"), false);
    assert_eq!(result.error.as_deref(), Some("File not found."));
    assert!(result.findings.is_empty());
}

#[test]
fn directory_read_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = auditor().audit_file(dir.path(), false);
    assert!(result.error.is_some());
    assert!(result.findings.is_empty());
}

#[test]
fn comment_only_file_has_no_findings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments");
    std::fs::write(&path, "# root ALL=(ALL) ALL\n\n   # %admin ALL=(ALL) ALL\n").unwrap();

    let result = auditor().audit_file(&path, false);
    assert!(result.error.is_none());
    assert!(result.findings.is_empty());
}

#[test]
fn empty_file_has_no_findings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    std::fs::write(&path, "").unwrap();
    assert!(auditor().audit_file(&path, false).findings.is_empty());
}

// ── audit_content ─────────────────────────────────────────────────────────────

#[test]
fn permission_checks_report_missing_commands() {
    let findings = auditor().audit_content("u ALL=(root) /nonexistent/sudoers-audit/tool\n", true);
    assert_eq!(findings.len(), 1);
    assert!(findings[0]
        .issues
        .iter()
        .any(|i| i.starts_with("LOW: Command '/nonexistent/sudoers-audit/tool' not found")));
}

#[test]
fn permission_checks_off_by_default_path() {
    let findings = auditor().audit_content("u ALL=(root) /nonexistent/sudoers-audit/tool\n", false);
    assert!(findings.is_empty());
}

#[cfg(unix)]
#[test]
fn permission_checks_flag_writable_command() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let command = dir.path().join("tool");
    std::fs::write(&command, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&command, std::fs::Permissions::from_mode(0o757)).unwrap();

    let content = format!("u ALL=(root) {} --flag\n", command.display());
    let findings = auditor().audit_content(&content, true);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].issues.iter().any(|i| i.contains("writable by others")));
    assert!(!findings[0].issues.iter().any(|i| i.contains("writable by group")));
}

// ── permission_target ─────────────────────────────────────────────────────────

#[test]
fn permission_target_extraction() {
    assert_eq!(
        permission_target("u ALL=(root) /usr/bin/systemctl restart nginx").as_deref(),
        Some("/usr/bin/systemctl")
    );
    assert_eq!(permission_target("u ALL=/bin/ls").as_deref(), Some("/bin/ls"));
    assert_eq!(permission_target("u ALL=(root) backup.sh"), None);
    assert_eq!(permission_target("u ALL=(ALL) NOPASSWD: /bin/sh"), None);
    assert_eq!(permission_target("Defaults env_reset"), None);
}

// ── audit_paths / collect_targets ─────────────────────────────────────────────

#[test]
fn audit_paths_preserves_input_order() {
    let paths = vec![
        fixture("malicious_mixed.sudoers"),
        fixture("clean.sudoers"),
        PathBuf::from("/nonexistent/sudoers"),
        fixture("malicious_all_cmd.sudoers"),
    ];
    let results = auditor().audit_paths(&paths, false);
    let returned: Vec<&Path> = results.iter().map(|r| r.file_path.as_path()).collect();
    let expected: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    assert_eq!(returned, expected);
    assert!(results[2].error.is_some());
}

#[test]
fn collect_targets_walks_directories_sorted() {
    let targets = collect_targets(&fixture("scan_dir"));
    assert_eq!(
        targets,
        vec![
            fixture("scan_dir/clean.sudoers"),
            fixture("scan_dir/malicious.sudoers"),
            fixture("scan_dir/nested/wildcard.sudoers"),
        ]
    );
}

#[test]
fn collect_targets_single_file() {
    let file = fixture("clean.sudoers");
    assert_eq!(collect_targets(&file), vec![file]);
}

// ── from_config / run_audit ───────────────────────────────────────────────────

#[test]
fn disabled_rules_are_not_run() {
    let mut config = Config::default();
    config.rules.disabled = vec!["SUDO005".to_string(), "SUDO012".to_string()];
    let auditor = Auditor::from_config(&config);

    assert!(!auditor.line_rule_ids().contains(&"SUDO005"));
    assert!(!auditor.line_rule_ids().contains(&"SUDO012"));
    assert_eq!(auditor.path_rule_ids(), vec!["PERM001", "PERM002", "PERM003"]);

    let issues = auditor.analyze_line("alice ALL=(ALL) NOPASSWD: /usr/bin/vim");
    assert_eq!(
        issues,
        vec!["MEDIUM: 'ALL' User (RunAs) granted. User can impersonate any account."]
    );
}

#[test]
fn excluded_binaries_are_not_reported() {
    let mut config = Config::default();
    config.catalogue.exclude = vec!["vim".to_string()];
    let issues = Auditor::from_config(&config).analyze_line("editor ALL=(root) /usr/bin/vim");
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn run_audit_directory() {
    let report = audit::run_audit(&fixture("scan_dir"), &Config::default());
    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.files_failed, 0);
    assert_eq!(report.status, AuditStatus::Failed);
    assert!(!report.passed);

    assert!(report.results[0].findings.is_empty());
    assert_eq!(report.results[1].findings.len(), 1);
    assert_eq!(report.results[2].findings[0].issues.len(), 2);
}

#[test]
fn run_audit_clean_file_passes() {
    let report = audit::run_audit(&fixture("clean.sudoers"), &Config::default());
    assert_eq!(report.status, AuditStatus::Passed);
    assert!(report.passed);
    assert_eq!(report.finding_count(), 0);
}

#[test]
fn run_audit_counts_severities() {
    let report = audit::run_audit(&fixture("malicious_mixed.sudoers"), &Config::default());
    let counts = report.count_by_severity();
    assert_eq!(counts.critical, 2);
    assert_eq!(counts.high, 6);
    assert_eq!(counts.medium, 5);
    assert_eq!(counts.warning, 4);
    assert_eq!(counts.low, 1);
    assert_eq!(counts.unclassified, 0);
    assert_eq!(report.finding_count(), 9);
}

// ── custom rule sets ──────────────────────────────────────────────────────────

struct NoSudoedit;

impl LineRule for NoSudoedit {
    fn id(&self) -> &'static str {
        "CUSTOM001"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if line.contains("sudoedit") {
            vec!["MEDIUM: sudoedit grant.".to_string()]
        } else {
            vec![]
        }
    }
}

#[test]
fn custom_line_rules_replace_built_ins() {
    let auditor = Auditor::with_rules(vec![Box::new(NoSudoedit)], vec![]);
    assert_eq!(auditor.line_rule_ids(), vec!["CUSTOM001"]);
    assert!(auditor.path_rule_ids().is_empty());

    let findings = auditor.audit_content(
        "%admin ALL=(ALL) ALL\nweb ALL=(root) sudoedit /etc/nginx/nginx.conf\n",
        false,
    );
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].line_number, 2);
    assert_eq!(findings[0].issues, vec!["MEDIUM: sudoedit grant."]);
}

#[test]
fn disabling_perm000_silences_missing_commands() {
    let mut config = Config::default();
    config.rules.disabled = vec!["PERM000".to_string()];
    let auditor = Auditor::from_config(&config);

    assert!(auditor
        .check_file_permissions(Path::new("/nonexistent/sudoers-audit/tool"))
        .is_empty());
    assert!(auditor
        .audit_content("ops ALL=(root) /nonexistent/sudoers-audit/tool\n", true)
        .is_empty());
}

#[test]
fn perm000_reported_by_default_from_config() {
    let auditor = Auditor::from_config(&Config::default());
    let issues = auditor.check_file_permissions(Path::new("/nonexistent/sudoers-audit/tool"));
    assert_eq!(issues.len(), 1);
    assert!(issues[0].starts_with("LOW"));
}
