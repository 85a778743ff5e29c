//! Pluggable detection rules.
//!
//! Rules come in two flavours:
//!
//! - [`LineRule`]s inspect one trimmed sudoers line and return issue strings.
//! - [`PathRule`]s inspect one absolute command path on the live filesystem.
//!
//! Rules are stateless apart from immutable data handed to them at
//! construction (the [`BinaryCatalogue`]), so one rule set can be shared by
//! any number of parallel file audits. Use [`all_line_rules`] and
//! [`all_path_rules`] for the registered sets and [`all_rules`] for the
//! metadata behind `list-rules` and `explain`.

pub mod commands;
pub mod defaults;
pub mod environment;
pub mod permissions;
pub mod privileges;
pub mod risky_binaries;

use crate::catalogue::BinaryCatalogue;
use crate::finding::Severity;
use std::path::Path;
use std::sync::Arc;

pub use permissions::PathStat;

/// A detector over a single sudoers line.
///
/// Implementers **must** be [`Send`] + [`Sync`] because
/// [`Auditor::audit_paths`](crate::audit::Auditor::audit_paths) audits files
/// in parallel via [rayon].
///
/// # Implementing a custom rule
///
/// ```rust
/// use sudoers_audit::rules::LineRule;
///
/// pub struct NoSudoedit;
///
/// impl LineRule for NoSudoedit {
///     fn id(&self) -> &'static str { "CUSTOM001" }
///     fn check(&self, line: &str) -> Vec<String> {
///         if line.contains("sudoedit") {
///             vec!["MEDIUM: sudoedit grant.".to_string()]
///         } else {
///             vec![]
///         }
///     }
/// }
/// ```
pub trait LineRule: Send + Sync {
    /// Stable rule identifier (e.g. `"SUDO001"`).
    fn id(&self) -> &'static str;

    /// Returns the issues found on `line`, each prefixed by a severity
    /// keyword. `line` is already trimmed and is never blank or a comment.
    fn check(&self, line: &str) -> Vec<String>;
}

/// A detector over one absolute filesystem path.
pub trait PathRule: Send + Sync {
    /// Stable rule identifier (e.g. `"PERM001"`).
    fn id(&self) -> &'static str;

    /// Returns the issues found for `path`.
    ///
    /// `stat` is metadata the caller already fetched for `path`; when `None`
    /// the rule fetches it and reports a lookup failure as a `WARNING` issue.
    fn check_path(&self, path: &Path, stat: Option<&PathStat>) -> Vec<String>;
}

/// Every registered line rule, in reporting order.
pub fn all_line_rules(catalogue: Arc<BinaryCatalogue>) -> Vec<Box<dyn LineRule>> {
    vec![
        Box::new(commands::AllCommandRule),
        Box::new(commands::WildcardRule),
        Box::new(commands::RecursiveOperationRule),
        Box::new(commands::RelativePathRule),
        Box::new(privileges::NopasswdRule),
        Box::new(privileges::FullPrivilegeRule),
        Box::new(privileges::NegationRule),
        Box::new(privileges::AuthenticateRule),
        Box::new(environment::EnvKeepRule),
        Box::new(defaults::SudoDefaultsRule),
        Box::new(defaults::RequireTtyRule),
        Box::new(risky_binaries::RiskyBinariesRule::new(catalogue)),
    ]
}

/// Every registered path rule, in reporting order.
pub fn all_path_rules() -> Vec<Box<dyn PathRule>> {
    vec![
        Box::new(permissions::FileOwnerRule),
        Box::new(permissions::FileWriteRule),
        Box::new(permissions::ParentDirectoryRule),
    ]
}

/// Metadata for a single rule.
///
/// Used by the `list-rules` and `explain` commands and by the SARIF writer to
/// map an issue string back to the rule that produced it.
pub struct RuleInfo {
    /// Unique rule identifier (e.g. `"SUDO001"`).
    pub id: &'static str,
    /// Short kebab-case name.
    pub name: &'static str,
    /// Highest severity the rule emits.
    pub severity: Severity,
    /// Substrings that only this rule's issue texts contain.
    pub markers: &'static [&'static str],
    /// Short description of what the rule checks.
    pub message: &'static str,
    /// Guidance on how to fix a violation.
    pub remediation: &'static str,
}

static RULES: &[RuleInfo] = &[
    RuleInfo {
        id: "SUDO001",
        name: "all-command",
        severity: Severity::Critical,
        markers: &["'ALL' command granted"],
        message: "Rule grants the ALL command: any binary can be executed",
        remediation: "List the exact absolute command paths the user needs instead of ALL",
    },
    RuleInfo {
        id: "SUDO002",
        name: "wildcard",
        severity: Severity::Critical,
        markers: &["Wildcard detected in binary path", "Wildcard '*' detected"],
        message: "Wildcard in a command path (critical) or in its arguments (high)",
        remediation: "Spell out full command paths and fixed arguments; never glob binaries",
    },
    RuleInfo {
        id: "SUDO003",
        name: "recursive-operation",
        severity: Severity::High,
        markers: &["Recursive file operation"],
        message: "Recursive cp/chown/chmod grant open to symlink and race attacks",
        remediation: "Grant a wrapper script that validates its target instead of a recursive operation",
    },
    RuleInfo {
        id: "SUDO004",
        name: "relative-path",
        severity: Severity::High,
        markers: &["Relative path detected"],
        message: "Command given without an absolute path is resolved through PATH",
        remediation: "Use absolute command paths (e.g. /usr/bin/systemctl)",
    },
    RuleInfo {
        id: "SUDO005",
        name: "nopasswd",
        severity: Severity::Warning,
        markers: &["'NOPASSWD' tag"],
        message: "NOPASSWD removes the authentication barrier",
        remediation: "Drop NOPASSWD unless the command must run unattended, and then scope it tightly",
    },
    RuleInfo {
        id: "SUDO006",
        name: "full-privilege",
        severity: Severity::High,
        markers: &["'ALL=(ALL) ALL' grant", "'ALL' User (RunAs) granted"],
        message: "RunAs (ALL) lets the user act as any account; with ALL commands it is full root",
        remediation: "Restrict the RunAs list to the service account the command needs",
    },
    RuleInfo {
        id: "SUDO007",
        name: "negation",
        severity: Severity::High,
        markers: &["Negation rule '!' detected"],
        message: "Deny-list entries (!/bin/sh) are bypassed by copies, symlinks and relative paths",
        remediation: "Replace deny-lists with an explicit allow-list of commands",
    },
    RuleInfo {
        id: "SUDO008",
        name: "authenticate-disabled",
        severity: Severity::Critical,
        markers: &["'!authenticate' detected"],
        message: "!authenticate disables password checks for the affected scope",
        remediation: "Remove !authenticate; use NOPASSWD on specific commands if unavoidable",
    },
    RuleInfo {
        id: "SUDO009",
        name: "env-keep",
        severity: Severity::High,
        markers: &["Risky environment variables in env_keep"],
        message: "env_keep preserves variables that inject code or redirect traffic",
        remediation: "Remove loader, interpreter-path and proxy variables from env_keep",
    },
    RuleInfo {
        id: "SUDO010",
        name: "defaults-hardening",
        severity: Severity::Medium,
        markers: &["'!use_pty' detected", "'visiblepw' enabled"],
        message: "Defaults disable pty isolation or allow visible password entry",
        remediation: "Set `Defaults use_pty` and remove visiblepw",
    },
    RuleInfo {
        id: "SUDO011",
        name: "requiretty-disabled",
        severity: Severity::Medium,
        markers: &["'!requiretty' detected"],
        message: "!requiretty lets scripts without a terminal invoke sudo",
        remediation: "Only disable requiretty for the service accounts that need it",
    },
    RuleInfo {
        id: "SUDO012",
        name: "risky-binary",
        severity: Severity::Warning,
        markers: &["GTFOBins detected"],
        message: "Command is a known shell-escape or privilege-escalation vector",
        remediation: "Replace the binary with a narrowly scoped wrapper or drop the grant",
    },
    RuleInfo {
        id: "PERM000",
        name: "command-not-found",
        severity: Severity::Low,
        markers: &["not found on this system"],
        message: "Command path does not exist on the auditing host; permission checks skipped",
        remediation: "Audit the file on the host where it is deployed",
    },
    RuleInfo {
        id: "PERM001",
        name: "file-owner",
        severity: Severity::Critical,
        markers: &["is not owned by root (owner uid"],
        message: "Command file is owned by a non-root user who can replace it",
        remediation: "chown root:root the command file",
    },
    RuleInfo {
        id: "PERM002",
        name: "file-writable",
        severity: Severity::Critical,
        markers: &["writable by group. Potential", "writable by others. Potential"],
        message: "Command file is writable by its group or by others",
        remediation: "chmod go-w the command file",
    },
    RuleInfo {
        id: "PERM003",
        name: "parent-directory",
        severity: Severity::High,
        markers: &["Parent directory '"],
        message: "Directory holding the command is not root-owned or is world-writable",
        remediation: "chown root the directory and chmod o-w it",
    },
    RuleInfo {
        id: "PERM999",
        name: "metadata-error",
        severity: Severity::Warning,
        markers: &["Could not inspect"],
        message: "Metadata for the command path could not be read",
        remediation: "Re-run with enough privileges to stat the command path",
    },
];

/// Every rule's metadata, line rules first.
pub fn all_rules() -> &'static [RuleInfo] {
    RULES
}

/// Looks up a rule by id, case-insensitively.
pub fn find_rule(id: &str) -> Option<&'static RuleInfo> {
    RULES.iter().find(|r| r.id.eq_ignore_ascii_case(id))
}

/// Maps an issue string back to the rule that emitted it.
///
/// ```
/// use sudoers_audit::rules::rule_for_issue;
///
/// let rule = rule_for_issue("WARNING: 'NOPASSWD' tag used. Allows usage without password.");
/// assert_eq!(rule.map(|r| r.id), Some("SUDO005"));
/// ```
pub fn rule_for_issue(issue: &str) -> Option<&'static RuleInfo> {
    RULES
        .iter()
        .find(|r| r.markers.iter().any(|m| issue.contains(m)))
}
