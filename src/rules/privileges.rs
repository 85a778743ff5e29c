//! Rules about who a grant runs as and whether authentication applies.

use crate::rules::LineRule;
use regex::Regex;
use std::sync::LazyLock;

static RE_FULL_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(ALL(?::ALL)?\)\s+ALL").unwrap());

// RunAs (ALL) or (ALL:ALL) plus the whitespace after it; whatever follows is
// inspected by hand since the regex engine has no lookahead.
static RE_RUNAS_ALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(ALL(?::ALL)?\)\s+").unwrap());

/// Flags the `NOPASSWD:` tag.
pub struct NopasswdRule;

impl LineRule for NopasswdRule {
    fn id(&self) -> &'static str {
        "SUDO005"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if line.contains("NOPASSWD:") {
            vec!["WARNING: 'NOPASSWD' tag used. Allows usage without password.".to_string()]
        } else {
            vec![]
        }
    }
}

/// Flags RunAs `(ALL)` grants.
///
/// `(ALL) ALL` is a full root grant. `(ALL)` followed by a specific command
/// still lets the user run that command as any account. The two checks look
/// at disjoint command positions, so both can fire on one line. Lines without
/// `=` grant nothing and are skipped.
pub struct FullPrivilegeRule;

impl LineRule for FullPrivilegeRule {
    fn id(&self) -> &'static str {
        "SUDO006"
    }

    fn check(&self, line: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if !line.contains('=') {
            return issues;
        }

        if RE_FULL_ROOT.is_match(line) {
            issues.push("HIGH: 'ALL=(ALL) ALL' grant. Grants full root access.".to_string());
        }

        let impersonates = RE_RUNAS_ALL
            .find_iter(line)
            .any(|m| !line[m.end()..].starts_with("ALL"));
        if impersonates {
            issues.push(
                "MEDIUM: 'ALL' User (RunAs) granted. User can impersonate any account."
                    .to_string(),
            );
        }

        issues
    }
}

/// Flags deny-list entries such as `, !/bin/sh`.
pub struct NegationRule;

impl LineRule for NegationRule {
    fn id(&self) -> &'static str {
        "SUDO007"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if line.contains(", !") || line.contains("!/") {
            vec![
                "HIGH: Negation rule '!' detected. Deny-lists are ineffective against symlinks/relative paths."
                    .to_string(),
            ]
        } else {
            vec![]
        }
    }
}

/// Flags `!authenticate`.
pub struct AuthenticateRule;

impl LineRule for AuthenticateRule {
    fn id(&self) -> &'static str {
        "SUDO008"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if line.contains("!authenticate") {
            vec!["CRITICAL: '!authenticate' detected. Globally disables authentication.".to_string()]
        } else {
            vec![]
        }
    }
}
