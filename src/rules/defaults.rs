//! Rules over `Defaults` hardening options.

use crate::rules::LineRule;

/// Flags `Defaults` lines that disable pty isolation or show passwords.
pub struct SudoDefaultsRule;

impl LineRule for SudoDefaultsRule {
    fn id(&self) -> &'static str {
        "SUDO010"
    }

    fn check(&self, line: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if !line.contains("Defaults") {
            return issues;
        }

        if line.contains("!use_pty") {
            issues.push("MEDIUM: '!use_pty' detected. Risk of TIOCSTI terminal hijacking.".to_string());
        }
        if line.contains("visiblepw") {
            issues.push("LOW: 'visiblepw' enabled. Password may be visible.".to_string());
        }

        issues
    }
}

/// Flags `!requiretty`, wherever it appears.
pub struct RequireTtyRule;

impl LineRule for RequireTtyRule {
    fn id(&self) -> &'static str {
        "SUDO011"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if line.contains("!requiretty") {
            vec!["MEDIUM: '!requiretty' detected. May facilitate automated attacks/scripts.".to_string()]
        } else {
            vec![]
        }
    }
}
