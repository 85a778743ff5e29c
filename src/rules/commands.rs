//! Rules about what a grant lets the user execute.

use crate::normalize::{command_token, split_sudoers_commands};
use crate::rules::LineRule;
use regex::Regex;
use std::sync::LazyLock;

static RE_ALL_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=.*\s+ALL\s*$").unwrap());

// A glob inside a `/`-rooted token: `/usr/bin/*`, `/opt/app/bin/run*`.
static RE_PATH_WILDCARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\S*\*(?:$|\s)").unwrap());

/// Flags grants whose command list ends in the bare `ALL` token.
pub struct AllCommandRule;

impl LineRule for AllCommandRule {
    fn id(&self) -> &'static str {
        "SUDO001"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if RE_ALL_COMMAND.is_match(line) {
            vec!["CRITICAL: 'ALL' command granted. Allows execution of any binary.".to_string()]
        } else {
            vec![]
        }
    }
}

/// Flags `*` anywhere on a line.
///
/// A glob inside a binary path is critical and replaces the generic
/// argument-wildcard issue; a line never carries both.
pub struct WildcardRule;

impl LineRule for WildcardRule {
    fn id(&self) -> &'static str {
        "SUDO002"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if !line.contains('*') {
            return vec![];
        }

        let rhs = line.split_once('=').map(|(_, rhs)| rhs).unwrap_or("");
        if RE_PATH_WILDCARD.is_match(rhs) {
            vec![
                "CRITICAL: Wildcard detected in binary path. Potential for high-risk binary execution."
                    .to_string(),
            ]
        } else {
            vec![
                "HIGH: Wildcard '*' detected. Potentially vulnerable to argument injection."
                    .to_string(),
            ]
        }
    }
}

/// Flags recursive `cp`, `chown` and `chmod` grants.
pub struct RecursiveOperationRule;

impl LineRule for RecursiveOperationRule {
    fn id(&self) -> &'static str {
        "SUDO003"
    }

    fn check(&self, line: &str) -> Vec<String> {
        const RECURSIVE: [&str; 3] = ["cp -r", "chown -R", "chmod -R"];

        if RECURSIVE.iter().any(|op| line.contains(op)) {
            vec![
                "HIGH: Recursive file operation detected. Race condition/Symlink attack risk."
                    .to_string(),
            ]
        } else {
            vec![]
        }
    }
}

/// Flags command clauses whose command is not an absolute path.
///
/// Each clause is normalized first so tags, RunAs groups and options are not
/// mistaken for the command. A clause with nothing left after normalization
/// means `ALL`. `Defaults` lines carry options, not commands, and are skipped.
pub struct RelativePathRule;

impl LineRule for RelativePathRule {
    fn id(&self) -> &'static str {
        "SUDO004"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if line.trim_start().starts_with("Defaults") {
            return vec![];
        }

        split_sudoers_commands(line)
            .iter()
            .filter_map(|clause| {
                let token = command_token(clause);
                // `!/bin/sh` denies an absolute path
                let path = token.trim_start_matches('!');
                if path.starts_with('/') || path == "ALL" {
                    None
                } else {
                    Some(format!(
                        "HIGH: Relative path detected for command '{token}'. Vulnerable to path interception."
                    ))
                }
            })
            .collect()
    }
}
