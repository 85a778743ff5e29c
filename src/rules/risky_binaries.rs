use crate::catalogue::BinaryCatalogue;
use crate::normalize::{clean_command_string, split_sudoers_commands};
use crate::rules::LineRule;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Flags commands that appear in the [`BinaryCatalogue`].
///
/// A binary matches when it appears as a whole token in a normalized command
/// clause: preceded by the start of the clause, a `/` or whitespace, and
/// followed by whitespace or the end. So `/usr/bin/vim` and `sudo -u x vim`
/// match `vim`, while `/usr/bin/vimtutor` does not.
///
/// Matches from every clause on a line are merged into one issue, sorted by
/// name.
pub struct RiskyBinariesRule {
    catalogue: Arc<BinaryCatalogue>,
    patterns: Vec<(String, Regex)>,
}

impl RiskyBinariesRule {
    pub fn new(catalogue: Arc<BinaryCatalogue>) -> Self {
        let patterns = catalogue
            .iter()
            .filter_map(|(name, _)| {
                let pattern = format!(r"(?:^|/|\s){}(?:\s|$)", regex::escape(name));
                Regex::new(&pattern).ok().map(|re| (name.to_string(), re))
            })
            .collect();

        RiskyBinariesRule {
            catalogue,
            patterns,
        }
    }
}

impl LineRule for RiskyBinariesRule {
    fn id(&self) -> &'static str {
        "SUDO012"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if !line.contains('=') || line.trim_start().starts_with("Defaults") {
            return vec![];
        }

        let mut found: BTreeSet<&str> = BTreeSet::new();
        for clause in split_sudoers_commands(line) {
            let command = clean_command_string(&clause);
            for (name, re) in &self.patterns {
                if re.is_match(&command) {
                    found.insert(name.as_str());
                }
            }
        }

        if found.is_empty() {
            return vec![];
        }

        let listed: Vec<String> = found
            .iter()
            .map(|name| format!("{name}: {}", self.catalogue.get(name).unwrap_or_default()))
            .collect();

        vec![format!(
            "WARNING: GTFOBins detected ({}). Known shell escape/privesc vectors.",
            listed.join(", ")
        )]
    }
}
