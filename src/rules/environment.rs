use crate::rules::LineRule;

/// Variables that inject code into, or redirect traffic of, a privileged
/// process when preserved through `env_keep`.
const RISKY_ENV: &[&str] = &[
    "LD_PRELOAD",
    "LD_LIBRARY_PATH",
    "PYTHONPATH",
    "PERL5LIB",
    "RUBYLIB",
    "http_proxy",
];

/// Flags `env_keep` entries that preserve a risky variable.
pub struct EnvKeepRule;

impl LineRule for EnvKeepRule {
    fn id(&self) -> &'static str {
        "SUDO009"
    }

    fn check(&self, line: &str) -> Vec<String> {
        if !line.contains("env_keep") {
            return vec![];
        }

        let found: Vec<&str> = RISKY_ENV
            .iter()
            .copied()
            .filter(|var| line.contains(var))
            .collect();

        if found.is_empty() {
            vec![]
        } else {
            vec![format!(
                "HIGH: Risky environment variables in env_keep: {}. Potential for code injection/MITM.",
                found.join(", ")
            )]
        }
    }
}
