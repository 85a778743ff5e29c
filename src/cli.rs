use clap::{Parser, Subcommand};
use sudoers_audit::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sudoers-audit",
    version,
    about = "Static security auditing for sudoers files"
)]
pub struct Cli {
    /// Log debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit a sudoers file, or every file under a directory
    Audit {
        /// Path to a sudoers file or directory (e.g. /etc/sudoers.d)
        path: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Check ownership and mode of the commands each rule grants
        #[arg(long)]
        check_perms: bool,

        /// Fail on any issue, not only CRITICAL and HIGH
        #[arg(long)]
        strict: bool,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List all built-in rules with descriptions
    ListRules,

    /// Show full explanation for a rule
    Explain {
        /// Rule ID (e.g., "SUDO004")
        rule_id: String,
    },

    /// List the risky binaries the audit looks for
    ListBinaries {
        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
