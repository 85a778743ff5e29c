mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::path::Path;
use sudoers_audit::{audit, config, output, rules};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Audit {
            path,
            format,
            output: output_path,
            check_perms,
            strict,
            config: config_path,
        } => {
            if !path.exists() {
                eprintln!("Error: path does not exist: {}", path.display());
                std::process::exit(2);
            }

            let mut config = load_config(config_path.as_deref());
            if strict {
                config.strict.enabled = true;
            }
            if check_perms {
                config.permissions.enabled = true;
            }

            let report = audit::run_audit(&path, &config);
            let formatted = output::format_report(&report, &format).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });

            if let Some(out_path) = output_path {
                std::fs::write(&out_path, &formatted).unwrap_or_else(|e| {
                    eprintln!("Error writing output: {e}");
                    std::process::exit(2);
                });
                eprintln!("Report written to {}", out_path.display());
            } else {
                print!("{formatted}");
            }

            std::process::exit(if report.passed { 0 } else { 1 });
        }

        Commands::ListRules => {
            let rules = rules::all_rules();
            println!("{}", "Built-in Rules".bold().underline());
            println!();

            for rule in rules {
                println!(
                    "  [{severity}] {id:<8} {name:<22} {message}",
                    severity = severity_label(rule.severity),
                    id = rule.id,
                    name = rule.name,
                    message = rule.message,
                );
            }

            println!();
            println!("  Total: {} rules", rules.len());
        }

        Commands::Explain { rule_id } => match rules::find_rule(&rule_id) {
            Some(rule) => {
                println!("{}", rule.id.bold());
                println!();
                println!("  Name:         {}", rule.name);
                println!("  Severity:     {}", rule.severity);
                println!("  Description:  {}", rule.message);
                println!("  Remediation:  {}", rule.remediation);
            }
            None => {
                eprintln!("Unknown rule: {rule_id}");
                eprintln!("Use 'sudoers-audit list-rules' to see all available rules.");
                std::process::exit(2);
            }
        },

        Commands::ListBinaries {
            config: config_path,
        } => {
            let catalogue = load_config(config_path.as_deref()).catalogue();
            println!("{}", "Risky Binaries".bold().underline());
            println!();
            for (name, url) in catalogue.iter() {
                println!("  {name:<20} {}", url.dimmed());
            }
            println!();
            println!("  Total: {} binaries", catalogue.len());
        }
    }
}

fn load_config(path: Option<&Path>) -> config::Config {
    config::Config::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}

/// Logs go to stderr so report output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn severity_label(severity: sudoers_audit::finding::Severity) -> String {
    use sudoers_audit::finding::Severity;

    match severity {
        Severity::Critical => "CRITICAL".red().bold().to_string(),
        Severity::High => "    HIGH".red().to_string(),
        Severity::Medium => "  MEDIUM".yellow().to_string(),
        Severity::Warning => " WARNING".bright_yellow().to_string(),
        Severity::Low => "     LOW".blue().to_string(),
    }
}
