//! # sudoers-audit
//!
//! Static security auditing for sudoers files.
//!
//! `sudoers-audit` reads sudoers-syntax files line by line and flags
//! privilege-escalation risks: unrestricted `ALL` grants, `NOPASSWD` and
//! `!authenticate`, wildcard and relative-path commands, deny-lists, leaked
//! environment variables, weak `Defaults`, and commands known to allow shell
//! escapes ([GTFOBins]). With permission checking enabled it also inspects
//! the owner and mode of every absolute command a rule grants.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sudoers_audit::{audit, config::Config, output};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let report = audit::run_audit(Path::new("/etc/sudoers"), &config);
//!
//! if !report.passed {
//!     let text = output::format_report(&report, &output::OutputFormat::Pretty)
//!         .expect("failed to render report");
//!     print!("{text}");
//! }
//! ```
//!
//! ## Architecture
//!
//! 1. **[`normalize`]**: strip RunAs groups, tags, options and digests from
//!    command clauses; split a rule into clauses.
//! 2. **[`catalogue`]**: the risky-binary lookup table.
//! 3. **[`rules`]**: pluggable [`rules::LineRule`] and [`rules::PathRule`]
//!    detectors.
//! 4. **[`audit`]**: run the rules over files (in parallel across files)
//!    and collect results.
//! 5. **[`finding`]**: result types ([`finding::Finding`],
//!    [`finding::FileAuditResult`], [`finding::AuditReport`]).
//! 6. **[`output`]**: pretty text, JSON, CSV, HTML, or SARIF.
//! 7. **[`config`]**: TOML configuration.
//!
//! Issue strings always start with a severity keyword (`CRITICAL`, `HIGH`,
//! `MEDIUM`, `WARNING`, `LOW`); reporting relies on that prefix.
//!
//! [GTFOBins]: https://gtfobins.github.io/

pub mod audit;
pub mod catalogue;
pub mod config;
pub mod finding;
pub mod normalize;
pub mod output;
pub mod rules;
