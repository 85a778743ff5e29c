//! Sudoers command-string normalization.
//!
//! A command clause on the right-hand side of a sudoers rule can carry any
//! number of prefixes before the actual command:
//!
//! ```text
//! (root:wheel) NOPASSWD: EXEC: !requiretty env_reset=true sha224:ab12 /bin/ls -l
//! ```
//!
//! Content-sensitive rules (relative paths, risky binaries) must look at the
//! command itself, so [`clean_command_string`] strips those prefixes and
//! [`split_sudoers_commands`] breaks a rule line into its individual clauses.

use regex::Regex;
use std::sync::LazyLock;

// RunAs specifier: `(root)`, `(user:group)`, `(user1, user2)`.
static RE_RUNAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([\w:.\-,\s]+\)\s+").unwrap());

// Command tag: `NOPASSWD:`, `EXEC:`, `SETENV:`.
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z_]+:\s*").unwrap());

// Boolean override: `!requiretty`, `!authenticate`.
static RE_OVERRIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^![\w]+(?:$|\s+)").unwrap());

// Option assignment: `env_reset=true`.
static RE_KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+=\w+(?:$|\s+)").unwrap());

// Digest prefix: `sha224:abcdef123123`.
static RE_DIGEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+:[a-zA-Z0-9+/=]+\s+").unwrap());

/// Prefix strippers in the order they are tried on every cycle.
static PREFIXES: [&LazyLock<Regex>; 5] =
    [&RE_RUNAS, &RE_TAG, &RE_OVERRIDE, &RE_KEY_VALUE, &RE_DIGEST];

/// Strips RunAs specifiers, tags, overrides, option assignments and digest
/// prefixes from the head of a command clause.
///
/// Prefixes may appear in any order and combination, so stripping runs to a
/// fixed point: after every successful strip the cycle restarts from the
/// first prefix kind, and the loop ends once a full cycle removes nothing.
/// Every strip shortens the string, which bounds the number of iterations.
///
/// An empty result means the clause held no explicit command; callers treat
/// that as `ALL`.
///
/// # Examples
///
/// ```
/// use sudoers_audit::normalize::clean_command_string;
///
/// assert_eq!(clean_command_string("(root) NOPASSWD: /bin/ls"), "/bin/ls");
/// assert_eq!(clean_command_string("EXEC: !requiretty env_reset=true /bin/ls -l"), "/bin/ls -l");
/// assert_eq!(clean_command_string("(ALL) !requiretty"), "");
/// ```
pub fn clean_command_string(raw: &str) -> String {
    let mut current = raw.trim();

    loop {
        let mut changed = false;
        for prefix in PREFIXES {
            if let Some(m) = prefix.find(current) {
                current = &current[m.end()..];
                changed = true;
                break;
            }
        }
        if !changed {
            break;
        }
    }

    current.to_string()
}

/// Splits the right-hand side of a rule line into individual command clauses.
///
/// Clauses are separated by top-level commas; commas inside a parenthesized
/// RunAs group such as `(user1, user2)` do not split. Each clause is trimmed
/// and empty clauses are dropped. The returned clauses may still carry
/// prefixes; pass each one through [`clean_command_string`].
///
/// Returns an empty vector when the line has no `=`.
///
/// # Examples
///
/// ```
/// use sudoers_audit::normalize::split_sudoers_commands;
///
/// let clauses = split_sudoers_commands("user ALL = (user1, user2) /bin/ls, (root) /bin/cat");
/// assert_eq!(clauses, vec!["(user1, user2) /bin/ls", "(root) /bin/cat"]);
/// assert!(split_sudoers_commands("Defaults !visiblepw").is_empty());
/// ```
pub fn split_sudoers_commands(line: &str) -> Vec<String> {
    let Some((_, rhs)) = line.split_once('=') else {
        return vec![];
    };

    let mut commands = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in rhs.trim().chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                push_clause(&mut commands, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    push_clause(&mut commands, &current);

    commands
}

fn push_clause(commands: &mut Vec<String>, clause: &str) {
    let clause = clause.trim();
    if !clause.is_empty() {
        commands.push(clause.to_string());
    }
}

/// Returns the command a clause resolves to: the first whitespace-delimited
/// token after [`clean_command_string`], or `"ALL"` when nothing remains.
///
/// ```
/// use sudoers_audit::normalize::command_token;
///
/// assert_eq!(command_token("(ALL) NOPASSWD: /usr/bin/systemctl restart nginx"), "/usr/bin/systemctl");
/// assert_eq!(command_token("(ALL:ALL) !requiretty"), "ALL");
/// ```
pub fn command_token(clause: &str) -> String {
    let cleaned = clean_command_string(clause);
    cleaned
        .split_whitespace()
        .next()
        .unwrap_or("ALL")
        .to_string()
}
