use sudoers_audit::normalize::{clean_command_string, command_token, split_sudoers_commands};

// ── split_sudoers_commands ────────────────────────────────────────────────────

#[test]
fn split_single_command() {
    assert_eq!(split_sudoers_commands("user ALL = /bin/ls"), vec!["/bin/ls"]);
}

#[test]
fn split_multiple_commands_in_order() {
    assert_eq!(
        split_sudoers_commands("user ALL = /bin/ls, /bin/cat,/usr/bin/id"),
        vec!["/bin/ls", "/bin/cat", "/usr/bin/id"]
    );
}

#[test]
fn split_keeps_commas_inside_runas_group() {
    let split = split_sudoers_commands("user ALL = (user1, user2) /bin/ls, (root) /bin/cat");
    assert_eq!(split.len(), 2);
    assert_eq!(split[0], "(user1, user2) /bin/ls");
    assert_eq!(split[1], "(root) /bin/cat");
}

#[test]
fn split_without_equals_is_empty() {
    assert!(split_sudoers_commands("Defaults !visiblepw").is_empty());
    assert!(split_sudoers_commands("").is_empty());
}

#[test]
fn split_drops_empty_clauses() {
    assert_eq!(
        split_sudoers_commands("user ALL = /bin/ls, , /bin/cat,"),
        vec!["/bin/ls", "/bin/cat"]
    );
}

#[test]
fn split_uses_first_equals_only() {
    assert_eq!(
        split_sudoers_commands("user ALL = (root) env_reset=true /bin/ls"),
        vec!["(root) env_reset=true /bin/ls"]
    );
}

#[test]
fn split_unbalanced_close_paren_does_not_underflow() {
    // A stray ')' must not push depth below zero and swallow the next separator.
    assert_eq!(
        split_sudoers_commands("user ALL = /bin/a), /bin/b"),
        vec!["/bin/a)", "/bin/b"]
    );
}

#[test]
fn split_count_matches_top_level_commas() {
    for n in 1..6 {
        let cmds: Vec<String> = (0..n).map(|i| format!("/bin/cmd{i}")).collect();
        let line = format!("user ALL = (a, b, c) {}", cmds.join(", "));
        assert_eq!(split_sudoers_commands(&line).len(), n);
    }
}

// ── clean_command_string ──────────────────────────────────────────────────────

#[test]
fn clean_plain_command_is_unchanged() {
    assert_eq!(clean_command_string("/bin/ls"), "/bin/ls");
    assert_eq!(clean_command_string("/bin/ls -la /tmp"), "/bin/ls -la /tmp");
}

#[test]
fn clean_strips_tags() {
    assert_eq!(clean_command_string("NOPASSWD: /bin/ls"), "/bin/ls");
    assert_eq!(clean_command_string("EXEC: NOPASSWD: /bin/ls"), "/bin/ls");
    assert_eq!(clean_command_string("SETENV:/bin/ls"), "/bin/ls");
}

#[test]
fn clean_strips_runas() {
    assert_eq!(clean_command_string("(root) /bin/ls"), "/bin/ls");
    assert_eq!(clean_command_string("(user:group) /bin/ls"), "/bin/ls");
    assert_eq!(clean_command_string("(user, group) /bin/ls"), "/bin/ls");
    assert_eq!(clean_command_string("(www-data:adm.users) /bin/ls"), "/bin/ls");
}

#[test]
fn clean_strips_overrides_and_options() {
    assert_eq!(clean_command_string("!requiretty /bin/ls"), "/bin/ls");
    assert_eq!(clean_command_string("env_reset=true /bin/ls"), "/bin/ls");
}

#[test]
fn clean_strips_digest() {
    assert_eq!(clean_command_string("sha224:abcdef123123 /bin/ls"), "/bin/ls");
    assert_eq!(
        clean_command_string("sha256:q2Fz+3/Ab== /usr/bin/id"),
        "/usr/bin/id"
    );
}

#[test]
fn clean_strips_prefixes_in_any_order() {
    assert_eq!(
        clean_command_string("(ALL) NOPASSWD: EXEC: !requiretty !visiblepw env_reset=true /bin/ls"),
        "/bin/ls"
    );
    assert_eq!(
        clean_command_string("NOPASSWD: (root) sha224:abc123 /bin/ls"),
        "/bin/ls"
    );
    assert_eq!(clean_command_string("(ALL) (ALL) /bin/bash"), "/bin/bash");
}

#[test]
fn clean_trims_surrounding_whitespace() {
    assert_eq!(clean_command_string("   (root)   /bin/ls   "), "/bin/ls");
}

#[test]
fn clean_option_only_clause_is_empty() {
    assert_eq!(clean_command_string("(ALL) !requiretty"), "");
    assert_eq!(clean_command_string("NOPASSWD:"), "");
    assert_eq!(clean_command_string(""), "");
}

#[test]
fn clean_leaves_relative_commands() {
    assert_eq!(clean_command_string("(ALL) NOPASSWD: relative/path"), "relative/path");
}

#[test]
fn clean_runas_requires_following_whitespace() {
    assert_eq!(clean_command_string("(root)/bin/ls"), "(root)/bin/ls");
}

#[test]
fn clean_is_idempotent() {
    let inputs = [
        "/bin/ls",
        "(root) NOPASSWD: /bin/ls -l",
        "EXEC: !requiretty env_reset=true sha224:ab12 relative/tool arg",
        "(ALL:ALL) ALL",
        "(ALL) !requiretty",
        "  ALL  ",
        "!/bin/sh",
    ];
    for input in inputs {
        let once = clean_command_string(input);
        assert_eq!(clean_command_string(&once), once, "not idempotent for {input:?}");
    }
}

// ── command_token ─────────────────────────────────────────────────────────────

#[test]
fn command_token_is_first_word_of_clean_clause() {
    assert_eq!(
        command_token("(ALL) NOPASSWD: /usr/bin/systemctl restart nginx"),
        "/usr/bin/systemctl"
    );
}

#[test]
fn command_token_defaults_to_all() {
    assert_eq!(command_token("(ALL:ALL) !requiretty"), "ALL");
    assert_eq!(command_token("(ALL:ALL) ALL"), "ALL");
}
