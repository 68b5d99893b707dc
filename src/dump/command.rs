//! Restore command serialization.
//!
//! Each leaf becomes one `vault kv put` line whose arguments survive
//! POSIX shell word splitting unchanged.

use std::fmt::Write;

/// Command every restore line starts with.
pub const RESTORE_COMMAND: &str = "vault kv put";

/// Build the restore line for one leaf.
///
/// `full_path` is the mount plus the leaf's relative path
/// (`secret/app/db`). Fields are written in the order given.
///
/// Quoting only protects values from the shell. `vault kv put` itself
/// still reads a value of `-` from stdin and a value starting with `@`
/// from a file; see [`restore_hazard`].
pub fn restore_command(full_path: &str, fields: &[(String, String)]) -> String {
    let mut line = format!("{RESTORE_COMMAND} {}", shell_quote(full_path));
    for (key, value) in fields {
        let _ = write!(line, " {}=", shell_quote(key));
        if !value.is_empty() {
            line.push_str(&shell_quote(value));
        }
    }
    line
}

/// Quote a word for a POSIX shell.
///
/// Words made only of characters the shell never interprets are returned
/// as-is. Everything else is wrapped in single quotes; an embedded single
/// quote closes the quoting, emits `"'"` and reopens it.
pub fn shell_quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }

    if word.chars().all(is_shell_safe) {
        return word.to_string();
    }

    format!("'{}'", word.replace('\'', r#"'"'"'"#))
}

/// How `vault kv put` would misread `value` on restore, if at all.
pub fn restore_hazard(value: &str) -> Option<&'static str> {
    if value == "-" {
        Some("is read from stdin")
    } else if value.starts_with('@') {
        Some("is read from a file")
    } else {
        None
    }
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c)
}
