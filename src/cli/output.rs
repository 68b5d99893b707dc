//! Colored terminal output helpers.
//!
//! Success, error and warning messages go to stderr, so a dump on stdout
//! stays clean. `info` and the mount table are command output and go to
//! stdout; the `dump` command never uses them.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::cli::commands::mounts::MountRow;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print the mount table (Path, Type, KV Version, Dumped, Description).
pub fn print_mounts_table(rows: &[MountRow]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Path", "Type", "KV Version", "Dumped", "Description"]);

    for row in rows {
        table.add_row(vec![
            row.path.clone(),
            row.engine_type.clone(),
            row.version.clone().unwrap_or_else(|| "-".into()),
            row.status.to_string(),
            row.description.clone(),
        ]);
    }

    println!("{table}");
}
