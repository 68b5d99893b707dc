//! `vault-dump dump` — write restore commands for every KV v2 secret.
//!
//! Output goes to stdout unless `--output` names a file. Either way each
//! line is written as soon as its secret has been read, so an aborted run
//! leaves a usable partial dump behind.

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter};
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::cli::output;
use crate::cli::{connect, load_settings, Cli, DumpArgs};
use crate::dump::{self, DumpOptions, WalkStats};
use crate::errors::{DumpError, Result};

/// Execute the `dump` command.
pub fn execute(cli: &Cli, args: &DumpArgs) -> Result<()> {
    let settings = load_settings(cli)?;
    let client = connect(cli, &settings)?;

    let options = DumpOptions {
        prefix: args.prefix.clone(),
        sort_keys: args.sort_keys || settings.sort_keys,
        exclude_mounts: settings.exclude_mounts.clone(),
    };

    let stats = match &args.output {
        Some(dest) => {
            let file = create_output(dest, args.force)?;
            let stats = dump::run(
                &client,
                LineWriter::new(file),
                client.address(),
                Utc::now(),
                &options,
            )?;
            output::success(&format!(
                "Dumped {} secret(s) to {}",
                stats.secrets,
                dest.display()
            ));
            stats
        }
        None => dump::run(
            &client,
            io::stdout().lock(),
            client.address(),
            Utc::now(),
            &options,
        )?,
    };

    log_summary(&stats);
    Ok(())
}

fn log_summary(stats: &WalkStats) {
    info!(
        engines = stats.engines,
        skipped_engines = stats.skipped_engines,
        secrets = stats.secrets,
        empty_paths = stats.empty_paths,
        unreadable = stats.unreadable,
        "dump complete"
    );
}

/// Create the dump file, readable by its owner only.
///
/// An existing file is only replaced with `--force`, and then its mode is
/// reset to 0600 as well.
fn create_output(dest: &Path, force: bool) -> Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true);
    if force {
        opts.create(true).truncate(true);
    } else {
        opts.create_new(true);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }

    let file = opts.open(dest).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => DumpError::CommandFailed(format!(
            "{} already exists (use --force to overwrite)",
            dest.display()
        )),
        _ => DumpError::CommandFailed(format!("failed to create {}: {e}", dest.display())),
    })?;

    // `mode` only applies to newly created files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(file)
}
