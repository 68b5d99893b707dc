//! Comment block printed at the top of every dump.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::errors::Result;

/// Text encoding of everything this tool reads and writes.
const ENCODING: &str = "utf-8";

/// Write the backup header.
///
/// `now` is passed in so two dumps of the same store differ only in the
/// `backup date` line.
pub fn write_header<W: Write>(out: &mut W, address: &str, now: DateTime<Utc>) -> Result<()> {
    writeln!(out, "#")?;
    writeln!(out, "# vault-dump backup")?;
    writeln!(
        out,
        "# backup date: {}",
        now.format("%Y-%m-%d %H:%M:%S%.6f UTC")
    )?;
    writeln!(out, "# VAULT_ADDR env variable: {address}")?;
    writeln!(out, "# STDIN encoding: {ENCODING}")?;
    writeln!(out, "# STDOUT encoding: {ENCODING}")?;
    writeln!(out, "#")?;
    writeln!(out, "# WARNING: not guaranteed to be consistent!")?;
    writeln!(out, "#")?;
    Ok(())
}
