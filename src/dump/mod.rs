//! Dump module — turn a Vault KV tree into restore commands.
//!
//! This module provides:
//! - KV engine discovery from the mount table (`engine`)
//! - The depth-first namespace walk (`walker`)
//! - `vault kv put` line serialization with shell quoting (`command`)
//! - The comment header printed before the walk (`header`)

pub mod command;
pub mod engine;
pub mod header;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

use std::io::Write;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::client::KvSource;
use crate::errors::{DumpError, Result};

pub use command::{restore_command, restore_hazard, shell_quote};
pub use engine::{kv_engines, Engine, KvVersion};
pub use header::write_header;
pub use walker::{WalkStats, Walker};

/// Knobs for a single dump run.
#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// Only dump below this path (`secret/app/`).
    pub prefix: Option<String>,
    /// Sort children and fields instead of keeping Vault's order.
    pub sort_keys: bool,
    /// Mount paths never dumped.
    pub exclude_mounts: Vec<String>,
}

/// Whether `mount` appears in `exclude`, with or without its trailing slash.
pub fn is_excluded(exclude: &[String], mount: &str) -> bool {
    let mount = mount.trim_end_matches('/');
    exclude.iter().any(|m| m.trim_end_matches('/') == mount)
}

/// An engine and the path inside it where the walk starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub engine: Engine,
    pub start: String,
}

/// Decide what to walk.
///
/// Without a prefix every engine is walked from its root. With one, the
/// KV mount holding the longest matching prefix is walked from the rest
/// of the prefix, and nothing else is dumped.
pub fn plan(engines: Vec<Engine>, prefix: Option<&str>) -> Result<Vec<Target>> {
    let prefix = prefix
        .map(|p| p.trim_start_matches('/'))
        .filter(|p| !p.is_empty());

    let Some(prefix) = prefix else {
        return Ok(engines
            .into_iter()
            .map(|engine| Target {
                engine,
                start: "/".to_string(),
            })
            .collect());
    };

    let wanted = if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{prefix}/")
    };

    let engine = engines
        .into_iter()
        .filter(|e| wanted.starts_with(e.mount.as_str()))
        .max_by_key(|e| e.mount.len())
        .ok_or_else(|| DumpError::PrefixNotMounted(prefix.to_string()))?;

    let start = format!("/{}", &wanted[engine.mount.len()..]);
    Ok(vec![Target { engine, start }])
}

/// Run a complete dump into `out`: header, engine discovery, walk.
///
/// Lines are written as they are produced; on error whatever was already
/// written stays in `out`.
pub fn run<S, W>(
    source: &S,
    mut out: W,
    address: &str,
    now: DateTime<Utc>,
    options: &DumpOptions,
) -> Result<WalkStats>
where
    S: KvSource + ?Sized,
    W: Write,
{
    write_header(&mut out, address, now)?;

    let mut mounts = source.mounts()?;
    mounts.retain(|mount, _| !is_excluded(&options.exclude_mounts, mount));

    let engines = kv_engines(&mounts)?;
    info!(count = engines.len(), "found key/value engines");

    let targets = plan(engines, options.prefix.as_deref())?;

    let mut walker = Walker::new(source, out, options.sort_keys);
    for target in &targets {
        info!(mount = %target.engine.mount, version = %target.engine.version, "dumping");
        walker.walk_engine(&target.engine, &target.start)?;
    }

    let stats = walker.stats();
    walker.into_inner().flush()?;
    Ok(stats)
}
