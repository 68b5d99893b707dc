//! Depth-first walk of a KV v2 namespace.

use std::io::Write;

use tracing::{debug, warn};

use super::command::{restore_command, restore_hazard};
use super::engine::{Engine, KvVersion};
use crate::client::KvSource;
use crate::errors::{DumpError, Result};

/// Counters collected over a run, logged once at the end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    /// KV v2 engines walked.
    pub engines: usize,
    /// KV v1 engines skipped.
    pub skipped_engines: usize,
    /// Restore lines written.
    pub secrets: usize,
    /// Listings that came back "path not found".
    pub empty_paths: usize,
    /// Leaves whose current version could not be read.
    pub unreadable: usize,
}

/// Streams restore lines for every leaf it visits into `out`.
pub struct Walker<'a, S: KvSource + ?Sized, W: Write> {
    source: &'a S,
    out: W,
    sort_keys: bool,
    stats: WalkStats,
}

impl<'a, S: KvSource + ?Sized, W: Write> Walker<'a, S, W> {
    pub fn new(source: &'a S, out: W, sort_keys: bool) -> Self {
        Self {
            source,
            out,
            sort_keys,
            stats: WalkStats::default(),
        }
    }

    /// Walk one engine starting at `start` (`/` for the whole mount).
    pub fn walk_engine(&mut self, engine: &Engine, start: &str) -> Result<()> {
        match engine.version {
            KvVersion::V1 => self.skip_v1(engine),
            KvVersion::V2 => {
                debug!(mount = %engine.mount, start, "walking kv v2 mount");
                self.stats.engines += 1;
                self.walk(&engine.mount, start)
            }
        }
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Give back the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn skip_v1(&mut self, engine: &Engine) -> Result<()> {
        warn!(mount = %engine.mount, "kv version 1 mounts are not dumped");
        self.stats.skipped_engines += 1;
        writeln!(
            self.out,
            "# KV version 1 mount {} is not supported yet, skipping",
            engine.mount
        )?;
        Ok(())
    }

    fn walk(&mut self, mount: &str, path: &str) -> Result<()> {
        let mut children = match self.source.list_keys(mount, path) {
            Ok(children) => children,
            Err(DumpError::PathNotFound(_)) => {
                self.stats.empty_paths += 1;
                writeln!(
                    self.out,
                    "# No Secrets found in mount {mount} and path {path}"
                )?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if self.sort_keys {
            children.sort();
        }

        for child in children {
            let child_path = format!("{path}{child}");
            if child.ends_with('/') {
                self.walk(mount, &child_path)?;
            } else {
                self.dump_leaf(mount, &child_path)?;
            }
        }

        Ok(())
    }

    fn dump_leaf(&mut self, mount: &str, path: &str) -> Result<()> {
        let full_path = format!("{}{path}", mount.trim_end_matches('/'));

        let Some(mut fields) = self.source.read_secret(mount, path)? else {
            warn!(path = %full_path, "current version deleted or destroyed");
            self.stats.unreadable += 1;
            writeln!(
                self.out,
                "# Secret {full_path} has no readable current version, skipping"
            )?;
            return Ok(());
        };

        if self.sort_keys {
            fields.sort_by(|a, b| a.0.cmp(&b.0));
        }

        for (field, value) in &fields {
            if let Some(hazard) = restore_hazard(value) {
                warn!(path = %full_path, field = %field, "value {hazard} by `vault kv put` on restore");
            }
        }

        writeln!(self.out, "{}", restore_command(&full_path, &fields))?;
        self.stats.secrets += 1;
        Ok(())
    }
}
