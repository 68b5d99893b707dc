//! `vault-dump mounts` — show the mount table and what `dump` does with it.

use std::collections::BTreeMap;
use std::fmt;

use crate::cli::output;
use crate::cli::{connect, load_settings, Cli};
use crate::client::{KvSource, MountEntry};
use crate::config::Settings;
use crate::dump::engine::{is_kv, kv_version, KvVersion};
use crate::dump::is_excluded;
use crate::errors::Result;

/// What a dump would do with a mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStatus {
    Dumped,
    NotKv,
    KvV1,
    Excluded,
    BadVersion,
}

impl fmt::Display for MountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MountStatus::Dumped => "yes",
            MountStatus::NotKv => "no",
            MountStatus::KvV1 => "no (kv v1)",
            MountStatus::Excluded => "no (excluded)",
            MountStatus::BadVersion => "error: bad version",
        };
        f.write_str(text)
    }
}

/// One line of the mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRow {
    pub path: String,
    pub engine_type: String,
    pub version: Option<String>,
    pub status: MountStatus,
    pub description: String,
}

/// Execute the `mounts` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let client = connect(cli, &settings)?;

    let rows = summarize(&client.mounts()?, &settings);
    let dumped = rows
        .iter()
        .filter(|r| r.status == MountStatus::Dumped)
        .count();

    output::info(&format!(
        "{}: {} mount(s), {} dumped",
        client.address(),
        rows.len(),
        dumped
    ));
    output::print_mounts_table(&rows);

    if rows.iter().any(|r| r.status == MountStatus::BadVersion) {
        output::warning("A dump will abort: some kv mounts have no usable version.");
    }

    Ok(())
}

/// Classify every mount the way `dump` would treat it.
pub fn summarize(mounts: &BTreeMap<String, MountEntry>, settings: &Settings) -> Vec<MountRow> {
    mounts
        .iter()
        .map(|(path, entry)| {
            let excluded = is_excluded(&settings.exclude_mounts, path);

            let (version, status) = if !is_kv(entry) {
                (None, MountStatus::NotKv)
            } else if excluded {
                (None, MountStatus::Excluded)
            } else {
                match kv_version(path, entry) {
                    Ok(KvVersion::V2) => (Some("2".to_string()), MountStatus::Dumped),
                    Ok(KvVersion::V1) => (Some("1".to_string()), MountStatus::KvV1),
                    Err(_) => (None, MountStatus::BadVersion),
                }
            };

            MountRow {
                path: path.clone(),
                engine_type: entry.engine_type.clone(),
                version,
                status,
                description: entry.description.clone().unwrap_or_default(),
            }
        })
        .collect()
}
