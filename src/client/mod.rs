//! Vault session client.
//!
//! This module provides:
//! - the `KvSource` trait, the read-only view of Vault the dump walks
//! - `VaultClient`, the blocking HTTP implementation (`http`)
//! - the mount and payload types shared by both

pub mod http;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::Result;

pub use http::VaultClient;

/// A leaf payload: `(field, value)` pairs in the order Vault returned them.
pub type Fields = Vec<(String, String)>;

/// One entry of `sys/mounts`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MountEntry {
    /// Engine type, e.g. `kv`, `transit`, `database`.
    #[serde(rename = "type")]
    pub engine_type: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Engine options; KV mounts carry `version` here.
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
}

/// Read-only access to the parts of Vault a dump needs.
///
/// Paths passed to `list_keys` and `read_secret` are relative to the
/// mount and start with `/` (the mount root is `/`).
pub trait KvSource {
    /// All mounted secrets engines, keyed by mount path (`secret/`).
    fn mounts(&self) -> Result<BTreeMap<String, MountEntry>>;

    /// Immediate children of `path`. Sub-namespaces end with `/`.
    ///
    /// Returns `DumpError::PathNotFound` when nothing exists under `path`.
    fn list_keys(&self, mount: &str, path: &str) -> Result<Vec<String>>;

    /// Current version of the leaf at `path`, or `None` when that version
    /// has been deleted or destroyed.
    fn read_secret(&self, mount: &str, path: &str) -> Result<Option<Fields>>;
}

/// Flatten a KV v2 `data` object into string fields.
///
/// Strings are taken as-is, `null` becomes an empty value and every other
/// JSON value is kept as its compact JSON text.
pub fn fields_from_json(data: Map<String, Value>) -> Fields {
    data.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, text)
        })
        .collect()
}
