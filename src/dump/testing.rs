//! In-memory `KvSource` for unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::{Map, Value};

use crate::client::{Fields, KvSource, MountEntry};
use crate::errors::{DumpError, Result};

type Key = (String, String);

/// A tiny Vault: a mount table plus one tree of listings per mount.
///
/// Children are listed in the order they were first added.
#[derive(Default)]
pub struct MemorySource {
    mounts: BTreeMap<String, MountEntry>,
    listings: HashMap<Key, Vec<String>>,
    leaves: HashMap<Key, Option<Fields>>,
    forbidden: HashSet<Key>,
    list_calls: RefCell<Vec<Key>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(mut self, path: &str, engine_type: &str, version: Option<&str>) -> Self {
        let options = version.map(|v| {
            let mut map = Map::new();
            map.insert("version".into(), Value::String(v.into()));
            map
        });
        self.mounts.insert(
            path.to_string(),
            MountEntry {
                engine_type: engine_type.to_string(),
                description: None,
                options,
            },
        );
        self
    }

    pub fn kv_mount(self, path: &str, version: &str) -> Self {
        self.mount(path, "kv", Some(version))
    }

    pub fn secret(self, mount: &str, path: &str, fields: &[(&str, &str)]) -> Self {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.leaf(mount, path, Some(fields))
    }

    pub fn deleted_secret(self, mount: &str, path: &str) -> Self {
        self.leaf(mount, path, None)
    }

    /// Make listing `path` fail with a 403.
    pub fn forbid(mut self, mount: &str, path: &str) -> Self {
        self.forbidden.insert((mount.to_string(), path.to_string()));
        self
    }

    /// Every `(mount, path)` passed to `list_keys`, in call order.
    pub fn list_calls(&self) -> Vec<Key> {
        self.list_calls.borrow().clone()
    }

    fn leaf(mut self, mount: &str, path: &str, fields: Option<Fields>) -> Self {
        // Register each ancestor directory in its parent's listing.
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let mut parent = "/".to_string();
        for (i, segment) in segments.iter().enumerate() {
            let is_leaf = i == segments.len() - 1;
            let child = if is_leaf {
                segment.to_string()
            } else {
                format!("{segment}/")
            };
            let listing = self
                .listings
                .entry((mount.to_string(), parent.clone()))
                .or_default();
            if !listing.contains(&child) {
                listing.push(child.clone());
            }
            parent.push_str(&child);
        }

        self.leaves.insert((mount.to_string(), path.to_string()), fields);
        self
    }
}

impl KvSource for MemorySource {
    fn mounts(&self) -> Result<BTreeMap<String, MountEntry>> {
        Ok(self.mounts.clone())
    }

    fn list_keys(&self, mount: &str, path: &str) -> Result<Vec<String>> {
        let key = (mount.to_string(), path.to_string());
        self.list_calls.borrow_mut().push(key.clone());

        if self.forbidden.contains(&key) {
            return Err(DumpError::Api {
                status: 403,
                path: format!("{mount}metadata{path}"),
                message: "permission denied".into(),
            });
        }

        self.listings
            .get(&key)
            .cloned()
            .ok_or_else(|| {
                DumpError::PathNotFound(format!("{}{path}", mount.trim_end_matches('/')))
            })
    }

    fn read_secret(&self, mount: &str, path: &str) -> Result<Option<Fields>> {
        self.leaves
            .get(&(mount.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| DumpError::Api {
                status: 404,
                path: format!("{mount}data{path}"),
                message: "no such leaf in test fixture".into(),
            })
    }
}
