//! Key/value engine discovery from the mount table.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::client::MountEntry;
use crate::errors::{DumpError, Result};

/// Engine type Vault reports for key/value mounts.
const KV_TYPE: &str = "kv";

/// Protocol version of a KV mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvVersion {
    V1,
    V2,
}

impl fmt::Display for KvVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvVersion::V1 => write!(f, "1"),
            KvVersion::V2 => write!(f, "2"),
        }
    }
}

/// A mounted key/value engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    /// Mount path as Vault reports it, with a trailing slash (`secret/`).
    pub mount: String,
    pub version: KvVersion,
}

/// Keep the `kv` mounts, in mount-path order, with their parsed version.
///
/// Any KV mount without a usable version aborts the whole enumeration.
pub fn kv_engines(mounts: &BTreeMap<String, MountEntry>) -> Result<Vec<Engine>> {
    mounts
        .iter()
        .filter(|(_, entry)| is_kv(entry))
        .map(|(mount, entry)| {
            Ok(Engine {
                mount: mount.clone(),
                version: kv_version(mount, entry)?,
            })
        })
        .collect()
}

/// Whether a mount is a key/value engine.
pub fn is_kv(entry: &MountEntry) -> bool {
    entry.engine_type == KV_TYPE
}

/// Read `options.version`, accepting `"2"` as well as `2`.
pub fn kv_version(mount: &str, entry: &MountEntry) -> Result<KvVersion> {
    let malformed = |detail: String| DumpError::MalformedEngineVersion {
        mount: mount.to_string(),
        detail,
    };

    let raw = entry
        .options
        .as_ref()
        .and_then(|opts| opts.get("version"))
        .ok_or_else(|| malformed("options.version is missing".into()))?;

    let number = match raw {
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| malformed(format!("'{s}' is not an integer")))?,
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| malformed(format!("{n} is not an integer")))?,
        other => return Err(malformed(format!("unexpected value {other}"))),
    };

    match number {
        1 => Ok(KvVersion::V1),
        2 => Ok(KvVersion::V2),
        n => Err(malformed(format!("unknown version {n}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(engine_type: &str, options: Value) -> MountEntry {
        MountEntry {
            engine_type: engine_type.to_string(),
            description: None,
            options: match options {
                Value::Object(map) => Some(map),
                _ => None,
            },
        }
    }

    #[test]
    fn filters_to_kv_mounts_in_path_order() {
        let mut mounts = BTreeMap::new();
        mounts.insert("transit/".to_string(), entry("transit", Value::Null));
        mounts.insert("secret/".to_string(), entry("kv", json!({"version": "2"})));
        mounts.insert("legacy/".to_string(), entry("kv", json!({"version": "1"})));
        mounts.insert("db/".to_string(), entry("database", Value::Null));

        let engines = kv_engines(&mounts).unwrap();
        assert_eq!(
            engines,
            vec![
                Engine {
                    mount: "legacy/".into(),
                    version: KvVersion::V1
                },
                Engine {
                    mount: "secret/".into(),
                    version: KvVersion::V2
                },
            ]
        );
    }

    #[test]
    fn numeric_version_is_accepted() {
        let e = entry("kv", json!({"version": 2}));
        assert_eq!(kv_version("secret/", &e).unwrap(), KvVersion::V2);
    }

    #[test]
    fn missing_version_is_fatal() {
        let mut mounts = BTreeMap::new();
        mounts.insert("secret/".to_string(), entry("kv", Value::Null));

        let err = kv_engines(&mounts).unwrap_err();
        assert!(matches!(
            err,
            DumpError::MalformedEngineVersion { ref mount, .. } if mount == "secret/"
        ));
    }

    #[test]
    fn garbage_version_is_fatal() {
        let e = entry("kv", json!({"version": "two"}));
        assert!(kv_version("secret/", &e).is_err());

        let e = entry("kv", json!({"version": "3"}));
        assert!(kv_version("secret/", &e).is_err());

        let e = entry("kv", json!({"version": true}));
        assert!(kv_version("secret/", &e).is_err());
    }

    #[test]
    fn non_kv_mounts_never_need_a_version() {
        let mut mounts = BTreeMap::new();
        mounts.insert("pki/".to_string(), entry("pki", json!({})));
        assert!(kv_engines(&mounts).unwrap().is_empty());
    }

    #[test]
    fn version_displays_as_number() {
        assert_eq!(KvVersion::V1.to_string(), "1");
        assert_eq!(KvVersion::V2.to_string(), "2");
    }
}
