use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use zeroize::Zeroizing;

use crate::errors::{DumpError, Result};

/// Address used when neither `--address`, `VAULT_ADDR` nor the config
/// file name one.
pub const DEFAULT_ADDRESS: &str = "http://localhost:8200";

/// Optional settings, loaded from `.vault-dump.toml`.
///
/// Every field has a default so the tool works without any config file.
/// The token is deliberately absent: it only ever comes from the
/// command line or the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault server URL (overridden by `--address` / `VAULT_ADDR`).
    #[serde(default)]
    pub address: Option<String>,

    /// Enterprise namespace sent as `X-Vault-Namespace`.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sort children and fields instead of keeping Vault's order.
    #[serde(default)]
    pub sort_keys: bool,

    /// Mount paths (e.g. `"scratch/"`) that are never dumped.
    #[serde(default)]
    pub exclude_mounts: Vec<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_timeout_secs() -> u64 {
    30
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            address: None,
            namespace: None,
            timeout_secs: default_timeout_secs(),
            sort_keys: false,
            exclude_mounts: Vec::new(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".vault-dump.toml";

    /// Load settings from an explicit path, or from `<dir>/.vault-dump.toml`.
    ///
    /// An explicit path must exist. The implicit file is optional and
    /// defaults are returned when it is absent.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(DumpError::ConfigError(format!(
                        "{} does not exist",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let path = dir.join(Self::FILE_NAME);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            DumpError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }
}

/// Everything the HTTP client needs to talk to one Vault server.
#[derive(Clone)]
pub struct VaultConfig {
    pub address: String,
    pub token: Zeroizing<String>,
    pub namespace: Option<String>,
    pub timeout: Duration,
}

// Never print the token, not even in debug logs.
impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl VaultConfig {
    /// Merge command-line/environment values over the config file.
    ///
    /// Flags and environment variables win, then the file, then the
    /// built-in defaults. A missing or empty token is an error: there is
    /// no sensible fallback credential.
    pub fn resolve(
        address: Option<&str>,
        token: Option<&str>,
        namespace: Option<&str>,
        timeout_secs: Option<u64>,
        settings: &Settings,
    ) -> Result<Self> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(DumpError::MissingToken)?;

        let address = address
            .map(str::to_string)
            .or_else(|| settings.address.clone())
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

        let url = Url::parse(&address).map_err(|e| {
            DumpError::ConfigError(format!("Vault address '{address}' is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DumpError::ConfigError(format!(
                "Vault address '{address}' must start with http:// or https://"
            )));
        }

        let namespace = namespace
            .map(str::to_string)
            .or_else(|| settings.namespace.clone())
            .filter(|ns| !ns.is_empty());

        let timeout_secs = timeout_secs.unwrap_or(settings.timeout_secs);
        if timeout_secs == 0 {
            return Err(DumpError::ConfigError(
                "timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            token: Zeroizing::new(token.to_string()),
            namespace,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────
