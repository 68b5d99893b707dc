//! Blocking Vault HTTP client built on `ureq`.
//!
//! Only the handful of read-only endpoints a dump needs are covered:
//! token lookup, the mount table, and KV v2 `metadata` listing and
//! `data` reads.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use ureq::http::{Response, StatusCode};
use ureq::{Agent, Body};
use url::Url;

use super::{fields_from_json, Fields, KvSource, MountEntry};
use crate::config::VaultConfig;
use crate::errors::{DumpError, Result};

/// Authenticated handle on one Vault server.
pub struct VaultClient {
    config: VaultConfig,
    agent: Agent,
}

impl VaultClient {
    /// Build a client. No request is made until the first call.
    pub fn new(config: VaultConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();

        Self {
            agent: Agent::new_with_config(agent_config),
            config,
        }
    }

    /// The server address this client talks to.
    pub fn address(&self) -> &str {
        &self.config.address
    }

    /// Check that the token is accepted (`auth/token/lookup-self`).
    pub fn verify_token(&self) -> Result<()> {
        let path = "auth/token/lookup-self";
        let response = self.get(self.url(&["auth", "token", "lookup-self"], false)?)?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let (_, message) = error_parts(response);
                Err(DumpError::NotAuthenticated(message))
            }
            _ => Err(api_error(path, response)),
        }
    }

    /// `<address>/v1/<segments...>`, each segment percent-encoded.
    ///
    /// An empty last segment keeps a trailing `/`, which KV listings use.
    fn url(&self, segments: &[&str], list: bool) -> Result<Url> {
        let address = &self.config.address;
        let mut url = Url::parse(address).map_err(|e| {
            DumpError::ConfigError(format!("Vault address '{address}' is not a valid URL: {e}"))
        })?;

        url.path_segments_mut()
            .map_err(|()| {
                DumpError::ConfigError(format!("Vault address '{address}' cannot take a path"))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(segments);

        if list {
            url.query_pairs_mut().append_pair("list", "true");
        }
        Ok(url)
    }

    fn get(&self, url: Url) -> Result<Response<Body>> {
        debug!(%url, "vault GET");

        let mut request = self
            .agent
            .get(url.as_str())
            .header("X-Vault-Token", self.config.token.as_str())
            .header(
                "User-Agent",
                concat!("vault-dump/", env!("CARGO_PKG_VERSION")),
            );
        if let Some(namespace) = &self.config.namespace {
            request = request.header("X-Vault-Namespace", namespace.as_str());
        }

        request
            .call()
            .map_err(|e| DumpError::Http(format!("{url}: {e}")))
    }
}

impl KvSource for VaultClient {
    fn mounts(&self) -> Result<BTreeMap<String, MountEntry>> {
        let path = "sys/mounts";
        let response = self.get(self.url(&["sys", "mounts"], false)?)?;
        if !response.status().is_success() {
            return Err(api_error(path, response));
        }

        let parsed: MountsResponse = decode(path, response)?;
        Ok(parsed.data)
    }

    fn list_keys(&self, mount: &str, path: &str) -> Result<Vec<String>> {
        let url = self.url(&kv_segments(mount, "metadata", path), true)?;
        let api_path = url.path().to_string();
        let response = self.get(url)?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(DumpError::PathNotFound(format!(
                "{}{path}",
                mount.trim_end_matches('/')
            ))),
            status if status.is_success() => {
                let list: KeyListResponse = decode(&api_path, response)?;
                Ok(list.data.keys.unwrap_or_default())
            }
            _ => Err(api_error(&api_path, response)),
        }
    }

    fn read_secret(&self, mount: &str, path: &str) -> Result<Option<Fields>> {
        let url = self.url(&kv_segments(mount, "data", path), false)?;
        let api_path = url.path().to_string();
        let response = self.get(url)?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let read: KvReadResponse = decode(&api_path, response)?;
                Ok(read.data.data.map(fields_from_json))
            }
            _ => Err(api_error(&api_path, response)),
        }
    }
}

/// Path segments of `<mount>/<kind>/<path>`.
///
/// A directory path (`/app/`) ends with an empty segment so the URL keeps
/// its trailing slash.
fn kv_segments<'a>(mount: &'a str, kind: &'a str, path: &'a str) -> Vec<&'a str> {
    mount
        .split('/')
        .filter(|s| !s.is_empty())
        .chain(std::iter::once(kind))
        .chain(path.trim_start_matches('/').split('/'))
        .collect()
}

fn decode<T: DeserializeOwned>(path: &str, mut response: Response<Body>) -> Result<T> {
    response
        .body_mut()
        .read_json::<T>()
        .map_err(|e| DumpError::InvalidResponse(format!("{path}: {e}")))
}

/// Status code and message of a failed response, keeping Vault's
/// `errors` array when the body has one.
fn error_parts(mut response: Response<Body>) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    let message = serde_json::from_str::<ApiErrors>(&body)
        .ok()
        .map(|e| e.errors.join("; "))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    (status, message)
}

fn api_error(path: &str, response: Response<Body>) -> DumpError {
    let (status, message) = error_parts(response);
    DumpError::Api {
        status,
        path: path.to_string(),
        message,
    }
}

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ApiErrors {
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Deserialize)]
struct MountsResponse {
    data: BTreeMap<String, MountEntry>,
}

#[derive(Deserialize)]
struct KeyListResponse {
    data: KeyListData,
}

#[derive(Deserialize)]
struct KeyListData {
    keys: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct KvReadResponse {
    data: KvDataEnvelope,
}

#[derive(Deserialize)]
struct KvDataEnvelope {
    #[serde(default)]
    data: Option<Map<String, Value>>,
}
