//! Mock Vault server helpers.
//!
//! Sets up wiremock endpoints that answer the way a real Vault does for
//! token lookup, the mount table, KV v2 listings and reads. Paths that
//! are not mocked answer 404, which is exactly what Vault does for an
//! empty listing.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token the mocks accept.
pub const TOKEN: &str = "hvs.test-root-token";

/// Accept `TOKEN` on `auth/token/lookup-self`.
pub async fn mock_token_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/auth/token/lookup-self"))
        .and(header("X-Vault-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": TOKEN, "policies": ["root"], "ttl": 0 }
        })))
        .mount(server)
        .await;
}

/// Reject every token.
pub async fn mock_token_denied(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/auth/token/lookup-self"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "errors": ["permission denied"] })),
        )
        .mount(server)
        .await;
}

/// Serve `sys/mounts` with the given `data` object.
pub async fn mock_mounts(server: &MockServer, data: Value) {
    let mut body = json!({ "request_id": "1b2c", "lease_id": "", "renewable": false });
    body["data"] = data;
    Mock::given(method("GET"))
        .and(path("/v1/sys/mounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve a KV v2 listing of `path` (`/` for the mount root).
pub async fn mock_list(server: &MockServer, mount: &str, dir: &str, keys: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/v1/{}/metadata/{}",
            mount.trim_end_matches('/'),
            dir.trim_start_matches('/')
        )))
        .and(query_param("list", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "keys": keys }
        })))
        .mount(server)
        .await;
}

/// Serve the current version of a KV v2 leaf.
pub async fn mock_read(server: &MockServer, mount: &str, leaf: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/v1/{}/data/{}",
            mount.trim_end_matches('/'),
            leaf.trim_start_matches('/')
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "data": data,
                "metadata": { "version": 1, "destroyed": false, "deletion_time": "" }
            }
        })))
        .mount(server)
        .await;
}

/// Make GET `api_path` fail with `status`.
pub async fn mock_status(server: &MockServer, api_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(api_path))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(json!({ "errors": ["permission denied"] })),
        )
        .mount(server)
        .await;
}

/// The mount table of a dev-mode Vault with a few extra engines.
pub fn standard_mounts() -> Value {
    json!({
        "cubbyhole/": { "type": "cubbyhole", "description": "per-token private secret storage", "options": null },
        "empty/": { "type": "kv", "description": "", "options": { "version": "2" } },
        "legacy/": { "type": "kv", "description": "", "options": { "version": "1" } },
        "secret/": { "type": "kv", "description": "key/value secret storage", "options": { "version": "2" } },
        "sys/": { "type": "system", "description": "system endpoints", "options": null },
        "transit/": { "type": "transit", "description": "", "options": null }
    })
}

/// A complete server: accepted token, standard mounts and a small tree
/// under `secret/`:
///
/// ```text
/// secret/app/db   {user: admin, pass: "p@ss word"}
/// secret/empty/   (listed, but listing it answers 404)
/// secret/top      {token: "it's"}
/// ```
pub async fn standard_vault() -> MockServer {
    let server = MockServer::start().await;
    mock_token_ok(&server).await;
    mock_mounts(&server, standard_mounts()).await;
    mock_list(&server, "secret/", "/", &["app/", "empty/", "top"]).await;
    mock_list(&server, "secret/", "/app/", &["db"]).await;
    mock_read(
        &server,
        "secret/",
        "/app/db",
        json!({ "user": "admin", "pass": "p@ss word" }),
    )
    .await;
    mock_read(&server, "secret/", "/top", json!({ "token": "it's" })).await;
    server
}

/// What `standard_vault` dumps to, header excluded.
pub const STANDARD_DUMP: &str = "\
# No Secrets found in mount empty/ and path /
# KV version 1 mount legacy/ is not supported yet, skipping
vault kv put secret/app/db user=admin pass='p@ss word'
# No Secrets found in mount secret/ and path /empty/
vault kv put secret/top token='it'\"'\"'s'
";

/// Strip the 9-line header from a dump.
pub fn body(dump: &str) -> String {
    dump.lines().skip(9).map(|l| format!("{l}\n")).collect()
}
