use thiserror::Error;

/// All errors that can occur while dumping a Vault instance.
#[derive(Debug, Error)]
pub enum DumpError {
    // --- Session errors ---
    #[error("No Vault token supplied: set VAULT_TOKEN or pass --token")]
    MissingToken,

    #[error("Vault rejected the token: {0}")]
    NotAuthenticated(String),

    // --- Transport / API errors ---
    #[error("Vault request failed: {0}")]
    Http(String),

    #[error("Vault returned {status} for {path}: {message}")]
    Api {
        status: u16,
        path: String,
        message: String,
    },

    #[error("Invalid response from Vault: {0}")]
    InvalidResponse(String),

    /// Listing a path that does not exist. The walker downgrades this one
    /// to a comment in the dump; everywhere else it is fatal.
    #[error("Path not found: {0}")]
    PathNotFound(String),

    // --- Engine errors ---
    #[error("Mount '{mount}' has a malformed KV version: {detail}")]
    MalformedEngineVersion { mount: String, detail: String },

    #[error("No key/value mount matches prefix '{0}'")]
    PrefixNotMounted(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for vault-dump results.
pub type Result<T> = std::result::Result<T, DumpError>;
