//! Configuration — optional TOML settings file plus the resolved
//! connection parameters for the Vault client.

pub mod settings;

pub use settings::{Settings, VaultConfig, DEFAULT_ADDRESS};
