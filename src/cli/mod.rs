//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::client::VaultClient;
use crate::config::{Settings, VaultConfig};
use crate::errors::Result;

/// vault-dump CLI: back up a Vault key/value tree as shell commands.
#[derive(Parser)]
#[command(
    name = "vault-dump",
    about = "Dump Vault key/value secrets as replayable `vault kv put` commands",
    version,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Options for the default `dump` command
    #[command(flatten)]
    pub dump: DumpArgs,

    /// Vault server URL (default: http://localhost:8200)
    #[arg(long, env = "VAULT_ADDR", global = true)]
    pub address: Option<String>,

    /// Vault token
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Vault Enterprise namespace
    #[arg(long, env = "VAULT_NAMESPACE", global = true)]
    pub namespace: Option<String>,

    /// Per-request timeout in seconds (default: 30)
    #[arg(long, env = "VAULT_HTTP_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Settings file (default: ./.vault-dump.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Clone, clap::Subcommand)]
pub enum Commands {
    /// Dump every key/value secret as `vault kv put` commands (default)
    Dump(DumpArgs),

    /// List mounted secrets engines and whether `dump` walks them
    Mounts,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, ignore_case = true)]
        shell: Shell,
    },
}

/// Options of the `dump` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DumpArgs {
    /// Only dump below this path, e.g. `secret/app/`
    #[arg(long, env = "TOP_VAULT_PREFIX")]
    pub prefix: Option<String>,

    /// Sort paths and fields instead of keeping Vault's order
    #[arg(long)]
    pub sort_keys: bool,

    /// Write the dump to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(long, requires = "output")]
    pub force: bool,
}

impl Cli {
    /// The command to run; a bare `vault-dump` means `dump`.
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Dump(self.dump.clone()))
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load the settings file named by `--config`, or the one in the
/// current directory.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(cli.config.as_deref(), &cwd)
}

/// Resolve connection parameters from flags, environment and settings.
pub fn vault_config(cli: &Cli, settings: &Settings) -> Result<VaultConfig> {
    VaultConfig::resolve(
        cli.address.as_deref(),
        cli.token.as_deref(),
        cli.namespace.as_deref(),
        cli.timeout,
        settings,
    )
}

/// Build a client and make sure Vault accepts its token.
pub fn connect(cli: &Cli, settings: &Settings) -> Result<VaultClient> {
    let config = vault_config(cli, settings)?;
    tracing::debug!(?config, "connecting");

    let client = VaultClient::new(config);
    client.verify_token()?;
    Ok(client)
}
