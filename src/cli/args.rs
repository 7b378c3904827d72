//! Clap argument types.

use clap::Parser;
use std::path::PathBuf;

/// Git metadata, JSON validation, and key-pair helpers.
#[derive(Parser, Debug)]
#[command(name = "elf", version = elf::constants::VERSION)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `ELF_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the commit hash of HEAD.
    Commit(CommitArgs),

    /// Print the nearest tag reachable from HEAD.
    Tag(TagArgs),

    /// Check and validate JSON files.
    Json {
        #[command(subcommand)]
        action: JsonAction,
    },

    /// Generate private keys and extract public keys.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Print version and build information.
    Version,
}

/// Arguments for the `commit` subcommand.
#[derive(Parser, Debug)]
pub struct CommitArgs {
    /// Print the full hash instead of the abbreviated one.
    #[arg(long, default_value_t = false)]
    pub long: bool,

    /// Repository directory (default: configured path, then the current directory).
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Arguments for the `tag` subcommand.
#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Repository directory (default: configured path, then the current directory).
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// JSON subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum JsonAction {
    /// Check the syntax of a JSON file.
    Lint {
        /// File to check.
        file: PathBuf,
    },
    /// Validate a JSON file against a JSON Schema.
    Validate {
        /// Schema file.
        #[arg(long)]
        schema: PathBuf,
        /// File to validate.
        file: PathBuf,
    },
}

/// Key subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum KeyAction {
    /// List the supported key types.
    Types,
    /// Generate a new private key.
    New(NewKeyArgs),
    /// Extract the public key from a private key file.
    Public(PublicKeyArgs),
}

/// Arguments for `key new`.
#[derive(Parser, Debug)]
pub struct NewKeyArgs {
    /// Key type: rsa, dsa, ec, ed25519 (default: config, then rsa).
    #[arg(long = "type")]
    pub key_type: Option<String>,

    /// Key size in bits (default: config, then the algorithm default).
    #[arg(long)]
    pub bits: Option<u32>,

    /// Write the key to this file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Environment variable holding the passphrase used to encrypt the key.
    #[arg(long)]
    pub passphrase_env: Option<String>,
}

/// Arguments for `key public`.
#[derive(Parser, Debug)]
pub struct PublicKeyArgs {
    /// PEM private key file.
    pub file: PathBuf,

    /// Write the public key to this file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Environment variable holding the private key passphrase.
    #[arg(long)]
    pub passphrase_env: Option<String>,
}
