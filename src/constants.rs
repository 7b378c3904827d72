//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and helper defaults so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "elf";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target triple the binary was built for (set by `build.rs`).
pub const TARGET: &str = env!("TARGET");

/// Local config filename (e.g. `.elf.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".elf.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "elf";

/// Executable used for repository queries when none is configured.
pub const DEFAULT_GIT_BINARY: &str = "git";

/// Maximum JSON nesting depth accepted by the parser.
pub const DEFAULT_JSON_MAX_DEPTH: usize = 512;

/// PBKDF2 iteration count for passphrase-protected private keys.
pub const PBKDF2_ITERATIONS: u32 = 2048;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_LOG: &str = "ELF_LOG";
pub const ENV_GIT_PATH: &str = "ELF_GIT_PATH";
pub const ENV_GIT_BINARY: &str = "ELF_GIT_BINARY";
pub const ENV_JSON_MAX_DEPTH: &str = "ELF_JSON_MAX_DEPTH";
pub const ENV_KEY_TYPE: &str = "ELF_KEY_TYPE";
pub const ENV_KEY_BITS: &str = "ELF_KEY_BITS";
