//! Configuration loading and layering for the `elf` binary.
//!
//! Handles `.elf.toml` loading, environment variable resolution,
//! and CLI flag merging with proper priority ordering.

pub mod loader;

pub use loader::{Config, ConfigError, JsonSection, KeySection};
