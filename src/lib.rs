//! elf: console helpers for Git metadata, JSON validation, and key pairs
//! (library crate).
//!
//! Each helper is independent: [`git::RepositoryInfo`], [`json::JsonTool`],
//! and [`keys::KeyPairTool`]. The `config` and `env` modules back the `elf`
//! binary and integration tests.

pub mod config;
pub mod constants;
pub mod env;
pub mod git;
pub mod json;
pub mod keys;
