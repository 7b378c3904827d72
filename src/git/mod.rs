//! Git repository metadata: current commit hash and nearest tag.
//!
//! Shells out to `git` via `std::process::Command`. Every query runs with
//! its working directory set to an explicitly resolved repository path.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_GIT_BINARY;

/// Errors from repository queries.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("{0}")]
    Configuration(String),

    #[error("The path \"{}\" is not a directory path or does not exist.", .0.display())]
    InvalidPath(PathBuf),

    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },

    /// Non-zero exit. `output` is stdout followed by stderr.
    #[error("{output}")]
    Command { output: String },
}

/// Settings for [`RepositoryInfo`]; the `[git]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Repository used when a query passes no explicit path.
    pub default_path: Option<PathBuf>,
    /// Executable to invoke.
    pub binary: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            default_path: None,
            binary: DEFAULT_GIT_BINARY.to_string(),
        }
    }
}

/// Reads commit and tag information from a Git working directory.
#[derive(Debug, Clone)]
pub struct RepositoryInfo {
    default_path: Option<PathBuf>,
    binary: String,
}

impl RepositoryInfo {
    /// Create a reader, validating `config.default_path` if one is given.
    pub fn new(config: GitConfig) -> Result<Self, GitError> {
        let mut info = Self {
            default_path: None,
            binary: config.binary,
        };
        info.set_default_path(config.default_path)?;
        Ok(info)
    }

    /// Set or clear the default repository path.
    ///
    /// A `Some` path must name an existing directory. On error the previous
    /// default is kept.
    pub fn set_default_path(&mut self, path: Option<PathBuf>) -> Result<(), GitError> {
        if let Some(ref p) = path {
            if !p.is_dir() {
                return Err(GitError::InvalidPath(p.clone()));
            }
        }
        self.default_path = path;
        Ok(())
    }

    pub fn default_path(&self) -> Option<&Path> {
        self.default_path.as_deref()
    }

    /// Return the hash of `HEAD`, abbreviated when `short` is set.
    pub fn commit(&self, short: bool, path: Option<&Path>) -> Result<String, GitError> {
        let format = if short { "--pretty=%h" } else { "--pretty=%H" };
        self.run(path, &["log", format, "-n1", "HEAD"])
    }

    /// Return the nearest tag reachable from `HEAD` (`git describe --tags`).
    pub fn tag(&self, path: Option<&Path>) -> Result<String, GitError> {
        self.run(path, &["describe", "--tags", "HEAD"])
    }

    /// Explicit argument, then the stored default. Never the process cwd.
    fn resolve_path<'a>(&'a self, path: Option<&'a Path>) -> Result<&'a Path, GitError> {
        path.or(self.default_path.as_deref()).ok_or_else(|| {
            GitError::Configuration("No default Git repository path set.".to_string())
        })
    }

    fn run(&self, path: Option<&Path>, args: &[&str]) -> Result<String, GitError> {
        let dir = self.resolve_path(path)?;
        tracing::debug!(binary = %self.binary, ?args, dir = %dir.display(), "running git");

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|source| GitError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            tracing::debug!(status = %output.status, "git exited with failure");
            return Err(GitError::Command {
                output: combined_output(&output),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}
