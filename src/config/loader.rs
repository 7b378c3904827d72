//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.elf.toml` in the working directory
//! 4. `~/.config/elf/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{self, DEFAULT_JSON_MAX_DEPTH};
use crate::env::Env;
use crate::git::GitConfig;
use crate::keys::KeyType;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub git: GitConfig,
    pub json: JsonSection,
    pub keys: KeySection,
}

/// JSON helper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonSection {
    pub max_depth: usize,
}

impl Default for JsonSection {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_JSON_MAX_DEPTH,
        }
    }
}

/// Key generation defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySection {
    pub default_type: Option<KeyType>,
    pub default_bits: Option<u32>,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads the global config, then `.elf.toml` in `working_dir`, then
    /// applies environment variable overrides.
    pub fn load(working_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        if let Some(dir) = working_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    ///
    /// A relative `git.default_path` is resolved against the file's directory.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        if let (Some(repo), Some(base)) = (config.git.default_path.as_mut(), path.parent()) {
            if repo.is_relative() {
                *repo = base.join(&*repo);
            }
        }

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        if other.git.default_path.is_some() {
            self.git.default_path = other.git.default_path;
        }
        if other.git.binary != GitConfig::default().binary {
            self.git.binary = other.git.binary;
        }

        if other.json.max_depth != JsonSection::default().max_depth {
            self.json.max_depth = other.json.max_depth;
        }

        if other.keys.default_type.is_some() {
            self.keys.default_type = other.keys.default_type;
        }
        if other.keys.default_bits.is_some() {
            self.keys.default_bits = other.keys.default_bits;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(path) = env.path(constants::ENV_GIT_PATH) {
            self.git.default_path = Some(path);
        }
        if let Some(binary) = env.var(constants::ENV_GIT_BINARY) {
            self.git.binary = binary;
        }

        if let Some(val) = env.var(constants::ENV_JSON_MAX_DEPTH) {
            match val.parse::<usize>() {
                Ok(depth) if depth > 0 => self.json.max_depth = depth,
                _ => tracing::warn!("ignoring invalid {} value: {val}", constants::ENV_JSON_MAX_DEPTH),
            }
        }

        if let Some(val) = env.var(constants::ENV_KEY_TYPE) {
            match val.parse::<KeyType>() {
                Ok(key_type) => self.keys.default_type = Some(key_type),
                Err(_) => tracing::warn!("ignoring invalid {} value: {val}", constants::ENV_KEY_TYPE),
            }
        }
        if let Some(val) = env.var(constants::ENV_KEY_BITS) {
            match val.parse::<u32>() {
                Ok(bits) => self.keys.default_bits = Some(bits),
                Err(_) => tracing::warn!("ignoring invalid {} value: {val}", constants::ENV_KEY_BITS),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn no_env() -> Env {
        Env::mock(Vec::<(&str, &str)>::new())
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.git.binary, "git");
        assert_eq!(config.git.default_path, None);
        assert_eq!(config.json.max_depth, 512);
        assert_eq!(config.keys.default_type, None);
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[git]
default_path = "/srv/repo"

[json]
max_depth = 64

[keys]
default_type = "ec"
default_bits = 384
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.git.default_path, Some(PathBuf::from("/srv/repo")));
        assert_eq!(config.git.binary, "git");
        assert_eq!(config.json.max_depth, 64);
        assert_eq!(config.keys.default_type, Some(KeyType::Ec));
        assert_eq!(config.keys.default_bits, Some(384));
    }

    #[test]
    fn merge_overrides_non_default_values() {
        let mut base = Config::default();
        let mut other = Config::default();
        other.git.default_path = Some(PathBuf::from("/srv/repo"));
        other.git.binary = "/usr/local/bin/git".to_string();
        other.json.max_depth = 32;
        other.keys.default_type = Some(KeyType::Ed25519);
        other.keys.default_bits = Some(256);

        base.merge(other.clone());

        assert_eq!(base, other);
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = Config::default();
        base.git.binary = "/opt/git".to_string();
        base.json.max_depth = 16;
        base.keys.default_type = Some(KeyType::Dsa);

        let expected = base.clone();
        base.merge(Config::default());

        assert_eq!(base, expected);
    }

    #[test]
    fn load_file_resolves_relative_repository_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        std::fs::write(&path, "[git]\ndefault_path = \"checkout\"\n").unwrap();

        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.git.default_path, Some(dir.path().join("checkout")));
    }

    #[test]
    fn load_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();

        let result = Config::load_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseFile { .. })));
    }

    #[test]
    fn load_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_file(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn load_from_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".elf.toml"),
            "[keys]\ndefault_type = \"ed25519\"\n",
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &no_env()).unwrap();
        assert_eq!(config.keys.default_type, Some(KeyType::Ed25519));
    }

    #[test]
    fn global_config_path_mentions_app() {
        if let Some(p) = Config::global_config_path() {
            assert!(p.to_str().unwrap().contains("elf"));
        }
    }

    #[test]
    fn apply_env_vars_overrides() {
        let env = Env::mock([
            ("ELF_GIT_PATH", "/work/repo"),
            ("ELF_GIT_BINARY", "git2"),
            ("ELF_JSON_MAX_DEPTH", "8"),
            ("ELF_KEY_TYPE", "EC"),
            ("ELF_KEY_BITS", "384"),
        ]);
        let mut config = Config::default();
        config.apply_env_vars(&env);

        assert_eq!(config.git.default_path, Some(PathBuf::from("/work/repo")));
        assert_eq!(config.git.binary, "git2");
        assert_eq!(config.json.max_depth, 8);
        assert_eq!(config.keys.default_type, Some(KeyType::Ec));
        assert_eq!(config.keys.default_bits, Some(384));
    }

    #[test]
    fn apply_env_vars_ignores_invalid_values() {
        let env = Env::mock([
            ("ELF_JSON_MAX_DEPTH", "0"),
            ("ELF_KEY_TYPE", "bogus"),
            ("ELF_KEY_BITS", "lots"),
        ]);
        let mut config = Config::default();
        config.apply_env_vars(&env);

        assert_eq!(config, Config::default());
    }
}
