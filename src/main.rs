//! elf: console helpers for Git metadata, JSON validation, and key pairs.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use elf::config::Config;
use elf::constants;
use elf::env::Env;
use elf::git::RepositoryInfo;
use elf::json::{JsonError, JsonTool};
use elf::keys::KeyPairTool;

use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use serde::de::IgnoredAny;
use serde_json::Value;

use cli::args::{Cli, Command, JsonAction, KeyAction, NewKeyArgs, PublicKeyArgs};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();
    cli::init_logging(cli.verbose, &env);

    let cwd = std::env::current_dir().context("failed to determine the current directory")?;
    let config = Config::load(Some(&cwd), &env).context("failed to load configuration")?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Commit(args) => {
            let repo = repository(&config, &cwd)?;
            println!("{}", repo.commit(!args.long, args.path.as_deref())?);
            Ok(())
        }
        Command::Tag(args) => {
            let repo = repository(&config, &cwd)?;
            println!("{}", repo.tag(args.path.as_deref())?);
            Ok(())
        }
        Command::Json { action } => run_json(action, &config),
        Command::Key { action } => run_key(action, &config, &env),
        Command::Version => run_version(),
    }
}

/// Build the repository reader. The binary, unlike the library, treats the
/// current directory as the default when neither config nor env name one.
fn repository(config: &Config, cwd: &Path) -> Result<RepositoryInfo> {
    let mut git = config.git.clone();
    if git.default_path.is_none() {
        tracing::debug!(
            cwd = %cwd.display(),
            "no repository path configured, using the current directory"
        );
        git.default_path = Some(cwd.to_path_buf());
    }
    Ok(RepositoryInfo::new(git)?)
}

fn run_json(action: JsonAction, config: &Config) -> Result<()> {
    let tool = JsonTool::with_max_depth(config.json.max_depth);

    match action {
        JsonAction::Lint { file } => {
            tool.parse_file::<IgnoredAny>(&file)?;
            println!("  {} {}", "✔".green().bold(), file.display());
        }
        JsonAction::Validate { schema, file } => {
            let schema_value: Value = tool
                .parse_file(&schema)
                .with_context(|| format!("failed to load schema {}", schema.display()))?;
            let data: Value = tool.parse_file(&file)?;

            match tool.validate(&schema_value, &data) {
                Ok(()) => println!("  {} {}", "✔".green().bold(), file.display()),
                Err(JsonError::Schema { errors }) => {
                    println!("  {} {}", "✘".red().bold(), file.display());
                    for violation in &errors {
                        println!("      {violation}");
                    }
                    bail!(
                        "{} does not match {} ({} violation(s))",
                        file.display(),
                        schema.display(),
                        errors.len()
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

fn run_key(action: KeyAction, config: &Config, env: &Env) -> Result<()> {
    let tool = KeyPairTool::new();

    match action {
        KeyAction::Types => {
            for (name, key_type) in tool.supported_key_types() {
                println!("  {}  {}", name.bold(), key_type.oid().to_string().dimmed());
            }
            Ok(())
        }
        KeyAction::New(args) => run_key_new(&tool, args, config, env),
        KeyAction::Public(args) => run_key_public(&tool, args, env),
    }
}

fn run_key_new(tool: &KeyPairTool, args: NewKeyArgs, config: &Config, env: &Env) -> Result<()> {
    let passphrase = passphrase(args.passphrase_env.as_deref(), env)?;
    let key_type = args
        .key_type
        .or_else(|| config.keys.default_type.map(|t| t.to_string()));
    let bits = args.bits.or(config.keys.default_bits);

    match args.out {
        Some(path) => {
            tool.create_private_key_file(&path, passphrase.as_deref(), key_type.as_deref(), bits)?;
            eprintln!("  {} wrote {}", "✔".green().bold(), path.display());
        }
        None => {
            let pem = tool.create_private_key(passphrase.as_deref(), key_type.as_deref(), bits)?;
            print!("{pem}");
        }
    }
    Ok(())
}

fn run_key_public(tool: &KeyPairTool, args: PublicKeyArgs, env: &Env) -> Result<()> {
    let passphrase = passphrase(args.passphrase_env.as_deref(), env)?;
    let private = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    match args.out {
        Some(path) => {
            tool.extract_public_key_to_file(&path, &private, passphrase.as_deref())?;
            eprintln!("  {} wrote {}", "✔".green().bold(), path.display());
        }
        None => print!("{}", tool.extract_public_key(&private, passphrase.as_deref())?),
    }
    Ok(())
}

/// Read a passphrase from the named environment variable.
fn passphrase(var: Option<&str>, env: &Env) -> Result<Option<String>> {
    let Some(var) = var else {
        return Ok(None);
    };
    match env.var(var) {
        Some(value) => Ok(Some(value)),
        None => bail!("passphrase variable {var} is not set"),
    }
}

/// Print version and build information.
fn run_version() -> Result<()> {
    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn repository_falls_back_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&Config::default(), dir.path()).unwrap();
        assert_eq!(repo.default_path(), Some(dir.path()));
    }

    #[test]
    fn repository_prefers_configured_path() {
        let configured = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.git.default_path = Some(configured.path().to_path_buf());

        let repo = repository(&config, cwd.path()).unwrap();
        assert_eq!(repo.default_path(), Some(configured.path()));
    }

    #[test]
    fn repository_rejects_missing_configured_path() {
        let cwd = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.git.default_path = Some(PathBuf::from("/definitely/not/here"));

        let err = repository(&config, cwd.path()).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here"), "got: {err}");
    }
}
