//! Command-line arguments and the stderr `tracing` subscriber for the `elf`
//! binary.

pub mod args;

use elf::constants::ENV_LOG;
use elf::env::Env;

/// Filter directive for the given `-v` count.
fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `ELF_LOG` (an `EnvFilter` directive) takes precedence over `-v`. If a
/// subscriber is already installed it is kept.
pub fn init_logging(verbose: u8, env: &Env) {
    let filter = env
        .var(ENV_LOG)
        .unwrap_or_else(|| format!("elf={}", level_for(verbose)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "debug");
        assert_eq!(level_for(5), "trace");
    }

    #[test]
    fn repeated_init_keeps_first_subscriber() {
        let env = Env::real();
        init_logging(0, &env);
        init_logging(2, &env);
        assert!(tracing::dispatcher::has_been_set());
    }
}
