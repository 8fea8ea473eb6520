//! Logging setup
//!
//! Logs go to the configured file, or stderr when none is set. The level
//! applies to both wordlink crates.

use std::fs::OpenOptions;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use wordlink_core::Config;

/// Install the global subscriber
pub fn init(config: &Config) {
    let log_level = config.log_level();
    let env_filter = EnvFilter::new(filter_directive(log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    // Ignore errors if a subscriber is already installed
    match &config.log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let _ = builder.with_ansi(false).with_writer(file).try_init();
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                let _ = builder.with_writer(std::io::stderr).try_init();
            }
        },
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }

    debug!("Logging initialized at level {}", log_level);
}

fn filter_directive(log_level: &str) -> String {
    format!("wordlink_core={},wordlink_cli={}", log_level, log_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(
            filter_directive("debug"),
            "wordlink_core=debug,wordlink_cli=debug"
        );
    }
}
