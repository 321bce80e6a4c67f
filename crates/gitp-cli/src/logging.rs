// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the gitp CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging on stderr,
//! so command output on stdout stays machine-readable.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings from gitp, errors from dependencies
//! gitp issues list
//!
//! # Per-repository progress and batch summaries
//! gitp -v issues list
//!
//! # Debug output for troubleshooting
//! RUST_LOG=gitp=debug,octocrab=debug gitp issues list
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter directives, raised to `info` for gitp by `-v`.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "gitp=info,gitp_core=info,gitp_cli=info,octocrab=error,reqwest=error"
    } else {
        "gitp=warn,gitp_core=warn,gitp_cli=warn,octocrab=error,reqwest=error"
    }
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` takes precedence over the `-v` flag.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(default_filter(verbose)).is_ok());
        }
    }

    #[test]
    fn test_verbose_raises_gitp_level() {
        assert!(default_filter(true).starts_with("gitp=info"));
        assert!(default_filter(false).starts_with("gitp=warn"));
    }
}
