//! Diagnostic logging to stderr.

use std::io;

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset.
const fn default_directive(debug: bool) -> &'static str {
    if debug { "ghaudit=debug" } else { "ghaudit=info" }
}

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over the `--debug` flag.
pub fn init(debug: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::default_directive;

    #[rstest]
    #[case(true, "ghaudit=debug")]
    #[case(false, "ghaudit=info")]
    fn debug_flag_selects_level(#[case] debug: bool, #[case] expected: &str) {
        assert_eq!(default_directive(debug), expected);
    }
}
