//! Tracing subscriber setup.

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Default filter for a verbosity level (`-v` count)
#[must_use]
pub const fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "selenium_compat=debug,info",
        _ => "selenium_compat=trace,debug",
    }
}

/// Install a stderr fmt subscriber.
///
/// `RUST_LOG` overrides the verbosity-derived filter. Returns `false` when a
/// global subscriber was already installed.
pub fn init_tracing(verbosity: u8) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "info");
        assert!(default_filter(2).contains("selenium_compat=debug"));
        assert!(default_filter(9).contains("selenium_compat=trace"));
    }

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing(0);
        assert!(!init_tracing(3));
    }
}
