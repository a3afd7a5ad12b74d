//! Optional subscriber setup for hosts that do not install their own.
//!
//! Everything in this crate logs through `tracing` macros; a host that
//! already has a subscriber simply never calls `setup_logging`.

use anyhow::Result;
use std::io::stderr;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Upper bound for events from other crates in the host process.
const DEPENDENCY_CEILING: LevelFilter = LevelFilter::WARN;

/// Maps a level name to a filter. Unknown names fall back to `error`.
pub fn parse_log_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::ERROR)
}

/// Workflow events at `level`, everything else at `level` or `warn`, whichever is quieter.
pub fn log_filter(level: LevelFilter) -> Targets {
    Targets::new()
        .with_default(level.min(DEPENDENCY_CEILING))
        .with_target(CRATE_TARGET, level)
}

/// Installs a stderr subscriber filtered by `log_filter`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn setup_logging(level: LevelFilter) -> Result<()> {
    //NOTE: stderr keeps stdout free for an embedding CLI that prints receipts.
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(log_filter(level));

    tracing_subscriber::registry()
        .with(terminal_log)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{log_filter, parse_log_level, setup_logging, CRATE_TARGET};
    use anyhow::Result;
    use tracing::level_filters::LevelFilter;
    use tracing::Level;

    #[test]
    fn test_parse_log_level_known_names() {
        assert_eq!(parse_log_level("trace"), LevelFilter::TRACE);
        assert_eq!(parse_log_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_log_level(" info "), LevelFilter::INFO);
        assert_eq!(parse_log_level("warn"), LevelFilter::WARN);
        assert_eq!(parse_log_level("off"), LevelFilter::OFF);
    }

    #[test]
    fn test_parse_log_level_defaults_to_error() {
        assert_eq!(parse_log_level("verbose"), LevelFilter::ERROR);
        assert_eq!(parse_log_level(""), LevelFilter::ERROR);
    }

    #[test]
    fn test_debug_level_applies_to_workflow_events_only() {
        let filter = log_filter(LevelFilter::DEBUG);

        assert!(filter.would_enable(&format!("{CRATE_TARGET}::workflow"), &Level::DEBUG));
        assert!(!filter.would_enable(&format!("{CRATE_TARGET}::workflow"), &Level::TRACE));
        assert!(filter.would_enable("moka::future", &Level::WARN));
        assert!(!filter.would_enable("moka::future", &Level::DEBUG));
    }

    #[test]
    fn test_quiet_level_is_not_raised_for_dependencies() {
        let filter = log_filter(LevelFilter::ERROR);

        assert!(!filter.would_enable("moka::future", &Level::WARN));
        assert!(!filter.would_enable(CRATE_TARGET, &Level::WARN));
        assert!(filter.would_enable(CRATE_TARGET, &Level::ERROR));
    }

    #[test]
    fn test_setup_logging_only_installs_once() -> Result<()> {
        setup_logging(LevelFilter::WARN)?;

        assert!(setup_logging(LevelFilter::DEBUG).is_err());

        Ok(())
    }
}
