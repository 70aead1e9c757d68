//! Structured logging for the Veld engine.
//!
//! Console output with uptime timestamps and module targets via the `tracing`
//! ecosystem, plus an optional JSON file layer in debug builds. The adaptive
//! quality controller has no user-visible error surface, so these diagnostics
//! are the only way to observe its decisions post hoc.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use veld_config::Config;

/// Initialize the tracing subscriber.
///
/// The filter is taken from `RUST_LOG` if set, otherwise from
/// `DebugConfig::log_level`, otherwise `info`. In debug builds, if `log_dir`
/// is given, a JSON file layer writes `veld.log` for post-mortem analysis.
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) {
    let filter_str = config
        .map(|c| c.debug.log_level.as_str())
        .filter(|level| !level.is_empty())
        .unwrap_or("info")
        .to_string();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if cfg!(debug_assertions) {
        if let Some(log_dir) = log_dir {
            if std::fs::create_dir_all(log_dir).is_ok() {
                if let Ok(log_file) = std::fs::File::create(log_dir.join("veld.log")) {
                    let file_layer = fmt::layer()
                        .with_writer(log_file)
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(fmt::time::uptime())
                        .json();
                    subscriber.with(file_layer).init();
                    return;
                }
            }
        }
    }

    subscriber.init();
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_info() {
        let filter = default_env_filter();
        assert!(format!("{filter}").contains("info"));
    }

    #[test]
    fn test_config_level_parses() {
        let mut config = Config::default();
        config.debug.log_level = "debug,veld_quality=trace".to_string();
        let filter = EnvFilter::try_new(&config.debug.log_level);
        assert!(filter.is_ok(), "config log level should parse");
    }

    #[test]
    fn test_log_dir_creation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("logs");
        std::fs::create_dir_all(&log_path).unwrap();
        assert!(log_path.is_dir());
    }
}
