//! Logging setup utilities for the Rogue AI client.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for the client library crate and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "rogueai-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use rogueai_shared::logger::setup_logger;
///
/// setup_logger("rogueai-client", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// Targets are module paths, so dashes in crate and binary names become underscores.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "rogueai_client={level},rogueai_shared={level},{bin}={level}",
        level = default_log_level,
        bin = binary_name.replace('-', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_library_and_binary() {
        // テスト項目: デフォルトのフィルタがライブラリとバイナリの両方を対象にする
        // given (前提条件):
        let binary_name = "rogueai-client";

        // when (操作):
        let filter = default_filter(binary_name, "debug");

        // then (期待する結果):
        assert!(filter.contains("rogueai_client=debug"));
        assert!(filter.contains("rogueai_shared=debug"));
        assert!(!filter.contains('-'));
    }
}
