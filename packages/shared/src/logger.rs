//! Logging setup utilities for the CrowdGuard binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter enables `crate_name` (the library crate of the caller) and the
/// binary itself at `default_log_level`, plus `tower_http` so request traces
/// show up. `RUST_LOG` overrides everything.
///
/// # Arguments
///
/// * `crate_name` - The library crate to enable (e.g., "crowdguard_server")
/// * `binary_name` - The name of the binary (e.g., "crowdguard-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use crowdguard_shared::logger::setup_logger;
///
/// setup_logger("crowdguard_server", "crowdguard-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(crate_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={level},{}={level},tower_http={level}",
        crate_name.replace('-', "_"),
        binary_name.replace('-', "_"),
        level = default_log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_crate_and_binary_names() {
        // テスト項目: クレート名・バイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let crate_name = "crowdguard-server";
        let binary_name = "crowdguard-server";

        // when (操作):
        let filter = default_filter(crate_name, binary_name, "info");

        // then (期待する結果):
        assert_eq!(
            filter,
            "crowdguard_server=info,crowdguard_server=info,tower_http=info"
        );
    }
}
