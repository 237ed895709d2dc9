//! Logging setup for the lobby signaling binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Logs from the server library and from the binary itself are enabled at
/// `default_log_level`. `RUST_LOG` overrides the whole filter when set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "lobby-signal-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use lobby_signal_shared::logger::setup_logger;
///
/// setup_logger("lobby-signal-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "lobby_signal_server={level},{bin}={level},tower_http={level}",
                    level = default_log_level,
                    bin = binary_name.replace('-', "_"),
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
