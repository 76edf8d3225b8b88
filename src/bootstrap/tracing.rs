//! Tracing configuration for SyncClip
//!
//! Two layers share one registry:
//!
//! - **File**: everything at the default level (debug in development, info in
//!   release) goes to `<data dir>/logs/syncclip.log` through a non-blocking writer.
//! - **Console**: warnings and errors only, on stderr, so log lines do not
//!   interleave with the interactive prompt.
//!
//! `RUST_LOG` overrides the directives of both layers. Records emitted with
//! the `log` macros (the platform crate uses them) are captured through the
//! `tracing-log` bridge that `tracing-subscriber` installs on init.

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "syncclip.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for the log file
///
/// ## Behavior / 行为
/// - **Development**: debug level for app crates
/// - **Production**: info level for app crates
/// - **mDNS**: info to keep discovery events, iface=off to drop per-interface send errors
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        "libp2p_mdns::behaviour::iface=off".to_string(), // Suppress iface send errors (No route to host)
        "libp2p_mdns=info".to_string(),
        "libp2p_swarm=info".to_string(),
        "multistream_select=info".to_string(),
        "yamux=info".to_string(),
        "hyper_util=info".to_string(),
        if is_dev {
            "sc_platform=debug"
        } else {
            "sc_platform=info"
        }
        .to_string(),
        if is_dev {
            "sc_infra=debug"
        } else {
            "sc_infra=info"
        }
        .to_string(),
    ]
}

fn build_console_directives() -> Vec<String> {
    vec![
        "warn".to_string(),
        "libp2p_mdns::behaviour::iface=off".to_string(),
    ]
}

fn env_filter_or(defaults: Vec<String>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(defaults.join(",")))
}

/// Initialize the global tracing subscriber
///
/// Call once, before the application is wired. A log directory that cannot
/// be created only disables the file layer.
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber(logs_dir: &Path) -> anyhow::Result<()> {
    let is_dev = is_development();

    let console_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(io::stderr)
        .with_filter(env_filter_or(build_console_directives()));

    let file_layer = match build_file_writer(logs_dir) {
        Ok(writer) => Some(
            fmt::layer()
                .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_ansi(false) // No ANSI colors in file logs
                .with_writer(writer)
                .with_filter(env_filter_or(build_filter_directives(is_dev))),
        ),
        Err(err) => {
            eprintln!("Failed to initialize file logging: {err}");
            None
        }
    };

    registry().with(console_layer).with(file_layer).try_init()?;

    Ok(())
}

fn build_file_writer(logs_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_directives() {
        let dev_directives = build_filter_directives(true);
        assert!(dev_directives.contains(&"debug".to_string()));
        assert!(dev_directives.contains(&"libp2p_mdns=info".to_string()));
        assert!(dev_directives.contains(&"libp2p_mdns::behaviour::iface=off".to_string()));
        assert!(dev_directives.contains(&"sc_platform=debug".to_string()));

        let prod_directives = build_filter_directives(false);
        assert!(prod_directives.contains(&"info".to_string()));
        assert!(prod_directives.contains(&"sc_infra=info".to_string()));
        assert!(!prod_directives.contains(&"debug".to_string()));
    }

    #[test]
    fn console_shows_warnings_only() {
        let directives = build_console_directives();
        assert_eq!(directives[0], "warn");
        assert!(EnvFilter::try_new(directives.join(",")).is_ok());
        assert!(EnvFilter::try_new(build_filter_directives(true).join(",")).is_ok());
    }
}
