//! Log sink setup.
//!
//! Entries go to an append-only file. If the file cannot be opened they go to
//! stderr instead, with one warning saying so. Debug mode adds a DEBUG-level
//! stderr layer on top.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uptimeguard_core::Config;

pub fn init(config: &Config) {
    let dir = config
        .log_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    let file_name = config
        .log_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "uptimeguard.log".to_string());

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir);

    let (file_layer, fallback) = match appender {
        Ok(writer) => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter);
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    // Debug mode already echoes everything to stderr.
    let console_layer = (fallback.is_some() && !config.debug).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(LevelFilter::INFO)
    });

    let debug_layer = config.debug.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(debug_layer)
        .init();

    if let Some(e) = fallback {
        tracing::warn!(
            path = %config.log_path.display(),
            error = %e,
            "Log file is not writable, logging to console"
        );
    }
}
