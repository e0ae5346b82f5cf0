pub mod config;
pub mod error;

pub use config::{Config, LocationConfig, ThemeMode, UiConfig, ValidationResult, WeatherConfig};
pub use error::{ConfigError, StorageError};

use anyhow::Result;

/// Initialize logging for the application.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects between `debug` and `info`.
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("Wetter core initialized");
    Ok(())
}
