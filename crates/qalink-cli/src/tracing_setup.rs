//! Logging setup for the qalink binary
//!
//! Logs always go to stderr; stdout is reserved for the benchmark report.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "qalink_core=info,qalink=info";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub default_filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { default_filter: DEFAULT_FILTER.to_string(), json: false }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables
    pub fn from_environment() -> Self {
        Self {
            json: std::env::var("QALINK_LOG_JSON")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            ..Self::default()
        }
    }
}

/// Install the global subscriber
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.json {
        builder.json().try_init().map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;
    }
    Ok(())
}
