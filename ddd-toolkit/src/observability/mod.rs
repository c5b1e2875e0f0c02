//! Observability (logging)
//!
//! Structured logging for the toolkit and its CLI. Operator-facing progress
//! lines are printed by the CLI itself; tracing events carry the details.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging stack
///
/// Log level comes from `RUST_LOG`; without it only warnings are shown
/// (`debug` for the toolkit crates in debug builds).
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
///
/// # Example
///
/// ```rust,no_run
/// use ddd_toolkit::observability;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// observability::init(&observability::ObservabilityConfig::default())?;
/// tracing::info!("toolkit started");
/// # Ok(())
/// # }
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("warn,ddd_toolkit=debug,ddd_toolkit_cli_lib=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::debug!(service = %config.service_name, json = config.json, "logging initialized");
    Ok(())
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Name reported in log output
    pub service_name: String,

    /// Emit JSON log lines instead of human-readable ones
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "ddd-toolkit".to_string(),
            json: false,
        }
    }
}

impl ObservabilityConfig {
    /// Create new observability config
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Switch to JSON log lines
    #[must_use]
    pub const fn with_json(mut self) -> Self {
        self.json = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.service_name, "ddd-toolkit");
        assert!(!config.json);
    }

    #[test]
    fn test_builder() {
        let config = ObservabilityConfig::new("scaffold").with_json();

        assert_eq!(config.service_name, "scaffold");
        assert!(config.json);
    }
}
