use crate::config::parameter;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment types for log level configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" | "testing" => Environment::Test,
            _ => Environment::Development,
        })
    }
}

fn parse_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Logging configuration for security-aware logging
#[derive(Debug)]
pub struct LoggingConfig {
    environment: Environment,
    log_level: Level,
}

impl LoggingConfig {
    /// Build the configuration from the loaded parameters
    pub fn from_parameters() -> Self {
        let environment = parameter::get_optional("ENV")
            .and_then(|s| s.parse().ok())
            .unwrap_or(Environment::Development);

        let log_level = parameter::get_optional("LOG_LEVEL")
            .and_then(|level| parse_level(&level))
            .unwrap_or(Level::INFO);

        Self {
            environment,
            log_level,
        }
    }

    /// Check if detailed error logging is allowed
    pub fn allow_detailed_errors(&self) -> bool {
        matches!(self.environment, Environment::Development) || self.log_level >= Level::DEBUG
    }

    /// Check if sensitive data logging is allowed
    pub fn allow_sensitive_data(&self) -> bool {
        matches!(self.environment, Environment::Development) && self.log_level >= Level::DEBUG
    }
}

static LOGGING_CONFIG: std::sync::OnceLock<LoggingConfig> = std::sync::OnceLock::new();

/// Install the global tracing subscriber. `RUST_LOG` wins over `LOG_LEVEL`.
pub fn init_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = parameter::get_optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Initialize global logging configuration
pub fn init() {
    if LOGGING_CONFIG.set(LoggingConfig::from_parameters()).is_err() {
        tracing::warn!("Logging configuration already initialized, skipping re-initialization");
        return;
    }

    let config = get_config();
    tracing::info!(
        "Logging configured: environment={:?}, level={:?}",
        config.environment,
        config.log_level
    );
}

/// Get global logging configuration, building it from parameters on first use
pub fn get_config() -> &'static LoggingConfig {
    LOGGING_CONFIG.get_or_init(LoggingConfig::from_parameters)
}

/// Security-aware logging macros
pub mod secure_log {

    /// Log errors with environment-aware detail level
    macro_rules! secure_error {
        ($message:expr) => {
            if $crate::config::logging::get_config().allow_detailed_errors() {
                tracing::error!("{}", $message);
            } else {
                tracing::error!("An internal error occurred");
            }
        };
        ($message:expr, $error:expr) => {
            if $crate::config::logging::get_config().allow_detailed_errors() {
                tracing::error!("{}: {}", $message, $error);
            } else {
                tracing::error!("{}: An internal error occurred", $message);
            }
        };
    }

    /// Log sensitive data only in development with debug level
    macro_rules! sensitive_debug {
        ($($arg:tt)*) => {
            if $crate::config::logging::get_config().allow_sensitive_data() {
                tracing::debug!($($arg)*);
            }
        };
    }

    pub(crate) use secure_error;
    pub(crate) use sensitive_debug;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("development".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("TEST".parse::<Environment>(), Ok(Environment::Test));
        assert_eq!("unknown".parse::<Environment>(), Ok(Environment::Development));
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(parse_level("Debug"), Some(Level::DEBUG));
        assert_eq!(parse_level("error"), Some(Level::ERROR));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_development_defaults() {
        let config = LoggingConfig {
            environment: Environment::Development,
            log_level: Level::INFO,
        };

        assert!(config.allow_detailed_errors());
        assert!(!config.allow_sensitive_data()); // INFO level doesn't allow sensitive data
    }

    #[test]
    fn test_production_restrictions() {
        let config = LoggingConfig {
            environment: Environment::Production,
            log_level: Level::INFO,
        };

        assert!(!config.allow_detailed_errors());
        assert!(!config.allow_sensitive_data());
    }

    #[test]
    fn test_production_debug_shows_errors_but_not_data() {
        let config = LoggingConfig {
            environment: Environment::Production,
            log_level: Level::DEBUG,
        };

        assert!(config.allow_detailed_errors());
        assert!(!config.allow_sensitive_data());
    }
}
