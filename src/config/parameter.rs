use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{error, info, warn};

static CONFIG: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Default configuration values
const DEFAULTS: &[(&str, &str)] = &[
    ("SERVER_ADDRESS", "127.0.0.1"),
    ("SERVER_PORT", "8081"),
    ("ENV", "development"),
    ("LOG_LEVEL", "info"),
    // Password storage: "legacy" (reversible base64) or "bcrypt"
    ("PASSWORD_SCHEME", "legacy"),
    ("BCRYPT_COST", "12"),
    ("DB_RUN_MIGRATIONS", "false"),
];

/// Keys read from the environment when present, with no default
const OPTIONAL: &[&str] = &[
    "DATABASE_URL",
    "DB_MAX_CONNECTIONS",
    "DB_MIN_CONNECTIONS",
    "DB_ACQUIRE_TIMEOUT_SECONDS",
    "DB_IDLE_TIMEOUT_SECONDS",
    "DB_MAX_LIFETIME_SECONDS",
];

pub fn init() {
    match dotenv::dotenv() {
        Ok(path) => info!("Loaded environment file: {:?}", path),
        Err(_) => warn!("No .env file found, using system environment variables"),
    }

    let config = build(|key| std::env::var(key).ok());

    if CONFIG.set(config).is_err() {
        error!("Configuration already initialized");
    } else {
        info!("Configuration initialized successfully");
    }
}

/// Merge defaults with whatever `lookup` yields for the known keys.
fn build(lookup: impl Fn(&str) -> Option<String>) -> HashMap<String, String> {
    let mut config = HashMap::new();

    for (key, value) in DEFAULTS {
        let value = lookup(key).unwrap_or_else(|| value.to_string());
        config.insert(key.to_string(), value);
    }

    for key in OPTIONAL {
        if let Some(value) = lookup(key) {
            config.insert(key.to_string(), value);
        }
    }

    config
}

pub fn get(parameter: &str) -> String {
    get_optional(parameter).unwrap_or_else(|| {
        error!("Configuration parameter '{}' not found", parameter);
        panic!("Required configuration parameter '{}' is missing", parameter);
    })
}

/// Falls back to the built-in default when the configuration has not been
/// initialized, so library code and tests see the same values as a fresh boot.
pub fn get_optional(parameter: &str) -> Option<String> {
    match CONFIG.get() {
        Some(config) => config.get(parameter).cloned(),
        None => DEFAULTS
            .iter()
            .find(|(key, _)| *key == parameter)
            .map(|(_, value)| value.to_string()),
    }
}

pub fn get_bool(parameter: &str) -> bool {
    parse_bool(&get(parameter))
}

pub fn get_u64(parameter: &str) -> u64 {
    let value = get(parameter);
    value.parse::<u64>().unwrap_or_else(|_| {
        error!("Configuration parameter '{}' is not a valid u64: {}", parameter, value);
        panic!("Configuration parameter '{}' is not a valid u64", parameter);
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_uses_defaults_when_env_is_empty() {
        let config = build(|_| None);

        assert_eq!(config.get("SERVER_PORT").map(String::as_str), Some("8081"));
        assert_eq!(config.get("PASSWORD_SCHEME").map(String::as_str), Some("legacy"));
        assert!(!config.contains_key("DATABASE_URL"));
    }

    #[test]
    fn test_build_prefers_environment_values() {
        let config = build(|key| match key {
            "SERVER_PORT" => Some("9000".to_string()),
            "DATABASE_URL" => Some("postgres://localhost/users".to_string()),
            _ => None,
        });

        assert_eq!(config.get("SERVER_PORT").map(String::as_str), Some("9000"));
        assert_eq!(
            config.get("DATABASE_URL").map(String::as_str),
            Some("postgres://localhost/users")
        );
        assert_eq!(config.get("LOG_LEVEL").map(String::as_str), Some("info"));
    }

    #[test]
    fn test_build_ignores_unknown_keys() {
        let config = build(|key| (key == "SOMETHING_ELSE").then(|| "x".to_string()));
        assert!(!config.contains_key("SOMETHING_ELSE"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("ON"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("nope"));
    }
}
