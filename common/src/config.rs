//! Environment variable parsing helpers
//!
//! All tool configuration is injected from the environment: connection
//! parameters and credentials are never inlined in the tools themselves.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Extension trait for parsing environment variables.
///
/// Provides convenient methods for reading env vars with defaults, required values,
/// and type parsing.
pub trait ConfigExt {
    /// Get an environment variable with a default value.
    ///
    /// # Example
    /// ```ignore
    /// let schema = String::env_or("BACKEND_SCHEMA", "public");
    /// ```
    fn env_or(name: &str, default: &str) -> String {
        env::var(name).unwrap_or_else(|_| default.to_string())
    }

    /// Get a required environment variable, returning an error if not set.
    ///
    /// # Example
    /// ```ignore
    /// let url = String::env_required("SUPABASE_URL")?;
    /// ```
    fn env_required(name: &str) -> Result<String> {
        env::var(name).context(format!("{} must be set", name))
    }

    /// Get an environment variable as a boolean.
    ///
    /// Returns `true` if the value is "true" (case-insensitive), otherwise `default`.
    fn env_bool(name: &str, default: bool) -> bool {
        env::var(name)
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(default)
    }

    /// Get an environment variable parsed as a specific type.
    ///
    /// Returns `default` if the variable is not set or fails to parse.
    ///
    /// # Example
    /// ```ignore
    /// let timeout: u64 = u64::env_parse("BACKEND_TIMEOUT_SECS", 10);
    /// ```
    fn env_parse<T: FromStr>(name: &str, default: T) -> T {
        env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

// Blanket implementation for all types
impl<T> ConfigExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back() {
        env::remove_var("ADMIN_TEST_ENV_OR");
        assert_eq!(String::env_or("ADMIN_TEST_ENV_OR", "fallback"), "fallback");

        env::set_var("ADMIN_TEST_ENV_OR", "set");
        assert_eq!(String::env_or("ADMIN_TEST_ENV_OR", "fallback"), "set");
        env::remove_var("ADMIN_TEST_ENV_OR");
    }

    #[test]
    fn test_env_required_errors_when_missing() {
        env::remove_var("ADMIN_TEST_ENV_REQUIRED");
        let err = String::env_required("ADMIN_TEST_ENV_REQUIRED").unwrap_err();
        assert!(err.to_string().contains("ADMIN_TEST_ENV_REQUIRED"));
    }

    #[test]
    fn test_env_parse_ignores_garbage() {
        env::set_var("ADMIN_TEST_ENV_PARSE", "not-a-number");
        assert_eq!(u64::env_parse("ADMIN_TEST_ENV_PARSE", 10), 10);

        env::set_var("ADMIN_TEST_ENV_PARSE", "30");
        assert_eq!(u64::env_parse("ADMIN_TEST_ENV_PARSE", 10), 30);
        env::remove_var("ADMIN_TEST_ENV_PARSE");
    }

    #[test]
    fn test_env_bool() {
        env::set_var("ADMIN_TEST_ENV_BOOL", "TRUE");
        assert!(bool::env_bool("ADMIN_TEST_ENV_BOOL", false));

        env::set_var("ADMIN_TEST_ENV_BOOL", "0");
        assert!(!bool::env_bool("ADMIN_TEST_ENV_BOOL", true));
        env::remove_var("ADMIN_TEST_ENV_BOOL");
    }
}
