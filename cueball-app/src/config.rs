//! Application configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use cueball_exec::PoolConfig;

use crate::error::{AppError, AppResult};

// =============================================================================
// Configuration
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Worker pool sizing
    pub pool: PoolConfig,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment
    Test,
    /// Development environment
    Development,
    /// Production environment (JSON logs)
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_environment()?;
        let pool = Self::load_pool_config()?;

        Ok(Self { pool, environment })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            pool: PoolConfig {
                core_size: 1,
                max_size: 2,
                keep_alive: Duration::from_secs(1),
                thread_name_prefix: "cueball-test-".to_string(),
            },
            environment: Environment::Test,
        }
    }

    fn load_environment() -> AppResult<Environment> {
        let env_str = env::var("CUEBALL_ENV").unwrap_or_else(|_| "development".to_string());
        parse_environment(&env_str)
    }

    fn load_pool_config() -> AppResult<PoolConfig> {
        let defaults = PoolConfig::default();

        let core_size = Self::load_env("CUEBALL_POOL_CORE_SIZE", defaults.core_size)?;
        let max_size = Self::load_env("CUEBALL_POOL_MAX_SIZE", defaults.max_size)?;
        let keep_alive_secs =
            Self::load_env("CUEBALL_POOL_KEEP_ALIVE_SECS", defaults.keep_alive.as_secs())?;
        let thread_name_prefix =
            env::var("CUEBALL_THREAD_NAME_PREFIX").unwrap_or(defaults.thread_name_prefix);

        let pool = PoolConfig {
            core_size,
            max_size,
            keep_alive: Duration::from_secs(keep_alive_secs),
            thread_name_prefix,
        };
        pool.validate().map_err(|e| AppError::Config(e.to_string()))?;
        Ok(pool)
    }

    fn load_env<T: FromStr>(key: &str, default: T) -> AppResult<T> {
        parse_var(key, env::var(key).ok(), default)
    }
}

fn parse_environment(value: &str) -> AppResult<Environment> {
    match value.to_lowercase().as_str() {
        "test" => Ok(Environment::Test),
        "development" | "dev" => Ok(Environment::Development),
        "production" | "prod" => Ok(Environment::Production),
        other => Err(AppError::Config(format!(
            "Invalid CUEBALL_ENV: {}. Expected: test, development, production",
            other
        ))),
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>, default: T) -> AppResult<T> {
    match value {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid {} value: {}", key, val))),
        None => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            environment: Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
