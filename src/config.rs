//! Configuration management for session-tokens.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Args;
use crate::crypt::SalterPolicy;
use crate::error::BuildError;
use crate::session::SessionStore;
use crate::store::{ExpiringStore, MemoryStore};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session store configuration.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Session store configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Token generation policy.
    pub policy: SalterPolicy,
    /// Static salt mixed into every token.
    pub salt: String,
    /// Session lifetime in milliseconds.
    pub ttl_ms: u64,
    /// Postpone expiry whenever a session is read or written.
    pub reset_on_access: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            policy: SalterPolicy::Secure,
            salt: String::new(),
            ttl_ms: 30 * 60 * 1000,
            reset_on_access: false,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(policy) = std::env::var("SESSION_TOKENS_POLICY") {
            if let Ok(policy) = policy.parse() {
                self.session.policy = policy;
            }
        }

        if let Ok(salt) = std::env::var("SESSION_TOKENS_SALT") {
            if !salt.is_empty() {
                self.session.salt = salt;
            }
        }

        if let Ok(ttl) = std::env::var("SESSION_TOKENS_TTL_MS") {
            if let Ok(ttl) = ttl.parse() {
                self.session.ttl_ms = ttl;
            }
        }

        if let Ok(level) = std::env::var("SESSION_TOKENS_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(policy) = args.policy {
            self.session.policy = policy;
        }

        if let Some(ref salt) = args.salt {
            self.session.salt = salt.clone();
        }

        if let Some(ttl) = args.ttl_ms {
            self.session.ttl_ms = ttl;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        config.apply_env();
        config.apply_args(args);

        config.validate()?;
        Ok(config)
    }

    /// Check values that cannot be expressed in the type system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.ttl_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "session.ttl_ms",
                self.session.ttl_ms.to_string(),
            ));
        }
        Ok(())
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.session.ttl_ms)
    }

    /// Create an in-memory store honouring the session section.
    pub fn memory_store<V>(&self) -> MemoryStore<V> {
        MemoryStore::new(self.ttl()).with_reset_on_access(self.session.reset_on_access)
    }

    /// Build a session store over `store` with the configured salter.
    pub fn session_store<V, S>(&self, store: S) -> Result<SessionStore<V>, BuildError>
    where
        S: ExpiringStore<V> + 'static,
    {
        SessionStore::builder()
            .salter(self.session.policy, self.session.salt.as_bytes())
            .store(store)
            .build()
    }

    /// Build a session store backed by a fresh in-memory store.
    ///
    /// The store handle is returned alongside so it can be swept or
    /// inspected.
    pub fn memory_session_store<V>(
        &self,
    ) -> Result<(SessionStore<V>, Arc<MemoryStore<V>>), BuildError>
    where
        V: Clone + Send + Sync + 'static,
    {
        let store = Arc::new(self.memory_store());
        let sessions = self.session_store(Arc::clone(&store))?;
        Ok((sessions, store))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    /// A value outside its accepted range.
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
