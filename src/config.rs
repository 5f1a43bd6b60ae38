//! Configuration management for alertgate
//!
//! This module defines the `AlertConfig` struct holding all dispatcher
//! settings. It uses the `figment` crate to load configuration from an
//! `alertgate.toml` file and merge it with environment variables.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Settings for the alert dispatcher.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AlertConfig {
    /// Feishu webhook the collectors post to. An empty string selects the
    /// built-in default webhook.
    pub webhook_url: String,
    /// Whether this process runs in production. Stamped into panic alert
    /// messages.
    pub production: bool,
}

impl AlertConfig {
    /// Loads the dispatcher configuration from the specified file.
    ///
    /// # Arguments
    /// * `config_path` - The path to the TOML configuration file.
    pub fn load(config_path: &str) -> Result<Self> {
        let config: AlertConfig = Figment::new()
            .merge(Serialized::defaults(AlertConfig::default()))
            .merge(Toml::file(config_path))
            // Allow overriding with environment variables, e.g. ALERTGATE_PRODUCTION=true
            .merge(Env::prefixed("ALERTGATE_"))
            .extract()?;
        Ok(config)
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            production: false,
        }
    }
}
