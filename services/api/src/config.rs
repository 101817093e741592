//! Service configuration
//!
//! Settings are layered with the `config` crate: built-in defaults, an
//! optional `health-assistant.{toml,yaml,json}` file in the working directory,
//! `HEALTH_ASSISTANT__*` environment variables (`__` separates nested keys),
//! and finally `OPENAI_API_KEY` / `ASSISTANT_ID` for the assistant credentials.
//! Database settings are read separately through
//! [`common::database::DatabaseConfig::from_env`].

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::{env, time::Duration};

/// Complete service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub assistant: AssistantSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// Socket address to bind, e.g. "0.0.0.0:8000"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Remote assistant settings
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantSettings {
    /// Provider API key; absence disables the assistant without failing startup
    pub api_key: Option<String>,
    /// Remote assistant (persona) identifier, expected to start with `asst_`
    pub assistant_id: String,
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub run_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl AssistantSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            assistant_id: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            poll_interval_ms: 500,
            run_timeout_secs: 60,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load the configuration from defaults, file and environment
    pub fn load() -> Result<Self> {
        let defaults = AssistantSettings::default();

        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("assistant.assistant_id", defaults.assistant_id)?
            .set_default("assistant.base_url", defaults.base_url)?
            .set_default("assistant.poll_interval_ms", defaults.poll_interval_ms)?
            .set_default("assistant.run_timeout_secs", defaults.run_timeout_secs)?
            .set_default("assistant.request_timeout_secs", defaults.request_timeout_secs)?
            .add_source(File::with_name("health-assistant").required(false))
            .add_source(
                Environment::with_prefix("HEALTH_ASSISTANT")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("assistant.api_key", non_empty_env("OPENAI_API_KEY"))?
            .set_override_option("assistant.assistant_id", non_empty_env("ASSISTANT_ID"))?
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Failed to parse configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.assistant.poll_interval_ms == 0 {
            anyhow::bail!("assistant.poll_interval_ms must be greater than zero");
        }
        if self.assistant.run_timeout_secs == 0 {
            anyhow::bail!("assistant.run_timeout_secs must be greater than zero");
        }
        if self.assistant.request_timeout_secs == 0 {
            anyhow::bail!("assistant.request_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
