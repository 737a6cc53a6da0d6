use std::{str::FromStr, time::Duration};

use crate::{
    engine::port::EngineConfig,
    error::{config::ConfigError, AppError},
    model::draft::{DraftDefaults, DEFAULT_REQUIRED_COUNT},
};

const DEFAULT_LOCATION: &str = "Great Temple of Balthazar - AE1";

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    pub ready_wait_minutes: u32,
    pub persist_debounce_seconds: u64,
    pub refresh_debounce_seconds: u64,
    pub ping_debounce_seconds: u64,
    pub flush_interval_minutes: u32,
    pub time_offset_minutes: i32,
    pub default_location: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Arguments
    /// - `lookup` - Returns the raw value of a variable, `None` when unset
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and all values parsed
    /// - `Err(AppError::ConfigErr)` - Missing required variable or unparseable value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            discord_bot_token: required(&lookup, "DISCORD_BOT_TOKEN")?,
            ready_wait_minutes: optional(&lookup, "DRAFT_READY_WAIT_MINUTES", 5)?,
            persist_debounce_seconds: optional(&lookup, "DRAFT_PERSIST_DEBOUNCE_SECONDS", 2)?,
            refresh_debounce_seconds: optional(&lookup, "DRAFT_REFRESH_DEBOUNCE_SECONDS", 5)?,
            ping_debounce_seconds: optional(&lookup, "DRAFT_PING_DEBOUNCE_SECONDS", 30)?,
            flush_interval_minutes: optional(&lookup, "DRAFT_FLUSH_INTERVAL_MINUTES", 5)?,
            time_offset_minutes: optional(&lookup, "DRAFT_TIME_OFFSET_MINUTES", 120)?,
            default_location: lookup("DRAFT_DEFAULT_LOCATION")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            persist_debounce: Duration::from_secs(self.persist_debounce_seconds),
            refresh_debounce: Duration::from_secs(self.refresh_debounce_seconds),
            ping_debounce: Duration::from_secs(self.ping_debounce_seconds),
        }
    }

    pub fn draft_defaults(&self) -> DraftDefaults {
        DraftDefaults {
            location: self.default_location.clone(),
            required_count: DEFAULT_REQUIRED_COUNT,
            ready_wait_minutes: self.ready_wait_minutes,
            time_offset_minutes: self.time_offset_minutes,
        }
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    lookup(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
        },
    }
}
