use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Name of the optional TOML configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "recurrent.toml";

/// Prefix for environment overrides, e.g. `RECURRENT_EXPANSION__MAX_INSTANCES=50`.
pub const ENV_PREFIX: &str = "RECURRENT";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub expansion: ExpansionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    /// Upper bound on occurrences produced for a single rule.
    pub max_instances: usize,
    /// Timezone applied to start timestamps that carry no zone of their own.
    pub default_tzid: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, environment variables and `recurrent.toml`.
    /// Environment variables take precedence over the file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating the result fails.
    pub fn load() -> CoreResult<Self> {
        let settings = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("expansion.max_instances", 1000)?
            .set_default("expansion.default_tzid", "UTC")?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks the invariants deserialization cannot express.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if `expansion.max_instances` is zero
    /// or `expansion.default_tzid` is blank.
    pub fn validate(&self) -> CoreResult<()> {
        if self.expansion.max_instances == 0 {
            return Err(CoreError::InvalidInput(
                "expansion.max_instances must be positive".to_string(),
            ));
        }
        if self.expansion.default_tzid.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "expansion.default_tzid must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` and `recurrent.toml`.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(settings = ?settings, "Configuration loaded");
    Ok(settings)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
