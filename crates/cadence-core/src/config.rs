use anyhow::Result;
use config::Config;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CANDIDATES: u32 = 1000;
pub const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub recurrence: RecurrenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn serve_origin(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            self.serve_origin()
        }
    }

    /// Returns the socket address the listener binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Business policy for recurrence expansion.
///
/// Whether skipped or cancelled dates use up one of a booking's
/// `max_occurrences` slots is a product decision; both default to `false`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecurrenceConfig {
    pub skip_consumes_slot: bool,
    pub cancel_consumes_slot: bool,
    pub max_candidates: u32,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            skip_consumes_slot: false,
            cancel_consumes_slot: false,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `CADENCE_`-prefixed environment variables and an
    /// optional `config.toml` into a `Settings`. Nested keys are separated by `__`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Self::builder()?
            // CADENCE_RECURRENCE__SKIP_CONSUMES_SLOT -> recurrence.skip_consumes_slot
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Builds settings from defaults only, ignoring the environment.
    ///
    /// ## Errors
    /// Returns an error if the defaults fail to deserialize.
    pub fn defaults() -> Result<Self> {
        Ok(Self::builder()?.build()?.try_deserialize::<Self>()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("logging.level", "debug")?
            .set_default("recurrence.skip_consumes_slot", false)?
            .set_default("recurrence.cancel_consumes_slot", false)?
            .set_default(
                "recurrence.max_candidates",
                i64::from(DEFAULT_MAX_CANDIDATES),
            )?)
    }

    fn validate(&self) -> Result<()> {
        if self.recurrence.max_candidates == 0 {
            anyhow::bail!(crate::error::CoreError::ConfigError(
                "recurrence.max_candidates must be positive".to_string()
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(
        bind = %settings.server.bind_addr(),
        skip_consumes_slot = settings.recurrence.skip_consumes_slot,
        cancel_consumes_slot = settings.recurrence.cancel_consumes_slot,
        "Settings loaded"
    );
    Ok(settings)
}
