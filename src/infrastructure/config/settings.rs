//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. Every
//! section is optional; an empty file yields a working local setup.
//!
//! # Example
//!
//! ```no_run
//! use ordergate::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use super::broker::{ExchangeBrokerConfig, TopicBrokerConfig};
use super::logging::LoggingConfig;
use crate::adapter::outbound::sqlite::settings::StorageConfig;
use crate::application::event::producer::ProducerConfig;
use crate::application::processor::config::ProcessorConfig;
use crate::application::validation::config::ValidationConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`Config::database`].
pub const DATABASE_URL_ENV: &str = "ORDERGATE_DATABASE_URL";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// SQLite database path or `sqlite://` URL. `:memory:` for a throwaway
    /// database.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Connection pool settings.
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Customer detail checks.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Order types with a registered processor.
    #[serde(default)]
    pub processors: ProcessorConfig,

    #[serde(default)]
    pub topic_broker: TopicBrokerConfig,

    #[serde(default)]
    pub exchange_broker: ExchangeBrokerConfig,

    /// Per-sink publish retries.
    #[serde(default)]
    pub publisher: ProducerConfig,
}

fn default_database_path() -> String {
    "ordergate.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            validation: ValidationConfig::default(),
            processors: ProcessorConfig::default(),
            topic_broker: TopicBrokerConfig::default(),
            exchange_broker: ExchangeBrokerConfig::default(),
            publisher: ProducerConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// `ORDERGATE_DATABASE_URL` overrides the `database` key when set.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.database = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.storage.pool_size == 0 {
            return Err(invalid("pool_size", "must be greater than 0"));
        }
        if !self.logging.is_known_format() {
            return Err(invalid("format", "must be \"pretty\" or \"json\""));
        }
        if let Err(e) = Regex::new(&self.validation.phone_pattern) {
            return Err(invalid("phone_pattern", &e.to_string()));
        }
        if self.publisher.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be greater than 0"));
        }
        if self.publisher.publish_timeout_ms == 0 {
            return Err(invalid("publish_timeout_ms", "must be greater than 0"));
        }

        let topic = &self.topic_broker;
        require_name("topic_broker.placement_queue", &topic.placement_queue)?;
        require_name("topic_broker.dead_letter_queue", &topic.dead_letter_queue)?;
        require_name("topic_broker.event_topic", &topic.event_topic)?;
        if topic.placement_queue == topic.dead_letter_queue {
            return Err(invalid(
                "dead_letter_queue",
                "must differ from placement_queue",
            ));
        }
        if topic.concurrency == 0 {
            return Err(invalid("concurrency", "must be greater than 0"));
        }
        if topic.processing_timeout_ms == 0 {
            return Err(invalid("processing_timeout_ms", "must be greater than 0"));
        }

        let exchange = &self.exchange_broker;
        require_name("exchange_broker.exchange", &exchange.exchange)?;
        require_name("exchange_broker.placement_queue", &exchange.placement_queue)?;
        require_name(
            "exchange_broker.placement_routing_key",
            &exchange.placement_routing_key,
        )?;
        require_name(
            "exchange_broker.dead_letter_exchange",
            &exchange.dead_letter_exchange,
        )?;
        require_name("exchange_broker.dead_letter_queue", &exchange.dead_letter_queue)?;
        require_name(
            "exchange_broker.dead_letter_routing_key",
            &exchange.dead_letter_routing_key,
        )?;
        require_name("exchange_broker.health_check_queue", &exchange.health_check_queue)?;
        require_name("exchange_broker.event_exchange", &exchange.event_exchange)?;
        require_name("exchange_broker.event_routing_key", &exchange.event_routing_key)?;
        require_name("exchange_broker.event_queue", &exchange.event_queue)?;
        if exchange.exchange == exchange.dead_letter_exchange {
            return Err(invalid(
                "dead_letter_exchange",
                "must differ from the main exchange",
            ));
        }
        if exchange.concurrency == 0 {
            return Err(invalid("concurrency", "must be greater than 0"));
        }
        if exchange.processing_timeout_ms == 0 {
            return Err(invalid("processing_timeout_ms", "must be greater than 0"));
        }
        if exchange.event_queue_max_length == 0 {
            return Err(invalid("event_queue_max_length", "must be greater than 0"));
        }

        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[allow(clippy::result_large_err)]
fn require_name(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderType;
    use crate::error::Error;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.topic_broker.max_redeliveries, 1);
        assert!(!config.topic_broker.retry_permanent_errors);
        assert_eq!(config.exchange_broker.exchange, "order.exchange");
        assert_eq!(config.exchange_broker.dead_letter_exchange, "dlq.exchange");
        assert_eq!(config.exchange_broker.health_check_queue, "healthcheck");
        assert_eq!(config.publisher.max_attempts, 3);
        assert_eq!(
            config.processors.enabled,
            vec![OrderType::Online, OrderType::Offline]
        );
        assert!(!config.validation.enforce_total_amount);
    }

    #[test]
    fn sections_override_defaults() {
        let toml = r#"
            database = ":memory:"

            [validation]
            enforce_total_amount = true

            [processors]
            enabled = ["ONLINE", "IN_STORE"]

            [topic_broker]
            placement_queue = "in"
            dead_letter_queue = "in.dlq"
            max_redeliveries = 3
            retry_permanent_errors = true

            [publisher]
            max_attempts = 1
        "#;
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.database, ":memory:");
        assert!(config.validation.enforce_total_amount);
        assert_eq!(
            config.processors.enabled,
            vec![OrderType::Online, OrderType::InStore]
        );
        assert_eq!(config.topic_broker.policy().max_redeliveries, 3);
        assert!(config.topic_broker.policy().retry_permanent_errors);
        assert_eq!(config.publisher.max_attempts, 1);
    }

    #[test]
    fn empty_queue_name_is_missing_field() {
        let err = Config::parse_toml("[topic_broker]\nplacement_queue = \"\"").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField {
                field: "topic_broker.placement_queue"
            })
        ));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = Config::parse_toml("[exchange_broker]\nconcurrency = 0").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "concurrency",
                ..
            })
        ));
    }

    #[test]
    fn bad_phone_pattern_is_rejected() {
        let err = Config::parse_toml("[validation]\nphone_pattern = \"(\"").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "phone_pattern",
                ..
            })
        ));
    }

    #[test]
    fn unknown_order_type_fails_to_parse() {
        let err = Config::parse_toml("[processors]\nenabled = [\"MAIL\"]").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
