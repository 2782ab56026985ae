//! Client configuration.
//!
//! Built-in defaults, then an optional TOML file, then `SAIH_*` environment
//! variables (e.g. `SAIH_TIMEOUT_SECS=10`). The resulting value is validated
//! once and handed to the HTTP source; nothing reads it globally.

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    DATE_FORMAT_KEY, DEFAULT_DATE_FORMAT, DEFAULT_SENSOR_DATA_URL, DEFAULT_STATION_LIST_URL,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClientConfig {
    #[serde(default = "default_station_list_url")]
    #[validate(url)]
    pub station_list_url: String,

    #[serde(default = "default_sensor_data_url")]
    #[validate(url)]
    pub sensor_data_url: String,

    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1))]
    pub user_agent: String,

    /// Key of the date format inside a payload's time-axis block.
    #[serde(default = "default_date_format_key")]
    #[validate(length(min = 1))]
    pub date_format_key: String,

    /// Format used when a payload does not declare one.
    #[serde(default = "default_date_format")]
    #[validate(length(min = 1))]
    pub default_date_format: String,
}

impl ClientConfig {
    /// Load configuration from an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix("SAIH"));

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            station_list_url: default_station_list_url(),
            sensor_data_url: default_sensor_data_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            date_format_key: default_date_format_key(),
            default_date_format: default_date_format(),
        }
    }
}

fn default_station_list_url() -> String { DEFAULT_STATION_LIST_URL.into() }
fn default_sensor_data_url() -> String { DEFAULT_SENSOR_DATA_URL.into() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.into() }
fn default_date_format_key() -> String { DATE_FORMAT_KEY.into() }
fn default_date_format() -> String { DEFAULT_DATE_FORMAT.into() }
