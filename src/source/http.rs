use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Result, SaihError};
use crate::models::{SensorQuery, SensorType};
use crate::source::SaihSource;

/// SAIH JSON API over one shared `reqwest` session.
///
/// The session lives as long as the source: create one per batch of requests
/// and drop it when the batch is over.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    config: ClientConfig,
}

impl HttpSource {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| SaihError::Config(format!("invalid user agent: {}", e)))?,
        );

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self.client.get(url).query(query).send().await?;
        let response = Self::check_status(response)?;
        Ok(response.json().await?)
    }

    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(SaihError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }
}

#[async_trait]
impl SaihSource for HttpSource {
    async fn fetch_station_catalog(&self, sensor_type: SensorType) -> Result<Vec<Value>> {
        debug!(sensor_type = %sensor_type, "requesting station catalog");
        let query = [
            ("t", sensor_type.catalog_code().to_string()),
            ("id", String::new()),
        ];

        match self.get_json(&self.config.station_list_url, &query).await? {
            Value::Array(records) => Ok(records),
            other => Err(SaihError::InvalidFormat(format!(
                "station catalog for {} is not a JSON array (got {})",
                sensor_type,
                json_kind(&other)
            ))),
        }
    }

    async fn fetch_sensor_payload(&self, query: &SensorQuery) -> Result<Value> {
        debug!(query = %query, "requesting sensor payload");
        let params = [
            ("v", query.variable.clone()),
            ("t", query.time_grouping.clone()),
            ("d", query.sample_count.to_string()),
        ];

        self.get_json(&self.config.sensor_data_url, &params).await
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_user_agent() {
        let config = ClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(HttpSource::new(config), Err(SaihError::Config(_))));
    }

    #[test]
    fn test_new_keeps_config() {
        let source = HttpSource::new(ClientConfig::default()).unwrap();
        assert_eq!(source.config().timeout_secs, 30);
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&Value::Null), "null");
        assert_eq!(json_kind(&serde_json::json!({"a": 1})), "an object");
    }
}
