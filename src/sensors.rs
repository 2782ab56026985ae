//! Sensor Façade: one entry point per sensor type for time-series queries.

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, warn};
use validator::Validate;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::{SensorData, SensorQuery, SensorType};
use crate::readers::TimeSeriesReader;
use crate::source::SaihSource;
use crate::utils::constants::KNOWN_TIME_GROUPINGS;

/// A time-series query bound to one sensor type.
///
/// ```
/// use chj_saih::models::{SensorQuery, SensorType};
/// use chj_saih::sensors::Sensor;
///
/// let sensor = Sensor::reservoir(SensorQuery::for_variable("E01A01"));
/// assert_eq!(sensor.sensor_type(), SensorType::Reservoir);
/// assert_eq!(sensor.result_key(), "reservoirData");
/// ```
#[derive(Debug, Clone)]
pub struct Sensor {
    sensor_type: SensorType,
    query: SensorQuery,
    reader: TimeSeriesReader,
}

impl Sensor {
    pub fn new(sensor_type: SensorType, query: SensorQuery) -> Self {
        Self {
            sensor_type,
            query,
            reader: TimeSeriesReader::new(),
        }
    }

    pub fn rain_gauge(query: SensorQuery) -> Self {
        Self::new(SensorType::RainGauge, query)
    }

    pub fn flow(query: SensorQuery) -> Self {
        Self::new(SensorType::Flow, query)
    }

    pub fn reservoir(query: SensorQuery) -> Self {
        Self::new(SensorType::Reservoir, query)
    }

    pub fn temperature(query: SensorQuery) -> Self {
        Self::new(SensorType::Temperature, query)
    }

    /// Use the date-format key and fallback format from a client configuration.
    pub fn with_config(mut self, config: &ClientConfig) -> Self {
        self.reader = self
            .reader
            .with_format_key(config.date_format_key.as_str())
            .with_default_format(config.default_date_format.as_str());
        self
    }

    /// Fallback date format for payloads that do not declare one.
    pub fn with_default_date_format(mut self, format: impl Into<String>) -> Self {
        self.reader = self.reader.with_default_format(format);
        self
    }

    /// Anchor year-less timestamps to `reference` instead of the current time.
    pub fn with_reference(mut self, reference: NaiveDateTime) -> Self {
        self.reader = self.reader.with_reference(reference);
        self
    }

    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    pub fn query(&self) -> &SensorQuery {
        &self.query
    }

    pub fn result_key(&self) -> &'static str {
        self.sensor_type.result_key()
    }

    /// Fetch and parse the series.
    ///
    /// Returns `Ok(None)` when the source fails or yields no payload. An
    /// invalid query is rejected before fetching, and a payload that cannot be
    /// parsed is an error.
    pub async fn get_data<S>(&self, source: &S) -> Result<Option<SensorData>>
    where
        S: SaihSource + ?Sized,
    {
        self.query.validate()?;

        if !KNOWN_TIME_GROUPINGS.contains(&self.query.time_grouping.as_str()) {
            warn!(
                grouping = %self.query.time_grouping,
                "unknown time grouping, passing it through"
            );
        }

        let payload = match source.fetch_sensor_payload(&self.query).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    sensor_type = %self.sensor_type,
                    query = %self.query,
                    error = %e,
                    "sensor data unavailable"
                );
                return Ok(None);
            }
        };

        if is_missing(&payload) {
            warn!(
                sensor_type = %self.sensor_type,
                query = %self.query,
                "upstream returned no payload"
            );
            return Ok(None);
        }

        let points = self.reader.extract(&payload)?;
        debug!(
            sensor_type = %self.sensor_type,
            query = %self.query,
            points = points.len(),
            "sensor data parsed"
        );

        Ok(Some(SensorData {
            sensor_type: self.sensor_type,
            query: self.query.clone(),
            points,
        }))
    }
}

fn is_missing(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Array(blocks) => blocks.is_empty(),
        _ => false,
    }
}
