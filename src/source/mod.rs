//! Raw data collaborators.
//!
//! A [`SaihSource`] hands back upstream records untouched: station catalogs as
//! JSON objects and time-series payloads as the raw three-part JSON array.
//! Normalisation and parsing happen in [`crate::readers`].

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{SensorQuery, SensorType};

pub use http::HttpSource;

#[async_trait]
pub trait SaihSource: Send + Sync {
    /// Fetch the raw station records of one sensor-type catalog.
    async fn fetch_station_catalog(&self, sensor_type: SensorType) -> Result<Vec<Value>>;

    /// Fetch the raw time-series payload for a query.
    async fn fetch_sensor_payload(&self, query: &SensorQuery) -> Result<Value>;
}
