use futures::future::join_all;
use tracing::{debug, warn};

use crate::models::{SensorType, Station};
use crate::readers::StationReader;
use crate::source::SaihSource;

/// Stations fetched from one sensor-type catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub sensor_type: SensorType,
    pub stations: Vec<Station>,
    /// Set when the fetch failed and the catalog was degraded to empty.
    pub error: Option<String>,
}

impl Catalog {
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetches several station catalogs concurrently from one source.
///
/// All requests run as futures on the calling task and are joined at a single
/// point; each builds its own station list, so nothing is shared while they are
/// in flight. Dropping the returned future cancels every pending request.
pub struct ConcurrentReader;

impl ConcurrentReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the given catalogs, in the order requested.
    ///
    /// A failed fetch yields an empty, degraded [`Catalog`] and a warning; it
    /// never fails the whole read.
    pub async fn read_catalogs<S>(&self, source: &S, sensor_types: &[SensorType]) -> Vec<Catalog>
    where
        S: SaihSource + ?Sized,
    {
        let fetches = sensor_types
            .iter()
            .map(|&sensor_type| Self::read_catalog(source, sensor_type));

        join_all(fetches).await
    }

    async fn read_catalog<S>(source: &S, sensor_type: SensorType) -> Catalog
    where
        S: SaihSource + ?Sized,
    {
        match source.fetch_station_catalog(sensor_type).await {
            Ok(records) => {
                let stations = StationReader::for_sensor_type(sensor_type).read_catalog(&records);
                debug!(
                    sensor_type = %sensor_type,
                    stations = stations.len(),
                    "station catalog fetched"
                );
                Catalog {
                    sensor_type,
                    stations,
                    error: None,
                }
            }
            Err(e) => {
                warn!(
                    sensor_type = %sensor_type,
                    error = %e,
                    "station catalog unavailable, treating as empty"
                );
                Catalog {
                    sensor_type,
                    stations: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new()
    }
}
