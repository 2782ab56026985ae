//! Directory Aggregator: station listings and filtered views over one source.

use tracing::debug;

use crate::error::Result;
use crate::models::{SensorType, Station};
use crate::processors::{BasinFilter, DataMerger, GeoFilter, RiskFilter};
use crate::readers::{Catalog, ConcurrentReader};
use crate::source::SaihSource;

/// Station directory bound to one raw-fetch source.
///
/// Every query fetches fresh catalogs; nothing is cached between calls.
pub struct StationDirectory<S> {
    source: S,
    reader: ConcurrentReader,
    merger: DataMerger,
}

impl<S: SaihSource> StationDirectory<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            reader: ConcurrentReader::new(),
            merger: DataMerger::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Per-type catalogs, including degraded ones.
    pub async fn catalogs(&self, sensor_types: &[SensorType]) -> Vec<Catalog> {
        self.reader.read_catalogs(&self.source, sensor_types).await
    }

    /// Merged, name-sorted listing for already-validated sensor types.
    ///
    /// A catalog that cannot be fetched contributes nothing; the call itself
    /// never fails.
    pub async fn list(&self, sensor_types: &[SensorType]) -> Vec<Station> {
        let catalogs = self.catalogs(sensor_types).await;
        self.merger.merge_catalogs(catalogs)
    }

    /// List stations for a set of sensor-type tokens (`all` expands to every type).
    pub async fn list_stations<I, T>(&self, tokens: I) -> Result<Vec<Station>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let sensor_types = SensorType::parse_selection(tokens)?;
        Ok(self.list(&sensor_types).await)
    }

    /// Stations within `radius_km` of a centre point, by geodesic distance.
    ///
    /// Tokens and the centre are validated before anything is fetched.
    pub async fn stations_near<I, T>(
        &self,
        tokens: I,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<Station>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let sensor_types = SensorType::parse_selection(tokens)?;
        let filter = GeoFilter::new(latitude, longitude, radius_km)?;
        Ok(self.within(&sensor_types, &filter).await)
    }

    /// Stations matching a prebuilt [`GeoFilter`], e.g. one with a spherical model.
    pub async fn stations_within<I, T>(&self, tokens: I, filter: &GeoFilter) -> Result<Vec<Station>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let sensor_types = SensorType::parse_selection(tokens)?;
        Ok(self.within(&sensor_types, filter).await)
    }

    async fn within(&self, sensor_types: &[SensorType], filter: &GeoFilter) -> Vec<Station> {
        let stations = self.list(sensor_types).await;
        let within = filter.filter(&stations);
        debug!(
            candidates = stations.len(),
            within = within.len(),
            radius_km = filter.radius_km(),
            "radius query"
        );
        within
    }

    pub async fn stations_by_risk<I, T>(&self, tokens: I, filter: RiskFilter) -> Result<Vec<Station>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let sensor_types = SensorType::parse_selection(tokens)?;
        let stations = self.list(&sensor_types).await;
        Ok(filter.filter(&stations))
    }

    pub async fn stations_in_basin<I, T>(&self, tokens: I, basin_id: i64) -> Result<Vec<Station>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let sensor_types = SensorType::parse_selection(tokens)?;
        let stations = self.list(&sensor_types).await;
        Ok(BasinFilter::new(basin_id).filter(&stations))
    }
}
