use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::error::{Result, SaihError};
use crate::models::SensorType;

/// External station identifier. The SAIH catalogs mix numeric and textual ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StationId {
    Number(i64),
    Text(String),
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationId::Number(n) => write!(f, "{}", n),
            StationId::Text(s) => f.write_str(s),
        }
    }
}

/// Alarm level published in a station's `estadoInt` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskLevel {
    Unknown = 0,
    Normal = 1,
    Warning = 2,
    Critical = 3,
}

impl RiskLevel {
    pub fn as_i64(&self) -> i64 {
        *self as i64
    }
}

impl TryFrom<i64> for RiskLevel {
    type Error = SaihError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(RiskLevel::Unknown),
            1 => Ok(RiskLevel::Normal),
            2 => Ok(RiskLevel::Warning),
            3 => Ok(RiskLevel::Critical),
            _ => Err(SaihError::InvalidRiskLevel(value)),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Unknown => "unknown",
            RiskLevel::Normal => "normal",
            RiskLevel::Warning => "warning",
            RiskLevel::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// A monitoring station as listed in one sensor-type catalog.
///
/// Every field except `name` may be absent upstream. Instances are snapshots:
/// they are rebuilt on every directory fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: Option<StationId>,

    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    pub variable: Option<String>,
    pub unit: Option<String>,
    pub basin_id: Option<i64>,
    pub status: Option<String>,
    pub status_code: Option<i64>,
    pub internal_status_code: Option<i64>,
    pub current_reading: Option<f64>,
    pub total_reading: Option<f64>,
    pub municipality: Option<String>,

    /// Catalog this entry came from, set by the directory fetch.
    pub sensor_type: Option<SensorType>,
}

impl Station {
    pub fn new(id: Option<StationId>, name: String) -> Self {
        Self {
            id,
            name,
            latitude: None,
            longitude: None,
            variable: None,
            unit: None,
            basin_id: None,
            status: None,
            status_code: None,
            internal_status_code: None,
            current_reading: None,
            total_reading: None,
            municipality: None,
            sensor_type: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_status_code(mut self, status_code: i64) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_basin(mut self, basin_id: i64) -> Self {
        self.basin_id = Some(basin_id);
        self
    }

    /// Coordinates usable for distance queries.
    ///
    /// `None` when either coordinate is missing, non-finite or out of range.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let (lat, lon) = (self.latitude?, self.longitude?);
        if !lat.is_finite() || !lon.is_finite() || self.validate().is_err() {
            return None;
        }
        Some((lat, lon))
    }

    pub fn is_locatable(&self) -> bool {
        self.coordinates().is_some()
    }

    /// The station's risk level, if its status code is within the published domain.
    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.status_code
            .and_then(|code| RiskLevel::try_from(code).ok())
    }

    /// Key used to order directory listings.
    pub fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Sort stations by lower-cased name, keeping the incoming order for equal names.
pub fn sort_by_name(stations: &mut [Station]) {
    stations.sort_by_cached_key(Station::sort_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_coordinates() {
        let station = Station::new(Some(StationId::Number(1)), "Embalse de Benagéber".to_string())
            .with_coordinates(39.7094, -1.0981);

        assert!(station.validate().is_ok());
        assert_eq!(station.coordinates(), Some((39.7094, -1.0981)));
    }

    #[test]
    fn test_invalid_or_missing_coordinates_are_unlocatable() {
        let out_of_range = Station::new(None, "Bad".to_string()).with_coordinates(91.0, 0.0);
        assert!(out_of_range.validate().is_err());
        assert!(!out_of_range.is_locatable());

        let mut half = Station::new(None, "Half".to_string());
        half.latitude = Some(39.0);
        assert!(!half.is_locatable());

        let nan = Station::new(None, "NaN".to_string()).with_coordinates(f64::NAN, 0.0);
        assert!(!nan.is_locatable());
    }

    #[test]
    fn test_risk_level_domain() {
        assert_eq!(RiskLevel::try_from(2).unwrap(), RiskLevel::Warning);
        assert!(matches!(
            RiskLevel::try_from(7),
            Err(SaihError::InvalidRiskLevel(7))
        ));

        let anomalous = Station::new(None, "X".to_string()).with_status_code(-1);
        assert_eq!(anomalous.risk_level(), None);
    }

    #[test]
    fn test_sort_by_name_is_case_insensitive_and_stable() {
        let mut stations = vec![
            Station::new(Some(StationId::Number(1)), "valencia".to_string()),
            Station::new(Some(StationId::Number(2)), "Alcoy".to_string()),
            Station::new(Some(StationId::Number(3)), "Valencia".to_string()),
            Station::new(Some(StationId::Number(4)), "alcoy".to_string()),
        ];
        sort_by_name(&mut stations);

        let ids: Vec<String> = stations
            .iter()
            .map(|s| s.id.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_station_id_display() {
        assert_eq!(StationId::Number(42).to_string(), "42");
        assert_eq!(StationId::Text("E01".to_string()).to_string(), "E01");
    }
}
