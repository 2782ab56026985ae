use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::{Result, SaihError};
use crate::utils::constants::{DEFAULT_SAMPLE_COUNT, DEFAULT_TIME_GROUPING, SENSOR_TYPE_ALL};

/// The four station catalogs published by the SAIH network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorType {
    RainGauge,
    Flow,
    Reservoir,
    Temperature,
}

impl SensorType {
    pub const ALL: [SensorType; 4] = [
        SensorType::RainGauge,
        SensorType::Flow,
        SensorType::Reservoir,
        SensorType::Temperature,
    ];

    /// Value of the `t` query parameter of the station-list endpoint.
    pub fn catalog_code(&self) -> &'static str {
        match self {
            SensorType::RainGauge => "p",
            SensorType::Flow => "a",
            SensorType::Reservoir => "e",
            SensorType::Temperature => "t",
        }
    }

    /// Key under which a parsed time series is published.
    pub fn result_key(&self) -> &'static str {
        match self {
            SensorType::RainGauge => "rainfallData",
            SensorType::Flow => "flowData",
            SensorType::Reservoir => "reservoirData",
            SensorType::Temperature => "temperatureData",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorType::RainGauge => "rain",
            SensorType::Flow => "flow",
            SensorType::Reservoir => "reservoir",
            SensorType::Temperature => "temperature",
        }
    }

    /// Parse a list of sensor-type tokens, expanding `all`.
    ///
    /// Duplicates collapse onto their first occurrence. An unknown token or an
    /// empty selection is rejected.
    ///
    /// # Examples
    /// ```
    /// use chj_saih::models::SensorType;
    ///
    /// let types = SensorType::parse_selection(["all"]).unwrap();
    /// assert_eq!(types, SensorType::ALL.to_vec());
    ///
    /// assert!(SensorType::parse_selection(["snow"]).is_err());
    /// ```
    pub fn parse_selection<I, T>(tokens: I) -> Result<Vec<SensorType>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut selected: Vec<SensorType> = Vec::with_capacity(SensorType::ALL.len());

        for token in tokens {
            let token = token.as_ref().trim();
            let expanded: Vec<SensorType> = if token.eq_ignore_ascii_case(SENSOR_TYPE_ALL) {
                SensorType::ALL.to_vec()
            } else {
                vec![token.parse()?]
            };

            for sensor_type in expanded {
                if !selected.contains(&sensor_type) {
                    selected.push(sensor_type);
                }
            }
        }

        if selected.is_empty() {
            return Err(SaihError::InvalidSensorType(String::new()));
        }

        Ok(selected)
    }
}

impl FromStr for SensorType {
    type Err = SaihError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rain" | "raingauge" | "rain_gauge" | "p" => Ok(SensorType::RainGauge),
            "flow" | "a" => Ok(SensorType::Flow),
            "reservoir" | "e" => Ok(SensorType::Reservoir),
            "temperature" | "temp" | "t" => Ok(SensorType::Temperature),
            _ => Err(SaihError::InvalidSensorType(s.to_string())),
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable descriptor of a time-series request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SensorQuery {
    #[validate(length(min = 1))]
    pub variable: String,

    #[validate(length(min = 1))]
    pub time_grouping: String,

    #[validate(range(min = 1))]
    pub sample_count: u32,
}

impl SensorQuery {
    pub fn new(variable: impl Into<String>, time_grouping: impl Into<String>, sample_count: u32) -> Self {
        Self {
            variable: variable.into(),
            time_grouping: time_grouping.into(),
            sample_count,
        }
    }

    /// Query the default window (last 30 five-minute samples) of a variable.
    pub fn for_variable(variable: impl Into<String>) -> Self {
        Self::new(variable, DEFAULT_TIME_GROUPING, DEFAULT_SAMPLE_COUNT)
    }
}

impl fmt::Display for SensorQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} x{})",
            self.variable, self.time_grouping, self.sample_count
        )
    }
}
