use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::{SensorQuery, SensorType};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A parsed time series, published under its sensor type's result key.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorData {
    pub sensor_type: SensorType,
    pub query: SensorQuery,
    pub points: Vec<TimeSeriesPoint>,
}

impl SensorData {
    pub fn result_key(&self) -> &'static str {
        self.sensor_type.result_key()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }
}

// Serialized as `{ "<resultKey>": [points...] }`.
impl Serialize for SensorData {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.result_key(), &self.points)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_sensor_data_serializes_under_result_key() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let data = SensorData {
            sensor_type: SensorType::Reservoir,
            query: SensorQuery::for_variable("E01A01"),
            points: vec![TimeSeriesPoint::new(timestamp, 3.5)],
        };

        let json = serde_json::to_value(&data).unwrap();
        let points = json
            .get("reservoirData")
            .and_then(|v| v.as_array())
            .expect("points published under reservoirData");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0]["value"], 3.5);
        assert_eq!(points[0]["timestamp"], "2024-06-01T10:00:00");
    }
}
