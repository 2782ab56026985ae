use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::error::{Result, SaihError};
use crate::models::TimeSeriesPoint;
use crate::utils::constants::{
    DATE_FORMAT_KEY, DEFAULT_DATE_FORMAT, PAYLOAD_AXIS_INDEX, PAYLOAD_METADATA_INDEX,
    PAYLOAD_ROWS_INDEX,
};

/// strftime directives that carry a year, including the composite ones
const YEAR_DIRECTIVES: [&str; 10] = ["%Y", "%y", "%G", "%g", "%C", "%F", "%D", "%c", "%x", "%+"];

/// strftime directives that carry a time of day
const TIME_DIRECTIVES: [&str; 11] = [
    "%H", "%I", "%k", "%l", "%M", "%R", "%T", "%X", "%r", "%c", "%+",
];

/// The three blocks of a raw time-series payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSensorPayload<'a> {
    pub metadata: &'a Value,
    pub rows: &'a [Value],
    pub time_axis: Option<&'a Value>,
}

impl<'a> TryFrom<&'a Value> for RawSensorPayload<'a> {
    type Error = SaihError;

    fn try_from(value: &'a Value) -> Result<Self> {
        let blocks = value.as_array().ok_or_else(|| {
            SaihError::InvalidFormat("sensor payload is not a JSON array".to_string())
        })?;

        if blocks.len() <= PAYLOAD_ROWS_INDEX {
            return Err(SaihError::InvalidFormat(format!(
                "sensor payload has {} blocks, expected [metadata, rows, time axis]",
                blocks.len()
            )));
        }

        let rows = blocks[PAYLOAD_ROWS_INDEX].as_array().ok_or_else(|| {
            SaihError::InvalidFormat("sensor payload rows are not a JSON array".to_string())
        })?;

        Ok(Self {
            metadata: &blocks[PAYLOAD_METADATA_INDEX],
            rows,
            time_axis: blocks.get(PAYLOAD_AXIS_INDEX),
        })
    }
}

/// Parses raw time-series payloads into sorted [`TimeSeriesPoint`]s.
///
/// The date format is read from each payload's time-axis block; the default
/// format is only used when the payload does not declare one. Formats without
/// a year are anchored to a reference time, which defaults to now.
#[derive(Debug, Clone)]
pub struct TimeSeriesReader {
    format_key: String,
    default_format: String,
    reference: Option<NaiveDateTime>,
}

impl TimeSeriesReader {
    pub fn new() -> Self {
        Self {
            format_key: DATE_FORMAT_KEY.to_string(),
            default_format: DEFAULT_DATE_FORMAT.to_string(),
            reference: None,
        }
    }

    pub fn with_format_key(mut self, format_key: impl Into<String>) -> Self {
        self.format_key = format_key.into();
        self
    }

    pub fn with_default_format(mut self, default_format: impl Into<String>) -> Self {
        self.default_format = default_format.into();
        self
    }

    pub fn with_reference(mut self, reference: NaiveDateTime) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    /// Extract the points of a raw payload, dropping null readings.
    ///
    /// # Errors
    /// - `InvalidFormat` when the payload or a row is malformed, or a value is
    ///   neither null nor numeric.
    /// - `DateParse` when a date does not match the resolved format.
    pub fn extract(&self, payload: &Value) -> Result<Vec<TimeSeriesPoint>> {
        let payload = RawSensorPayload::try_from(payload)?;
        let format = self.resolve_format(payload.time_axis);
        let reference = self.reference.unwrap_or_else(|| Local::now().naive_local());

        let mut points = Vec::with_capacity(payload.rows.len());
        for (index, row) in payload.rows.iter().enumerate() {
            let (date, value) = split_row(row, index)?;
            // dates of null rows are still checked so a format change surfaces
            let timestamp = parse_timestamp(date, format, reference)?;
            if let Some(value) = reading(value, index)? {
                points.push(TimeSeriesPoint::new(timestamp, value));
            }
        }

        // stable: equal timestamps keep row order
        points.sort_by_key(|p| p.timestamp);

        Ok(points)
    }

    /// The date format declared by a time-axis block, or the default one.
    pub fn resolve_format<'a>(&'a self, time_axis: Option<&'a Value>) -> &'a str {
        time_axis
            .and_then(|axis| axis.get(&self.format_key))
            .and_then(Value::as_str)
            .filter(|format| !format.trim().is_empty())
            .unwrap_or(&self.default_format)
    }
}

impl Default for TimeSeriesReader {
    fn default() -> Self {
        Self::new()
    }
}

fn split_row(row: &Value, index: usize) -> Result<(&str, &Value)> {
    match row.as_array().map(Vec::as_slice) {
        Some([date, value, ..]) => {
            let date = date.as_str().ok_or_else(|| {
                SaihError::InvalidFormat(format!("row {}: date is not a string", index))
            })?;
            Ok((date, value))
        }
        _ => Err(SaihError::InvalidFormat(format!(
            "row {}: expected [date, value]",
            index
        ))),
    }
}

fn reading(value: &Value, index: usize) -> Result<Option<f64>> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| SaihError::InvalidFormat(format!("row {}: value {} is not numeric", index, value)))
}

fn parse_timestamp(raw: &str, format: &str, reference: NaiveDateTime) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    let date_parse_error = |source| SaihError::DateParse {
        value: raw.to_string(),
        format: format.to_string(),
        source,
    };

    if has_directive(format, &YEAR_DIRECTIVES) {
        return parse_with_format(raw, format).map_err(date_parse_error);
    }

    // Anchor year-less dates to the reference year, or the year before when
    // that would put the reading in the future (December data read in January).
    let year = reference.year();
    let anchored_format = format!("{} %Y", format);
    let anchored = |year: i32| parse_with_format(&format!("{} {}", raw, year), &anchored_format);

    match anchored(year) {
        Ok(timestamp) if timestamp <= reference + Duration::days(1) => Ok(timestamp),
        Ok(_) => anchored(year - 1).map_err(date_parse_error),
        // 29/02 outside a leap year
        Err(err) => anchored(year - 1).map_err(|_| date_parse_error(err)),
    }
}

fn parse_with_format(raw: &str, format: &str) -> chrono::ParseResult<NaiveDateTime> {
    if has_directive(format, &TIME_DIRECTIVES) {
        NaiveDateTime::parse_from_str(raw, format)
    } else {
        NaiveDate::parse_from_str(raw, format).map(|date| date.and_time(NaiveTime::MIN))
    }
}

fn has_directive(format: &str, directives: &[&str]) -> bool {
    directives.iter().any(|directive| format.contains(directive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn reader() -> TimeSeriesReader {
        TimeSeriesReader::new().with_reference(at(2024, 6, 15, 12, 0))
    }

    #[test]
    fn test_extract_drops_nulls_and_sorts() {
        let payload = json!([
            { "nombre": "Pluviómetro Alcoy" },
            [
                ["01/06/2024 10:00", 3.5],
                ["01/06/2024 09:00", null],
                ["01/06/2024 11:00", 7.2]
            ],
            { "xDateFormat": "%d/%m/%Y %H:%M" }
        ]);

        let points = reader().extract(&payload).unwrap();

        assert_eq!(
            points,
            vec![
                TimeSeriesPoint::new(at(2024, 6, 1, 10, 0), 3.5),
                TimeSeriesPoint::new(at(2024, 6, 1, 11, 0), 7.2),
            ]
        );
    }

    #[test]
    fn test_null_reading_is_not_zero() {
        let payload = json!([{}, [["01/06 09:00", null]], {}]);
        let points = reader().extract(&payload).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_default_format_has_no_year() {
        let payload = json!([{}, [["14/06 23:55", 0.2], ["14/06 23:50", "0.1"]], {}]);
        let points = reader().extract(&payload).unwrap();

        assert_eq!(
            points,
            vec![
                TimeSeriesPoint::new(at(2024, 6, 14, 23, 50), 0.1),
                TimeSeriesPoint::new(at(2024, 6, 14, 23, 55), 0.2),
            ]
        );
    }

    #[test]
    fn test_missing_axis_block_uses_default_format() {
        let payload = json!([{}, [["14/06 08:00", 1.0]]]);
        let points = reader().extract(&payload).unwrap();
        assert_eq!(points[0].timestamp, at(2024, 6, 14, 8, 0));
    }

    #[test]
    fn test_year_rollover_for_yearless_format() {
        let reader = TimeSeriesReader::new().with_reference(at(2025, 1, 1, 0, 30));
        let payload = json!([{}, [["01/01 00:10", 2.0], ["31/12 23:50", 1.0]], {}]);
        let points = reader.extract(&payload).unwrap();

        assert_eq!(
            points,
            vec![
                TimeSeriesPoint::new(at(2024, 12, 31, 23, 50), 1.0),
                TimeSeriesPoint::new(at(2025, 1, 1, 0, 10), 2.0),
            ]
        );
    }

    #[test]
    fn test_composite_year_directives_keep_their_own_year() {
        let payload = json!([
            {},
            [["2022-06-01 10:00", 1.0], ["2022-06-01 09:55", 0.5]],
            { "xDateFormat": "%F %H:%M" }
        ]);
        let points = reader().extract(&payload).unwrap();
        assert_eq!(
            points,
            vec![
                TimeSeriesPoint::new(at(2022, 6, 1, 9, 55), 0.5),
                TimeSeriesPoint::new(at(2022, 6, 1, 10, 0), 1.0),
            ]
        );

        let payload = json!([{}, [["06/01/21", 4.0]], { "xDateFormat": "%D" }]);
        let points = reader().extract(&payload).unwrap();
        assert_eq!(points[0].timestamp, at(2021, 6, 1, 0, 0));
    }

    #[test]
    fn test_date_only_format_yields_midnight() {
        let payload = json!([{}, [["03/06/2024", 12.0]], { "xDateFormat": "%d/%m/%Y" }]);
        let points = reader().extract(&payload).unwrap();
        assert_eq!(points[0].timestamp, at(2024, 6, 3, 0, 0));
    }

    #[test]
    fn test_equal_timestamps_keep_row_order() {
        let payload = json!([
            {},
            [["01/06 10:00", 1.0], ["01/06 09:00", 5.0], ["01/06 10:00", 2.0]],
            {}
        ]);
        let values: Vec<f64> = reader()
            .extract(&payload)
            .unwrap()
            .iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(values, vec![5.0, 1.0, 2.0]);
    }

    #[test]
    fn test_format_mismatch_is_a_hard_error() {
        // year-bearing dates against the default year-less format
        let payload = json!([{}, [["01/06/2024 10:00", 3.5]], {}]);
        match reader().extract(&payload) {
            Err(SaihError::DateParse { value, format, .. }) => {
                assert_eq!(value, "01/06/2024 10:00");
                assert_eq!(format, "%d/%m %H:%M");
            }
            other => panic!("expected DateParse, got {:?}", other),
        }
    }

    #[test]
    fn test_format_mismatch_surfaces_on_null_rows_too() {
        let payload = json!([
            {},
            [["01/06/2024 10:00", 1.0], ["garbage", null]],
            { "xDateFormat": "%d/%m/%Y %H:%M" }
        ]);
        assert!(matches!(
            reader().extract(&payload),
            Err(SaihError::DateParse { .. })
        ));
    }

    #[test]
    fn test_malformed_payloads_are_rejected() {
        assert!(matches!(
            reader().extract(&json!({ "rows": [] })),
            Err(SaihError::InvalidFormat(_))
        ));
        assert!(matches!(
            reader().extract(&json!([{}])),
            Err(SaihError::InvalidFormat(_))
        ));
        assert!(matches!(
            reader().extract(&json!([{}, [["01/06 10:00"]], {}])),
            Err(SaihError::InvalidFormat(_))
        ));
        assert!(matches!(
            reader().extract(&json!([{}, [["01/06 10:00", "n/d"]], {}])),
            Err(SaihError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_resolve_format_prefers_payload_declaration() {
        let reader = TimeSeriesReader::new().with_default_format("%Y-%m-%d %H:%M");
        let axis = json!({ "xDateFormat": "%d/%m/%Y %H:%M" });

        assert_eq!(reader.resolve_format(Some(&axis)), "%d/%m/%Y %H:%M");
        assert_eq!(reader.resolve_format(Some(&json!({}))), "%Y-%m-%d %H:%M");
        assert_eq!(reader.resolve_format(None), "%Y-%m-%d %H:%M");
        assert_eq!(
            reader.resolve_format(Some(&json!({ "xDateFormat": "" }))),
            "%Y-%m-%d %H:%M"
        );
    }

    #[test]
    fn test_custom_format_key() {
        let reader = reader().with_format_key("dateFormat");
        let payload = json!([{}, [["2024-06-01 10:00", 1.0]], { "dateFormat": "%Y-%m-%d %H:%M" }]);
        let points = reader.extract(&payload).unwrap();
        assert_eq!(points[0].timestamp, at(2024, 6, 1, 10, 0));
    }
}
