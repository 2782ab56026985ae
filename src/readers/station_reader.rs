use serde_json::{Map, Value};

use crate::models::{SensorType, Station, StationId};

/// Maps raw SAIH catalog records onto [`Station`].
///
/// Normalisation never fails: missing keys and values of an unexpected type
/// become `None`, and unknown keys are ignored.
pub struct StationReader {
    sensor_type: Option<SensorType>,
}

impl StationReader {
    pub fn new() -> Self {
        Self { sensor_type: None }
    }

    /// Tag every normalised station with the catalog it came from.
    pub fn for_sensor_type(sensor_type: SensorType) -> Self {
        Self {
            sensor_type: Some(sensor_type),
        }
    }

    /// Normalise one raw record.
    pub fn normalize(&self, raw: &Value) -> Station {
        let empty = Map::new();
        let record = raw.as_object().unwrap_or(&empty);

        Station {
            id: station_id(record.get("id")),
            // unnamed stations sort first
            name: text(record.get("nombre")).unwrap_or_default(),
            latitude: coordinate(record.get("latitud")),
            longitude: coordinate(record.get("longitud")),
            variable: text(record.get("variable")),
            unit: text(record.get("unidades")),
            basin_id: integer(record.get("subcuenca")),
            status: text(record.get("estado")),
            status_code: integer(record.get("estadoInt")),
            internal_status_code: integer(record.get("estadoInternal")),
            current_reading: number(record.get("datoActual")),
            total_reading: number(record.get("datoTotal")),
            municipality: text(record.get("municipioNombre")),
            sensor_type: self.sensor_type,
        }
    }

    /// Normalise a whole catalog, keeping upstream order.
    pub fn read_catalog(&self, records: &[Value]) -> Vec<Station> {
        records.iter().map(|record| self.normalize(record)).collect()
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn station_id(value: Option<&Value>) -> Option<StationId> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .map(StationId::Number)
            .or_else(|| Some(StationId::Text(n.to_string()))),
        Value::String(s) if !s.trim().is_empty() => Some(StationId::Text(s.trim().to_string())),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

// decimal degrees, as a number or numeric string
fn coordinate(value: Option<&Value>) -> Option<f64> {
    number(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_record() {
        let raw = json!({
            "id": 66,
            "latitud": 39.4364,
            "longitud": -0.4723,
            "nombre": "Embalse de Forata",
            "variable": "E80A01",
            "unidades": "hm³",
            "subcuenca": 7,
            "estado": "Normal",
            "datoActual": 12.5,
            "datoTotal": "37,8",
            "municipioNombre": "Yátova",
            "estadoInt": 1,
            "estadoInternal": "2"
        });

        let station = StationReader::for_sensor_type(SensorType::Reservoir).normalize(&raw);

        assert_eq!(station.id, Some(StationId::Number(66)));
        assert_eq!(station.name, "Embalse de Forata");
        assert_eq!(station.coordinates(), Some((39.4364, -0.4723)));
        assert_eq!(station.variable.as_deref(), Some("E80A01"));
        assert_eq!(station.unit.as_deref(), Some("hm³"));
        assert_eq!(station.basin_id, Some(7));
        assert_eq!(station.status.as_deref(), Some("Normal"));
        assert_eq!(station.status_code, Some(1));
        assert_eq!(station.internal_status_code, Some(2));
        assert_eq!(station.current_reading, Some(12.5));
        assert_eq!(station.total_reading, Some(37.8));
        assert_eq!(station.municipality.as_deref(), Some("Yátova"));
        assert_eq!(station.sensor_type, Some(SensorType::Reservoir));
    }

    #[test]
    fn test_missing_and_null_keys_become_absent() {
        let raw = json!({ "id": "P012", "nombre": "Alcoy", "latitud": null });
        let station = StationReader::new().normalize(&raw);

        assert_eq!(station.id, Some(StationId::Text("P012".to_string())));
        assert_eq!(station.latitude, None);
        assert_eq!(station.longitude, None);
        assert_eq!(station.status_code, None);
        assert_eq!(station.sensor_type, None);
        assert!(!station.is_locatable());
    }

    #[test]
    fn test_unknown_keys_and_odd_types_are_tolerated() {
        let raw = json!({
            "nombre": "Teruel",
            "latitud": "40,3439",
            "longitud": true,
            "municipioNombre": 44,
            "estadoInt": "alto",
            "nuevoCampo": { "nested": [1, 2, 3] }
        });
        let station = StationReader::new().normalize(&raw);

        assert!((station.latitude.unwrap() - 40.3439).abs() < 0.00001);
        assert_eq!(station.longitude, None);
        assert_eq!(station.municipality.as_deref(), Some("44"));
        assert_eq!(station.status_code, None);
    }

    #[test]
    fn test_unnamed_stations_sort_first() {
        let records = vec![
            json!({ "id": 1, "nombre": "Alcoy" }),
            json!({ "id": 2 }),
            json!({ "id": 3, "nombre": null }),
        ];
        let mut stations = StationReader::new().read_catalog(&records);
        crate::models::sort_by_name(&mut stations);

        let ids: Vec<Option<StationId>> = stations.into_iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                Some(StationId::Number(2)),
                Some(StationId::Number(3)),
                Some(StationId::Number(1)),
            ]
        );
    }

    #[test]
    fn test_sexagesimal_coordinates_are_not_decimal_degrees() {
        let raw = json!({ "nombre": "Teruel", "latitud": "40:20:38", "longitud": "-1.1065" });
        let station = StationReader::new().normalize(&raw);

        assert_eq!(station.latitude, None);
        assert!(!station.is_locatable());
    }

    #[test]
    fn test_non_object_record_yields_empty_station() {
        let station = StationReader::new().normalize(&json!([1, 2, 3]));
        assert_eq!(station.id, None);
        assert_eq!(station.name, "");
    }

    #[test]
    fn test_read_catalog_keeps_order() {
        let records = vec![json!({ "nombre": "B" }), json!({ "nombre": "A" })];
        let stations = StationReader::new().read_catalog(&records);
        let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
