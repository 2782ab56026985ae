/// SAIH JSON API endpoints
pub const DEFAULT_STATION_LIST_URL: &str = "https://saih.chj.es/jsonApi/estaciones/listado";
pub const DEFAULT_SENSOR_DATA_URL: &str = "https://saih.chj.es/jsonApi/datos/grafica";
pub const DEFAULT_USER_AGENT: &str = concat!("chj-saih/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Token expanding to every sensor type
pub const SENSOR_TYPE_ALL: &str = "all";

/// Time-series payload layout: [metadata, rows, time axis]
pub const PAYLOAD_METADATA_INDEX: usize = 0;
pub const PAYLOAD_ROWS_INDEX: usize = 1;
pub const PAYLOAD_AXIS_INDEX: usize = 2;

/// Key of the date format inside the time-axis block
pub const DATE_FORMAT_KEY: &str = "xDateFormat";

/// Used when the time-axis block does not declare a format (no year)
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m %H:%M";

/// Sensor query defaults
pub const DEFAULT_TIME_GROUPING: &str = "ultimos5minutales";
pub const DEFAULT_SAMPLE_COUNT: u32 = 30;

/// Time groupings accepted by the data endpoint
pub const KNOWN_TIME_GROUPINGS: [&str; 7] = [
    "ultimos5minutales",
    "ultimashoras",
    "ultimashorasaforo",
    "ultimodia",
    "ultimasemana",
    "ultimomes",
    "ultimoanno",
];

/// Directory query defaults
pub const DEFAULT_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_RISK_SENSOR_TYPE: &str = "reservoir";

/// Earth models
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const WGS84_SEMI_MAJOR_M: f64 = 6_378_137.0;
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
