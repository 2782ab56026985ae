pub mod sensor;
pub mod station;
pub mod timeseries;

pub use sensor::{SensorQuery, SensorType};
pub use station::{sort_by_name, RiskLevel, Station, StationId};
pub use timeseries::{SensorData, TimeSeriesPoint};
