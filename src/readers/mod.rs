pub mod concurrent_reader;
pub mod station_reader;
pub mod timeseries_reader;

pub use concurrent_reader::{Catalog, ConcurrentReader};
pub use station_reader::StationReader;
pub use timeseries_reader::{RawSensorPayload, TimeSeriesReader};
