pub mod basin_filter;
pub mod data_merger;
pub mod geo_filter;
pub mod risk_filter;

pub use basin_filter::BasinFilter;
pub use data_merger::DataMerger;
pub use geo_filter::{GeoFilter, StationDistance};
pub use risk_filter::{Comparison, RiskFilter};
