use tracing::info;

use crate::models::{sort_by_name, Station};
use crate::readers::Catalog;

/// Merges per-type catalogs into one directory listing.
///
/// Stations are not deduplicated across catalogs: a site with both a rain
/// gauge and a thermometer is listed once per sensor type.
pub struct DataMerger;

impl DataMerger {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate catalogs in the given order, then sort by lower-cased name.
    ///
    /// The sort is stable, so equal names keep their catalog order.
    pub fn merge_catalogs(&self, catalogs: Vec<Catalog>) -> Vec<Station> {
        let degraded = catalogs.iter().filter(|c| c.is_degraded()).count();
        let total: usize = catalogs.iter().map(|c| c.stations.len()).sum();

        let mut stations = Vec::with_capacity(total);
        for catalog in catalogs {
            stations.extend(catalog.stations);
        }
        sort_by_name(&mut stations);

        if degraded > 0 {
            info!(
                stations = stations.len(),
                degraded_catalogs = degraded,
                "directory merged with missing catalogs"
            );
        }

        stations
    }
}

impl Default for DataMerger {
    fn default() -> Self {
        Self::new()
    }
}
