use crate::models::{sort_by_name, Station};

/// Keeps stations of one hydrological sub-basin (`subcuenca`), sorted by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasinFilter {
    basin_id: i64,
}

impl BasinFilter {
    pub fn new(basin_id: i64) -> Self {
        Self { basin_id }
    }

    pub fn matches(&self, station: &Station) -> bool {
        station.basin_id == Some(self.basin_id)
    }

    pub fn filter(&self, stations: &[Station]) -> Vec<Station> {
        let mut in_basin: Vec<Station> = stations
            .iter()
            .filter(|station| self.matches(station))
            .cloned()
            .collect();
        sort_by_name(&mut in_basin);
        in_basin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_basin() {
        let stations = vec![
            Station::new(None, "Tous".to_string()).with_basin(7),
            Station::new(None, "Alarcón".to_string()).with_basin(7),
            Station::new(None, "Contreras".to_string()).with_basin(6),
            Station::new(None, "Sin cuenca".to_string()),
        ];

        let names: Vec<String> = BasinFilter::new(7)
            .filter(&stations)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Alarcón", "Tous"]);
        assert!(BasinFilter::new(0).filter(&stations).is_empty());
    }
}
