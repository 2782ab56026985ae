use serde::Serialize;

use crate::error::{Result, SaihError};
use crate::models::{sort_by_name, Station};
use crate::utils::coordinates::{validate_coordinates, DistanceModel};

/// A station paired with its distance to the query centre.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDistance {
    pub station: Station,
    pub distance_km: f64,
}

/// Keeps stations within a radius of a centre point (boundary inclusive).
///
/// Stations without usable coordinates are never included, whatever the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFilter {
    center: (f64, f64),
    radius_km: f64,
    model: DistanceModel,
}

impl GeoFilter {
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Result<Self> {
        validate_coordinates(latitude, longitude)?;
        if radius_km.is_nan() || radius_km < 0.0 {
            return Err(SaihError::InvalidCoordinate(format!(
                "radius must be a non-negative number of kilometres, got {}",
                radius_km
            )));
        }

        Ok(Self {
            center: (latitude, longitude),
            radius_km,
            model: DistanceModel::default(),
        })
    }

    pub fn with_model(mut self, model: DistanceModel) -> Self {
        self.model = model;
        self
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Distance from the centre, or `None` for an unlocatable station.
    pub fn distance_to(&self, station: &Station) -> Option<f64> {
        station
            .coordinates()
            .map(|coords| self.model.distance_km(self.center, coords))
    }

    pub fn contains(&self, station: &Station) -> bool {
        self.distance_to(station)
            .is_some_and(|distance| distance <= self.radius_km)
    }

    /// Stations inside the radius, sorted by name.
    pub fn filter(&self, stations: &[Station]) -> Vec<Station> {
        let mut within: Vec<Station> = stations
            .iter()
            .filter(|station| self.contains(station))
            .cloned()
            .collect();
        sort_by_name(&mut within);
        within
    }

    /// Every locatable station with its distance, nearest first.
    pub fn distances(&self, stations: &[Station]) -> Vec<StationDistance> {
        let mut distances: Vec<StationDistance> = stations
            .iter()
            .filter_map(|station| {
                self.distance_to(station).map(|distance_km| StationDistance {
                    station: station.clone(),
                    distance_km,
                })
            })
            .collect();
        distances.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        distances
    }
}
