use serde::{Deserialize, Serialize};

use crate::error::{Result, SaihError};
use crate::utils::constants::{EARTH_RADIUS_KM, WGS84_FLATTENING, WGS84_SEMI_MAJOR_M};

const VINCENTY_MAX_ITERATIONS: usize = 200;
const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Earth model used for great-circle distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceModel {
    /// Sphere of radius 6371 km (haversine).
    Spherical,
    /// WGS-84 ellipsoid (Vincenty inverse formula).
    #[default]
    Ellipsoidal,
}

impl DistanceModel {
    /// Distance in kilometres between two points given in decimal degrees.
    pub fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        match self {
            DistanceModel::Spherical => haversine_distance(from.0, from.1, to.0, to.1),
            DistanceModel::Ellipsoidal => vincenty_distance(from.0, from.1, to.0, to.1)
                .unwrap_or_else(|| haversine_distance(from.0, from.1, to.0, to.1)),
        }
    }
}

/// Validate a query centre against the WGS-84 coordinate bounds
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(SaihError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(SaihError::InvalidCoordinate(format!(
            "Longitude {} is outside [-180, 180]",
            longitude
        )));
    }

    Ok(())
}

/// Calculate the distance between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Geodesic distance on the WGS-84 ellipsoid in kilometres (Vincenty inverse formula).
///
/// Returns `None` when the iteration does not converge, which only happens for
/// nearly antipodal points.
pub fn vincenty_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Option<f64> {
    let a = WGS84_SEMI_MAJOR_M;
    let f = WGS84_FLATTENING;
    let b = (1.0 - f) * a;

    let l = (lon2 - lon1).to_radians();
    let u1 = ((1.0 - f) * lat1.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * lat2.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;
    let (mut sin_sigma, mut cos_sigma, mut sigma) = (0.0, 0.0, 0.0);
    let (mut cos_sq_alpha, mut cos_2sigma_m) = (0.0, 0.0);

    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        if sin_sigma == 0.0 {
            // coincident points
            return Some(0.0);
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line: cos_sq_alpha == 0
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - previous).abs() < VINCENTY_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        return None;
    }

    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

    Some(b * big_a * (sigma - delta_sigma) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(validate_coordinates(39.4699, -0.3763).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn test_haversine_distance() {
        // Valencia to Madrid
        let distance = haversine_distance(39.4699, -0.3763, 40.4168, -3.7038);
        assert!((distance - 302.0).abs() < 5.0);
    }

    #[test]
    fn test_vincenty_reference_geodesic() {
        // Flinders Peak to Buninyong, 54972.271 m on WGS-84
        let distance =
            vincenty_distance(-37.95103342, 144.42486789, -37.65282114, 143.92649554).unwrap();
        assert!((distance - 54.972271).abs() < 0.001, "got {}", distance);
    }

    #[test]
    fn test_vincenty_coincident_points() {
        assert_eq!(vincenty_distance(39.0, -0.5, 39.0, -0.5), Some(0.0));
    }

    #[test]
    fn test_models_agree_within_half_a_percent() {
        let from = (39.4699, -0.3763);
        let to = (38.3452, -0.4810);
        let spherical = DistanceModel::Spherical.distance_km(from, to);
        let ellipsoidal = DistanceModel::Ellipsoidal.distance_km(from, to);
        assert!((spherical - ellipsoidal).abs() / ellipsoidal < 0.005);
    }
}
