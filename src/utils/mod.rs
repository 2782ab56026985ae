pub mod constants;
pub mod coordinates;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use coordinates::{haversine_distance, validate_coordinates, vincenty_distance, DistanceModel};
pub use logging::init_logging;
pub use progress::ProgressReporter;
