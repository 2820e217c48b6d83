//! Location related module
//!
//! Holds the receiver (or "home") location and the great-circle distance
//! used for the nearest-flight metric.
//!

use serde::Deserialize;

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Actual location
///
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Location {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Location {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Location { lat, lon }
    }
}

impl From<(f64, f64)> for Location {
    fn from((lat, lon): (f64, f64)) -> Self {
        Location { lat, lon }
    }
}

/// Great-circle (haversine) distance between two points, in kilometers and
/// rounded to two decimals.
///
/// Coordinates are (latitude, longitude) in degrees.  Out-of-range values
/// are fed to the formula as-is, there is no validation at this level.
///
pub fn distance_km(from: Location, to: Location) -> f64 {
    let (lat1, lon1) = (from.lat.to_radians(), from.lon.to_radians());
    let (lat2, lon2) = (to.lat.to_radians(), to.lon.to_radians());

    let h = ((lat2 - lat1) / 2.).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.).sin().powi(2);
    let d = 2. * EARTH_RADIUS_KM * h.sqrt().asin();

    (d * 100.).round() / 100.
}
