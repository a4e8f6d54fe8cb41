//! Geographic utilities: tile-coordinate conversion and distance calculations.
//!
//! Map data encodes positions as 31-bit integer tile coordinates (Web
//! Mercator, the full projection square divided into 2^31 units per axis).
//! This module converts between those and latitude/longitude, and provides
//! the haversine distance used for gap detection and track splitting.

use std::f64::consts::PI;

use crate::{GeoPoint, Point31};

/// Earth radius in meters (mean).
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Equatorial circumference in meters, for tile-unit resolution.
const EQUATOR_M: f64 = 40_075_016.686;

/// Number of coordinate units per axis at 31 bits.
const UNITS_31: f64 = 2_147_483_648.0; // 2^31

/// Convert a 31-bit tile x coordinate to longitude in degrees.
pub fn x31_to_lon(x: u32) -> f64 {
    x as f64 / UNITS_31 * 360.0 - 180.0
}

/// Convert a 31-bit tile y coordinate to latitude in degrees.
pub fn y31_to_lat(y: u32) -> f64 {
    let n = PI * (1.0 - 2.0 * (y as f64 / UNITS_31));
    n.sinh().atan().to_degrees()
}

/// Convert longitude in degrees to a 31-bit tile x coordinate.
pub fn lon_to_x31(lon: f64) -> u32 {
    ((lon + 180.0) / 360.0 * UNITS_31) as u32
}

/// Convert latitude in degrees to a 31-bit tile y coordinate.
pub fn lat_to_y31(lat: f64) -> u32 {
    let lat_rad = lat.to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    (y * UNITS_31) as u32
}

/// Convert a tile-encoded point to latitude/longitude.
pub fn point31_to_geo(p: Point31) -> GeoPoint {
    GeoPoint::new(y31_to_lat(p.y), x31_to_lon(p.x))
}

/// Convert latitude/longitude to a tile-encoded point.
pub fn geo_to_point31(p: &GeoPoint) -> Point31 {
    Point31::new(lon_to_x31(p.longitude), lat_to_y31(p.latitude))
}

/// Haversine distance between two points in meters.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Distance in meters between two tile-encoded points.
pub fn distance31(a: Point31, b: Point31) -> f64 {
    haversine_distance(&point31_to_geo(a), &point31_to_geo(b))
}

/// Conservative radius in 31-bit coordinate units covering `radius_m` meters
/// around a point at tile y coordinate `y`.
///
/// Used to size R-tree search envelopes; candidates are filtered precisely
/// with [`distance31`] afterwards, so overshooting is harmless.
pub fn radius31(radius_m: f64, y: u32) -> f64 {
    let lat = y31_to_lat(y).to_radians();
    // Ground resolution of one coordinate unit at this latitude.
    let resolution = EQUATOR_M * lat.cos().abs().max(0.01) / UNITS_31;
    radius_m / resolution * 1.5
}
