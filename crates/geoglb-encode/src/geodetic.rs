//! Geodetic to earth-centered (ECEF) coordinate conversion.
//!
//! Both directions use the WGS84 reference ellipsoid.

use glam::DVec3;

use crate::error::{EncodeError, EncodeResult};

/// WGS84 equatorial radius in meters.
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = 6.694_379_990_14e-3;

/// Fixed-point iterations used by [`ecef_to_geodetic`].
const INVERSE_ITERATIONS: usize = 10;

/// A geodetic coordinate on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPoint {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Height above the ellipsoid in meters.
    pub height: f64,
}

impl GeodeticPoint {
    /// Create a point, rejecting non-finite components.
    ///
    /// Latitude is deliberately not clamped to ±90°: the conversion formula
    /// is evaluated as-is for any finite input.
    pub fn new(longitude: f64, latitude: f64, height: f64) -> EncodeResult<Self> {
        for (name, value) in [
            ("longitude", longitude),
            ("latitude", latitude),
            ("height", height),
        ] {
            if !value.is_finite() {
                return Err(EncodeError::DegenerateInput {
                    context: "geodetic point",
                    detail: format!("{name} is {value}"),
                });
            }
        }

        Ok(Self {
            longitude,
            latitude,
            height,
        })
    }

    /// Reject non-finite components.
    ///
    /// Fields are public, so points built as struct literals skip [`Self::new`];
    /// pipeline entry points call this instead.
    pub fn validate(&self) -> EncodeResult<()> {
        Self::new(self.longitude, self.latitude, self.height).map(|_| ())
    }

    /// Convert to earth-centered, earth-fixed coordinates in meters.
    #[must_use]
    pub fn to_ecef(&self) -> DVec3 {
        geodetic_to_ecef(self.longitude, self.latitude, self.height)
    }
}

/// Prime-vertical radius of curvature at the given latitude (radians).
#[must_use]
pub fn prime_vertical_radius(lat_rad: f64) -> f64 {
    let sin_lat = lat_rad.sin();
    WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt()
}

/// Convert longitude, latitude (degrees) and height (meters) to ECEF.
#[must_use]
pub fn geodetic_to_ecef(lon_deg: f64, lat_deg: f64, height: f64) -> DVec3 {
    let lon_rad = lon_deg.to_radians();
    let lat_rad = lat_deg.to_radians();
    let n = prime_vertical_radius(lat_rad);

    DVec3::new(
        (n + height) * lat_rad.cos() * lon_rad.cos(),
        (n + height) * lat_rad.cos() * lon_rad.sin(),
        (n * (1.0 - WGS84_E2) + height) * lat_rad.sin(),
    )
}

/// Convert ECEF coordinates back to a geodetic point.
///
/// Iterates on latitude starting from the spherical-height estimate; the
/// error shrinks by roughly a factor of `e²` per step.
#[must_use]
pub fn ecef_to_geodetic(position: DVec3) -> GeodeticPoint {
    let p = position.x.hypot(position.y);
    let lon_rad = position.y.atan2(position.x);

    let mut lat_rad = position.z.atan2(p * (1.0 - WGS84_E2));
    let mut height = 0.0;

    for _ in 0..INVERSE_ITERATIONS {
        let n = prime_vertical_radius(lat_rad);
        let (sin_lat, cos_lat) = lat_rad.sin_cos();
        // Near the poles cos(lat) vanishes, so height comes from z instead.
        height = if cos_lat.abs() > sin_lat.abs() {
            p / cos_lat - n
        } else {
            position.z / sin_lat - n * (1.0 - WGS84_E2)
        };
        lat_rad = position.z.atan2(p * (1.0 - WGS84_E2 * n / (n + height)));
    }

    GeodeticPoint {
        longitude: lon_rad.to_degrees(),
        latitude: lat_rad.to_degrees(),
        height,
    }
}
