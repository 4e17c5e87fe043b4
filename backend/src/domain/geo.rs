//! Geographic primitives used by the proximity search.
//!
//! Distances are great-circle distances on a sphere with the IUGG mean Earth
//! radius, matching the spherical semantics of a `$near` style query.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

const MAX_LONGITUDE: f64 = 180.0;
const MAX_LATITUDE: f64 = 90.0;

/// Validation errors for [`GeoPoint`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeoPointValidationError {
    #[error("longitude {0} must be a finite value within [-180, 180]")]
    Longitude(f64),
    #[error("latitude {0} must be a finite value within [-90, 90]")]
    Latitude(f64),
}

/// A WGS84 coordinate pair in degrees.
///
/// Serialised as `[longitude, latitude]`, the GeoJSON order.
///
/// ## Invariants
/// - longitude is finite and within [-180, 180];
/// - latitude is finite and within [-90, 90].
///
/// # Examples
/// ```
/// use eventwait::domain::GeoPoint;
///
/// let paris = GeoPoint::new(2.35, 48.85).expect("valid point");
/// assert_eq!(paris.longitude(), 2.35);
/// assert!(GeoPoint::new(200.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoPointValidationError> {
        if !longitude.is_finite() || longitude.abs() > MAX_LONGITUDE {
            return Err(GeoPointValidationError::Longitude(longitude));
        }
        if !latitude.is_finite() || latitude.abs() > MAX_LATITUDE {
            return Err(GeoPointValidationError::Latitude(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Great-circle distance to `other` in metres (haversine formula).
    ///
    /// # Examples
    /// ```
    /// use eventwait::domain::GeoPoint;
    ///
    /// let a = GeoPoint::new(0.0, 0.0).expect("valid");
    /// let b = GeoPoint::new(0.0, 1.0).expect("valid");
    /// let metres = a.distance_to(&b);
    /// assert!((metres - 111_195.0).abs() < 1.0);
    /// ```
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let d_phi = (other.latitude - self.latitude).to_radians();
        let d_lambda = (other.longitude - self.longitude).to_radians();

        let h = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        // Rounding can push `h` marginally above 1 for antipodal points.
        2.0 * EARTH_RADIUS_M * h.clamp(0.0, 1.0).sqrt().asin()
    }

    /// Whether `other` lies within `radius_m` of this point, boundary included.
    #[must_use]
    pub fn is_within(&self, other: &Self, radius_m: f64) -> bool {
        self.distance_to(other) <= radius_m
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

impl TryFrom<[f64; 2]> for GeoPoint {
    type Error = GeoPointValidationError;

    fn try_from([longitude, latitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(longitude, latitude)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(value: GeoPoint) -> Self {
        [value.longitude, value.latitude]
    }
}

/// Axis-aligned latitude/longitude box enclosing a search circle.
///
/// Used by persistence adapters as a cheap index-friendly prefilter before the
/// exact haversine check. `longitude` is `None` when the circle reaches a pole
/// or crosses the antimeridian, in which case every longitude qualifies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub latitude: (f64, f64),
    pub longitude: Option<(f64, f64)>,
}

impl BoundingBox {
    /// Compute the box enclosing the circle of `radius_m` around `center`.
    ///
    /// # Examples
    /// ```
    /// use eventwait::domain::{BoundingBox, GeoPoint};
    ///
    /// let center = GeoPoint::new(2.35, 48.85).expect("valid");
    /// let bbox = BoundingBox::around(&center, 10_000.0);
    /// assert!(bbox.latitude.0 < 48.85 && bbox.latitude.1 > 48.85);
    /// assert!(bbox.longitude.is_some());
    /// ```
    #[must_use]
    pub fn around(center: &GeoPoint, radius_m: f64) -> Self {
        let angular = (radius_m / EARTH_RADIUS_M).to_degrees();
        let min_lat = center.latitude - angular;
        let max_lat = center.latitude + angular;

        if min_lat <= -MAX_LATITUDE || max_lat >= MAX_LATITUDE {
            return Self {
                latitude: (min_lat.max(-MAX_LATITUDE), max_lat.min(MAX_LATITUDE)),
                longitude: None,
            };
        }

        // Widest longitude span of the circle occurs at the latitude of the
        // tangent point, not at the centre latitude.
        let ratio = (radius_m / EARTH_RADIUS_M).sin() / center.latitude.to_radians().cos();
        if ratio >= 1.0 {
            return Self {
                latitude: (min_lat, max_lat),
                longitude: None,
            };
        }
        let delta_lon = ratio.asin().to_degrees();
        let min_lon = center.longitude - delta_lon;
        let max_lon = center.longitude + delta_lon;
        let longitude = if min_lon < -MAX_LONGITUDE || max_lon > MAX_LONGITUDE {
            None
        } else {
            Some((min_lon, max_lon))
        };

        Self {
            latitude: (min_lat, max_lat),
            longitude,
        }
    }

    /// Whether `point` lies inside the box.
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let (min_lat, max_lat) = self.latitude;
        let lat_ok = (min_lat..=max_lat).contains(&point.latitude);
        let lon_ok = self
            .longitude
            .is_none_or(|(min_lon, max_lon)| (min_lon..=max_lon).contains(&point.longitude));
        lat_ok && lon_ok
    }
}

/// Default zoom-level radii in metres: level 1 covers 10 000 km and each
/// level halves the radius, down to level 20.
pub const DEFAULT_ZOOM_RADII_M: [f64; 20] = [
    10_000_000.0,
    5_000_000.0,
    2_500_000.0,
    1_250_000.0,
    625_000.0,
    312_500.0,
    156_250.0,
    78_125.0,
    39_062.5,
    19_531.25,
    9_765.625,
    4_882.812_5,
    2_441.406_25,
    1_220.703_125,
    610.351_562_5,
    305.175_781_25,
    152.587_890_625,
    76.293_945_312_5,
    38.146_972_656_25,
    19.073_486_328_125,
];

/// Errors raised when building or indexing a [`ZoomRadii`] table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoomRadiiError {
    #[error("zoom table must contain at least one level")]
    Empty,
    #[error("zoom radius at level {level} must be a positive finite number, got {radius}")]
    InvalidRadius { level: usize, radius: f64 },
    #[error("zoom level {zoom} is outside the configured range 1..={levels}")]
    OutOfRange { zoom: u32, levels: usize },
}

/// Configured table mapping a 1-based zoom level to a maximum search radius.
///
/// # Examples
/// ```
/// use eventwait::domain::ZoomRadii;
///
/// let table = ZoomRadii::new(vec![1000.0, 500.0]).expect("valid table");
/// assert_eq!(table.radius_for(2), Ok(500.0));
/// assert!(table.radius_for(3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomRadii(Vec<f64>);

impl ZoomRadii {
    /// Validate and construct a zoom table.
    pub fn new(radii: Vec<f64>) -> Result<Self, ZoomRadiiError> {
        if radii.is_empty() {
            return Err(ZoomRadiiError::Empty);
        }
        if let Some((index, radius)) = radii
            .iter()
            .enumerate()
            .find(|(_, radius)| !radius.is_finite() || **radius <= 0.0)
        {
            return Err(ZoomRadiiError::InvalidRadius {
                level: index + 1,
                radius: *radius,
            });
        }
        Ok(Self(radii))
    }

    /// Number of configured zoom levels.
    pub fn levels(&self) -> usize {
        self.0.len()
    }

    /// Radius in metres for a 1-based zoom level.
    pub fn radius_for(&self, zoom: u32) -> Result<f64, ZoomRadiiError> {
        let out_of_range = || ZoomRadiiError::OutOfRange {
            zoom,
            levels: self.levels(),
        };
        let index = usize::try_from(zoom)
            .ok()
            .and_then(|zoom| zoom.checked_sub(1))
            .ok_or_else(out_of_range)?;
        self.0.get(index).copied().ok_or_else(out_of_range)
    }
}

impl Default for ZoomRadii {
    fn default() -> Self {
        Self(DEFAULT_ZOOM_RADII_M.to_vec())
    }
}
