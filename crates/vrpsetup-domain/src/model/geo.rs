//! Coordinates and geofences

use serde::{Deserialize, Serialize};
use vrpsetup_types::{Error, Result, ValidationRule};

use super::Record;
use crate::service::field_validators::is_finite_number;

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range coordinates
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() {
            return Err(Error::validation(ValidationRule::NotANumber, latitude));
        }
        if !longitude.is_finite() {
            return Err(Error::validation(ValidationRule::NotANumber, longitude));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::validation(ValidationRule::LatitudeRange, latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::validation(ValidationRule::LongitudeRange, longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Read the `latitude`/`longitude` columns of a record.
    ///
    /// `row` is the 1-based data row used in error messages.
    pub fn from_record(record: &Record, row: Option<usize>) -> Result<Self> {
        let latitude = coordinate(record, LATITUDE_COLUMN, row)?;
        let longitude = coordinate(record, LONGITUDE_COLUMN, row)?;
        Self::new(latitude, longitude)
    }
}

fn coordinate(record: &Record, column: &str, row: Option<usize>) -> Result<f64> {
    if !record.has_field(column) {
        return Err(Error::missing_field(column, row));
    }
    match record.get(column) {
        Some(value) if is_finite_number(value) => record
            .number(column)
            .ok_or_else(|| not_a_number(record, column)),
        _ => Err(not_a_number(record, column)),
    }
}

fn not_a_number(record: &Record, column: &str) -> Error {
    Error::validation(
        ValidationRule::NotANumber,
        record.text(column).unwrap_or_default(),
    )
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Rectangular latitude/longitude region. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

/// Coarse rectangle around the contiguous United States (not a coastline)
pub const CONTIGUOUS_USA: BoundingBox = BoundingBox {
    min_latitude: 24.396308,
    max_latitude: 49.384358,
    min_longitude: -125.0,
    max_longitude: -66.93457,
};

impl BoundingBox {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_latitude
            && point.latitude <= self.max_latitude
            && point.longitude >= self.min_longitude
            && point.longitude <= self.max_longitude
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        CONTIGUOUS_USA
    }
}
