//! Field-level checks shared by both upload flows

use serde_json::Value;
use vrpsetup_types::{Error, Result, ValidationRule};

use crate::model::{BoundingBox, GeoPoint, Record};

/// Fail with the first field that is absent or blank
pub fn require_fields<S: AsRef<str>>(record: &Record, fields: &[S]) -> Result<()> {
    for field in fields {
        let field = field.as_ref();
        if !record.has_field(field) {
            return Err(Error::missing_field(field, None));
        }
    }
    Ok(())
}

/// Finite number, or a non-blank string that parses to one
pub fn is_finite_number(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(f64::is_finite),
        Value::String(s) => parse_finite(s).is_some(),
        _ => false,
    }
}

/// Parse user text as a finite number. Blank text is not a number.
pub fn parse_finite(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn in_bounding_box(point: &GeoPoint, bbox: &BoundingBox) -> bool {
    bbox.contains(point)
}

/// Stops at the first point outside the box
pub fn all_in_bounding_box(points: &[GeoPoint], bbox: &BoundingBox) -> bool {
    points.iter().all(|p| bbox.contains(p))
}

/// Index of the first point outside the box
pub fn first_outside_bounding_box(points: &[GeoPoint], bbox: &BoundingBox) -> Option<usize> {
    points.iter().position(|p| !bbox.contains(p))
}

/// Vehicle capacity as entered by the user.
///
/// Integral values are accepted in any numeric spelling ("12", "12.0");
/// fractions, zero, negatives and non-numbers are rejected.
pub fn parse_positive_integer(text: &str) -> Result<u32> {
    let reject = || Error::validation(ValidationRule::CapacityNotPositiveInteger, text.trim());
    let value = parse_finite(text).ok_or_else(reject)?;
    if value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
        return Err(reject());
    }
    Ok(value as u32)
}
