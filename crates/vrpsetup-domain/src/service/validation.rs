//! Validation sequences for the two upload flows
//!
//! Both sequences are fail-fast: the first violated rule is returned and the
//! remaining checks are skipped.

use vrpsetup_types::{Error, Result, ValidationRule};

use crate::model::{BoundingBox, DemandSet, GeoPoint, Record, VehicleConstraint};
use crate::service::field_validators::{
    all_in_bounding_box, first_outside_bounding_box, in_bounding_box, parse_positive_integer,
    require_fields,
};

/// Form values for a routing upload
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingInputs<'a> {
    pub origin_latitude: Option<f64>,
    pub origin_longitude: Option<f64>,
    /// Capacity exactly as typed
    pub capacity: &'a str,
    pub unit: &'a str,
}

/// Check a routing upload in order:
/// 1. origin inside the box
/// 2. capacity is a positive integer
/// 3. demand rows exist and carry coordinates and the unit column
/// 4. every demand point inside the box
pub fn validate_routing_inputs(
    inputs: &RoutingInputs<'_>,
    records: &[Record],
    bbox: &BoundingBox,
) -> Result<(GeoPoint, VehicleConstraint, DemandSet)> {
    let latitude = inputs
        .origin_latitude
        .ok_or_else(|| Error::missing_field("origin_latitude", None))?;
    let longitude = inputs
        .origin_longitude
        .ok_or_else(|| Error::missing_field("origin_longitude", None))?;
    let origin = GeoPoint::new(latitude, longitude)?;
    if !in_bounding_box(&origin, bbox) {
        return Err(Error::validation(ValidationRule::OutsideBoundingBox, origin));
    }

    let capacity = parse_positive_integer(inputs.capacity)?;

    let vehicle = VehicleConstraint::new(capacity, inputs.unit)?;
    let demand = DemandSet::new(records.to_vec(), &vehicle.unit)?;

    let points = demand.points()?;
    if !all_in_bounding_box(&points, bbox) {
        let idx = first_outside_bounding_box(&points, bbox).unwrap_or_default();
        return Err(Error::validation(
            ValidationRule::OutsideBoundingBox,
            format!("row {}: {}", idx + 1, points[idx]),
        ));
    }

    tracing::debug!(
        rows = demand.len(),
        capacity = vehicle.capacity_quantity,
        unit = %vehicle.unit,
        "Routing inputs valid"
    );
    Ok((origin, vehicle, demand))
}

/// Every zip code row must carry the columns the geocoder needs
pub fn validate_geocode_records<S: AsRef<str>>(records: &[Record], required: &[S]) -> Result<()> {
    if records.is_empty() {
        return Err(Error::validation(ValidationRule::EmptyRecordSet, 0));
    }
    for (idx, record) in records.iter().enumerate() {
        require_fields(record, required).map_err(|e| match e {
            Error::MissingField { field, .. } => Error::missing_field(field, Some(idx + 1)),
            other => other,
        })?;
    }
    Ok(())
}
