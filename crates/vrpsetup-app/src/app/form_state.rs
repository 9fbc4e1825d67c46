//! Owned form state for the routing setup

use vrpsetup_domain::service::{parse_finite, RoutingInputs};
use vrpsetup_types::{Error, Result, ValidationRule};

/// Values typed into the routing form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingForm {
    origin_latitude: Option<f64>,
    origin_longitude: Option<f64>,
    vehicle_capacity: String,
    vehicle_unit: String,
}

impl RoutingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_origin_latitude(&mut self, text: &str) -> Result<()> {
        self.origin_latitude = parse_coordinate(text)?;
        Ok(())
    }

    pub fn set_origin_longitude(&mut self, text: &str) -> Result<()> {
        self.origin_longitude = parse_coordinate(text)?;
        Ok(())
    }

    /// The raw text is kept even when it is not a number; the submit-time
    /// integer check reports it in full.
    pub fn set_vehicle_capacity(&mut self, text: &str) -> Result<()> {
        self.vehicle_capacity = text.trim().to_string();
        if parse_finite(&self.vehicle_capacity).is_none() {
            return Err(Error::validation(
                ValidationRule::NotANumber,
                &self.vehicle_capacity,
            ));
        }
        Ok(())
    }

    pub fn set_vehicle_unit(&mut self, text: &str) {
        self.vehicle_unit = text.trim().to_string();
    }

    pub fn origin_latitude(&self) -> Option<f64> {
        self.origin_latitude
    }

    pub fn origin_longitude(&self) -> Option<f64> {
        self.origin_longitude
    }

    pub fn vehicle_capacity(&self) -> &str {
        &self.vehicle_capacity
    }

    pub fn vehicle_unit(&self) -> &str {
        &self.vehicle_unit
    }

    pub fn inputs(&self) -> RoutingInputs<'_> {
        RoutingInputs {
            origin_latitude: self.origin_latitude,
            origin_longitude: self.origin_longitude,
            capacity: &self.vehicle_capacity,
            unit: &self.vehicle_unit,
        }
    }
}

/// A blank field or a lone minus sign is a half-typed value, not an error
fn parse_coordinate(text: &str) -> Result<Option<f64>> {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return Ok(None);
    }
    match parse_finite(text) {
        Some(v) => Ok(Some(v)),
        None => Err(Error::validation(ValidationRule::NotANumber, text)),
    }
}
