//! Vehicle capacity constraint for routing jobs

use serde::{Deserialize, Serialize};
use vrpsetup_types::{Error, Result, ValidationRule};

/// Maximum load of the vehicle, measured in one demand column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleConstraint {
    /// Capacity in units of `unit`; the optimizer is integer based
    pub capacity_quantity: u32,
    /// Name of the demand column the capacity is measured in
    pub unit: String,
}

impl VehicleConstraint {
    pub fn new(capacity_quantity: u32, unit: impl Into<String>) -> Result<Self> {
        if capacity_quantity == 0 {
            return Err(Error::validation(
                ValidationRule::CapacityNotPositiveInteger,
                capacity_quantity,
            ));
        }
        let unit = unit.into().trim().to_string();
        if unit.is_empty() {
            return Err(Error::validation(ValidationRule::EmptyUnit, unit));
        }
        Ok(Self {
            capacity_quantity,
            unit,
        })
    }
}
