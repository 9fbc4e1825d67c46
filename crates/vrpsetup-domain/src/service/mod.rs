//! Domain services

pub mod field_validators;
pub mod payload_builder;
pub mod validation;

pub use field_validators::{
    all_in_bounding_box, first_outside_bounding_box, in_bounding_box, is_finite_number,
    parse_finite, parse_positive_integer, require_fields,
};
pub use payload_builder::{build_geocode_job, build_routing_job};
pub use validation::{validate_geocode_records, validate_routing_inputs, RoutingInputs};
