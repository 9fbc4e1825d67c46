//! Use cases driven by the front end

pub mod form_state;
pub mod submission_controller;

pub use form_state::RoutingForm;
pub use submission_controller::{ControllerOptions, SubmissionController, SubmissionPhase};
