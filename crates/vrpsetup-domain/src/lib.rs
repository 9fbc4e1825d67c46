//! Domain layer for vrpsetup
//!
//! Records, geofences and job payloads, plus the traits the application layer
//! uses to reach the remote services and the export store.

pub mod gateway;
pub mod model;
pub mod service;
