//! Domain model types

pub mod demand;
pub mod export;
pub mod geo;
pub mod job;
pub mod marker;
pub mod record;
pub mod vehicle;

pub use demand::DemandSet;
pub use export::ExportArtifact;
pub use geo::{BoundingBox, GeoPoint, CONTIGUOUS_USA};
pub use job::{GeocodeJob, GeocodeResponse, JobRequest, JobResponse, RoutingJob, RoutingSolution};
pub use marker::MarkerState;
pub use record::Record;
pub use vehicle::VehicleConstraint;
