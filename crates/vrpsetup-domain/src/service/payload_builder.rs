//! Assembly of request payloads from validated inputs

use crate::model::{DemandSet, GeoPoint, GeocodeJob, Record, RoutingJob, VehicleConstraint};

/// `stack_id` is supplied by the caller and passed through untouched
pub fn build_geocode_job(stack_id: i64, records: Vec<Record>) -> GeocodeJob {
    GeocodeJob {
        stack_id,
        zipcodes: records,
    }
}

pub fn build_routing_job(
    origin: GeoPoint,
    vehicle: VehicleConstraint,
    demand: DemandSet,
) -> RoutingJob {
    RoutingJob {
        origin,
        vehicle,
        demand,
    }
}
