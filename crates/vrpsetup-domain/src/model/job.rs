//! Request and response payloads for the remote services

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use vrpsetup_types::Flow;

use super::{DemandSet, GeoPoint, Record, VehicleConstraint};

/// Geocode request: `{stack_id, zipcodes}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeJob {
    pub stack_id: i64,
    pub zipcodes: Vec<Record>,
}

/// Routing request for one vehicle leaving `origin`
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingJob {
    pub origin: GeoPoint,
    pub vehicle: VehicleConstraint,
    pub demand: DemandSet,
}

/// Wire layout expected by the routing service
#[derive(Serialize)]
struct RoutingRequestBody<'a> {
    origin_latitude: f64,
    origin_longitude: f64,
    vehicle_max_capacity_quantity: u32,
    vehicle_definitions: &'a [Value],
    unit: &'a str,
    demand: &'a DemandSet,
}

impl Serialize for RoutingJob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RoutingRequestBody {
            origin_latitude: self.origin.latitude,
            origin_longitude: self.origin.longitude,
            vehicle_max_capacity_quantity: self.vehicle.capacity_quantity,
            vehicle_definitions: &[],
            unit: &self.vehicle.unit,
            demand: &self.demand,
        }
        .serialize(serializer)
    }
}

/// Geocode response: one record per resolved zip code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub geocodes: Vec<Record>,
}

impl GeocodeResponse {
    /// Coordinates of every entry that resolved to a usable point
    pub fn points(&self) -> Vec<GeoPoint> {
        self.geocodes
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| match GeoPoint::from_record(record, Some(idx + 1)) {
                Ok(point) => Some(point),
                Err(e) => {
                    tracing::warn!(row = idx + 1, error = %e, "Skipping geocode without coordinates");
                    None
                }
            })
            .collect()
    }
}

/// Routing service output; its shape is owned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingSolution(pub Value);

/// A request ready to be sent, serialized as the service's body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobRequest {
    Geocode(GeocodeJob),
    Routing(RoutingJob),
}

impl JobRequest {
    pub fn flow(&self) -> Flow {
        match self {
            JobRequest::Geocode(_) => Flow::Geocode,
            JobRequest::Routing(_) => Flow::Routing,
        }
    }

    /// Number of rows carried by the request
    pub fn row_count(&self) -> usize {
        match self {
            JobRequest::Geocode(job) => job.zipcodes.len(),
            JobRequest::Routing(job) => job.demand.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobResponse {
    Geocode(GeocodeResponse),
    Routing(RoutingSolution),
}

impl JobResponse {
    pub fn flow(&self) -> Flow {
        match self {
            JobResponse::Geocode(_) => Flow::Geocode,
            JobResponse::Routing(_) => Flow::Routing,
        }
    }
}
