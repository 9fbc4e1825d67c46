//! Trait definitions for the collaborators behind the pipeline

use async_trait::async_trait;
use vrpsetup_types::Result;

use crate::model::{
    ExportArtifact, GeocodeJob, GeocodeResponse, JobRequest, JobResponse, RoutingJob,
    RoutingSolution,
};

/// Outbound calls to the geocoding and routing services
#[async_trait]
pub trait JobClient: Send + Sync {
    /// POST a geocode job
    async fn geocode(&self, job: &GeocodeJob) -> Result<GeocodeResponse>;

    /// POST a routing job
    async fn route(&self, job: &RoutingJob) -> Result<RoutingSolution>;

    /// Send whichever job the request holds
    async fn send(&self, request: &JobRequest) -> Result<JobResponse> {
        match request {
            JobRequest::Geocode(job) => self.geocode(job).await.map(JobResponse::Geocode),
            JobRequest::Routing(job) => self.route(job).await.map(JobResponse::Routing),
        }
    }
}

/// Holder of downloadable export blobs
pub trait ExportStore {
    /// Store bytes and hand out a reference to them
    fn publish(&self, bytes: Vec<u8>, media_type: &str) -> Result<ExportArtifact>;

    /// Bytes behind a live reference
    fn fetch(&self, artifact: &ExportArtifact) -> Result<Vec<u8>>;

    /// Release the bytes; the reference is dead afterwards
    fn revoke(&self, artifact: &ExportArtifact) -> Result<()>;
}
