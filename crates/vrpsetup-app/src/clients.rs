//! Adapters wiring configuration to infrastructure

use vrpsetup_domain::model::CONTIGUOUS_USA;
use vrpsetup_infra::export::MemoryExportStore;
use vrpsetup_infra::http_client::{HttpJobClient, ServiceEndpoints};
use vrpsetup_types::{Flow, Result};

use crate::app::{ControllerOptions, SubmissionController};
use crate::config::Config;

/// Open the HTTP client for the configured services
pub fn open_job_client(config: &Config) -> Result<HttpJobClient> {
    let endpoints = ServiceEndpoints {
        geocode_url: config.geocode_url.clone(),
        routing_url: config.routing_url.clone(),
    };
    HttpJobClient::new(endpoints, config.request_timeout())
}

/// Controller options taken from the config
pub fn controller_options(config: &Config) -> ControllerOptions {
    ControllerOptions {
        stack_id: config.stack_id,
        geocode_required_fields: config.geocode_required_fields.clone(),
        bounding_box: CONTIGUOUS_USA,
    }
}

/// Start a session backed by an in-memory export store
pub fn open_session(config: &Config, flow: Flow) -> SubmissionController<MemoryExportStore> {
    SubmissionController::new(flow, controller_options(config), MemoryExportStore::new())
}
