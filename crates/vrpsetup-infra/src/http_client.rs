//! reqwest-backed client for the geocoding and routing services

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use vrpsetup_domain::gateway::JobClient;
use vrpsetup_domain::model::{GeocodeJob, GeocodeResponse, RoutingJob, RoutingSolution};
use vrpsetup_types::{ConfigError, Error, Result};

const USER_AGENT: &str = concat!("vrpsetup/", env!("CARGO_PKG_VERSION"));

/// Service locations; either may be absent when only one flow is used
#[derive(Debug, Clone, Default)]
pub struct ServiceEndpoints {
    pub geocode_url: Option<String>,
    pub routing_url: Option<String>,
}

pub struct HttpJobClient {
    http_client: reqwest::Client,
    endpoints: ServiceEndpoints,
}

impl HttpJobClient {
    pub fn new(endpoints: ServiceEndpoints, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Submission(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoints,
        })
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        tracing::debug!(url = %url, "POST");

        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Submission(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Submission(format!(
                "{} returned {}: {}",
                url,
                status.as_u16(),
                error_text.trim()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Submission(format!("invalid response from {}: {}", url, e)))
    }
}

fn require_url<'a>(url: &'a Option<String>, name: &str) -> Result<&'a str> {
    url.as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| Error::Config(ConfigError::MissingValue(name.to_string())))
}

#[async_trait]
impl JobClient for HttpJobClient {
    async fn geocode(&self, job: &GeocodeJob) -> Result<GeocodeResponse> {
        let url = require_url(&self.endpoints.geocode_url, "geocode_url")?;
        let response: GeocodeResponse = self.post_json(url, job).await?;
        tracing::info!(
            stack_id = job.stack_id,
            sent = job.zipcodes.len(),
            received = response.geocodes.len(),
            "Geocode request completed"
        );
        Ok(response)
    }

    async fn route(&self, job: &RoutingJob) -> Result<RoutingSolution> {
        let url = require_url(&self.endpoints.routing_url, "routing_url")?;
        let solution: RoutingSolution = self.post_json(url, job).await?;
        tracing::info!(demand = job.demand.len(), "Routing request completed");
        Ok(solution)
    }
}
