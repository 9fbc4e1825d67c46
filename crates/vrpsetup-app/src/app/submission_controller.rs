//! Submission Controller - drives one upload session
//!
//! Phases:
//! `Idle → FileSelected → Validating → (Valid → Submitting → {Success, Failure}) | Invalid`
//!
//! `Invalid` and `Failure` report their error and fall back to `Idle`. At most
//! one request is in flight; a second submit while `Submitting` is rejected.

use std::path::Path;

use vrpsetup_domain::gateway::{ExportStore, JobClient};
use vrpsetup_domain::model::export::CSV_MEDIA_TYPE;
use vrpsetup_domain::model::{
    BoundingBox, ExportArtifact, GeocodeResponse, JobRequest, JobResponse, MarkerState, Record,
    RoutingSolution, CONTIGUOUS_USA,
};
use vrpsetup_domain::service::{
    build_geocode_job, build_routing_job, validate_geocode_records, validate_routing_inputs,
};
use vrpsetup_infra::export::records_to_csv;
use vrpsetup_infra::tabular;
use vrpsetup_types::{Error, Flow, ParseError, Result};

use super::form_state::RoutingForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    FileSelected,
    Validating,
    Valid,
    Invalid,
    Submitting,
    Success,
    Failure,
}

/// Per-session settings
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    /// Passed through unchanged into geocode jobs
    pub stack_id: i64,
    pub geocode_required_fields: Vec<String>,
    pub bounding_box: BoundingBox,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            stack_id: 1,
            geocode_required_fields: vec!["zip".to_string()],
            bounding_box: CONTIGUOUS_USA,
        }
    }
}

pub struct SubmissionController<S: ExportStore> {
    flow: Flow,
    options: ControllerOptions,
    phase: SubmissionPhase,
    form: RoutingForm,
    file_name: Option<String>,
    records: Option<Vec<Record>>,
    /// Validated request while `Valid`, the in-flight one while `Submitting`
    prepared: Option<JobRequest>,
    markers: MarkerState,
    solution: Option<RoutingSolution>,
    artifact: Option<ExportArtifact>,
    store: S,
}

impl<S: ExportStore> SubmissionController<S> {
    pub fn new(flow: Flow, options: ControllerOptions, store: S) -> Self {
        Self {
            flow,
            options,
            phase: SubmissionPhase::Idle,
            form: RoutingForm::new(),
            file_name: None,
            records: None,
            prepared: None,
            markers: MarkerState::default(),
            solution: None,
            artifact: None,
            store,
        }
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn form(&self) -> &RoutingForm {
        &self.form
    }

    /// Records of the current upload, empty before one succeeds
    pub fn records(&self) -> &[Record] {
        self.records.as_deref().unwrap_or(&[])
    }

    /// Name shown on the file input
    pub fn file_label(&self) -> &str {
        self.file_name
            .as_deref()
            .unwrap_or_else(|| self.flow.default_file_label())
    }

    pub fn markers(&self) -> &MarkerState {
        &self.markers
    }

    /// The validated or in-flight request, if any
    pub fn prepared_request(&self) -> Option<&JobRequest> {
        self.prepared.as_ref()
    }

    pub fn routing_solution(&self) -> Option<&RoutingSolution> {
        self.solution.as_ref()
    }

    pub fn export_artifact(&self) -> Option<&ExportArtifact> {
        self.artifact.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Download the current export, if one was produced
    pub fn export_bytes(&self) -> Result<Option<Vec<u8>>> {
        match &self.artifact {
            Some(artifact) => self.store.fetch(artifact).map(Some),
            None => Ok(None),
        }
    }

    // ---- form edits ----

    pub fn set_origin_latitude(&mut self, text: &str) -> Result<()> {
        self.edit(|form| form.set_origin_latitude(text))
    }

    pub fn set_origin_longitude(&mut self, text: &str) -> Result<()> {
        self.edit(|form| form.set_origin_longitude(text))
    }

    pub fn set_vehicle_capacity(&mut self, text: &str) -> Result<()> {
        self.edit(|form| form.set_vehicle_capacity(text))
    }

    pub fn set_vehicle_unit(&mut self, text: &str) {
        self.edit(|form| form.set_vehicle_unit(text))
    }

    /// Apply a form edit; a validated job no longer matches the form
    fn edit<T>(&mut self, apply: impl FnOnce(&mut RoutingForm) -> T) -> T {
        let out = apply(&mut self.form);
        if matches!(self.phase, SubmissionPhase::Valid | SubmissionPhase::Success) {
            self.prepared = None;
            let next = if self.records.is_some() {
                SubmissionPhase::FileSelected
            } else {
                SubmissionPhase::Idle
            };
            self.transition(next);
        }
        out
    }

    // ---- transitions ----

    /// Ingest an uploaded file given its name and contents
    pub fn select_file(&mut self, name: &str, bytes: &[u8]) -> Result<usize> {
        self.reject_if_submitting()?;
        self.start_upload(name);
        let parsed = tabular::parse(bytes);
        self.finish_upload(parsed)
    }

    /// Ingest a file from disk
    pub fn select_path(&mut self, path: &Path) -> Result<usize> {
        self.reject_if_submitting()?;
        self.start_upload(&path.to_string_lossy());
        let parsed = tabular::parse_file(path);
        self.finish_upload(parsed)
    }

    fn start_upload(&mut self, name: &str) {
        let label = name
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(name)
            .to_string();
        self.file_name = Some(label);
        self.markers = MarkerState::default();
        self.solution = None;
        self.prepared = None;
    }

    fn finish_upload(&mut self, parsed: std::result::Result<Vec<Record>, ParseError>) -> Result<usize> {
        match parsed {
            Ok(records) => {
                let count = records.len();
                tracing::info!(file = %self.file_label(), rows = count, "File selected");
                self.records = Some(records);
                self.transition(SubmissionPhase::FileSelected);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(file = %self.file_label(), error = %e, "File rejected");
                self.records = None;
                self.transition(SubmissionPhase::Idle);
                Err(e.into())
            }
        }
    }

    /// Run the flow's validation sequence and build the request
    pub fn validate(&mut self) -> Result<&JobRequest> {
        self.reject_if_submitting()?;
        if self.records.is_none() {
            return Err(Error::NotReady("no file selected".to_string()));
        }

        self.transition(SubmissionPhase::Validating);
        match self.check() {
            Ok(request) => {
                self.transition(SubmissionPhase::Valid);
                let request = self.prepared.insert(request);
                Ok(&*request)
            }
            Err(e) => {
                tracing::warn!(flow = %self.flow, error = %e, "Validation failed");
                self.prepared = None;
                self.transition(SubmissionPhase::Invalid);
                self.transition(SubmissionPhase::Idle);
                Err(e)
            }
        }
    }

    fn check(&self) -> Result<JobRequest> {
        let records = self.records();
        match self.flow {
            Flow::Geocode => {
                validate_geocode_records(records, &self.options.geocode_required_fields)?;
                Ok(JobRequest::Geocode(build_geocode_job(
                    self.options.stack_id,
                    records.to_vec(),
                )))
            }
            Flow::Routing => {
                let (origin, vehicle, demand) = validate_routing_inputs(
                    &self.form.inputs(),
                    records,
                    &self.options.bounding_box,
                )?;
                Ok(JobRequest::Routing(build_routing_job(origin, vehicle, demand)))
            }
        }
    }

    /// Enter `Submitting` and hand out the request to send.
    ///
    /// Validates first unless already `Valid`.
    pub fn begin_submission(&mut self) -> Result<JobRequest> {
        self.reject_if_submitting()?;
        if self.phase != SubmissionPhase::Valid {
            self.validate()?;
        }
        let request = self
            .prepared
            .clone()
            .ok_or_else(|| Error::NotReady("nothing to submit".to_string()))?;

        tracing::info!(flow = %self.flow, rows = request.row_count(), "Submitting");
        self.transition(SubmissionPhase::Submitting);
        Ok(request)
    }

    /// Apply the outcome of the in-flight request
    pub fn finish_submission(&mut self, outcome: Result<JobResponse>) -> Result<&MarkerState> {
        if self.phase != SubmissionPhase::Submitting {
            return Err(Error::NotReady("no submission in flight".to_string()));
        }
        let request = self.prepared.take();

        let applied = match (request, outcome) {
            (_, Err(e)) => Err(e),
            (Some(JobRequest::Geocode(_)), Ok(JobResponse::Geocode(response))) => {
                self.apply_geocodes(response)
            }
            (Some(JobRequest::Routing(job)), Ok(JobResponse::Routing(solution))) => {
                job.demand.points().map(|destinations| {
                    self.markers = MarkerState {
                        origin: Some(job.origin),
                        destinations,
                    };
                    self.solution = Some(solution);
                })
            }
            (_, Ok(response)) => Err(Error::Submission(format!(
                "{} response received for a {} submission",
                response.flow(),
                self.flow
            ))),
        };

        match applied {
            Ok(()) => {
                tracing::info!(
                    flow = %self.flow,
                    destinations = self.markers.destinations.len(),
                    "Submission succeeded"
                );
                self.transition(SubmissionPhase::Success);
                Ok(&self.markers)
            }
            Err(e) => {
                let e = match e {
                    Error::Submission(_) => e,
                    other => Error::Submission(other.to_string()),
                };
                tracing::warn!(flow = %self.flow, error = %e, "Submission failed");
                self.transition(SubmissionPhase::Failure);
                self.transition(SubmissionPhase::Idle);
                Err(e)
            }
        }
    }

    fn apply_geocodes(&mut self, response: GeocodeResponse) -> Result<()> {
        let published = if response.geocodes.is_empty() {
            None
        } else {
            let csv = records_to_csv(&response.geocodes)?;
            Some(self.store.publish(csv.into_bytes(), CSV_MEDIA_TYPE)?)
        };

        // The superseded export is released only once its replacement exists
        if let Some(old) = std::mem::replace(&mut self.artifact, published) {
            if let Err(e) = self.store.revoke(&old) {
                tracing::warn!(url = %old.url, error = %e, "Failed to revoke export");
            }
        }

        self.markers = MarkerState {
            origin: None,
            destinations: response.points(),
        };
        Ok(())
    }

    /// Validate if needed, send exactly one request, apply its outcome
    pub async fn submit<C>(&mut self, client: &C) -> Result<&MarkerState>
    where
        C: JobClient + ?Sized,
    {
        let request = self.begin_submission()?;
        let in_flight = InFlight {
            controller: Some(self),
        };
        let outcome = client.send(&request).await;
        match in_flight.disarm() {
            Some(controller) => controller.finish_submission(outcome),
            None => Err(Error::NotReady("no submission in flight".to_string())),
        }
    }

    /// The in-flight request was dropped before its outcome arrived
    fn abandon_submission(&mut self) {
        if self.phase != SubmissionPhase::Submitting {
            return;
        }
        tracing::warn!(flow = %self.flow, "Submission abandoned before a response arrived");
        self.prepared = None;
        self.transition(SubmissionPhase::Failure);
        self.transition(SubmissionPhase::Idle);
    }

    /// Release session resources
    pub fn end_session(mut self) -> Result<()> {
        match self.artifact.take() {
            Some(artifact) => self.store.revoke(&artifact),
            None => Ok(()),
        }
    }

    fn reject_if_submitting(&self) -> Result<()> {
        if self.phase == SubmissionPhase::Submitting {
            tracing::warn!(flow = %self.flow, "Rejected action while a submission is in flight");
            return Err(Error::ConcurrentSubmission);
        }
        Ok(())
    }

    fn transition(&mut self, next: SubmissionPhase) {
        tracing::debug!(flow = %self.flow, from = ?self.phase, to = ?next, "Phase transition");
        self.phase = next;
    }
}

impl<S: ExportStore> Drop for SubmissionController<S> {
    fn drop(&mut self) {
        if let Some(artifact) = self.artifact.take() {
            if let Err(e) = self.store.revoke(&artifact) {
                tracing::warn!(url = %artifact.url, error = %e, "Failed to revoke export");
            }
        }
    }
}

/// Returns the controller to `Idle` if `submit` is dropped mid-request
struct InFlight<'a, S: ExportStore> {
    controller: Option<&'a mut SubmissionController<S>>,
}

impl<'a, S: ExportStore> InFlight<'a, S> {
    fn disarm(mut self) -> Option<&'a mut SubmissionController<S>> {
        self.controller.take()
    }
}

impl<S: ExportStore> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.abandon_submission();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vrpsetup_domain::model::GeoPoint;
    use vrpsetup_infra::export::MemoryExportStore;
    use vrpsetup_types::ValidationRule;

    fn geocode_controller() -> SubmissionController<MemoryExportStore> {
        SubmissionController::new(
            Flow::Geocode,
            ControllerOptions::default(),
            MemoryExportStore::new(),
        )
    }

    fn routing_controller() -> SubmissionController<MemoryExportStore> {
        let mut c = SubmissionController::new(
            Flow::Routing,
            ControllerOptions::default(),
            MemoryExportStore::new(),
        );
        c.set_origin_latitude("39.1").unwrap();
        c.set_origin_longitude("-94.6").unwrap();
        c.set_vehicle_capacity("30").unwrap();
        c.set_vehicle_unit("kg");
        c
    }

    fn geocodes(points: &[(&str, f64, f64)]) -> JobResponse {
        let geocodes = points
            .iter()
            .map(|(zip, lat, lon)| {
                serde_json::from_value(json!({"zip": zip, "latitude": lat, "longitude": lon}))
                    .unwrap()
            })
            .collect();
        JobResponse::Geocode(GeocodeResponse { geocodes })
    }

    #[test]
    fn test_label_defaults_and_last_segment() {
        let mut c = geocode_controller();
        assert_eq!(c.file_label(), "zipcode file");
        c.select_file("C:\\fakepath\\zips.csv", b"zip\n10001\n").unwrap();
        assert_eq!(c.file_label(), "zips.csv");
        c.select_file("/home/me/more.csv", b"zip\n10001\n").unwrap();
        assert_eq!(c.file_label(), "more.csv");
        assert_eq!(routing_controller().file_label(), "demand file");
    }

    #[test]
    fn test_parse_error_returns_to_idle() {
        let mut c = geocode_controller();
        c.select_file("zips.csv", b"zip\n10001\n").unwrap();
        assert_eq!(c.phase(), SubmissionPhase::FileSelected);

        let err = c.select_file("empty.csv", b"").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MissingHeader)));
        assert_eq!(c.phase(), SubmissionPhase::Idle);
        assert!(c.records().is_empty());
        assert!(matches!(c.validate(), Err(Error::NotReady(_))));
    }

    #[test]
    fn test_invalid_returns_to_idle_and_allows_fix() {
        let mut c = routing_controller();
        c.select_file("demand.csv", b"latitude,longitude,kg\n40.0,-100.0,5\n")
            .unwrap();
        c.set_vehicle_capacity("12.5").unwrap();
        let err = c.validate().unwrap_err();
        assert_eq!(err.rule(), Some(ValidationRule::CapacityNotPositiveInteger));
        assert_eq!(c.phase(), SubmissionPhase::Idle);

        c.set_vehicle_capacity("12").unwrap();
        assert!(c.validate().is_ok());
        assert_eq!(c.phase(), SubmissionPhase::Valid);
    }

    #[test]
    fn test_edit_after_validation_invalidates() {
        let mut c = routing_controller();
        c.select_file("demand.csv", b"latitude,longitude,kg\n40.0,-100.0,5\n")
            .unwrap();
        c.validate().unwrap();
        c.set_vehicle_unit("lbs");
        assert_eq!(c.phase(), SubmissionPhase::FileSelected);
        assert!(c.prepared_request().is_none());
        match c.validate() {
            Err(Error::MissingField { field, row }) => {
                assert_eq!(field, "lbs");
                assert_eq!(row, Some(1));
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let mut c = geocode_controller();
        c.select_file("zips.csv", b"zip\n10001\n").unwrap();
        c.begin_submission().unwrap();
        assert!(matches!(c.begin_submission(), Err(Error::ConcurrentSubmission)));
        assert!(matches!(
            c.select_file("other.csv", b"zip\n1\n"),
            Err(Error::ConcurrentSubmission)
        ));
        assert_eq!(c.phase(), SubmissionPhase::Submitting);
    }

    #[test]
    fn test_finish_without_begin() {
        let mut c = geocode_controller();
        assert!(matches!(
            c.finish_submission(Ok(geocodes(&[]))),
            Err(Error::NotReady(_))
        ));
    }

    #[test]
    fn test_failure_returns_to_idle_then_retry() {
        let mut c = geocode_controller();
        c.select_file("zips.csv", b"zip\n10001\n").unwrap();
        c.begin_submission().unwrap();
        let err = c
            .finish_submission(Err(Error::Submission("connection refused".to_string())))
            .unwrap_err();
        assert!(matches!(err, Error::Submission(ref m) if m == "connection refused"));
        assert_eq!(c.phase(), SubmissionPhase::Idle);

        let request = c.begin_submission().unwrap();
        assert_eq!(request.row_count(), 1);
        c.finish_submission(Ok(geocodes(&[("10001", 40.75, -73.99)])))
            .unwrap();
        assert_eq!(c.phase(), SubmissionPhase::Success);
    }

    #[test]
    fn test_mismatched_response_is_failure() {
        let mut c = geocode_controller();
        c.select_file("zips.csv", b"zip\n10001\n").unwrap();
        c.begin_submission().unwrap();
        let err = c
            .finish_submission(Ok(JobResponse::Routing(RoutingSolution(json!({})))))
            .unwrap_err();
        assert!(matches!(err, Error::Submission(_)));
        assert_eq!(c.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_routing_success_markers() {
        let mut c = routing_controller();
        c.select_file(
            "demand.csv",
            b"latitude,longitude,kg\n40.0,-100.0,5\n41.5,-90.25,7\n",
        )
        .unwrap();
        c.begin_submission().unwrap();
        let markers = c
            .finish_submission(Ok(JobResponse::Routing(RoutingSolution(json!({"routes": []})))))
            .unwrap()
            .clone();
        assert_eq!(markers.origin, Some(GeoPoint { latitude: 39.1, longitude: -94.6 }));
        assert_eq!(markers.destinations.len(), 2);
        assert_eq!(c.routing_solution().unwrap().0, json!({"routes": []}));
        assert!(c.export_artifact().is_none());
    }

    #[test]
    fn test_new_upload_discards_markers() {
        let mut c = geocode_controller();
        c.select_file("zips.csv", b"zip\n10001\n").unwrap();
        c.begin_submission().unwrap();
        c.finish_submission(Ok(geocodes(&[("10001", 40.75, -73.99)])))
            .unwrap();
        assert_eq!(c.markers().destinations.len(), 1);

        c.select_file("zips2.csv", b"zip\n94105\n").unwrap();
        assert!(c.markers().is_empty());
        // the old export stays downloadable until a newer response replaces it
        assert!(c.export_artifact().is_some());
    }

    #[test]
    fn test_superseded_export_is_revoked() {
        let mut c = geocode_controller();
        c.select_file("zips.csv", b"zip\n10001\n").unwrap();
        c.begin_submission().unwrap();
        c.finish_submission(Ok(geocodes(&[("10001", 40.75, -73.99)])))
            .unwrap();
        let first = c.export_artifact().cloned().unwrap();

        c.select_file("zips.csv", b"zip\n94105\n").unwrap();
        c.begin_submission().unwrap();
        c.finish_submission(Ok(geocodes(&[("94105", 37.79, -122.4)])))
            .unwrap();
        let second = c.export_artifact().cloned().unwrap();

        assert_ne!(first.url, second.url);
        assert_eq!(c.store().live_count(), 1);
        assert!(c.store().fetch(&first).is_err());

        // empty response: old export released, no new one
        c.begin_submission().unwrap();
        c.finish_submission(Ok(geocodes(&[]))).unwrap();
        assert!(c.export_artifact().is_none());
        assert_eq!(c.store().live_count(), 0);
    }

    #[test]
    fn test_end_session_revokes_export() {
        let mut c = geocode_controller();
        c.select_file("zips.csv", b"zip\n10001\n").unwrap();
        c.begin_submission().unwrap();
        c.finish_submission(Ok(geocodes(&[("10001", 40.75, -73.99)])))
            .unwrap();
        let bytes = c.export_bytes().unwrap().unwrap();
        assert!(!bytes.is_empty());
        assert!(c.end_session().is_ok());
    }
}
