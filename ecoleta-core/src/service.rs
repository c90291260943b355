//! High-level service facade that carries out the screen's outbound requests.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::collaborators::Collaborators;
use crate::form::{FormEvent, Request};

/// Executes [`Request`]s against the collaborators and turns each answer into a [`FormEvent`].
#[derive(Clone)]
pub struct RegistrationService {
    collaborators: Arc<Collaborators>,
}

impl RegistrationService {
    /// Create a new service bound to the provided collaborators.
    #[must_use]
    pub fn new(collaborators: Arc<Collaborators>) -> Self {
        Self { collaborators }
    }

    /// Perform one request and report its outcome.
    ///
    /// Failures never escape: they come back as the `Err` side of the answering event.
    pub async fn run(&self, request: Request) -> FormEvent {
        match request {
            Request::Locate => {
                let result = self.collaborators.location.current_position().await;
                if let Ok(point) = &result {
                    debug!(%point, "resolved current position");
                }
                FormEvent::LocationResolved(result.map_err(|err| err.to_string()))
            }
            Request::FetchCategories => {
                let result = self.collaborators.catalog.items().await;
                log_failure("categories", &result);
                FormEvent::CategoriesLoaded(result.map_err(|err| err.to_string()))
            }
            Request::FetchRegions => {
                let result = self.collaborators.geography.regions().await;
                log_failure("states", &result);
                FormEvent::RegionsLoaded(result.map_err(|err| err.to_string()))
            }
            Request::FetchSubRegions(region) => {
                let result = self.collaborators.geography.sub_regions(&region).await;
                log_failure("cities", &result);
                FormEvent::SubRegionsLoaded {
                    region,
                    result: result.map_err(|err| err.to_string()),
                }
            }
            Request::CreatePoint(payload) => {
                let result = self.collaborators.catalog.create_point(&payload).await;
                if result.is_ok() {
                    info!(
                        name = %payload.name,
                        uf = %payload.uf,
                        city = %payload.city,
                        items = payload.items.len(),
                        "collection point created"
                    );
                }
                FormEvent::PointCreated(result.map_err(|err| err.to_string()))
            }
        }
    }
}

fn log_failure<T, E: fmt::Display>(what: &str, result: &Result<T, E>) {
    if let Err(err) = result {
        warn!(error = %err, "failed to load {what}");
    }
}
