//! Provider implementation for the Ecoleta backend API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use ecoleta_core::{
    model::{CategoryItem, SubmissionPayload},
    ports::{CatalogPort, PortError},
};

/// Where the backend listens during local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// Category listing and point creation against the Ecoleta backend.
pub struct EcoletaCatalogPort {
    client: Client,
    base_url: String,
}

impl EcoletaCatalogPort {
    /// Create a new port bound to the given HTTP client and backend root.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }
}

#[async_trait]
impl CatalogPort for EcoletaCatalogPort {
    async fn items(&self) -> Result<Vec<CategoryItem>, PortError> {
        let items =
            fetch_json::<Vec<CategoryItem>>(self.client.get(format!("{}/items", self.base_url)))
                .await?;
        debug!(count = items.len(), "loaded categories");
        Ok(items)
    }

    async fn create_point(&self, payload: &SubmissionPayload) -> Result<(), PortError> {
        let resp = self
            .client
            .post(format!("{}/points", self.base_url))
            .json(payload)
            .send()
            .await?;

        // Any 2xx counts; the body is not needed.
        check_status(resp).map(drop)
    }
}

/// Build the catalog port for the backend at `base_url`.
#[must_use]
pub fn catalog(client: Client, base_url: impl Into<String>) -> Arc<dyn CatalogPort> {
    Arc::new(EcoletaCatalogPort::new(client, base_url))
}

fn check_status(resp: Response) -> Result<Response, PortError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(PortError::UnexpectedStatus(status.as_u16()))
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    check_status(req.send().await?)?
        .json()
        .await
        .map_err(PortError::from)
}
