//! Provider implementation for Brazilian states and municipalities using the IBGE localities API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use ecoleta_core::{
    model::{RegionCode, SubRegionName},
    ports::{GeographyPort, PortError},
};

/// Public IBGE localities endpoint.
pub const DEFAULT_BASE_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";

/// State entry from /estados
#[derive(Debug, Deserialize)]
struct StateEntry {
    sigla: String,
    // id, nome and regiao exist but are not needed
}

/// Municipality entry from /estados/{uf}/municipios
#[derive(Debug, Deserialize)]
struct MunicipalityEntry {
    nome: String,
    // microrregiao nesting is ignored
}

/// State and city lookup backed by IBGE.
pub struct IbgeGeographyPort {
    client: Client,
    base_url: String,
}

impl IbgeGeographyPort {
    /// Create a new port bound to the given HTTP client and API root.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }
}

#[async_trait]
impl GeographyPort for IbgeGeographyPort {
    async fn regions(&self) -> Result<Vec<RegionCode>, PortError> {
        let states =
            fetch_json::<Vec<StateEntry>>(self.client.get(format!("{}/estados", self.base_url)))
                .await?;
        debug!(count = states.len(), "loaded states");

        Ok(states
            .into_iter()
            .map(|state| RegionCode(state.sigla))
            .collect())
    }

    async fn sub_regions(&self, region: &RegionCode) -> Result<Vec<SubRegionName>, PortError> {
        if region.is_unselected() {
            return Ok(Vec::new());
        }

        let municipalities = fetch_json::<Vec<MunicipalityEntry>>(
            self.client
                .get(format!("{}/estados/{region}/municipios", self.base_url)),
        )
        .await?;
        debug!(%region, count = municipalities.len(), "loaded cities");

        Ok(municipalities
            .into_iter()
            .map(|municipality| SubRegionName(municipality.nome))
            .collect())
    }
}

/// Build the geography port for the IBGE API at `base_url`.
#[must_use]
pub fn geography(client: Client, base_url: impl Into<String>) -> Arc<dyn GeographyPort> {
    Arc::new(IbgeGeographyPort::new(client, base_url))
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(PortError::UnexpectedStatus(status.as_u16()));
    }
    resp.json().await.map_err(PortError::from)
}
