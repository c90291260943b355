//! Providers resolving the device's current position.
//!
//! A terminal has no browser geolocation, so the position is either looked up
//! from the public IP address, taken from configuration, or not resolved at all.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use ecoleta_core::{
    model::GeoPoint,
    ports::{LocationPort, PortError},
};

/// Public IP geolocation endpoint answering with `latitude`/`longitude`.
pub const DEFAULT_LOOKUP_URL: &str = "https://ipapi.co/json/";

/// Response from the IP lookup endpoint
#[derive(Debug, Deserialize)]
struct LookupResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,

    // ipapi reports rate limiting and reserved ranges in-band
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Position lookup from the caller's public IP address.
pub struct IpLocationPort {
    client: Client,
    url: String,
}

impl IpLocationPort {
    /// Create a new port querying `url` with the given HTTP client.
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl LocationPort for IpLocationPort {
    async fn current_position(&self) -> Result<GeoPoint, PortError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PortError::UnexpectedStatus(status.as_u16()));
        }

        let lookup = resp.json::<LookupResponse>().await?;
        if lookup.error {
            return Err(PortError::Unavailable(
                lookup
                    .reason
                    .unwrap_or_else(|| "lookup refused".to_owned()),
            ));
        }

        match (lookup.latitude, lookup.longitude) {
            (Some(latitude), Some(longitude)) => {
                let point = GeoPoint::new(latitude, longitude);
                debug!(%point, "located by IP address");
                Ok(point)
            }
            _ => Err(PortError::Unavailable(
                "lookup returned no coordinates".to_owned(),
            )),
        }
    }
}

/// Always answers with the same configured point.
pub struct FixedLocationPort {
    point: GeoPoint,
}

impl FixedLocationPort {
    /// Create a port that reports `point`.
    #[must_use]
    pub fn new(point: GeoPoint) -> Self {
        Self { point }
    }
}

#[async_trait]
impl LocationPort for FixedLocationPort {
    async fn current_position(&self) -> Result<GeoPoint, PortError> {
        Ok(self.point)
    }
}

/// Never resolves a position; the map keeps its default view.
pub struct DisabledLocationPort;

#[async_trait]
impl LocationPort for DisabledLocationPort {
    async fn current_position(&self) -> Result<GeoPoint, PortError> {
        Err(PortError::Unavailable("location lookup disabled".to_owned()))
    }
}

/// Build a port locating by IP through `url`.
#[must_use]
pub fn ip_lookup(client: Client, url: impl Into<String>) -> Arc<dyn LocationPort> {
    Arc::new(IpLocationPort::new(client, url))
}

/// Build a port reporting a fixed point.
#[must_use]
pub fn fixed(point: GeoPoint) -> Arc<dyn LocationPort> {
    Arc::new(FixedLocationPort::new(point))
}

/// Build a port that never resolves.
#[must_use]
pub fn disabled() -> Arc<dyn LocationPort> {
    Arc::new(DisabledLocationPort)
}
