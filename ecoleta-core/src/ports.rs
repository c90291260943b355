//! Traits describing the collaborators the registration screen talks to.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{CategoryItem, GeoPoint, RegionCode, SubRegionName, SubmissionPayload};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to collaborator backends.
pub enum PortError {
    /// Network layer failed, including timeouts and undecodable bodies.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Backend answered with a non-success status.
    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),
    /// The collaborator is disabled or cannot answer at all.
    #[error("Unavailable: {0}")]
    Unavailable(String),
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// The application's own backend: category listing and point creation.
pub trait CatalogPort: Send + Sync {
    /// List the selectable material categories.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn items(&self) -> Result<Vec<CategoryItem>, PortError>;

    /// Create a collection point.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or is rejected.
    async fn create_point(&self, payload: &SubmissionPayload) -> Result<(), PortError>;
}

#[async_trait]
/// Third-party lookup for states and their municipalities.
pub trait GeographyPort: Send + Sync {
    /// List state abbreviations.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn regions(&self) -> Result<Vec<RegionCode>, PortError>;

    /// List the municipalities of one state.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn sub_regions(&self, region: &RegionCode) -> Result<Vec<SubRegionName>, PortError>;
}

#[async_trait]
/// One-shot source of the device's current position.
pub trait LocationPort: Send + Sync {
    /// Resolve the current position.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when no position can be determined.
    async fn current_position(&self) -> Result<GeoPoint, PortError>;
}
