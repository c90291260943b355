//! Bundle of the ports a registration screen depends on.

use std::sync::Arc;

use crate::ports::{CatalogPort, GeographyPort, LocationPort};

/// Concrete implementations backing one registration screen.
#[derive(Clone)]
pub struct Collaborators {
    /// Backend for categories and point creation.
    pub catalog: Arc<dyn CatalogPort>,
    /// State and city lookup.
    pub geography: Arc<dyn GeographyPort>,
    /// Current position source.
    pub location: Arc<dyn LocationPort>,
}

impl Collaborators {
    /// Bundle the three ports.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        geography: Arc<dyn GeographyPort>,
        location: Arc<dyn LocationPort>,
    ) -> Self {
        Self {
            catalog,
            geography,
            location,
        }
    }
}
