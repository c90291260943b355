//! Core types, ports, and the registration controller for Ecoleta collection points.

/// Bundle of ports a registration screen is wired to.
pub mod collaborators;
/// Registration screen state and transitions.
pub mod form;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Traits describing the collaborator interfaces.
pub mod ports;
/// Service facade executing outbound requests.
pub mod service;

pub use collaborators::*;
pub use form::*;
pub use model::*;
pub use ports::*;
pub use service::*;
