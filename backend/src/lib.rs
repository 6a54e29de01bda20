//! Donation-platform backend: request authentication and the user-facing
//! failure catalog.
//!
//! The library holds the transport-agnostic domain ([`domain`]), the HTTP
//! adapter ([`inbound`]), and the request authenticator ([`middleware`]).
//! Server wiring lives in the binary.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;

pub use middleware::Authenticate;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
