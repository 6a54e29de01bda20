//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use crate::domain::ports::SharedDirectory;

/// Ports available to HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account lookup used for uniqueness checks.
    pub directory: SharedDirectory,
}

impl HttpState {
    /// Bundle the directory port for handler injection.
    #[must_use]
    pub fn new(directory: SharedDirectory) -> Self {
        Self { directory }
    }
}
