//! HTTP server configuration object.

use std::net::SocketAddr;

use patronage::domain::ports::SharedDirectory;
use patronage::inbound::http::session_config::SessionSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) settings: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) directory: SharedDirectory,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(
        settings: SessionSettings,
        bind_addr: SocketAddr,
        directory: SharedDirectory,
    ) -> Self {
        Self {
            settings,
            bind_addr,
            directory,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
