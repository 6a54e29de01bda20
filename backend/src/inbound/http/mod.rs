//! HTTP inbound adapter exposing the REST endpoints.

pub mod basic_auth;
pub mod error;
pub mod health;
pub mod identity;
pub mod participants;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
