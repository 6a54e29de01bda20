//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns.
//! Identity resolution and session refresh live in [`authenticate`].

pub mod authenticate;

pub use authenticate::Authenticate;
