//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};

use crate::domain::ports::{FixtureParticipantDirectory, SharedDirectory};
use crate::domain::{Participant, ParticipantId};
use crate::inbound::http::session::SessionTokens;

/// Directory with the accounts the HTTP tests rely on:
/// - 42 `alice`, API key `open-sesame`;
/// - 7 `bob`, no API key;
/// - 13 `mallory`, suspended.
pub fn fixture_directory() -> SharedDirectory {
    Arc::new(FixtureParticipantDirectory::new([
        Participant::new(ParticipantId::new(42), "alice").with_api_key("open-sesame"),
        Participant::new(ParticipantId::new(7), "bob"),
        Participant::new(ParticipantId::new(13), "mallory")
            .with_api_key("mallory-key")
            .suspended(),
    ]))
}

/// Token issuer with a fresh key per invocation and the `Secure` flag off
/// for local HTTP tests.
pub fn test_tokens() -> SessionTokens {
    SessionTokens::new(Key::generate(), false, SameSite::Lax)
}
