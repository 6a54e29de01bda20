//! Ports exposed to inbound adapters.
//!
//! The authenticator only needs a fast keyed read of account records; the
//! trait keeps the storage engine out of scope and lets tests substitute an
//! in-memory directory.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::identity::{Participant, ParticipantId};

/// Failures surfaced by a participant directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// The backing store cannot be reached; callers map this to the 503
    /// [`crate::domain::Failure::NeedDatabase`] response.
    #[error("participant directory is unavailable")]
    Unavailable,
}

/// Keyed lookup of stored account records.
pub trait ParticipantDirectory: Send + Sync {
    /// Find an account by its numeric identifier.
    fn find(&self, id: ParticipantId) -> Result<Option<Participant>, DirectoryError>;

    /// Find an account by its exact username.
    fn find_by_username(&self, username: &str) -> Result<Option<Participant>, DirectoryError>;
}

/// Shared handle to a directory implementation.
pub type SharedDirectory = Arc<dyn ParticipantDirectory>;

/// In-memory directory used by the default server wiring and tests.
#[derive(Debug, Default, Clone)]
pub struct FixtureParticipantDirectory {
    by_id: HashMap<ParticipantId, Participant>,
}

impl FixtureParticipantDirectory {
    /// Build a directory over the given accounts.
    #[must_use]
    pub fn new(participants: impl IntoIterator<Item = Participant>) -> Self {
        let by_id = participants
            .into_iter()
            .map(|participant| (participant.id, participant))
            .collect();
        Self { by_id }
    }
}

impl ParticipantDirectory for FixtureParticipantDirectory {
    fn find(&self, id: ParticipantId) -> Result<Option<Participant>, DirectoryError> {
        Ok(self.by_id.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Participant>, DirectoryError> {
        Ok(self
            .by_id
            .values()
            .find(|participant| participant.username == username)
            .cloned())
    }
}

/// Directory double that reports the backing store as down.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableDirectory;

impl ParticipantDirectory for UnavailableDirectory {
    fn find(&self, _id: ParticipantId) -> Result<Option<Participant>, DirectoryError> {
        Err(DirectoryError::Unavailable)
    }

    fn find_by_username(&self, _username: &str) -> Result<Option<Participant>, DirectoryError> {
        Err(DirectoryError::Unavailable)
    }
}
