//! Domain primitives for the donation platform's authentication fragment.
//!
//! Purpose: Define the transport-agnostic types the HTTP adapters build on.
//! Keep types immutable once constructed and document invariants in each
//! type's Rustdoc.
//!
//! Public surface:
//! - [`Failure`] — the closed catalog of user-facing failures.
//! - [`Identity`] / [`Participant`] — per-request identity resolution result.
//! - [`Translate`] — seam for message localisation.
//! - [`ports`] — account lookup abstraction used by the authenticator.

pub mod failure;
pub mod identity;
pub mod ports;
pub mod translate;

pub use self::failure::{DonationPeriod, Failure};
pub use self::identity::{Identity, Participant, ParticipantId};
pub use self::translate::{NoTranslation, Translate};
