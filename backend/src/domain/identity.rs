//! Participant identity model.
//!
//! A request resolves to exactly one [`Identity`]: either the anonymous
//! default or an authenticated [`Participant`]. The identity is immutable
//! once resolved; handlers only read it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::failure::{Failure, USERNAME_MAX_SIZE};

/// Stable numeric account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(i64);

impl ParticipantId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ParticipantId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

/// Stored account record as seen by the authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable account identifier.
    pub id: ParticipantId,
    /// Unique public username.
    pub username: String,
    /// API key accepted via HTTP Basic credentials, when one is issued.
    pub api_key: Option<String>,
    /// Suspended accounts keep read access but may not act.
    pub is_suspended: bool,
}

impl Participant {
    /// Construct an active participant without an API key.
    pub fn new(id: ParticipantId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            api_key: None,
            is_suspended: false,
        }
    }

    /// Attach an API key so the account can authenticate with Basic
    /// credentials.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Mark the account as suspended.
    #[must_use]
    pub fn suspended(mut self) -> Self {
        self.is_suspended = true;
        self
    }
}

/// The calling identity for one request.
///
/// `Anonymous` is the constant default; there is no mutable singleton. Once
/// the authenticator stores an identity in the request it is never changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    /// No valid credentials were presented.
    #[default]
    Anonymous,
    /// Credentials resolved to a stored account.
    Participant(Participant),
}

impl Identity {
    /// Whether this identity is the anonymous default.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Borrow the authenticated participant, if any.
    #[must_use]
    pub const fn participant(&self) -> Option<&Participant> {
        match self {
            Self::Anonymous => None,
            Self::Participant(participant) => Some(participant),
        }
    }
}

/// Usernames reserved for platform pages and operational endpoints.
const RESTRICTED_USERNAMES: &[&str] = &[
    "about", "admin", "assets", "auth", "search", "username", "www",
];

/// Validate a proposed username against the platform's naming rules.
///
/// Checks run in the order the platform reports them: empty, length,
/// character set, restricted names. Uniqueness is a directory concern and
/// checked separately.
pub fn validate_username(username: &str) -> Result<(), Failure> {
    if username.is_empty() {
        return Err(Failure::UsernameIsEmpty);
    }
    if username.chars().count() > USERNAME_MAX_SIZE {
        return Err(Failure::UsernameTooLong {
            username: username.to_owned(),
        });
    }
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        return Err(Failure::UsernameContainsInvalidCharacters {
            username: username.to_owned(),
        });
    }
    if RESTRICTED_USERNAMES.contains(&username.to_ascii_lowercase().as_str()) {
        return Err(Failure::UsernameIsRestricted {
            username: username.to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn anonymous_is_the_default() {
        assert!(Identity::default().is_anonymous());
        assert!(Identity::default().participant().is_none());
    }

    #[rstest]
    fn participant_identity_exposes_the_account() {
        let participant = Participant::new(ParticipantId::new(42), "alice");
        let identity = Identity::Participant(participant.clone());
        assert!(!identity.is_anonymous());
        assert_eq!(identity.participant(), Some(&participant));
    }

    #[rstest]
    #[case("", Failure::UsernameIsEmpty)]
    #[case(
        "this_is_too_long_123456789_and_then_some",
        Failure::UsernameTooLong { username: "this_is_too_long_123456789_and_then_some".to_owned() }
    )]
    #[case(
        "no spaces",
        Failure::UsernameContainsInvalidCharacters { username: "no spaces".to_owned() }
    )]
    #[case(
        "émile",
        Failure::UsernameContainsInvalidCharacters { username: "émile".to_owned() }
    )]
    #[case(
        "admin",
        Failure::UsernameIsRestricted { username: "admin".to_owned() }
    )]
    #[case(
        "Assets",
        Failure::UsernameIsRestricted { username: "Assets".to_owned() }
    )]
    fn validate_username_rejects(#[case] username: &str, #[case] expected: Failure) {
        assert_eq!(validate_username(username), Err(expected));
    }

    #[rstest]
    #[case("alice")]
    #[case("a-b_c42")]
    #[case("X")]
    fn validate_username_accepts(#[case] username: &str) {
        assert_eq!(validate_username(username), Ok(()));
    }
}
