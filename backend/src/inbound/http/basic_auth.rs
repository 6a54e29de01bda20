//! HTTP Basic credential resolution.
//!
//! API clients may authenticate with `Authorization: Basic
//! base64("{participant_id}:{api_key}")`. Resolution distinguishes a
//! malformed header (400) from credentials that simply do not check out
//! (401); a validation failure never produces a 500. The API key comparison
//! is constant-time to avoid a timing side channel.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use subtle::ConstantTimeEq;

use crate::domain::ports::{DirectoryError, ParticipantDirectory};
use crate::domain::{Identity, ParticipantId};

/// Scheme prefix for Basic credentials, including the separating space.
pub const BASIC_PREFIX: &str = "Basic ";

/// Failures while resolving Basic credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BasicAuthError {
    /// The header payload is not decodable Basic syntax.
    #[error("malformed \"Authorization\" header")]
    Malformed,
    /// The credentials are well-formed but do not match an account. The
    /// message is deliberately uniform across the unknown-id, missing-key,
    /// and wrong-key cases.
    #[error("bad credentials")]
    BadCredentials,
    /// The account lookup could not run.
    #[error(transparent)]
    Unavailable(#[from] DirectoryError),
}

impl ResponseError for BasicAuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Malformed => StatusCode::BAD_REQUEST,
            Self::BadCredentials => StatusCode::UNAUTHORIZED,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "message": self.to_string() }))
    }
}

/// Resolve a `Basic` Authorization header value to an identity.
///
/// Steps, in order:
/// 1. base64-decode the payload after the scheme prefix — undecodable input
///    is [`BasicAuthError::Malformed`];
/// 2. split on the first colon — anything but exactly two parts is
///    `Malformed`;
/// 3. parse the left part as a numeric account id — non-numeric is
///    [`BasicAuthError::BadCredentials`];
/// 4. look the account up and compare the supplied key against the stored
///    one in constant time — any mismatch is `BadCredentials`.
///
/// Success always yields a non-anonymous identity.
pub fn resolve(
    header: &str,
    directory: &dyn ParticipantDirectory,
) -> Result<Identity, BasicAuthError> {
    let encoded = header
        .strip_prefix(BASIC_PREFIX)
        .ok_or(BasicAuthError::Malformed)?;
    let payload = BASE64
        .decode(encoded.trim())
        .map_err(|_| BasicAuthError::Malformed)?;

    let mut parts = payload.splitn(2, |&byte| byte == b':');
    let id = parts.next().ok_or(BasicAuthError::Malformed)?;
    let supplied_key = parts.next().ok_or(BasicAuthError::Malformed)?;

    let id: ParticipantId = std::str::from_utf8(id)
        .map_err(|_| BasicAuthError::BadCredentials)?
        .parse()
        .map_err(|_| BasicAuthError::BadCredentials)?;

    let participant = directory.find(id)?.ok_or(BasicAuthError::BadCredentials)?;
    let stored_key = participant
        .api_key
        .as_deref()
        .ok_or(BasicAuthError::BadCredentials)?;

    if bool::from(stored_key.as_bytes().ct_eq(supplied_key)) {
        Ok(Identity::Participant(participant))
    } else {
        Err(BasicAuthError::BadCredentials)
    }
}
