//! HTTP adapter mapping for the failure catalog.
//!
//! Purpose: keep [`Failure`] transport-agnostic while letting actix handlers
//! turn catalog values into consistent JSON responses. The status code is
//! fixed per variant; the body carries the rendered message and, where one
//! exists, the HTML template hint for the out-of-process page renderer.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Failure, NoTranslation};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Failure>;

/// JSON body emitted for a catalog failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct FailureBody {
    /// Localized human-readable explanation.
    #[schema(example = "You need to log in")]
    pub message: String,
    /// Template hint for HTML rendering, when a dedicated page exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "log-in-required")]
    pub template: Option<&'static str>,
}

/// Fixed status code for a catalog variant; exactly one per variant.
pub fn status_for(failure: &Failure) -> StatusCode {
    match failure {
        Failure::UsernameIsEmpty
        | Failure::UsernameTooLong { .. }
        | Failure::UsernameContainsInvalidCharacters { .. }
        | Failure::UsernameIsRestricted { .. }
        | Failure::UsernameAlreadyTaken { .. }
        | Failure::EmailAlreadyTaken { .. }
        | Failure::CannotRemovePrimaryEmail
        | Failure::EmailNotVerified { .. }
        | Failure::TooManyEmailAddresses
        | Failure::BadEmailAddress { .. }
        | Failure::BadPasswordSize
        | Failure::NoSelfTipping
        | Failure::NoTippee { .. }
        | Failure::BadAmount { .. }
        | Failure::UserDoesntAcceptTips { .. }
        | Failure::NonexistingElsewhere
        | Failure::NegativeBalance
        | Failure::NotEnoughWithdrawableMoney { .. }
        | Failure::FeeExceedsAmount
        | Failure::InvalidNumber { .. }
        | Failure::CommunityAlreadyExists { .. }
        | Failure::InvalidCommunityName { .. } => StatusCode::BAD_REQUEST,
        Failure::AuthRequired | Failure::LoginRequired | Failure::AccountSuspended => {
            StatusCode::FORBIDDEN
        }
        Failure::NeedDatabase | Failure::PaydayIsRunning => StatusCode::SERVICE_UNAVAILABLE,
        Failure::TransferError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Failure {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        // Locale negotiation belongs to the page renderer; the JSON surface
        // renders the English templates.
        HttpResponse::build(self.status_code()).json(FailureBody {
            message: self.render(&NoTranslation),
            template: self.template(),
        })
    }
}
