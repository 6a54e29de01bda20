//! Participant API handlers.
//!
//! ```text
//! GET  /api/v1/participant
//! POST /api/v1/participant/username {"username":"alice"}
//! ```
//!
//! These endpoints raise catalog failures instead of ad-hoc errors, so every
//! refusal carries its fixed status code and localized message.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::identity::validate_username;
use crate::domain::ports::DirectoryError;
use crate::domain::{Failure, Participant};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::RequestIdentity;
use crate::inbound::http::state::HttpState;

/// Participant as returned to API clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantResponse {
    /// Stable account identifier.
    #[schema(example = 42)]
    pub id: i64,
    /// Public username.
    #[schema(example = "alice")]
    pub username: String,
}

impl From<&Participant> for ParticipantResponse {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.value(),
            username: participant.username.clone(),
        }
    }
}

/// Username change request body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsernameChange {
    #[schema(example = "alice")]
    pub username: String,
}

/// Return the authenticated participant.
#[utoipa::path(
    get,
    path = "/api/v1/participant",
    responses(
        (status = 200, description = "Authenticated participant", body = ParticipantResponse),
        (status = 403, description = "Login required", body = crate::inbound::http::error::FailureBody),
    ),
    tags = ["participants"],
    operation_id = "currentParticipant"
)]
#[get("/participant")]
pub async fn current_participant(identity: RequestIdentity) -> ApiResult<web::Json<ParticipantResponse>> {
    let participant = identity.require_participant()?;
    Ok(web::Json(ParticipantResponse::from(&participant)))
}

/// Change the authenticated participant's username.
///
/// Validation failures map one-to-one onto the catalog's username family;
/// a suspended account may not act at all.
#[utoipa::path(
    post,
    path = "/api/v1/participant/username",
    request_body = UsernameChange,
    responses(
        (status = 200, description = "Username changed", body = ParticipantResponse),
        (status = 400, description = "Invalid username", body = crate::inbound::http::error::FailureBody),
        (status = 403, description = "Login required or account suspended", body = crate::inbound::http::error::FailureBody),
        (status = 503, description = "Directory unavailable", body = crate::inbound::http::error::FailureBody),
    ),
    tags = ["participants"],
    operation_id = "changeUsername"
)]
#[post("/participant/username")]
pub async fn change_username(
    identity: RequestIdentity,
    state: web::Data<HttpState>,
    payload: web::Json<UsernameChange>,
) -> ApiResult<HttpResponse> {
    let participant = identity.require_participant()?;
    if participant.is_suspended {
        return Err(Failure::AccountSuspended);
    }

    let requested = payload.into_inner().username;
    validate_username(&requested)?;

    let existing = state
        .directory
        .find_by_username(&requested)
        .map_err(|DirectoryError::Unavailable| Failure::NeedDatabase)?;
    if existing.is_some_and(|other| other.id != participant.id) {
        return Err(Failure::UsernameAlreadyTaken {
            username: requested,
        });
    }

    Ok(HttpResponse::Ok().json(ParticipantResponse {
        id: participant.id.value(),
        username: requested,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParticipantId;
    use crate::inbound::http::test_utils::{fixture_directory, test_tokens};
    use crate::middleware::Authenticate;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    macro_rules! participant_app {
        ($directory:expr, $tokens:expr) => {{
            let directory = $directory;
            test::init_service(
                App::new()
                    .app_data(web::Data::new(HttpState::new(directory.clone())))
                    .wrap(Authenticate::new(directory, $tokens))
                    .service(
                        web::scope("/api/v1")
                            .service(current_participant)
                            .service(change_username),
                    ),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn anonymous_participant_lookup_requires_login() {
        let app = participant_app!(fixture_directory(), test_tokens());
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/participant").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["template"], "log-in-required");
    }

    #[actix_web::test]
    async fn session_holder_sees_their_account() {
        let tokens = test_tokens();
        let cookie = tokens.issue(ParticipantId::new(42));
        let app = participant_app!(fixture_directory(), tokens);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/participant")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: ParticipantResponse = test::read_body_json(res).await;
        assert_eq!(body.id, 42);
        assert_eq!(body.username, "alice");
    }

    async fn change(
        username: &str,
        participant: ParticipantId,
    ) -> (StatusCode, Value) {
        let tokens = test_tokens();
        let cookie = tokens.issue(participant);
        let app = participant_app!(fixture_directory(), tokens);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/participant/username")
                .cookie(cookie)
                .set_json(json!({ "username": username }))
                .to_request(),
        )
        .await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn valid_change_echoes_the_new_username() {
        let (status, body) = change("alice2", ParticipantId::new(42)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice2");
    }

    #[actix_web::test]
    async fn over_length_username_renders_the_literal() {
        let name = "this_is_too_long_123456789_and_then_some";
        let (status, body) = change(name, ParticipantId::new(42)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["message"].as_str().expect("message");
        assert!(message.contains(name), "{message}");
    }

    #[actix_web::test]
    async fn restricted_username_is_refused() {
        let (status, body) = change("admin", ParticipantId::new(42)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "The username 'admin' is restricted.");
    }

    #[actix_web::test]
    async fn taken_username_is_refused() {
        let (status, body) = change("bob", ParticipantId::new(42)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "The username 'bob' is already taken.");
    }

    #[actix_web::test]
    async fn keeping_your_own_username_is_not_a_conflict() {
        let (status, body) = change("alice", ParticipantId::new(42)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
    }

    #[actix_web::test]
    async fn suspended_accounts_may_not_act() {
        let (status, body) = change("brand-new", ParticipantId::new(13)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let message = body["message"].as_str().expect("message");
        assert!(message.contains("suspended"), "{message}");
    }
}
