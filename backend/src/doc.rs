//! OpenAPI documentation configuration.
//!
//! Registers the participant and health endpoints plus the failure body
//! schema, and describes both credential mechanisms: the session cookie and
//! HTTP Basic for API clients.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::error::FailureBody;
use crate::inbound::http::participants::{ParticipantResponse, UsernameChange};

/// Enrich the generated document with the credential schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Signed session cookie, refreshed on each authenticated response.",
            ))),
        );
        components.add_security_scheme(
            "BasicAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Patronage backend API",
        description = "HTTP interface for authenticated participant access and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = []), ("BasicAuth" = [])),
    paths(
        crate::inbound::http::participants::current_participant,
        crate::inbound::http::participants::change_username,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(FailureBody, ParticipantResponse, UsernameChange))
)]
pub struct ApiDoc;
