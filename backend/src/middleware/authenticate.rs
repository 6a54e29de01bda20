//! Request authenticator middleware.
//!
//! Resolves the calling identity for each inbound request and refreshes
//! session state on the outbound side:
//!
//! - asset requests skip authentication entirely;
//! - a `Basic` Authorization header authenticates API clients (and mints a
//!   fresh CSRF token for the response, since those callers sit outside
//!   browser CSRF protection);
//! - otherwise a signed session cookie is validated, with anything invalid
//!   or expired silently treated as anonymous;
//! - on egress, an authenticated response to a request that carried a
//!   session cookie gets a re-issued cookie so the session lifetime slides
//!   forward on activity.
//!
//! Handlers read the result through
//! [`crate::inbound::http::identity::RequestIdentity`].

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage, HttpResponse};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use rand::RngCore;
use tracing::{error, warn};

use crate::domain::ports::SharedDirectory;
use crate::domain::{Failure, Identity};
use crate::inbound::http::basic_auth::{self, BASIC_PREFIX, BasicAuthError};
use crate::inbound::http::session::{SESSION_COOKIE, SessionTokens};

/// Requests under this prefix are never authenticated and never touch
/// session cookies.
pub const ASSET_PREFIX: &str = "/assets/";

/// Cookie carrying the CSRF token for double-submit checks.
pub const CSRF_COOKIE: &str = "csrf_token";

/// Response header carrying a freshly minted CSRF token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Shared authenticator state: the account directory and the session token
/// issuer. Read-only after construction; requests share it without locking.
#[derive(Clone)]
pub struct AuthState {
    pub directory: SharedDirectory,
    pub tokens: SessionTokens,
}

/// Authenticator middleware factory.
///
/// # Examples
/// ```ignore
/// let app = App::new().wrap(Authenticate::new(directory, tokens));
/// ```
#[derive(Clone)]
pub struct Authenticate {
    state: Arc<AuthState>,
}

impl Authenticate {
    /// Build the middleware over a directory and token issuer.
    #[must_use]
    pub fn new(directory: SharedDirectory, tokens: SessionTokens) -> Self {
        Self {
            state: Arc::new(AuthState { directory, tokens }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateMiddleware {
            service,
            state: self.state.clone(),
        }))
    }
}

/// Service wrapper produced by [`Authenticate`].
pub struct AuthenticateMiddleware<S> {
    service: S,
    state: Arc<AuthState>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let state = self.state.clone();
        let resolution = match resolve_identity(&req, state.as_ref()) {
            Ok(resolution) => resolution,
            // Render the refusal here instead of bubbling an Err; the
            // status and body come from the error's ResponseError impl.
            Err(err) => {
                let res = req
                    .into_response(HttpResponse::from_error(err))
                    .map_into_right_body();
                return Box::pin(ready(Ok(res)));
            }
        };
        req.extensions_mut().insert(resolution.identity.clone());

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            apply_egress(&mut res, &state, &resolution);
            Ok(res.map_into_left_body())
        })
    }
}

/// Outcome of ingress identity resolution, carried to the egress hook.
struct Resolution {
    identity: Identity,
    is_asset: bool,
    had_session_cookie: bool,
    csrf_token: Option<String>,
}

fn resolve_identity(req: &ServiceRequest, state: &AuthState) -> Result<Resolution, Error> {
    if req.path().starts_with(ASSET_PREFIX) {
        return Ok(Resolution {
            identity: Identity::Anonymous,
            is_asset: true,
            had_session_cookie: false,
            csrf_token: None,
        });
    }

    let had_session_cookie = req.cookie(SESSION_COOKIE).is_some();
    let mut resolution = Resolution {
        identity: Identity::Anonymous,
        is_asset: false,
        had_session_cookie,
        csrf_token: None,
    };

    if let Some(authorization) = req.headers().get(header::AUTHORIZATION) {
        let value = authorization
            .to_str()
            .map_err(|_| Error::from(BasicAuthError::Malformed))?;
        if value.starts_with(BASIC_PREFIX) {
            let identity = basic_auth::resolve(value, state.directory.as_ref()).map_err(
                |err| match err {
                    BasicAuthError::Unavailable(_) => Error::from(Failure::NeedDatabase),
                    other => Error::from(other),
                },
            )?;
            // Basic callers are API clients, not browsers; hand them a CSRF
            // token so the double-submit check passes downstream.
            resolution.identity = identity;
            resolution.csrf_token = Some(mint_csrf_token());
        } else {
            // Unknown schemes fall through to anonymous rather than being
            // rejected; see DESIGN.md.
            warn!(path = %req.path(), "ignoring Authorization header with unsupported scheme");
        }
        return Ok(resolution);
    }

    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Some(id) = state.tokens.validate(cookie.value()) {
            match state.directory.find(id) {
                Ok(Some(participant)) => {
                    resolution.identity = Identity::Participant(participant);
                }
                // A token for a deleted account is a stale session, not an
                // error.
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, "account lookup failed during session resolution");
                    return Err(Error::from(Failure::NeedDatabase));
                }
            }
        }
    }

    Ok(resolution)
}

fn apply_egress<B>(res: &mut ServiceResponse<B>, state: &AuthState, resolution: &Resolution) {
    if resolution.is_asset {
        return;
    }

    if let Some(token) = &resolution.csrf_token {
        attach_csrf_token(res, state, token);
    }

    if resolution.had_session_cookie {
        if let Identity::Participant(participant) = &resolution.identity {
            let refreshed = state.tokens.issue(participant.id);
            if let Err(err) = res.response_mut().add_cookie(&refreshed) {
                error!(error = %err, "failed to refresh session cookie");
            }
        }
    }
}

fn attach_csrf_token<B>(res: &mut ServiceResponse<B>, state: &AuthState, token: &str) {
    let mut cookie = Cookie::new(CSRF_COOKIE, token.to_owned());
    cookie.set_path("/");
    cookie.set_secure(state.tokens.cookie_secure());
    if let Err(err) = res.response_mut().add_cookie(&cookie) {
        error!(error = %err, "failed to attach CSRF cookie");
    }
    match HeaderValue::from_str(token) {
        Ok(value) => {
            res.response_mut()
                .headers_mut()
                .insert(HeaderName::from_static(CSRF_HEADER), value);
        }
        Err(err) => {
            error!(error = %err, "failed to encode CSRF token header");
        }
    }
}

/// Mint an unguessable CSRF token: 32 random bytes, base64url without
/// padding.
fn mint_csrf_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
