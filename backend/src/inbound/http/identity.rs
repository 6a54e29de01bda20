//! Request-identity extractor.
//!
//! The authenticate middleware stores the resolved [`Identity`] in request
//! extensions; handlers read it through this extractor so they never touch
//! headers or cookies themselves. Without the middleware (or before it runs)
//! the identity is the anonymous default.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{Failure, Identity, Participant};

/// The identity the authenticator resolved for this request.
#[derive(Debug, Clone)]
pub struct RequestIdentity(Identity);

impl RequestIdentity {
    /// Borrow the resolved identity.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.0
    }

    /// Require an authenticated participant or fail with the catalog's
    /// `LoginRequired` (403).
    pub fn require_participant(&self) -> Result<Participant, Failure> {
        self.0
            .participant()
            .cloned()
            .ok_or(Failure::LoginRequired)
    }
}

impl FromRequest for RequestIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<Identity>().cloned().unwrap_or_default();
        ready(Ok(Self(identity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParticipantId;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[actix_web::test]
    async fn defaults_to_anonymous_without_middleware() {
        let req = TestRequest::get().uri("/").to_http_request();
        let identity = RequestIdentity::extract(&req).await.expect("extracts");
        assert!(identity.identity().is_anonymous());
    }

    #[actix_web::test]
    async fn reads_the_identity_stored_by_the_middleware() {
        let req = TestRequest::get().uri("/").to_http_request();
        let participant = Participant::new(ParticipantId::new(3), "carol");
        req.extensions_mut()
            .insert(Identity::Participant(participant.clone()));

        let identity = RequestIdentity::extract(&req).await.expect("extracts");
        assert_eq!(identity.require_participant(), Ok(participant));
    }

    #[rstest]
    fn anonymous_requires_login() {
        let identity = RequestIdentity(Identity::Anonymous);
        assert_eq!(identity.require_participant(), Err(Failure::LoginRequired));
    }
}
