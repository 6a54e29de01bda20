//! Signed session-token cookies.
//!
//! The session cookie carries an opaque signed token mapping to an account
//! id with an expiry. Tokens are re-issued on every authenticated response
//! so the effective lifetime slides forward on activity. Signing uses the
//! actix-web signed cookie jar, keyed by the session signing key from
//! [`super::session_config`].

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, CookieJar, Key, SameSite};
use chrono::{Duration, Utc};

use crate::domain::ParticipantId;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Default session lifetime.
const SESSION_TTL_DAYS: i64 = 30;

/// Issues and validates signed session tokens.
///
/// Token payload is `"{participant_id}:{expires_unix}"`; the signature and
/// the embedded expiry are both checked on validation. Anything invalid —
/// bad signature, wrong shape, past expiry — yields `None`, never an error:
/// a stale session is anonymous, not a failure.
#[derive(Clone)]
pub struct SessionTokens {
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    ttl: Duration,
}

impl SessionTokens {
    /// Build a token issuer over the given signing key and cookie policy.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            ttl: Duration::days(SESSION_TTL_DAYS),
        }
    }

    /// Override the token lifetime. Tests use short or negative lifetimes
    /// to exercise expiry.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Whether issued cookies carry the `Secure` attribute.
    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// `SameSite` policy applied to issued cookies.
    #[must_use]
    pub const fn same_site(&self) -> SameSite {
        self.same_site
    }

    /// Issue a fresh session cookie for `id`, expiring one TTL from now.
    ///
    /// Re-issuing on each authenticated response is what makes the session
    /// lifetime slide.
    #[must_use]
    pub fn issue(&self, id: ParticipantId) -> Cookie<'static> {
        let expires = (Utc::now() + self.ttl).timestamp();
        let payload = format!("{id}:{expires}");

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key)
            .add(Cookie::new(SESSION_COOKIE, payload.clone()));
        // The jar retains what was just added; the unsigned fallback can
        // only fail validation later, it never panics here.
        let mut cookie = jar
            .get(SESSION_COOKIE)
            .cloned()
            .unwrap_or_else(|| Cookie::new(SESSION_COOKIE, payload));

        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.cookie_secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(CookieDuration::seconds(self.ttl.num_seconds()));
        cookie
    }

    /// Validate a raw session cookie value and return the account id it
    /// maps to, or `None` for anything invalid or expired.
    #[must_use]
    pub fn validate(&self, raw: &str) -> Option<ParticipantId> {
        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(SESSION_COOKIE, raw.to_owned()));
        let verified = jar.signed(&self.key).get(SESSION_COOKIE)?;

        let (id, expires) = verified.value().split_once(':')?;
        let id: ParticipantId = id.parse().ok()?;
        let expires: i64 = expires.parse().ok()?;
        if expires <= Utc::now().timestamp() {
            return None;
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokens() -> SessionTokens {
        SessionTokens::new(Key::generate(), false, SameSite::Lax)
    }

    #[rstest]
    fn issued_tokens_validate_back_to_the_account() {
        let tokens = tokens();
        let cookie = tokens.issue(ParticipantId::new(42));
        assert_eq!(
            tokens.validate(cookie.value()),
            Some(ParticipantId::new(42))
        );
    }

    #[rstest]
    fn issued_cookies_carry_the_session_policy() {
        let cookie = tokens().issue(ParticipantId::new(1));
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert!(cookie.max_age().is_some());
    }

    #[rstest]
    fn tampered_tokens_are_rejected() {
        let tokens = tokens();
        let cookie = tokens.issue(ParticipantId::new(42));
        let mut raw = cookie.value().to_owned();
        raw.push('x');
        assert_eq!(tokens.validate(&raw), None);
    }

    #[rstest]
    fn tokens_signed_with_another_key_are_rejected() {
        let cookie = tokens().issue(ParticipantId::new(42));
        assert_eq!(tokens().validate(cookie.value()), None);
    }

    #[rstest]
    fn expired_tokens_are_rejected() {
        let tokens = tokens().with_ttl(Duration::seconds(-60));
        let cookie = tokens.issue(ParticipantId::new(42));
        assert_eq!(tokens.validate(cookie.value()), None);
    }

    #[rstest]
    fn malformed_payloads_are_rejected() {
        let tokens = tokens();
        // Correctly signed but the payload has no expiry segment.
        let mut jar = CookieJar::new();
        jar.signed_mut(&tokens.key)
            .add(Cookie::new(SESSION_COOKIE, "not-a-token"));
        let raw = jar.get(SESSION_COOKIE).expect("cookie added").value();
        assert_eq!(tokens.validate(raw), None);
    }

    #[rstest]
    fn garbage_values_are_rejected() {
        assert_eq!(tokens().validate("definitely not signed"), None);
    }
}
