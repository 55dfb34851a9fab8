//! Session cookies, request extractors, and the sign-in flows.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

mod identity;
mod password;
mod router;
mod session;

pub use identity::{ExternalIdentity, GoogleIdentityProvider, IdentityError, IdentityProvider};
pub use password::{hash_password, verify_password};
pub use router::auth_router;
pub use session::SessionStore;
pub(crate) use session::random_token;

use super::domain::{User, UserType};
use super::error::MarketplaceError;
use super::repository::MarketplaceStore;
use super::Marketplace;

pub(crate) const OAUTH_STATE_COOKIE: &str = "SAARTHI_OAUTH_STATE";

/// Signed-in user; rejects with 401 when the session is missing or stale.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Signed-in user if any; never rejects for a missing session.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

pub(crate) fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
        .next()
}

pub(crate) fn set_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub(crate) fn redirect_with_cookies(location: &str, cookies: &[String]) -> Response {
    let mut response = StatusCode::FOUND.into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(location) {
        headers.insert(LOCATION, value);
    }
    for cookie in cookies {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            headers.append(SET_COOKIE, value);
        }
    }
    response
}

pub(crate) fn require_role(
    user: &User,
    role: UserType,
    message: &str,
) -> Result<(), MarketplaceError> {
    if user.is(role) {
        Ok(())
    } else {
        Err(MarketplaceError::forbidden(message))
    }
}

impl<S: MarketplaceStore> Marketplace<S> {
    /// Resolve the session cookie on a request to its account.
    pub fn session_user(&self, headers: &HeaderMap) -> Result<Option<User>, MarketplaceError> {
        let Some(token) = cookie_value(headers, &self.settings.session_cookie) else {
            return Ok(None);
        };
        let Some(email) = self.sessions.resolve(token)? else {
            return Ok(None);
        };
        Ok(self.store.user_by_email(&email)?)
    }

    pub(crate) fn session_cookie_for(&self, user: &User) -> Result<String, MarketplaceError> {
        let token = self.sessions.open(&user.email)?;
        Ok(set_cookie(
            &self.settings.session_cookie,
            &token,
            self.sessions.ttl().num_seconds(),
            self.settings.secure_cookies,
        ))
    }
}

#[async_trait]
impl<S: MarketplaceStore> FromRequestParts<Arc<Marketplace<S>>> for MaybeUser {
    type Rejection = MarketplaceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<Marketplace<S>>,
    ) -> Result<Self, Self::Rejection> {
        state.session_user(&parts.headers).map(MaybeUser)
    }
}

#[async_trait]
impl<S: MarketplaceStore> FromRequestParts<Arc<Marketplace<S>>> for CurrentUser {
    type Rejection = MarketplaceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<Marketplace<S>>,
    ) -> Result<Self, Self::Rejection> {
        state
            .session_user(&parts.headers)?
            .map(CurrentUser)
            .ok_or_else(|| MarketplaceError::unauthenticated("Authentication required. Please log in."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; SAARTHI_SESSION=abc"));
        headers.append(COOKIE, HeaderValue::from_static("other=1"));
        assert_eq!(cookie_value(&headers, "SAARTHI_SESSION"), Some("abc"));
        assert_eq!(cookie_value(&headers, "other"), Some("1"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn secure_flag_follows_settings() {
        assert!(set_cookie("s", "v", 60, true).ends_with("; Secure"));
        assert!(!set_cookie("s", "v", 60, false).contains("Secure"));
    }
}
