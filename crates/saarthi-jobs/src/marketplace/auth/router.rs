use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use super::{
    cookie_value, random_token, redirect_with_cookies, set_cookie, MaybeUser, OAUTH_STATE_COOKIE,
};
use crate::marketplace::domain::{AuthStatus, IndustryLogin, IndustryRegistration, User};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::router::AppState;
use crate::marketplace::Marketplace;

const OAUTH_STATE_TTL_SECS: i64 = 600;

pub fn auth_router<S: MarketplaceStore>() -> Router<Arc<Marketplace<S>>> {
    Router::new()
        .route("/oauth2/authorization/google", get(google_authorize::<S>))
        .route("/login/oauth2/code/google", get(google_callback::<S>))
        .route("/logout", get(logout::<S>).post(logout::<S>))
        .route("/api/auth/me", get(me::<S>))
        .route("/api/auth/industry/register", post(register_industry::<S>))
        .route("/api/auth/industry/login", post(login_industry::<S>))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

fn clear_cookie(name: &str, secure: bool) -> String {
    set_cookie(name, "", 0, secure)
}

async fn google_authorize<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
) -> Result<Response, MarketplaceError> {
    let state = random_token(24);
    let location = marketplace.identity.authorization_url(&state)?;
    let cookie = set_cookie(
        OAUTH_STATE_COOKIE,
        &state,
        OAUTH_STATE_TTL_SECS,
        marketplace.settings.secure_cookies,
    );
    Ok(redirect_with_cookies(&location, &[cookie]))
}

async fn google_callback<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Response, MarketplaceError> {
    let settings = &marketplace.settings;
    let clear_state = clear_cookie(OAUTH_STATE_COOKIE, settings.secure_cookies);

    if let Some(error) = params.error {
        warn!(%error, "google sign-in was declined");
        let location = format!("{}/?login=failed", settings.frontend_url);
        return Ok(redirect_with_cookies(&location, &[clear_state]));
    }

    let expected = cookie_value(&headers, OAUTH_STATE_COOKIE);
    match (expected, params.state.as_deref()) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => return Err(MarketplaceError::unauthenticated("Invalid OAuth state")),
    }
    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| MarketplaceError::invalid("Missing authorization code"))?;

    let identity = marketplace.identity.exchange(&code).await?;
    let user = marketplace.users.sign_in_external(identity)?;
    let session = marketplace.session_cookie_for(&user)?;
    info!(user_id = %user.id, has_role = user.user_type.is_some(), "google sign-in completed");

    Ok(redirect_with_cookies(&settings.frontend_url, &[session, clear_state]))
}

async fn logout<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    headers: HeaderMap,
) -> Result<Response, MarketplaceError> {
    let settings = &marketplace.settings;
    if let Some(token) = cookie_value(&headers, &settings.session_cookie) {
        marketplace.sessions.revoke(token)?;
    }
    let expired = clear_cookie(&settings.session_cookie, settings.secure_cookies);
    Ok(redirect_with_cookies(&settings.frontend_url, &[expired]))
}

async fn me<S: MarketplaceStore>(MaybeUser(user): MaybeUser) -> Json<AuthStatus> {
    Json(user.as_ref().map_or_else(AuthStatus::anonymous, AuthStatus::from))
}

async fn register_industry<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    Json(registration): Json<IndustryRegistration>,
) -> Result<Json<User>, MarketplaceError> {
    Ok(Json(marketplace.users.register_industry(registration)?))
}

async fn login_industry<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    Json(login): Json<IndustryLogin>,
) -> Result<Response, MarketplaceError> {
    let user = marketplace.users.login_industry(login)?;
    let cookie = marketplace.session_cookie_for(&user)?;
    let mut response = Json(user).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    Ok(response)
}
