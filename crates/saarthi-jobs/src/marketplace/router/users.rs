use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use super::AppState;
use crate::marketplace::auth::CurrentUser;
use crate::marketplace::domain::{RoleSelection, RoleUpdate, SessionUser, User};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

pub fn routes<S: MarketplaceStore>() -> Router<Arc<Marketplace<S>>> {
    Router::new()
        .route("/api/user/save-role", post(save_role::<S>))
        .route("/api/user/me", get(me::<S>))
        .route("/api/user/update-profile", put(update_profile::<S>))
}

async fn save_role<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    Json(selection): Json<RoleSelection>,
) -> Result<Json<User>, MarketplaceError> {
    Ok(Json(marketplace.users.save_role(selection)?))
}

async fn me<S: MarketplaceStore>(CurrentUser(user): CurrentUser) -> Json<SessionUser> {
    Json(SessionUser::from(&user))
}

async fn update_profile<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<RoleUpdate>,
) -> Result<Json<SessionUser>, MarketplaceError> {
    let updated = marketplace.users.update_role(&user, update)?;
    Ok(Json(SessionUser::from(&updated)))
}
