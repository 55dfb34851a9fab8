use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::AppState;
use crate::marketplace::auth::CurrentUser;
use crate::marketplace::domain::{ProfilePatch, UserProfile};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

pub fn routes<S: MarketplaceStore>() -> Router<Arc<Marketplace<S>>> {
    Router::new().route(
        "/api/profile",
        get(fetch::<S>).post(save::<S>).put(save::<S>),
    )
}

async fn fetch<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserProfile>, MarketplaceError> {
    Ok(Json(marketplace.profiles.get(&user)?))
}

async fn save<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<UserProfile>, MarketplaceError> {
    Ok(Json(marketplace.profiles.upsert(&user, patch)?))
}
