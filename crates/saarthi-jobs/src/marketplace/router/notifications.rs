use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::AppState;
use crate::marketplace::auth::{CurrentUser, MaybeUser};
use crate::marketplace::domain::{Notification, NotificationId};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

pub fn routes<S: MarketplaceStore>() -> Router<Arc<Marketplace<S>>> {
    Router::new()
        .route("/api/notifications", get(list::<S>))
        .route("/api/notifications/unread-count", get(unread_count::<S>))
        .route("/api/notifications/mark-all-read", put(mark_all_read::<S>))
        .route("/api/notifications/:id/read", put(mark_read::<S>))
        .route("/api/notifications/:id", delete(remove::<S>))
}

async fn list<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Notification>>, MarketplaceError> {
    Ok(Json(marketplace.notifications.list(&user)?))
}

/// Anonymous visitors get a zero badge rather than a 401.
async fn unread_count<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Value>, MarketplaceError> {
    let count = match user {
        Some(user) => marketplace.notifications.unread_count(&user)?,
        None => 0,
    };
    Ok(Json(json!({ "count": count })))
}

async fn mark_read<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Notification>, MarketplaceError> {
    Ok(Json(
        marketplace
            .notifications
            .mark_read(&user, &NotificationId(id))?,
    ))
}

async fn mark_all_read<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, MarketplaceError> {
    let count = marketplace.notifications.mark_all_read(&user)?;
    Ok(Json(json!({
        "message": "All notifications marked as read",
        "count": count,
    })))
}

async fn remove<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, MarketplaceError> {
    marketplace
        .notifications
        .delete(&user, &NotificationId(id))?;
    Ok(Json(json!({ "message": "Notification deleted" })))
}
