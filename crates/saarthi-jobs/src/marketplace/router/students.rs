use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::marketplace::auth::CurrentUser;
use crate::marketplace::domain::{ProfileId, ResumeDownload, StudentFilters, SubscriptionInfo};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::students::{ShortlistPage, StudentDetail, StudentPage};
use crate::marketplace::Marketplace;

pub fn routes<S: MarketplaceStore>() -> Router<Arc<Marketplace<S>>> {
    Router::new()
        .route("/api/students", get(search::<S>))
        .route("/api/students/shortlisted", get(shortlisted::<S>))
        .route("/api/students/subscription/info", get(subscription::<S>))
        .route(
            "/api/students/subscription/update",
            post(update_subscription::<S>),
        )
        .route("/api/students/:id", get(detail::<S>))
        .route(
            "/api/students/:id/shortlist",
            post(shortlist::<S>).delete(remove_shortlist::<S>),
        )
        .route("/api/students/:id/resume/download", get(download_resume::<S>))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionUpdate {
    #[serde(default)]
    subscription_type: Option<String>,
}

async fn search<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Query(filters): Query<StudentFilters>,
) -> Result<Json<StudentPage>, MarketplaceError> {
    Ok(Json(marketplace.students.list(&user, &filters)?))
}

async fn detail<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<StudentDetail>, MarketplaceError> {
    Ok(Json(marketplace.students.get(&user, &ProfileId(id))?))
}

async fn shortlist<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, MarketplaceError> {
    let message = marketplace.students.shortlist(&user, &ProfileId(id))?;
    Ok(Json(json!({ "message": message })))
}

async fn remove_shortlist<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, MarketplaceError> {
    let message = marketplace
        .students
        .remove_shortlist(&user, &ProfileId(id))?;
    Ok(Json(json!({ "message": message })))
}

async fn shortlisted<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ShortlistPage>, MarketplaceError> {
    Ok(Json(marketplace.students.shortlisted(&user)?))
}

async fn download_resume<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ResumeDownload>, MarketplaceError> {
    Ok(Json(
        marketplace
            .students
            .download_resume(&user, &ProfileId(id))?,
    ))
}

async fn subscription<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SubscriptionInfo>, MarketplaceError> {
    Ok(Json(marketplace.students.subscription(&user)?))
}

async fn update_subscription<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<SubscriptionUpdate>,
) -> Result<Json<SubscriptionInfo>, MarketplaceError> {
    let raw = update
        .subscription_type
        .ok_or_else(|| MarketplaceError::invalid("subscriptionType is required"))?;
    Ok(Json(marketplace.students.update_subscription(&user, &raw)?))
}
