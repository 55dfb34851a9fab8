use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::AppState;
use crate::marketplace::auth::CurrentUser;
use crate::marketplace::domain::{Job, JobApplication, JobDraft, JobId, RecommendedJob};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

pub fn routes<S: MarketplaceStore>() -> Router<Arc<Marketplace<S>>> {
    Router::new()
        .route("/api/jobs", get(list::<S>).post(create::<S>))
        .route(
            "/api/jobs/:id",
            get(detail::<S>).put(update::<S>).delete(remove::<S>),
        )
        .route("/api/jobs/:id/apply", post(apply::<S>))
        .route("/api/jobs/recommended/jobs", get(recommended::<S>))
}

async fn list<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
) -> Result<Json<Vec<Job>>, MarketplaceError> {
    Ok(Json(marketplace.jobs.list()?))
}

async fn detail<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    Path(id): Path<String>,
) -> Result<Json<Job>, MarketplaceError> {
    Ok(Json(marketplace.jobs.get(&JobId(id))?))
}

async fn create<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<Job>), MarketplaceError> {
    let job = marketplace.jobs.create(&user, draft)?;
    Ok((StatusCode::CREATED, Json(job)))
}

async fn update<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(draft): Json<JobDraft>,
) -> Result<Json<Job>, MarketplaceError> {
    Ok(Json(marketplace.jobs.update(&user, &JobId(id), draft)?))
}

async fn remove<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, MarketplaceError> {
    marketplace.jobs.delete(&user, &JobId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<JobApplication>), MarketplaceError> {
    let application = marketplace.applications.apply_to_job(&user, &JobId(id))?;
    Ok((StatusCode::CREATED, Json(application)))
}

async fn recommended<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<RecommendedJob>>, MarketplaceError> {
    Ok(Json(marketplace.jobs.recommended(&user)?))
}
