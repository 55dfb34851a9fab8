use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::AppState;
use crate::marketplace::auth::CurrentUser;
use crate::marketplace::domain::{
    ApplicationForm, ApplicationId, Job, JobApplication, JobApplicationWithProfile, JobId,
    ResumeDetails,
};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

pub fn routes<S: MarketplaceStore>() -> Router<Arc<Marketplace<S>>> {
    Router::new()
        .route("/api/applications", get(mine::<S>).post(submit::<S>))
        .route("/api/applications/my-jobs", get(my_jobs::<S>))
        .route("/api/applications/resume-details", get(resume_details::<S>))
        .route("/api/applications/job/:job_id", get(for_job::<S>))
        .route(
            "/api/applications/job/:job_id/profiles",
            get(for_job_with_profiles::<S>),
        )
        .route("/api/applications/by-email/:email", get(by_email::<S>))
        .route("/api/applications/:id/status", put(update_status::<S>))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdate {
    #[serde(default)]
    status: Option<String>,
}

async fn mine<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<JobApplication>>, MarketplaceError> {
    Ok(Json(marketplace.applications.mine(&user)?))
}

async fn submit<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Json(form): Json<ApplicationForm>,
) -> Result<(StatusCode, Json<JobApplication>), MarketplaceError> {
    let application = marketplace.applications.submit(&user, form)?;
    Ok((StatusCode::CREATED, Json(application)))
}

async fn my_jobs<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Job>>, MarketplaceError> {
    Ok(Json(marketplace.jobs.posted_by(&user)?))
}

async fn resume_details<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ResumeDetails>>, MarketplaceError> {
    Ok(Json(marketplace.applications.resume_details(&user)?))
}

async fn for_job<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<JobApplication>>, MarketplaceError> {
    Ok(Json(marketplace.applications.for_job(&user, &JobId(job_id))?))
}

async fn for_job_with_profiles<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<JobApplicationWithProfile>>, MarketplaceError> {
    Ok(Json(
        marketplace
            .applications
            .for_job_with_profiles(&user, &JobId(job_id))?,
    ))
}

async fn by_email<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<Vec<JobApplication>>, MarketplaceError> {
    Ok(Json(marketplace.applications.by_email(&user, &email)?))
}

async fn update_status<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<JobApplication>, MarketplaceError> {
    let status = update
        .status
        .filter(|status| !status.trim().is_empty())
        .ok_or_else(|| MarketplaceError::invalid("Status is required"))?;
    Ok(Json(marketplace.applications.update_status(
        &user,
        &ApplicationId(id),
        &status,
    )?))
}
