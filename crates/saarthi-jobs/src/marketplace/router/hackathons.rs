use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::AppState;
use crate::marketplace::auth::CurrentUser;
use crate::marketplace::domain::{
    Hackathon, HackathonApplication, HackathonApplicationId, HackathonApplicationRequest,
    HackathonDraft, HackathonId, PhaseId, PhaseReview, PhaseSubmissionRequest,
};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::repository::MarketplaceStore;
use crate::marketplace::Marketplace;

/// Hackathon postings, entries and certificates. Segments after
/// `/api/hackathon-applications/` share the `:id` name so the routes can coexist.
pub fn routes<S: MarketplaceStore>() -> Router<Arc<Marketplace<S>>> {
    Router::new()
        .route("/api/hackathons", get(list::<S>).post(create::<S>))
        .route("/api/hackathons/my-hackathons", get(mine::<S>))
        .route(
            "/api/hackathons/:id",
            get(detail::<S>).put(update::<S>).delete(remove::<S>),
        )
        .route(
            "/api/hackathon-applications/my-applications",
            get(my_applications::<S>),
        )
        .route(
            "/api/hackathon-applications/hackathon/:hackathon_id",
            get(for_hackathon::<S>),
        )
        .route("/api/hackathon-applications/:id/apply", post(apply::<S>))
        .route(
            "/api/hackathon-applications/:id/phases/:phase_id/submit",
            post(submit_phase::<S>),
        )
        .route(
            "/api/hackathon-applications/:id/phases/:phase_id/review",
            put(review_phase::<S>),
        )
        .route(
            "/api/hackathon-applications/:id",
            get(application_detail::<S>),
        )
        .route(
            "/api/certificates/generate/:application_id",
            post(generate_certificates::<S>),
        )
        .route("/api/certificates/view", get(view_certificate::<S>))
}

async fn list<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
) -> Result<Json<Vec<Hackathon>>, MarketplaceError> {
    Ok(Json(marketplace.hackathons.list()?))
}

async fn mine<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Hackathon>>, MarketplaceError> {
    Ok(Json(marketplace.hackathons.mine(&user)?))
}

async fn detail<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Hackathon>, MarketplaceError> {
    Ok(Json(marketplace.hackathons.get(&user, &HackathonId(id))?))
}

async fn create<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<HackathonDraft>,
) -> Result<(StatusCode, Json<Hackathon>), MarketplaceError> {
    let hackathon = marketplace.hackathons.create(&user, draft)?;
    Ok((StatusCode::CREATED, Json(hackathon)))
}

async fn update<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(draft): Json<HackathonDraft>,
) -> Result<Json<Hackathon>, MarketplaceError> {
    Ok(Json(
        marketplace
            .hackathons
            .update(&user, &HackathonId(id), draft)?,
    ))
}

async fn remove<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, MarketplaceError> {
    marketplace.hackathons.delete(&user, &HackathonId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(hackathon_id): Path<String>,
    Json(request): Json<HackathonApplicationRequest>,
) -> Result<(StatusCode, Json<HackathonApplication>), MarketplaceError> {
    let application =
        marketplace
            .hackathon_applications
            .apply(&user, &HackathonId(hackathon_id), request)?;
    Ok((StatusCode::CREATED, Json(application)))
}

async fn my_applications<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<HackathonApplication>>, MarketplaceError> {
    Ok(Json(marketplace.hackathon_applications.mine(&user)?))
}

async fn submit_phase<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path((application_id, phase_id)): Path<(String, String)>,
    Json(request): Json<PhaseSubmissionRequest>,
) -> Result<Json<HackathonApplication>, MarketplaceError> {
    Ok(Json(marketplace.hackathon_applications.submit_phase(
        &user,
        &HackathonApplicationId(application_id),
        &PhaseId(phase_id),
        request,
    )?))
}

async fn review_phase<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path((application_id, phase_id)): Path<(String, String)>,
    Json(review): Json<PhaseReview>,
) -> Result<Json<HackathonApplication>, MarketplaceError> {
    Ok(Json(marketplace.hackathon_applications.review_phase(
        &user,
        &HackathonApplicationId(application_id),
        &PhaseId(phase_id),
        review,
    )?))
}

async fn for_hackathon<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(hackathon_id): Path<String>,
) -> Result<Json<Vec<HackathonApplication>>, MarketplaceError> {
    Ok(Json(
        marketplace
            .hackathon_applications
            .for_hackathon(&user, &HackathonId(hackathon_id))?,
    ))
}

async fn application_detail<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<HackathonApplication>, MarketplaceError> {
    Ok(Json(
        marketplace
            .hackathon_applications
            .details(&user, &HackathonApplicationId(id))?,
    ))
}

async fn generate_certificates<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    CurrentUser(user): CurrentUser,
    Path(application_id): Path<String>,
) -> Result<Json<HackathonApplication>, MarketplaceError> {
    Ok(Json(
        marketplace
            .certificates
            .generate(&user, &HackathonApplicationId(application_id))?,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CertificateQuery {
    application_id: String,
    #[serde(default)]
    email: Option<String>,
}

async fn view_certificate<S: MarketplaceStore>(
    State(marketplace): AppState<S>,
    Query(query): Query<CertificateQuery>,
) -> Result<Html<String>, MarketplaceError> {
    let page = marketplace.certificates.render(
        &HackathonApplicationId(query.application_id),
        query.email.as_deref(),
    )?;
    Ok(Html(page))
}
