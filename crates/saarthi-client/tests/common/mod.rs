//! Serves the real marketplace router on an ephemeral port for client tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::async_trait;
use saarthi_client::{AuthState, SaarthiClient};
use saarthi_jobs::marketplace::domain::{JobDraft, RoleSelection, UserType};
use saarthi_jobs::marketplace::{
    marketplace_router, ExternalIdentity, IdentityError, IdentityProvider,
    InMemoryMarketplaceStore, LogMailer, Marketplace, MarketplaceSettings,
};
use tokio::net::TcpListener;

pub const APPLICANT_EMAIL: &str = "ravi.kumar@example.com";

struct StaticIdentity;

#[async_trait]
impl IdentityProvider for StaticIdentity {
    fn authorization_url(&self, state: &str) -> Result<String, IdentityError> {
        Ok(format!("https://accounts.example.test/auth?state={state}"))
    }

    async fn exchange(&self, _code: &str) -> Result<ExternalIdentity, IdentityError> {
        Ok(ExternalIdentity {
            email: APPLICANT_EMAIL.to_string(),
            name: Some("Ravi Kumar".to_string()),
            picture: None,
        })
    }
}

/// Base URL of a fresh marketplace with empty in-memory stores.
pub async fn spawn_marketplace() -> String {
    let marketplace = Marketplace::new(
        Arc::new(InMemoryMarketplaceStore::default()),
        Arc::new(LogMailer::new("no-reply@saarthi.test")),
        Arc::new(StaticIdentity),
        MarketplaceSettings::default(),
    );
    let router = marketplace_router(Arc::new(marketplace));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve marketplace");
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub async fn signed_in_applicant(base_url: &str) -> SaarthiClient {
    let client = SaarthiClient::new(base_url).expect("client");
    let consent = client.begin_google_sign_in().await.expect("consent url");
    let state = consent
        .split_once("state=")
        .map(|(_, state)| state.to_string())
        .expect("state parameter");
    let landing = client
        .finish_google_sign_in("code-from-google", &state)
        .await
        .expect("callback");
    assert_eq!(landing, "http://localhost:5173");

    let auth = AuthState::refresh(&client).await.expect("auth state");
    if auth.needs_role() {
        client
            .save_role(&RoleSelection {
                email: Some(APPLICANT_EMAIL.to_string()),
                user_type: Some(UserType::Applicant.as_str().to_string()),
                ..RoleSelection::default()
            })
            .await
            .expect("save role");
    }
    client
}

pub fn job_draft(title: &str) -> JobDraft {
    JobDraft {
        title: Some(title.to_string()),
        description: Some("Build and run the hiring APIs.".to_string()),
        company: Some("Acme".to_string()),
        location: Some("Pune".to_string()),
        skills: vec!["Rust".to_string()],
        ..JobDraft::default()
    }
}
