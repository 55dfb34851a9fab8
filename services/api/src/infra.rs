use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use metrics_exporter_prometheus::PrometheusHandle;
use saarthi_jobs::config::{AppConfig, AuthConfig};
use saarthi_jobs::error::AppError;
use saarthi_jobs::marketplace::{
    GoogleIdentityProvider, InMemoryMarketplaceStore, LogMailer, Marketplace, MarketplaceSettings,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryMarketplace = Marketplace<InMemoryMarketplaceStore>;

/// Marketplace over fresh in-memory stores, wired from configuration.
pub(crate) fn build_marketplace(config: &AppConfig) -> Result<Arc<InMemoryMarketplace>, AppError> {
    if config.auth.google.is_none() {
        warn!("GOOGLE_CLIENT_ID not set; Google sign-in will answer with an error");
    }
    let identity = GoogleIdentityProvider::new(config.auth.google.clone())?;
    Ok(Arc::new(Marketplace::new(
        Arc::new(InMemoryMarketplaceStore::default()),
        Arc::new(LogMailer::new(config.mail.from.clone())),
        Arc::new(identity),
        MarketplaceSettings::from_config(config),
    )))
}

/// Credentialed CORS for the configured SPA origins; unparsable origins are skipped.
pub(crate) fn cors_layer(auth: &AuthConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = auth
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT])
}
