//! Job board, applications, hackathons and the recruiter student database.
//!
//! Services are synchronous and share one [`MarketplaceStore`]; the axum routers in
//! [`router`] resolve the session user and delegate to them.

use std::sync::Arc;

use axum::Router;

use crate::config::AppConfig;

pub mod applications;
pub mod auth;
pub mod certificates;
pub mod domain;
pub mod error;
pub mod hackathon_applications;
pub mod hackathons;
pub mod jobs;
pub mod mail;
pub mod memory;
pub mod notifications;
pub mod profiles;
pub mod repository;
pub mod router;
pub mod students;
pub mod users;

#[cfg(test)]
mod tests;

pub use applications::ApplicationService;
pub use auth::{
    CurrentUser, ExternalIdentity, GoogleIdentityProvider, IdentityError, IdentityProvider,
    MaybeUser, SessionStore,
};
pub use certificates::CertificateService;
pub use error::MarketplaceError;
pub use hackathon_applications::HackathonApplicationService;
pub use hackathons::HackathonService;
pub use jobs::JobService;
pub use mail::{LogMailer, MailError, MailMessage, Mailer};
pub use memory::InMemoryMarketplaceStore;
pub use notifications::NotificationService;
pub use profiles::ProfileService;
pub use repository::{MarketplaceStore, RepositoryError};
pub use students::{ShortlistPage, StudentDetail, StudentDirectoryService, StudentPage};
pub use users::UserService;

/// Request-facing settings derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct MarketplaceSettings {
    pub session_cookie: String,
    pub session_ttl: chrono::Duration,
    pub frontend_url: String,
    pub public_url: String,
    pub secure_cookies: bool,
}

impl MarketplaceSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            session_cookie: config.auth.session_cookie.clone(),
            session_ttl: chrono::Duration::hours(i64::from(config.auth.session_ttl_hours)),
            frontend_url: config.auth.frontend_url.clone(),
            public_url: config.server.public_url.clone(),
            secure_cookies: config.environment.is_production(),
        }
    }
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            session_cookie: "SAARTHI_SESSION".to_string(),
            session_ttl: chrono::Duration::hours(24),
            frontend_url: "http://localhost:5173".to_string(),
            public_url: "http://localhost:8080".to_string(),
            secure_cookies: false,
        }
    }
}

/// Every service wired to one store; shared as router state.
pub struct Marketplace<S> {
    pub store: Arc<S>,
    pub users: UserService<S>,
    pub jobs: JobService<S>,
    pub applications: ApplicationService<S>,
    pub notifications: Arc<NotificationService<S>>,
    pub hackathons: Arc<HackathonService<S>>,
    pub hackathon_applications: Arc<HackathonApplicationService<S>>,
    pub certificates: CertificateService<S>,
    pub profiles: ProfileService<S>,
    pub students: StudentDirectoryService<S>,
    pub sessions: SessionStore,
    pub identity: Arc<dyn IdentityProvider>,
    pub settings: MarketplaceSettings,
}

impl<S: MarketplaceStore> Marketplace<S> {
    pub fn new(
        store: Arc<S>,
        mailer: Arc<dyn Mailer>,
        identity: Arc<dyn IdentityProvider>,
        settings: MarketplaceSettings,
    ) -> Self {
        let notifications = Arc::new(NotificationService::new(store.clone()));
        let hackathons = Arc::new(HackathonService::new(store.clone()));
        let hackathon_applications = Arc::new(HackathonApplicationService::new(
            store.clone(),
            hackathons.clone(),
        ));
        Self {
            users: UserService::new(store.clone()),
            jobs: JobService::new(store.clone()),
            applications: ApplicationService::new(store.clone(), notifications.clone(), mailer),
            certificates: CertificateService::new(
                store.clone(),
                hackathons.clone(),
                hackathon_applications.clone(),
                settings.public_url.clone(),
            ),
            profiles: ProfileService::new(store.clone()),
            students: StudentDirectoryService::new(store.clone()),
            sessions: SessionStore::new(settings.session_ttl),
            notifications,
            hackathons,
            hackathon_applications,
            identity,
            settings,
            store,
        }
    }
}

/// Full HTTP surface: sign-in flows plus every `/api` resource.
pub fn marketplace_router<S: MarketplaceStore>(marketplace: Arc<Marketplace<S>>) -> Router {
    Router::new()
        .merge(auth::auth_router::<S>())
        .merge(router::users::routes::<S>())
        .merge(router::jobs::routes::<S>())
        .merge(router::applications::routes::<S>())
        .merge(router::notifications::routes::<S>())
        .merge(router::hackathons::routes::<S>())
        .merge(router::profiles::routes::<S>())
        .merge(router::students::routes::<S>())
        .with_state(marketplace)
}
