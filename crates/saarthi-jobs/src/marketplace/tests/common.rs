use std::sync::{Arc, Mutex};

use axum::async_trait;

use crate::marketplace::auth::{ExternalIdentity, IdentityError, IdentityProvider};
use crate::marketplace::domain::{
    HackathonDraft, HackathonPhaseDraft, IndustryRegistration, JobDraft, RoleSelection, User,
};
use crate::marketplace::mail::{MailError, MailMessage, Mailer};
use crate::marketplace::memory::InMemoryMarketplaceStore;
use crate::marketplace::{Marketplace, MarketplaceSettings};

#[derive(Default)]
pub(super) struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub(super) fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mailer mutex").clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: MailMessage) -> Result<(), MailError> {
        self.sent.lock().expect("mailer mutex").push(message);
        Ok(())
    }
}

pub(super) struct FailingMailer;

impl Mailer for FailingMailer {
    fn send(&self, _message: MailMessage) -> Result<(), MailError> {
        Err(MailError::Transport("relay offline".to_string()))
    }
}

/// Identity provider that signs everyone in as the same Google account.
pub(super) struct StaticIdentity(pub ExternalIdentity);

#[async_trait]
impl IdentityProvider for StaticIdentity {
    fn authorization_url(&self, state: &str) -> Result<String, IdentityError> {
        Ok(format!("https://accounts.example.test/auth?state={state}"))
    }

    async fn exchange(&self, _code: &str) -> Result<ExternalIdentity, IdentityError> {
        Ok(self.0.clone())
    }
}

pub(super) type TestMarketplace = Marketplace<InMemoryMarketplaceStore>;

pub(super) struct Fixture {
    pub marketplace: Arc<TestMarketplace>,
    pub store: Arc<InMemoryMarketplaceStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub(super) fn fixture() -> Fixture {
    let mailer = Arc::new(RecordingMailer::default());
    let (marketplace, store) = build(mailer.clone());
    Fixture {
        marketplace,
        store,
        mailer,
    }
}

/// Marketplace whose outbound mail always fails.
pub(super) fn failing_mail_fixture() -> Fixture {
    let (marketplace, store) = build(Arc::new(FailingMailer));
    Fixture {
        marketplace,
        store,
        mailer: Arc::new(RecordingMailer::default()),
    }
}

fn build(mailer: Arc<dyn Mailer>) -> (Arc<TestMarketplace>, Arc<InMemoryMarketplaceStore>) {
    let store = Arc::new(InMemoryMarketplaceStore::default());
    let identity = Arc::new(StaticIdentity(ExternalIdentity {
        email: "google.user@example.com".to_string(),
        name: Some("Google User".to_string()),
        picture: None,
    }));
    let marketplace = Arc::new(Marketplace::new(
        store.clone(),
        mailer,
        identity,
        MarketplaceSettings::default(),
    ));
    (marketplace, store)
}

pub(super) fn applicant(fx: &Fixture, email: &str, name: &str) -> User {
    fx.marketplace
        .users
        .save_role(RoleSelection {
            email: Some(email.to_string()),
            name: Some(name.to_string()),
            picture_url: None,
            user_type: Some("APPLICANT".to_string()),
        })
        .expect("applicant created")
}

pub(super) fn industry(fx: &Fixture, email: &str, company: &str) -> User {
    fx.marketplace
        .users
        .save_role(RoleSelection {
            email: Some(email.to_string()),
            name: Some(company.to_string()),
            picture_url: None,
            user_type: Some("INDUSTRY".to_string()),
        })
        .expect("industry user created")
}

pub(super) fn registration(company: &str, email: &str, password: &str) -> IndustryRegistration {
    IndustryRegistration {
        company_name: company.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub(super) fn job_draft(title: &str, company: &str) -> JobDraft {
    JobDraft {
        title: Some(title.to_string()),
        description: Some("Build and operate backend services.".to_string()),
        company: Some(company.to_string()),
        location: Some("Pune".to_string()),
        skills: vec!["Rust".to_string(), "SQL".to_string()],
        employment_type: Some("FULLTIME".to_string()),
        ..JobDraft::default()
    }
}

pub(super) fn hackathon_draft(title: &str) -> HackathonDraft {
    HackathonDraft {
        title: Some(title.to_string()),
        description: Some("Forty-eight hours of building.".to_string()),
        company: Some("Acme Labs".to_string()),
        team_size: Some(4),
        phases: vec![
            HackathonPhaseDraft {
                id: None,
                name: "Ideation".to_string(),
                description: "Submit a problem statement".to_string(),
                upload_format: "PDF".to_string(),
                deadline: Some("2026-11-01".to_string()),
            },
            HackathonPhaseDraft {
                id: None,
                name: "Prototype".to_string(),
                description: "Ship a working demo".to_string(),
                upload_format: "GitHub link".to_string(),
                deadline: Some("2026-11-15".to_string()),
            },
        ],
        ..HackathonDraft::default()
    }
}
