use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::auth::require_role;
use super::domain::{next_record_id, ProfileId, ProfilePatch, User, UserProfile, UserType};
use super::error::MarketplaceError;
use super::repository::MarketplaceStore;

pub struct ProfileService<S> {
    store: Arc<S>,
}

impl<S: MarketplaceStore> ProfileService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn lookup(&self, user: &User) -> Result<Option<UserProfile>, MarketplaceError> {
        match self.store.profile_by_applicant(&user.id)? {
            Some(profile) => Ok(Some(profile)),
            None => Ok(self.store.profile_by_email(&user.email)?),
        }
    }

    pub fn get(&self, user: &User) -> Result<UserProfile, MarketplaceError> {
        self.lookup(user)?.ok_or_else(|| {
            MarketplaceError::not_found("Profile not found. Please create your profile first.")
        })
    }

    /// Create the profile on first save, otherwise patch the keys that were sent.
    pub fn upsert(&self, user: &User, patch: ProfilePatch) -> Result<UserProfile, MarketplaceError> {
        require_role(
            user,
            UserType::Applicant,
            "Only APPLICANT users can manage a profile",
        )?;
        let now = Utc::now();
        let mut profile = match self.lookup(user)? {
            Some(profile) => profile,
            None => {
                info!(user_id = %user.id, "creating applicant profile");
                let mut profile = UserProfile::empty(
                    ProfileId(next_record_id("prf")),
                    user.id.clone(),
                    user.email.clone(),
                    now,
                );
                profile.full_name = Some(user.name.clone());
                profile.email = Some(user.email.clone());
                profile
            }
        };
        profile.apply(patch, now);
        Ok(self.store.save_profile(profile)?)
    }
}
