use std::sync::Arc;

use tracing::info;

use super::auth::{hash_password, verify_password, ExternalIdentity};
use super::domain::{
    next_record_id, IndustryLogin, IndustryRegistration, RoleSelection, RoleUpdate,
    SubscriptionType, User, UserId, UserType,
};
use super::error::MarketplaceError;
use super::repository::MarketplaceStore;

/// Account lifecycle: OAuth sign-up, role selection, industry credentials.
pub struct UserService<S> {
    store: Arc<S>,
}

fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

fn new_user(email: &str, name: Option<String>, picture_url: Option<String>) -> User {
    User {
        id: UserId(next_record_id("usr")),
        name: name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| default_name(email)),
        email: email.trim().to_lowercase(),
        picture_url,
        user_type: None,
        subscription_type: None,
        password_hash: None,
    }
}

impl<S: MarketplaceStore> UserService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Find or create the account behind an OAuth callback. New accounts have no role yet.
    pub fn sign_in_external(&self, identity: ExternalIdentity) -> Result<User, MarketplaceError> {
        match self.store.user_by_email(&identity.email)? {
            Some(mut user) => {
                let mut changed = false;
                if let Some(picture) = identity.picture {
                    if user.picture_url.as_deref() != Some(picture.as_str()) {
                        user.picture_url = Some(picture);
                        changed = true;
                    }
                }
                if changed {
                    self.store.update_user(user.clone())?;
                }
                Ok(user)
            }
            None => {
                let user = new_user(&identity.email, identity.name, identity.picture);
                info!(user_id = %user.id, "created account from google sign-in");
                Ok(self.store.insert_user(user)?)
            }
        }
    }

    /// Record the role picked on the post-sign-up screen.
    pub fn save_role(&self, selection: RoleSelection) -> Result<User, MarketplaceError> {
        let email = selection
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| MarketplaceError::invalid("Email is required"))?;
        let role = selection
            .user_type
            .as_deref()
            .and_then(UserType::parse)
            .ok_or_else(|| MarketplaceError::invalid("userType must be APPLICANT or INDUSTRY"))?;

        match self.store.user_by_email(email)? {
            Some(mut user) => {
                if let Some(existing) = user.user_type {
                    return Err(MarketplaceError::invalid(format!(
                        "Role already set to {}",
                        existing.as_str()
                    )));
                }
                user.user_type = Some(role);
                if role == UserType::Industry && user.subscription_type.is_none() {
                    user.subscription_type = Some(SubscriptionType::Free);
                }
                if user.picture_url.is_none() {
                    user.picture_url = selection.picture_url;
                }
                self.store.update_user(user.clone())?;
                Ok(user)
            }
            None => {
                let mut user = new_user(email, selection.name, selection.picture_url);
                user.user_type = Some(role);
                if role == UserType::Industry {
                    user.subscription_type = Some(SubscriptionType::Free);
                }
                Ok(self.store.insert_user(user)?)
            }
        }
    }

    /// Role switch from the profile menu. Applicants are locked into their role.
    pub fn update_role(&self, user: &User, update: RoleUpdate) -> Result<User, MarketplaceError> {
        let Some(raw) = update.user_type else {
            return Ok(user.clone());
        };
        let role = UserType::parse(&raw)
            .ok_or_else(|| MarketplaceError::invalid("userType must be APPLICANT or INDUSTRY"))?;

        if user.user_type == Some(role) {
            return Ok(user.clone());
        }
        if user.is(UserType::Applicant) {
            return Err(MarketplaceError::forbidden(
                "Applicants cannot change their account type",
            ));
        }

        let mut updated = user.clone();
        updated.user_type = Some(role);
        self.store.update_user(updated.clone())?;
        Ok(updated)
    }

    pub fn register_industry(
        &self,
        registration: IndustryRegistration,
    ) -> Result<User, MarketplaceError> {
        let company = registration.company_name.trim();
        let email = registration.email.trim();
        if company.is_empty() || email.is_empty() || registration.password.is_empty() {
            return Err(MarketplaceError::invalid(
                "Company name, email and password are required",
            ));
        }
        if self.store.user_by_email(email)?.is_some() {
            return Err(MarketplaceError::invalid("Email already registered"));
        }

        let mut user = new_user(email, Some(company.to_string()), None);
        user.user_type = Some(UserType::Industry);
        user.subscription_type = Some(SubscriptionType::Free);
        user.password_hash = Some(hash_password(&registration.password)?);

        info!(user_id = %user.id, "registered industry account");
        Ok(self.store.insert_user(user)?)
    }

    pub fn login_industry(&self, login: IndustryLogin) -> Result<User, MarketplaceError> {
        let user = self
            .store
            .user_by_email(&login.email)?
            .ok_or_else(|| MarketplaceError::unauthenticated("Invalid email"))?;
        if !user.is(UserType::Industry) {
            return Err(MarketplaceError::unauthenticated(
                "Account is not an industry account",
            ));
        }
        let verified = user
            .password_hash
            .as_deref()
            .map_or(false, |hash| verify_password(&login.password, hash));
        if !verified {
            return Err(MarketplaceError::unauthenticated("Incorrect password"));
        }
        Ok(user)
    }

    pub fn by_id(&self, id: &UserId) -> Result<Option<User>, MarketplaceError> {
        Ok(self.store.user(id)?)
    }

    pub fn by_email(&self, email: &str) -> Result<Option<User>, MarketplaceError> {
        Ok(self.store.user_by_email(email)?)
    }
}
