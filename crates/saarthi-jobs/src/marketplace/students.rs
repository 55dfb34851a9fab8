use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::auth::require_role;
use super::domain::{
    next_record_id, ActivityKind, ActivityLog, IndustryShortlist, ProfileId, ResumeDownload,
    StudentCard, StudentFilters, SubscriptionInfo, SubscriptionType, User, UserProfile, UserType,
};
use super::error::MarketplaceError;
use super::repository::{MarketplaceStore, RepositoryError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPage {
    pub students: Vec<StudentCard>,
    pub subscription_type: SubscriptionType,
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    pub student: StudentCard,
    pub subscription_type: SubscriptionType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistPage {
    pub students: Vec<StudentCard>,
    pub total_count: usize,
}

/// Recruiter-facing student database.
pub struct StudentDirectoryService<S> {
    store: Arc<S>,
}

impl<S: MarketplaceStore> StudentDirectoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn recruiter(user: &User) -> Result<(), MarketplaceError> {
        require_role(
            user,
            UserType::Industry,
            "Only INDUSTRY users can access the student database",
        )
    }

    /// Current tier; accounts that predate subscriptions are stored as FREE.
    fn tier(&self, user: &User) -> Result<SubscriptionType, MarketplaceError> {
        if let Some(tier) = user.subscription_type {
            return Ok(tier);
        }
        let mut updated = user.clone();
        updated.subscription_type = Some(SubscriptionType::Free);
        self.store.update_user(updated)?;
        Ok(SubscriptionType::Free)
    }

    /// Shortlists and activity are keyed on the account email, which the student
    /// cannot edit; `profile.email` is only contact data.
    fn student_email(profile: &UserProfile) -> &str {
        &profile.applicant_email
    }

    fn card(&self, user: &User, profile: &UserProfile) -> Result<StudentCard, MarketplaceError> {
        let email = Self::student_email(profile);
        let shortlisted = self.store.is_shortlisted(&user.email, email)?;
        let hackathons = self
            .store
            .hackathon_applications_by(&profile.applicant_id)?
            .len();
        let jobs = self.store.applications_by_email(&profile.applicant_email)?.len();
        Ok(StudentCard::from_profile(profile, shortlisted, hackathons, jobs))
    }

    fn is_applicant(&self, profile: &UserProfile) -> Result<bool, MarketplaceError> {
        let owner = match self.store.user(&profile.applicant_id)? {
            Some(user) => Some(user),
            None => self.store.user_by_email(&profile.applicant_email)?,
        };
        Ok(owner.map_or(false, |user| user.is(UserType::Applicant)))
    }

    fn profile(&self, id: &ProfileId) -> Result<UserProfile, MarketplaceError> {
        self.store
            .profile(id)?
            .ok_or_else(|| MarketplaceError::not_found("Student not found"))
    }

    fn log(
        &self,
        user: &User,
        profile: &UserProfile,
        action: ActivityKind,
    ) -> Result<(), MarketplaceError> {
        let entry = ActivityLog {
            id: next_record_id("act"),
            industry_email: user.email.clone(),
            industry_id: user.id.clone(),
            student_email: Self::student_email(profile).to_string(),
            student_id: profile.id.clone(),
            action_type: action,
            timestamp: Utc::now(),
        };
        Ok(self.store.record_activity(entry)?)
    }

    pub fn list(&self, user: &User, filters: &StudentFilters) -> Result<StudentPage, MarketplaceError> {
        Self::recruiter(user)?;
        let subscription_type = self.tier(user)?;

        let mut students = Vec::new();
        for profile in self.store.profiles()? {
            if !self.is_applicant(&profile)? || !filters.matches(&profile) {
                continue;
            }
            students.push(self.card(user, &profile)?);
        }
        info!(industry_id = %user.id, matches = students.len(), "student search");
        Ok(StudentPage {
            total_count: students.len(),
            students,
            subscription_type,
        })
    }

    pub fn get(&self, user: &User, id: &ProfileId) -> Result<StudentDetail, MarketplaceError> {
        Self::recruiter(user)?;
        let subscription_type = self.tier(user)?;
        let profile = self.profile(id)?;
        self.log(user, &profile, ActivityKind::ProfileViewed)?;
        Ok(StudentDetail {
            student: self.card(user, &profile)?,
            subscription_type,
        })
    }

    /// Returns the confirmation message shown to the recruiter.
    pub fn shortlist(&self, user: &User, id: &ProfileId) -> Result<String, MarketplaceError> {
        Self::recruiter(user)?;
        let profile = self.profile(id)?;
        let entry = IndustryShortlist {
            id: next_record_id("sl"),
            industry_email: user.email.clone(),
            industry_id: user.id.clone(),
            student_email: Self::student_email(&profile).to_string(),
            student_id: profile.id.clone(),
            shortlisted_at: Utc::now(),
            notes: None,
        };
        match self.store.insert_shortlist(entry) {
            Ok(_) => {
                self.log(user, &profile, ActivityKind::CandidateShortlisted)?;
                Ok("Student shortlisted successfully".to_string())
            }
            Err(RepositoryError::Conflict) => Ok("Student already shortlisted".to_string()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn remove_shortlist(&self, user: &User, id: &ProfileId) -> Result<String, MarketplaceError> {
        Self::recruiter(user)?;
        let profile = self.profile(id)?;
        if self
            .store
            .remove_shortlist(&user.email, Self::student_email(&profile))?
        {
            Ok("Student removed from shortlist".to_string())
        } else {
            Err(MarketplaceError::not_found("Student is not shortlisted"))
        }
    }

    pub fn shortlisted(&self, user: &User) -> Result<ShortlistPage, MarketplaceError> {
        Self::recruiter(user)?;
        let mut students = Vec::new();
        for entry in self.store.shortlists_for(&user.email)? {
            match self.store.profile(&entry.student_id)? {
                Some(profile) => students.push(self.card(user, &profile)?),
                None => warn!(student_id = %entry.student_id, "shortlisted profile no longer exists"),
            }
        }
        Ok(ShortlistPage {
            total_count: students.len(),
            students,
        })
    }

    pub fn download_resume(
        &self,
        user: &User,
        id: &ProfileId,
    ) -> Result<ResumeDownload, MarketplaceError> {
        Self::recruiter(user)?;
        let profile = self.profile(id)?;
        let Some(data) = profile.resume_base64.clone().filter(|data| !data.is_empty()) else {
            return Err(MarketplaceError::not_found("Resume not available"));
        };
        self.log(user, &profile, ActivityKind::ResumeDownloaded)?;
        Ok(ResumeDownload {
            file_name: profile.resume_file_name.clone(),
            file_type: profile.resume_file_type.clone(),
            base64_data: data,
        })
    }

    pub fn subscription(&self, user: &User) -> Result<SubscriptionInfo, MarketplaceError> {
        Self::recruiter(user)?;
        Ok(SubscriptionInfo::for_tier(self.tier(user)?))
    }

    pub fn update_subscription(
        &self,
        user: &User,
        raw: &str,
    ) -> Result<SubscriptionInfo, MarketplaceError> {
        Self::recruiter(user)?;
        let tier = SubscriptionType::parse(raw)
            .ok_or_else(|| MarketplaceError::invalid("Invalid subscription type. Must be FREE or PAID"))?;
        let mut updated = user.clone();
        updated.subscription_type = Some(tier);
        self.store.update_user(updated)?;
        info!(industry_id = %user.id, tier = tier.as_str(), "subscription updated");
        Ok(SubscriptionInfo::for_tier(tier))
    }

    /// Recruiter's audit trail, newest first.
    pub fn activity(&self, user: &User) -> Result<Vec<ActivityLog>, MarketplaceError> {
        Self::recruiter(user)?;
        Ok(self.store.activity_for(&user.email)?)
    }
}
