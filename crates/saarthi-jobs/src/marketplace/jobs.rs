use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::auth::require_role;
use super::domain::{
    next_record_id, rank_jobs, CandidatePreferences, Job, JobDraft, JobId, RecommendedJob, User,
    UserType,
};
use super::error::MarketplaceError;
use super::repository::MarketplaceStore;

/// Job board postings.
pub struct JobService<S> {
    store: Arc<S>,
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl<S: MarketplaceStore> JobService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Job>, MarketplaceError> {
        Ok(self.store.jobs()?)
    }

    pub fn get(&self, id: &JobId) -> Result<Job, MarketplaceError> {
        self.store
            .job(id)?
            .ok_or_else(|| MarketplaceError::not_found("Job not found"))
    }

    fn validate(draft: &JobDraft) -> Result<(), MarketplaceError> {
        let missing = draft.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MarketplaceError::invalid(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn create(&self, user: &User, draft: JobDraft) -> Result<Job, MarketplaceError> {
        require_role(user, UserType::Industry, "Only INDUSTRY users can post jobs")?;
        Self::validate(&draft)?;

        let job = Job {
            id: JobId(next_record_id("job")),
            title: text(draft.title),
            description: text(draft.description),
            company: text(draft.company),
            location: text(draft.location),
            posted_by: draft.posted_by.or_else(|| Some(user.email.clone())),
            industry_id: Some(user.id.clone()),
            industry: draft.industry,
            skills: draft.skills,
            employment_type: draft.employment_type,
            job_min_salary: draft.job_min_salary,
            job_max_salary: draft.job_max_salary,
            job_salary_currency: draft.job_salary_currency,
            years_of_experience: draft.years_of_experience,
            created_at: Utc::now(),
            active: true,
        };
        info!(job_id = %job.id, industry_id = %user.id, "job posted");
        Ok(self.store.insert_job(job)?)
    }

    fn owned(&self, user: &User, id: &JobId, action: &str) -> Result<Job, MarketplaceError> {
        require_role(
            user,
            UserType::Industry,
            &format!("Only INDUSTRY users can {action} jobs"),
        )?;
        let job = self.get(id)?;
        if !job.is_owned_by(&user.id) {
            return Err(MarketplaceError::forbidden(format!(
                "You can only {action} your own jobs"
            )));
        }
        Ok(job)
    }

    pub fn update(&self, user: &User, id: &JobId, draft: JobDraft) -> Result<Job, MarketplaceError> {
        let existing = self.owned(user, id, "update")?;
        Self::validate(&draft)?;

        let job = Job {
            title: text(draft.title),
            description: text(draft.description),
            company: text(draft.company),
            location: text(draft.location),
            posted_by: draft.posted_by.or(existing.posted_by.clone()),
            industry: draft.industry,
            skills: draft.skills,
            employment_type: draft.employment_type,
            job_min_salary: draft.job_min_salary,
            job_max_salary: draft.job_max_salary,
            job_salary_currency: draft.job_salary_currency,
            years_of_experience: draft.years_of_experience,
            active: draft.active.unwrap_or(existing.active),
            ..existing
        };
        self.store.update_job(job.clone())?;
        Ok(job)
    }

    pub fn delete(&self, user: &User, id: &JobId) -> Result<(), MarketplaceError> {
        self.owned(user, id, "delete")?;
        self.store.delete_job(id)?;
        info!(job_id = %id, "job deleted");
        Ok(())
    }

    /// Every posting scored against the applicant's profile, best match first.
    /// Postings that score zero are left out.
    pub fn recommended(&self, user: &User) -> Result<Vec<RecommendedJob>, MarketplaceError> {
        require_role(
            user,
            UserType::Applicant,
            "Only APPLICANT users can get job recommendations",
        )?;
        let profile = match self.store.profile_by_applicant(&user.id)? {
            Some(profile) => profile,
            None => self.store.profile_by_email(&user.email)?.ok_or_else(|| {
                MarketplaceError::not_found("Profile not found. Please create your profile first.")
            })?,
        };
        let preferences = CandidatePreferences::from_profile(&profile);
        let ranked = rank_jobs(&preferences, self.store.jobs()?);
        info!(user_id = %user.id, matches = ranked.len(), "job recommendations ranked");
        Ok(ranked)
    }

    /// The industry user's postings. Ownerless legacy jobs whose `postedBy` matches
    /// the user's email or name are claimed on first lookup.
    pub fn posted_by(&self, user: &User) -> Result<Vec<Job>, MarketplaceError> {
        require_role(
            user,
            UserType::Industry,
            "Only INDUSTRY users can view their posted jobs",
        )?;
        let jobs = self.store.jobs()?;
        let owned: Vec<Job> = jobs
            .iter()
            .filter(|job| job.is_owned_by(&user.id))
            .cloned()
            .collect();
        if !owned.is_empty() {
            return Ok(owned);
        }

        let mut claimed = Vec::new();
        for mut job in jobs {
            let matches_poster = job.industry_id.is_none()
                && job.posted_by.as_deref().map_or(false, |poster| {
                    poster.eq_ignore_ascii_case(&user.email) || poster == user.name
                });
            if matches_poster {
                job.industry_id = Some(user.id.clone());
                self.store.update_job(job.clone())?;
                claimed.push(job);
            }
        }
        if !claimed.is_empty() {
            info!(industry_id = %user.id, count = claimed.len(), "claimed legacy job postings");
        }
        Ok(claimed)
    }
}
