use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::auth::require_role;
use super::domain::{
    next_record_id, ApplicationForm, ApplicationId, ApplicationStatus, Job, JobApplication,
    JobApplicationWithProfile, JobId, ResumeDetails, User, UserType,
};
use super::error::MarketplaceError;
use super::mail::{application_confirmation, Mailer};
use super::notifications::NotificationService;
use super::repository::MarketplaceStore;

/// Job applications: submission, recruiter review, and the status pipeline.
pub struct ApplicationService<S> {
    store: Arc<S>,
    notifications: Arc<NotificationService<S>>,
    mailer: Arc<dyn Mailer>,
}

fn or_default(value: Option<String>, fallback: &str) -> String {
    value.unwrap_or_else(|| fallback.to_string())
}

impl<S: MarketplaceStore> ApplicationService<S> {
    pub fn new(
        store: Arc<S>,
        notifications: Arc<NotificationService<S>>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            store,
            notifications,
            mailer,
        }
    }

    /// Submit the apply-dialog form.
    pub fn submit(
        &self,
        user: &User,
        form: ApplicationForm,
    ) -> Result<JobApplication, MarketplaceError> {
        require_role(
            user,
            UserType::Applicant,
            "Only APPLICANT users can apply to jobs",
        )?;
        let job_id = form
            .job_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(JobId::from)
            .ok_or_else(|| MarketplaceError::invalid("Job ID is required"))?;

        if self
            .store
            .applications_for_job(&job_id)?
            .iter()
            .any(|existing| existing.applicant_email.eq_ignore_ascii_case(&user.email))
        {
            return Err(MarketplaceError::invalid(
                "You have already applied to this job",
            ));
        }

        let job = self.store.job(&job_id)?;
        if job.is_none() {
            warn!(job_id = %job_id, "application submitted for a job missing from the board");
        }

        let status = match form.status.as_deref() {
            Some(raw) => ApplicationStatus::parse(raw)
                .ok_or_else(|| MarketplaceError::invalid(format!("Invalid status: {raw}")))?,
            None => ApplicationStatus::Pending,
        };

        let now = Utc::now();
        let application = JobApplication {
            id: ApplicationId(next_record_id("app")),
            job_id,
            applicant_email: user.email.clone(),
            applicant_id: user.id.clone(),
            job_title: form
                .job_title
                .or_else(|| job.as_ref().map(|job| job.title.clone()))
                .unwrap_or_default(),
            company: form
                .company
                .or_else(|| job.as_ref().map(|job| job.company.clone()))
                .unwrap_or_else(|| "Company confidential".to_string()),
            location: form
                .location
                .or_else(|| job.as_ref().map(|job| job.location.clone()))
                .unwrap_or_else(|| "Location not specified".to_string()),
            job_description: form
                .job_description
                .or_else(|| job.as_ref().map(|job| job.description.clone()))
                .unwrap_or_default(),
            status,
            applied_at: now,
            last_updated: now,
            full_name: or_default(form.full_name, &user.name),
            phone_number: form.phone_number.unwrap_or_default(),
            cover_letter: form.cover_letter.unwrap_or_default(),
            resume_file_name: form.resume_file_name.unwrap_or_default(),
            resume_file_type: form.resume_file_type.unwrap_or_default(),
            resume_base64: form.resume_base64.unwrap_or_default(),
            resume_file_size: form.resume_file_size,
            linked_in_url: form.linked_in_url.unwrap_or_default(),
            portfolio_url: form.portfolio_url.unwrap_or_default(),
            experience: form.experience.unwrap_or_default(),
            availability: form.availability.unwrap_or_default(),
        };

        let saved = self.store.insert_application(application)?;
        self.store
            .insert_resume_details(ResumeDetails::snapshot(next_record_id("rsd"), &saved))?;
        self.notifications.notify_new_application(&saved)?;
        self.send_confirmation(&saved);

        info!(
            application_id = %saved.id,
            job_id = %saved.job_id,
            resume_bytes = saved.resume_file_size.unwrap_or(0),
            "job application stored"
        );
        Ok(saved)
    }

    /// One-click apply from the job board, using the posting's details.
    pub fn apply_to_job(&self, user: &User, job_id: &JobId) -> Result<JobApplication, MarketplaceError> {
        let job = self
            .store
            .job(job_id)?
            .ok_or_else(|| MarketplaceError::not_found("Job not found"))?;
        self.submit(user, Self::form_for(&job))
    }

    fn form_for(job: &Job) -> ApplicationForm {
        ApplicationForm {
            job_id: Some(job.id.0.clone()),
            job_title: Some(job.title.clone()),
            company: Some(job.company.clone()),
            location: Some(job.location.clone()),
            job_description: Some(job.description.clone()),
            ..ApplicationForm::default()
        }
    }

    fn send_confirmation(&self, application: &JobApplication) {
        let message = application_confirmation(
            &application.applicant_email,
            application.id.as_str(),
            &application.full_name,
            &application.job_title,
            &application.company,
        );
        if let Err(err) = self.mailer.send(message) {
            warn!(application_id = %application.id, error = %err, "confirmation mail failed");
        }
    }

    pub fn mine(&self, user: &User) -> Result<Vec<JobApplication>, MarketplaceError> {
        Ok(self.store.applications_by_email(&user.email)?)
    }

    pub fn by_email(&self, user: &User, email: &str) -> Result<Vec<JobApplication>, MarketplaceError> {
        if !user.email.eq_ignore_ascii_case(email.trim()) {
            return Err(MarketplaceError::forbidden(
                "You can only view your own applications",
            ));
        }
        self.mine(user)
    }

    pub fn resume_details(&self, user: &User) -> Result<Vec<ResumeDetails>, MarketplaceError> {
        Ok(self.store.resume_details_by_email(&user.email)?)
    }

    fn owned_job(&self, user: &User, job_id: &JobId) -> Result<Job, MarketplaceError> {
        require_role(
            user,
            UserType::Industry,
            "Only INDUSTRY users can view job applications",
        )?;
        let job = self
            .store
            .job(job_id)?
            .ok_or_else(|| MarketplaceError::not_found("Job not found"))?;
        if !job.is_owned_by(&user.id) {
            return Err(MarketplaceError::forbidden(
                "You can only view applications for your own jobs",
            ));
        }
        Ok(job)
    }

    /// Applications for one of the user's jobs. When none reference the job id, applications
    /// whose title and company match the posting are re-linked to it.
    pub fn for_job(&self, user: &User, job_id: &JobId) -> Result<Vec<JobApplication>, MarketplaceError> {
        let job = self.owned_job(user, job_id)?;
        let applications = self.store.applications_for_job(job_id)?;
        if !applications.is_empty() {
            return Ok(applications);
        }

        let mut relinked = Vec::new();
        for mut application in self.store.applications()? {
            let title_match = application.job_title.eq_ignore_ascii_case(&job.title);
            let company_match = application.company.eq_ignore_ascii_case(&job.company);
            if title_match && company_match && !job.title.is_empty() {
                application.job_id = job.id.clone();
                self.store.update_application(application.clone())?;
                relinked.push(application);
            }
        }
        if !relinked.is_empty() {
            info!(job_id = %job.id, count = relinked.len(), "re-linked applications by title and company");
        }
        Ok(relinked)
    }

    pub fn for_job_with_profiles(
        &self,
        user: &User,
        job_id: &JobId,
    ) -> Result<Vec<JobApplicationWithProfile>, MarketplaceError> {
        self.for_job(user, job_id)?
            .into_iter()
            .map(|application| {
                let profile = match self.store.profile_by_applicant(&application.applicant_id)? {
                    Some(profile) => Some(profile),
                    None => self.store.profile_by_email(&application.applicant_email)?,
                };
                Ok(JobApplicationWithProfile {
                    application,
                    profile,
                })
            })
            .collect()
    }

    /// Move an application through the recruiter pipeline.
    pub fn update_status(
        &self,
        user: &User,
        id: &ApplicationId,
        raw_status: &str,
    ) -> Result<JobApplication, MarketplaceError> {
        require_role(
            user,
            UserType::Industry,
            "Only INDUSTRY users can update application status",
        )?;
        let status = ApplicationStatus::parse_pipeline(raw_status).ok_or_else(|| {
            MarketplaceError::invalid(format!(
                "Invalid status. Must be one of: {}",
                ApplicationStatus::PIPELINE
                    .iter()
                    .map(|status| status.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        let mut application = self
            .store
            .application(id)?
            .ok_or_else(|| MarketplaceError::not_found("Application not found"))?;
        let job = self
            .store
            .job(&application.job_id)?
            .ok_or_else(|| MarketplaceError::not_found("Job not found"))?;
        if !job.is_owned_by(&user.id) {
            return Err(MarketplaceError::forbidden(
                "You can only update applications for your own jobs",
            ));
        }

        let previous = application.status;
        application.status = status;
        application.last_updated = Utc::now();
        self.store.update_application(application.clone())?;

        if previous != status {
            self.notifications
                .notify_status_change(&application, Some(previous))?;
        }
        info!(application_id = %id, from = previous.as_str(), to = status.as_str(), "application status updated");
        Ok(application)
    }
}
