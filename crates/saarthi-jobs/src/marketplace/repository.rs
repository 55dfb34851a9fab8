use super::domain::{
    ActivityLog, ApplicationId, Hackathon, HackathonApplication, HackathonApplicationId,
    HackathonId, IndustryShortlist, Job, JobApplication, JobId, Notification, NotificationId,
    ProfileId, ResumeDetails, User, UserId, UserProfile,
};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Accounts. Email lookups are case-insensitive.
pub trait UserRepository: Send + Sync {
    fn insert_user(&self, user: User) -> Result<User, RepositoryError>;
    fn update_user(&self, user: User) -> Result<(), RepositoryError>;
    fn user(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}

pub trait JobRepository: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update_job(&self, job: Job) -> Result<(), RepositoryError>;
    fn delete_job(&self, id: &JobId) -> Result<(), RepositoryError>;
    fn job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    /// All postings, newest first.
    fn jobs(&self) -> Result<Vec<Job>, RepositoryError>;
}

/// Job applications plus the resume-and-details snapshots taken at submission.
pub trait ApplicationRepository: Send + Sync {
    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError>;
    fn update_application(&self, application: JobApplication) -> Result<(), RepositoryError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError>;
    fn applications(&self) -> Result<Vec<JobApplication>, RepositoryError>;
    fn applications_for_job(&self, job: &JobId) -> Result<Vec<JobApplication>, RepositoryError>;
    fn applications_by_email(&self, email: &str) -> Result<Vec<JobApplication>, RepositoryError>;
    fn insert_resume_details(&self, details: ResumeDetails)
        -> Result<ResumeDetails, RepositoryError>;
    fn resume_details_by_email(&self, email: &str) -> Result<Vec<ResumeDetails>, RepositoryError>;
}

pub trait NotificationRepository: Send + Sync {
    fn insert_notification(&self, notification: Notification)
        -> Result<Notification, RepositoryError>;
    fn update_notification(&self, notification: Notification) -> Result<(), RepositoryError>;
    fn delete_notification(&self, id: &NotificationId) -> Result<(), RepositoryError>;
    fn notification(&self, id: &NotificationId) -> Result<Option<Notification>, RepositoryError>;
    fn notifications_for(&self, user: &UserId) -> Result<Vec<Notification>, RepositoryError>;
}

pub trait HackathonRepository: Send + Sync {
    fn insert_hackathon(&self, hackathon: Hackathon) -> Result<Hackathon, RepositoryError>;
    fn update_hackathon(&self, hackathon: Hackathon) -> Result<(), RepositoryError>;
    fn delete_hackathon(&self, id: &HackathonId) -> Result<(), RepositoryError>;
    fn hackathon(&self, id: &HackathonId) -> Result<Option<Hackathon>, RepositoryError>;
    fn hackathons(&self) -> Result<Vec<Hackathon>, RepositoryError>;
}

pub trait HackathonApplicationRepository: Send + Sync {
    fn insert_hackathon_application(
        &self,
        application: HackathonApplication,
    ) -> Result<HackathonApplication, RepositoryError>;
    fn update_hackathon_application(
        &self,
        application: HackathonApplication,
    ) -> Result<(), RepositoryError>;
    fn hackathon_application(
        &self,
        id: &HackathonApplicationId,
    ) -> Result<Option<HackathonApplication>, RepositoryError>;
    fn hackathon_applications_for(
        &self,
        hackathon: &HackathonId,
    ) -> Result<Vec<HackathonApplication>, RepositoryError>;
    fn hackathon_applications_by(
        &self,
        applicant: &UserId,
    ) -> Result<Vec<HackathonApplication>, RepositoryError>;
}

pub trait ProfileRepository: Send + Sync {
    /// Insert or replace, keyed by profile id.
    fn save_profile(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError>;
    fn profile(&self, id: &ProfileId) -> Result<Option<UserProfile>, RepositoryError>;
    fn profile_by_applicant(&self, applicant: &UserId)
        -> Result<Option<UserProfile>, RepositoryError>;
    fn profile_by_email(&self, email: &str) -> Result<Option<UserProfile>, RepositoryError>;
    fn profiles(&self) -> Result<Vec<UserProfile>, RepositoryError>;
}

/// Recruiter shortlists and the activity audit trail.
pub trait RecruiterRepository: Send + Sync {
    fn insert_shortlist(&self, entry: IndustryShortlist)
        -> Result<IndustryShortlist, RepositoryError>;
    /// Returns whether an entry was removed.
    fn remove_shortlist(
        &self,
        industry_email: &str,
        student_email: &str,
    ) -> Result<bool, RepositoryError>;
    fn shortlists_for(&self, industry_email: &str)
        -> Result<Vec<IndustryShortlist>, RepositoryError>;
    fn is_shortlisted(&self, industry_email: &str, student_email: &str)
        -> Result<bool, RepositoryError>;
    fn record_activity(&self, entry: ActivityLog) -> Result<(), RepositoryError>;
    fn activity_for(&self, industry_email: &str) -> Result<Vec<ActivityLog>, RepositoryError>;
}

/// Everything the marketplace services persist.
pub trait MarketplaceStore:
    UserRepository
    + JobRepository
    + ApplicationRepository
    + NotificationRepository
    + HackathonRepository
    + HackathonApplicationRepository
    + ProfileRepository
    + RecruiterRepository
    + 'static
{
}

impl<T> MarketplaceStore for T where
    T: UserRepository
        + JobRepository
        + ApplicationRepository
        + NotificationRepository
        + HackathonRepository
        + HackathonApplicationRepository
        + ProfileRepository
        + RecruiterRepository
        + 'static
{
}
