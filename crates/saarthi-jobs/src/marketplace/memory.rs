use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    ActivityLog, ApplicationId, Hackathon, HackathonApplication, HackathonApplicationId,
    HackathonId, IndustryShortlist, Job, JobApplication, JobId, Notification, NotificationId,
    ProfileId, ResumeDetails, User, UserId, UserProfile,
};
use super::repository::{
    ApplicationRepository, HackathonApplicationRepository, HackathonRepository, JobRepository,
    NotificationRepository, ProfileRepository, RecruiterRepository, RepositoryError,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    jobs: HashMap<JobId, Job>,
    applications: HashMap<ApplicationId, JobApplication>,
    resume_details: Vec<ResumeDetails>,
    notifications: HashMap<NotificationId, Notification>,
    hackathons: HashMap<HackathonId, Hackathon>,
    hackathon_applications: HashMap<HackathonApplicationId, HackathonApplication>,
    profiles: HashMap<ProfileId, UserProfile>,
    shortlists: Vec<IndustryShortlist>,
    activity: Vec<ActivityLog>,
}

/// Process-local store backing every marketplace repository.
#[derive(Default, Clone)]
pub struct InMemoryMarketplaceStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryMarketplaceStore {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

fn same_email(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}

fn insert_new<K, V>(map: &mut HashMap<K, V>, key: K, value: V) -> Result<V, RepositoryError>
where
    K: std::hash::Hash + Eq,
    V: Clone,
{
    if map.contains_key(&key) {
        return Err(RepositoryError::Conflict);
    }
    map.insert(key, value.clone());
    Ok(value)
}

fn replace<K, V>(map: &mut HashMap<K, V>, key: K, value: V) -> Result<(), RepositoryError>
where
    K: std::hash::Hash + Eq,
{
    match map.get_mut(&key) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(RepositoryError::NotFound),
    }
}

impl UserRepository for InMemoryMarketplaceStore {
    fn insert_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut tables = self.lock()?;
        if tables
            .users
            .values()
            .any(|existing| same_email(&existing.email, &user.email))
        {
            return Err(RepositoryError::Conflict);
        }
        insert_new(&mut tables.users, user.id.clone(), user)
    }

    fn update_user(&self, user: User) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        replace(&mut tables.users, user.id.clone(), user)
    }

    fn user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|user| same_email(&user.email, email))
            .cloned())
    }
}

impl JobRepository for InMemoryMarketplaceStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut tables = self.lock()?;
        insert_new(&mut tables.jobs, job.id.clone(), job)
    }

    fn update_job(&self, job: Job) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        replace(&mut tables.jobs, job.id.clone(), job)
    }

    fn delete_job(&self, id: &JobId) -> Result<(), RepositoryError> {
        self.lock()?
            .jobs
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.lock()?.jobs.get(id).cloned())
    }

    fn jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        let mut jobs: Vec<Job> = self.lock()?.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(jobs)
    }
}

impl ApplicationRepository for InMemoryMarketplaceStore {
    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let mut tables = self.lock()?;
        insert_new(&mut tables.applications, application.id.clone(), application)
    }

    fn update_application(&self, application: JobApplication) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        replace(&mut tables.applications, application.id.clone(), application)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        Ok(self.lock()?.applications.get(id).cloned())
    }

    fn applications(&self) -> Result<Vec<JobApplication>, RepositoryError> {
        let mut applications: Vec<JobApplication> =
            self.lock()?.applications.values().cloned().collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(b.id.cmp(&a.id)));
        Ok(applications)
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<JobApplication>, RepositoryError> {
        Ok(self
            .applications()?
            .into_iter()
            .filter(|application| &application.job_id == job)
            .collect())
    }

    fn applications_by_email(&self, email: &str) -> Result<Vec<JobApplication>, RepositoryError> {
        Ok(self
            .applications()?
            .into_iter()
            .filter(|application| same_email(&application.applicant_email, email))
            .collect())
    }

    fn insert_resume_details(
        &self,
        details: ResumeDetails,
    ) -> Result<ResumeDetails, RepositoryError> {
        self.lock()?.resume_details.push(details.clone());
        Ok(details)
    }

    fn resume_details_by_email(&self, email: &str) -> Result<Vec<ResumeDetails>, RepositoryError> {
        Ok(self
            .lock()?
            .resume_details
            .iter()
            .filter(|details| same_email(&details.applicant_email, email))
            .cloned()
            .collect())
    }
}

impl NotificationRepository for InMemoryMarketplaceStore {
    fn insert_notification(
        &self,
        notification: Notification,
    ) -> Result<Notification, RepositoryError> {
        let mut tables = self.lock()?;
        insert_new(&mut tables.notifications, notification.id.clone(), notification)
    }

    fn update_notification(&self, notification: Notification) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        replace(&mut tables.notifications, notification.id.clone(), notification)
    }

    fn delete_notification(&self, id: &NotificationId) -> Result<(), RepositoryError> {
        self.lock()?
            .notifications
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn notification(&self, id: &NotificationId) -> Result<Option<Notification>, RepositoryError> {
        Ok(self.lock()?.notifications.get(id).cloned())
    }

    fn notifications_for(&self, user: &UserId) -> Result<Vec<Notification>, RepositoryError> {
        let mut notifications: Vec<Notification> = self
            .lock()?
            .notifications
            .values()
            .filter(|notification| &notification.user_id == user)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notifications)
    }
}

impl HackathonRepository for InMemoryMarketplaceStore {
    fn insert_hackathon(&self, hackathon: Hackathon) -> Result<Hackathon, RepositoryError> {
        let mut tables = self.lock()?;
        insert_new(&mut tables.hackathons, hackathon.id.clone(), hackathon)
    }

    fn update_hackathon(&self, hackathon: Hackathon) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        replace(&mut tables.hackathons, hackathon.id.clone(), hackathon)
    }

    fn delete_hackathon(&self, id: &HackathonId) -> Result<(), RepositoryError> {
        self.lock()?
            .hackathons
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn hackathon(&self, id: &HackathonId) -> Result<Option<Hackathon>, RepositoryError> {
        Ok(self.lock()?.hackathons.get(id).cloned())
    }

    fn hackathons(&self) -> Result<Vec<Hackathon>, RepositoryError> {
        let mut hackathons: Vec<Hackathon> = self.lock()?.hackathons.values().cloned().collect();
        hackathons.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(hackathons)
    }
}

impl HackathonApplicationRepository for InMemoryMarketplaceStore {
    fn insert_hackathon_application(
        &self,
        application: HackathonApplication,
    ) -> Result<HackathonApplication, RepositoryError> {
        let mut tables = self.lock()?;
        insert_new(
            &mut tables.hackathon_applications,
            application.id.clone(),
            application,
        )
    }

    fn update_hackathon_application(
        &self,
        application: HackathonApplication,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        replace(
            &mut tables.hackathon_applications,
            application.id.clone(),
            application,
        )
    }

    fn hackathon_application(
        &self,
        id: &HackathonApplicationId,
    ) -> Result<Option<HackathonApplication>, RepositoryError> {
        Ok(self.lock()?.hackathon_applications.get(id).cloned())
    }

    fn hackathon_applications_for(
        &self,
        hackathon: &HackathonId,
    ) -> Result<Vec<HackathonApplication>, RepositoryError> {
        let mut applications: Vec<HackathonApplication> = self
            .lock()?
            .hackathon_applications
            .values()
            .filter(|application| &application.hackathon_id == hackathon)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.applied_at.cmp(&b.applied_at).then(a.id.cmp(&b.id)));
        Ok(applications)
    }

    fn hackathon_applications_by(
        &self,
        applicant: &UserId,
    ) -> Result<Vec<HackathonApplication>, RepositoryError> {
        let mut applications: Vec<HackathonApplication> = self
            .lock()?
            .hackathon_applications
            .values()
            .filter(|application| &application.applicant_id == applicant)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(b.id.cmp(&a.id)));
        Ok(applications)
    }
}

impl ProfileRepository for InMemoryMarketplaceStore {
    fn save_profile(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        self.lock()?
            .profiles
            .insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn profile(&self, id: &ProfileId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.lock()?.profiles.get(id).cloned())
    }

    fn profile_by_applicant(
        &self,
        applicant: &UserId,
    ) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self
            .lock()?
            .profiles
            .values()
            .find(|profile| &profile.applicant_id == applicant)
            .cloned())
    }

    fn profile_by_email(&self, email: &str) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self
            .lock()?
            .profiles
            .values()
            .find(|profile| same_email(&profile.applicant_email, email))
            .cloned())
    }

    fn profiles(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        let mut profiles: Vec<UserProfile> = self.lock()?.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(profiles)
    }
}

impl RecruiterRepository for InMemoryMarketplaceStore {
    fn insert_shortlist(
        &self,
        entry: IndustryShortlist,
    ) -> Result<IndustryShortlist, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.shortlists.iter().any(|existing| {
            same_email(&existing.industry_email, &entry.industry_email)
                && same_email(&existing.student_email, &entry.student_email)
        }) {
            return Err(RepositoryError::Conflict);
        }
        tables.shortlists.push(entry.clone());
        Ok(entry)
    }

    fn remove_shortlist(
        &self,
        industry_email: &str,
        student_email: &str,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        let before = tables.shortlists.len();
        tables.shortlists.retain(|entry| {
            !(same_email(&entry.industry_email, industry_email)
                && same_email(&entry.student_email, student_email))
        });
        Ok(tables.shortlists.len() != before)
    }

    fn shortlists_for(
        &self,
        industry_email: &str,
    ) -> Result<Vec<IndustryShortlist>, RepositoryError> {
        Ok(self
            .lock()?
            .shortlists
            .iter()
            .filter(|entry| same_email(&entry.industry_email, industry_email))
            .cloned()
            .collect())
    }

    fn is_shortlisted(
        &self,
        industry_email: &str,
        student_email: &str,
    ) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.shortlists.iter().any(|entry| {
            same_email(&entry.industry_email, industry_email)
                && same_email(&entry.student_email, student_email)
        }))
    }

    fn record_activity(&self, entry: ActivityLog) -> Result<(), RepositoryError> {
        self.lock()?.activity.push(entry);
        Ok(())
    }

    fn activity_for(&self, industry_email: &str) -> Result<Vec<ActivityLog>, RepositoryError> {
        Ok(self
            .lock()?
            .activity
            .iter()
            .rev()
            .filter(|entry| same_email(&entry.industry_email, industry_email))
            .cloned()
            .collect())
    }
}
