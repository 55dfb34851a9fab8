use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::domain::{
    next_record_id, ApplicationStatus, JobApplication, Notification, NotificationId,
    NotificationKind, User, UserType,
};
use super::error::MarketplaceError;
use super::repository::MarketplaceStore;

pub struct NotificationService<S> {
    store: Arc<S>,
}

impl<S: MarketplaceStore> NotificationService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Tell the applicant their application moved. Skipped when the account is gone.
    pub fn notify_status_change(
        &self,
        application: &JobApplication,
        previous: Option<ApplicationStatus>,
    ) -> Result<Option<Notification>, MarketplaceError> {
        let Some(applicant) = self.store.user_by_email(&application.applicant_email)? else {
            warn!(application_id = %application.id, "status notification skipped: applicant missing");
            return Ok(None);
        };

        let previous = previous.unwrap_or(ApplicationStatus::Pending);
        let message = format!(
            "Your application for {} at {} has been updated from {} to {}",
            application.job_title,
            application.company,
            previous.label(),
            application.status.label(),
        );
        let notification = self.build(
            &applicant,
            UserType::Applicant,
            NotificationKind::ApplicationStatusUpdate,
            "Application Status Updated",
            message,
            application,
        );
        Ok(Some(self.store.insert_notification(notification)?))
    }

    /// Tell the job owner someone applied. Skipped for ownerless legacy jobs.
    pub fn notify_new_application(
        &self,
        application: &JobApplication,
    ) -> Result<Option<Notification>, MarketplaceError> {
        let Some(job) = self.store.job(&application.job_id)? else {
            debug!(job_id = %application.job_id, "new-application notification skipped: job missing");
            return Ok(None);
        };
        let Some(owner_id) = job.industry_id.as_ref() else {
            debug!(job_id = %job.id, "new-application notification skipped: job has no owner");
            return Ok(None);
        };
        let Some(owner) = self.store.user(owner_id)? else {
            return Ok(None);
        };

        let applicant_label = if application.full_name.trim().is_empty() {
            application.applicant_email.as_str()
        } else {
            application.full_name.as_str()
        };
        let message = format!(
            "{} has applied for the position: {}",
            applicant_label, application.job_title
        );
        let notification = self.build(
            &owner,
            UserType::Industry,
            NotificationKind::NewApplication,
            "New Application Received",
            message,
            application,
        );
        Ok(Some(self.store.insert_notification(notification)?))
    }

    fn build(
        &self,
        recipient: &User,
        role: UserType,
        kind: NotificationKind,
        title: &str,
        message: String,
        application: &JobApplication,
    ) -> Notification {
        Notification {
            id: NotificationId(next_record_id("ntf")),
            user_id: recipient.id.clone(),
            user_type: role,
            kind,
            title: title.to_string(),
            message,
            read: false,
            created_at: Utc::now(),
            application_id: application.id.clone(),
            job_id: application.job_id.clone(),
            job_title: application.job_title.clone(),
            company_name: application.company.clone(),
        }
    }

    /// The user's notifications for their current role, newest first.
    pub fn list(&self, user: &User) -> Result<Vec<Notification>, MarketplaceError> {
        let notifications = self.store.notifications_for(&user.id)?;
        Ok(match user.user_type {
            Some(role) => notifications
                .into_iter()
                .filter(|notification| notification.user_type == role)
                .collect(),
            None => notifications,
        })
    }

    pub fn unread_count(&self, user: &User) -> Result<usize, MarketplaceError> {
        Ok(self
            .list(user)?
            .iter()
            .filter(|notification| !notification.read)
            .count())
    }

    fn owned(&self, user: &User, id: &NotificationId) -> Result<Notification, MarketplaceError> {
        let notification = self
            .store
            .notification(id)?
            .ok_or_else(|| MarketplaceError::not_found("Notification not found"))?;
        if notification.user_id != user.id {
            return Err(MarketplaceError::forbidden(
                "You can only manage your own notifications",
            ));
        }
        Ok(notification)
    }

    pub fn mark_read(
        &self,
        user: &User,
        id: &NotificationId,
    ) -> Result<Notification, MarketplaceError> {
        let mut notification = self.owned(user, id)?;
        if !notification.read {
            notification.read = true;
            self.store.update_notification(notification.clone())?;
        }
        Ok(notification)
    }

    /// Returns how many notifications flipped to read.
    pub fn mark_all_read(&self, user: &User) -> Result<usize, MarketplaceError> {
        let mut count = 0;
        for mut notification in self.list(user)? {
            if notification.read {
                continue;
            }
            notification.read = true;
            self.store.update_notification(notification)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn delete(&self, user: &User, id: &NotificationId) -> Result<(), MarketplaceError> {
        self.owned(user, id)?;
        Ok(self.store.delete_notification(id)?)
    }
}
