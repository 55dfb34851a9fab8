use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::auth::require_role;
use super::domain::{
    next_record_id, Hackathon, HackathonApplication, HackathonApplicationId,
    HackathonApplicationRequest, HackathonApplicationStatus, HackathonId, PhaseId, PhaseReview,
    PhaseSubmission, PhaseSubmissionRequest, SubmissionStatus, User, UserType,
};
use super::error::MarketplaceError;
use super::hackathons::HackathonService;
use super::repository::MarketplaceStore;

/// Individual and team entries, phase submissions and their reviews.
pub struct HackathonApplicationService<S> {
    store: Arc<S>,
    hackathons: Arc<HackathonService<S>>,
}

impl<S: MarketplaceStore> HackathonApplicationService<S> {
    pub fn new(store: Arc<S>, hackathons: Arc<HackathonService<S>>) -> Self {
        Self { store, hackathons }
    }

    fn hackathon(&self, id: &HackathonId) -> Result<Hackathon, MarketplaceError> {
        self.store
            .hackathon(id)?
            .ok_or_else(|| MarketplaceError::not_found("Hackathon not found"))
    }

    pub(crate) fn find(
        &self,
        id: &HackathonApplicationId,
    ) -> Result<HackathonApplication, MarketplaceError> {
        self.store
            .hackathon_application(id)?
            .ok_or_else(|| MarketplaceError::not_found("Application not found"))
    }

    pub fn apply(
        &self,
        user: &User,
        hackathon_id: &HackathonId,
        request: HackathonApplicationRequest,
    ) -> Result<HackathonApplication, MarketplaceError> {
        require_role(
            user,
            UserType::Applicant,
            "Only APPLICANT users can apply to hackathons",
        )?;
        let hackathon = self.hackathon(hackathon_id)?;
        if self
            .store
            .hackathon_applications_by(&user.id)?
            .iter()
            .any(|existing| &existing.hackathon_id == hackathon_id)
        {
            return Err(MarketplaceError::invalid(
                "You have already applied to this hackathon",
            ));
        }

        let as_team = request.as_team.unwrap_or(false);
        let (team_name, team_size) = if as_team {
            let name = request
                .team_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    MarketplaceError::invalid("Team name is required for team applications")
                })?;
            let size = request.team_size.unwrap_or(0);
            if size <= 1 {
                return Err(MarketplaceError::invalid("Team size must be greater than 1"));
            }
            (Some(name), size)
        } else {
            (None, 1)
        };

        let application = HackathonApplication {
            id: HackathonApplicationId(next_record_id("happ")),
            hackathon_id: hackathon.id.clone(),
            applicant_id: user.id.clone(),
            as_team,
            team_name,
            team_size,
            team_members: request.team_members,
            applied_at: Utc::now(),
            current_phase_id: hackathon.phases.first().map(|phase| phase.id.clone()),
            status: HackathonApplicationStatus::Active,
            phase_submissions: Default::default(),
            certificate_url: None,
        };
        info!(
            application_id = %application.id,
            hackathon_id = %hackathon.id,
            as_team,
            "hackathon application stored"
        );
        Ok(self.store.insert_hackathon_application(application)?)
    }

    pub fn mine(&self, user: &User) -> Result<Vec<HackathonApplication>, MarketplaceError> {
        require_role(
            user,
            UserType::Applicant,
            "Only APPLICANT users have hackathon applications",
        )?;
        Ok(self.store.hackathon_applications_by(&user.id)?)
    }

    pub fn submit_phase(
        &self,
        user: &User,
        id: &HackathonApplicationId,
        phase_id: &PhaseId,
        request: PhaseSubmissionRequest,
    ) -> Result<HackathonApplication, MarketplaceError> {
        let mut application = self.find(id)?;
        if application.applicant_id != user.id {
            return Err(MarketplaceError::forbidden(
                "You can only submit for your own application",
            ));
        }
        if application.status == HackathonApplicationStatus::Rejected {
            return Err(MarketplaceError::forbidden("Application is rejected."));
        }
        let hackathon = self.hackathon(&application.hackathon_id)?;
        if hackathon.phase(phase_id).is_none() {
            return Err(MarketplaceError::not_found("Phase not found"));
        }

        application.phase_submissions.insert(
            phase_id.clone(),
            PhaseSubmission {
                solution_statement: request.solution_statement,
                file_url: request.file_url,
                file_name: request.file_name,
                submitted_at: Utc::now(),
                status: SubmissionStatus::Pending,
                remarks: None,
                score: None,
            },
        );
        application.current_phase_id = Some(phase_id.clone());
        self.store.update_hackathon_application(application.clone())?;
        info!(application_id = %id, phase_id = %phase_id, "phase submission received");
        Ok(application)
    }

    /// Record the owner's verdict. A rejection ends the application; accepting the
    /// final phase completes it.
    pub fn review_phase(
        &self,
        user: &User,
        id: &HackathonApplicationId,
        phase_id: &PhaseId,
        review: PhaseReview,
    ) -> Result<HackathonApplication, MarketplaceError> {
        let mut application = self.find(id)?;
        let hackathon = self.hackathons.owned(user, &application.hackathon_id)?;
        let submission = application
            .phase_submissions
            .get_mut(phase_id)
            .ok_or_else(|| MarketplaceError::not_found("No submission found for this phase."))?;

        submission.status = review.status;
        submission.score = review.score;
        submission.remarks = review.remarks;

        match review.status {
            SubmissionStatus::Rejected => {
                application.status = HackathonApplicationStatus::Rejected;
            }
            SubmissionStatus::Accepted
                if hackathon.phases.last().map(|phase| &phase.id) == Some(phase_id) =>
            {
                application.status = HackathonApplicationStatus::Completed;
            }
            _ => {}
        }
        self.store.update_hackathon_application(application.clone())?;
        info!(
            application_id = %id,
            phase_id = %phase_id,
            verdict = ?review.status,
            "phase reviewed"
        );
        Ok(application)
    }

    pub fn for_hackathon(
        &self,
        user: &User,
        hackathon_id: &HackathonId,
    ) -> Result<Vec<HackathonApplication>, MarketplaceError> {
        self.hackathons.owned(user, hackathon_id)?;
        Ok(self.store.hackathon_applications_for(hackathon_id)?)
    }

    /// Visible to the applicant and to the hackathon's owner.
    pub fn details(
        &self,
        user: &User,
        id: &HackathonApplicationId,
    ) -> Result<HackathonApplication, MarketplaceError> {
        let application = self.find(id)?;
        if application.applicant_id == user.id {
            return Ok(application);
        }
        let hackathon = self.hackathon(&application.hackathon_id)?;
        if user.is(UserType::Industry) && hackathon.is_owned_by(&user.id) {
            return Ok(application);
        }
        Err(MarketplaceError::forbidden(
            "You are not allowed to view this application",
        ))
    }
}
