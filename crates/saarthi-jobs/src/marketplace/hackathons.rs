use std::sync::Arc;

use tracing::info;

use super::auth::require_role;
use super::domain::{
    next_record_id, Hackathon, HackathonDraft, HackathonId, HackathonPhase, HackathonPhaseDraft,
    PhaseId, User, UserType,
};
use super::error::MarketplaceError;
use super::repository::MarketplaceStore;

pub struct HackathonService<S> {
    store: Arc<S>,
}

fn phases(drafts: Vec<HackathonPhaseDraft>) -> Vec<HackathonPhase> {
    drafts
        .into_iter()
        .map(|draft| HackathonPhase {
            id: draft
                .id
                .filter(|id| !id.trim().is_empty())
                .map(PhaseId)
                .unwrap_or_else(|| PhaseId(next_record_id("phase"))),
            name: draft.name,
            description: draft.description,
            upload_format: draft.upload_format,
            deadline: draft.deadline,
        })
        .collect()
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl<S: MarketplaceStore> HackathonService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Hackathon>, MarketplaceError> {
        Ok(self.store.hackathons()?)
    }

    pub fn mine(&self, user: &User) -> Result<Vec<Hackathon>, MarketplaceError> {
        require_role(
            user,
            UserType::Industry,
            "Only INDUSTRY users can view their hackathons",
        )?;
        Ok(self
            .store
            .hackathons()?
            .into_iter()
            .filter(|hackathon| hackathon.is_owned_by(&user.id))
            .collect())
    }

    fn find(&self, id: &HackathonId) -> Result<Hackathon, MarketplaceError> {
        self.store
            .hackathon(id)?
            .ok_or_else(|| MarketplaceError::not_found("Hackathon not found"))
    }

    /// Industry users only see their own postings; applicants see any.
    pub fn get(&self, user: &User, id: &HackathonId) -> Result<Hackathon, MarketplaceError> {
        let hackathon = self.find(id)?;
        if user.is(UserType::Industry) && !hackathon.is_owned_by(&user.id) {
            return Err(MarketplaceError::forbidden(
                "You can only view your own hackathons",
            ));
        }
        Ok(hackathon)
    }

    /// Hackathon owned by `user`, for the review and certificate flows.
    pub(crate) fn owned(&self, user: &User, id: &HackathonId) -> Result<Hackathon, MarketplaceError> {
        require_role(
            user,
            UserType::Industry,
            "Only INDUSTRY users can manage hackathons",
        )?;
        let hackathon = self.find(id)?;
        if !hackathon.is_owned_by(&user.id) {
            return Err(MarketplaceError::forbidden(
                "You can only manage your own hackathons",
            ));
        }
        Ok(hackathon)
    }

    fn validate(draft: &HackathonDraft) -> Result<(), MarketplaceError> {
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

    pub fn create(&self, user: &User, draft: HackathonDraft) -> Result<Hackathon, MarketplaceError> {
        require_role(
            user,
            UserType::Industry,
            "Only INDUSTRY users can create hackathons",
        )?;
        Self::validate(&draft)?;

        let hackathon = Hackathon {
            id: HackathonId(next_record_id("hck")),
            title: text(draft.title),
            description: text(draft.description),
            company: text(draft.company),
            prize: draft.prize,
            team_size: draft.team_size.unwrap_or(0),
            submission_url: draft.submission_url,
            created_by_industry_id: user.id.clone(),
            views: 0,
            problem_statement: draft.problem_statement,
            skills: draft.skills,
            phases: phases(draft.phases),
            eligibility: draft.eligibility,
            start_date: draft.start_date,
            end_date: draft.end_date,
            mode: draft.mode,
            location: draft.location,
            reporting_date: draft.reporting_date,
            submission_guidelines: draft.submission_guidelines,
            max_teams: draft.max_teams,
        };
        info!(hackathon_id = %hackathon.id, phases = hackathon.phases.len(), "hackathon created");
        Ok(self.store.insert_hackathon(hackathon)?)
    }

    pub fn update(
        &self,
        user: &User,
        id: &HackathonId,
        draft: HackathonDraft,
    ) -> Result<Hackathon, MarketplaceError> {
        let existing = self.owned(user, id)?;
        Self::validate(&draft)?;

        let hackathon = Hackathon {
            title: text(draft.title),
            description: text(draft.description),
            company: text(draft.company),
            prize: draft.prize,
            team_size: draft.team_size.unwrap_or(existing.team_size),
            submission_url: draft.submission_url,
            problem_statement: draft.problem_statement,
            skills: draft.skills,
            phases: phases(draft.phases),
            eligibility: draft.eligibility,
            start_date: draft.start_date,
            end_date: draft.end_date,
            mode: draft.mode,
            location: draft.location,
            reporting_date: draft.reporting_date,
            submission_guidelines: draft.submission_guidelines,
            max_teams: draft.max_teams,
            ..existing
        };
        self.store.update_hackathon(hackathon.clone())?;
        Ok(hackathon)
    }

    pub fn delete(&self, user: &User, id: &HackathonId) -> Result<(), MarketplaceError> {
        self.owned(user, id)?;
        self.store.delete_hackathon(id)?;
        info!(hackathon_id = %id, "hackathon deleted");
        Ok(())
    }
}
