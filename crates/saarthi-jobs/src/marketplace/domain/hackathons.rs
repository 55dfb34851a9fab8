use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{is_blank, HackathonApplicationId, HackathonId, PhaseId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HackathonPhase {
    pub id: PhaseId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Expected deliverable, e.g. "PDF" or "GitHub link".
    #[serde(default)]
    pub upload_format: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hackathon {
    pub id: HackathonId,
    pub title: String,
    pub description: String,
    pub company: String,
    #[serde(default)]
    pub prize: Option<String>,
    pub team_size: u32,
    #[serde(default)]
    pub submission_url: Option<String>,
    pub created_by_industry_id: UserId,
    pub views: u32,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub phases: Vec<HackathonPhase>,
    #[serde(default)]
    pub eligibility: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub reporting_date: Option<String>,
    #[serde(default)]
    pub submission_guidelines: Option<String>,
    #[serde(default)]
    pub max_teams: Option<u32>,
}

impl Hackathon {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.created_by_industry_id == user
    }

    pub fn phase(&self, id: &PhaseId) -> Option<&HackathonPhase> {
        self.phases.iter().find(|phase| &phase.id == id)
    }
}

/// Phase as posted by the wizard; ids are assigned server-side when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HackathonPhaseDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub upload_format: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HackathonDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub prize: Option<String>,
    #[serde(default)]
    pub team_size: Option<u32>,
    #[serde(default)]
    pub submission_url: Option<String>,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub phases: Vec<HackathonPhaseDraft>,
    #[serde(default)]
    pub eligibility: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub reporting_date: Option<String>,
    #[serde(default)]
    pub submission_guidelines: Option<String>,
    #[serde(default)]
    pub max_teams: Option<u32>,
}

impl HackathonDraft {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HackathonApplicationStatus {
    #[default]
    Active,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// "Team Lead" or "Member".
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSubmission {
    #[serde(default)]
    pub solution_statement: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub score: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HackathonApplication {
    pub id: HackathonApplicationId,
    pub hackathon_id: HackathonId,
    pub applicant_id: UserId,
    pub as_team: bool,
    #[serde(default)]
    pub team_name: Option<String>,
    pub team_size: u32,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub current_phase_id: Option<PhaseId>,
    pub status: HackathonApplicationStatus,
    #[serde(default)]
    pub phase_submissions: BTreeMap<PhaseId, PhaseSubmission>,
    #[serde(default)]
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HackathonApplicationRequest {
    #[serde(default)]
    pub as_team: Option<bool>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub team_size: Option<u32>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSubmissionRequest {
    #[serde(default)]
    pub solution_statement: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseReview {
    pub status: SubmissionStatus,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub remarks: Option<String>,
}
