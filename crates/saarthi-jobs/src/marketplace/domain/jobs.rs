use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_file_size, is_blank, ApplicationId, JobId, UserId, UserProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub posted_by: Option<String>,
    /// Owning industry user. Jobs posted before ownership was tracked have none.
    #[serde(default)]
    pub industry_id: Option<UserId>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub job_min_salary: Option<u32>,
    #[serde(default)]
    pub job_max_salary: Option<u32>,
    #[serde(default)]
    pub job_salary_currency: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

impl Job {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.industry_id.as_ref() == Some(user)
    }
}

/// Create/update payload for a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub posted_by: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub job_min_salary: Option<u32>,
    #[serde(default)]
    pub job_max_salary: Option<u32>,
    #[serde(default)]
    pub job_salary_currency: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl JobDraft {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("company", &self.company),
            ("location", &self.location),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Recruiter pipeline plus the two legacy tracker values older records still carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    ResumeViewed,
    CallScheduled,
    InterviewScheduled,
    OfferSent,
    Accepted,
    Rejected,
    Interview,
    Offer,
}

impl ApplicationStatus {
    pub const PIPELINE: [ApplicationStatus; 7] = [
        Self::Pending,
        Self::ResumeViewed,
        Self::CallScheduled,
        Self::InterviewScheduled,
        Self::OfferSent,
        Self::Accepted,
        Self::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ResumeViewed => "resume_viewed",
            Self::CallScheduled => "call_scheduled",
            Self::InterviewScheduled => "interview_scheduled",
            Self::OfferSent => "offer_sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Interview => "interview",
            Self::Offer => "offer",
        }
    }

    /// Parses any known status, legacy values included.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::PIPELINE
            .into_iter()
            .chain([Self::Interview, Self::Offer])
            .find(|status| status.as_str() == normalized)
    }

    /// Parses only values a recruiter may set.
    pub fn parse_pipeline(raw: &str) -> Option<Self> {
        Self::parse(raw).filter(|status| Self::PIPELINE.contains(status))
    }

    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant_email: String,
    pub applicant_id: UserId,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub job_description: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume_file_name: String,
    #[serde(default)]
    pub resume_file_type: String,
    #[serde(default)]
    pub resume_base64: String,
    #[serde(default)]
    pub resume_file_size: Option<u64>,
    #[serde(default)]
    pub linked_in_url: String,
    #[serde(default)]
    pub portfolio_url: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub availability: String,
}

/// Application form posted from the apply dialog. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_file_name: Option<String>,
    #[serde(default)]
    pub resume_file_type: Option<String>,
    #[serde(default)]
    pub resume_base64: Option<String>,
    #[serde(default, deserialize_with = "deserialize_file_size")]
    pub resume_file_size: Option<u64>,
    #[serde(default)]
    pub linked_in_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
}

/// Snapshot of the submitted form kept next to each application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDetails {
    pub id: String,
    pub job_id: JobId,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub job_description: String,
    pub applicant_email: String,
    pub applicant_id: UserId,
    pub full_name: String,
    pub phone_number: String,
    pub resume_file_name: String,
    pub resume_file_type: String,
    pub resume_base64: String,
    pub resume_file_size: Option<u64>,
    pub cover_letter: String,
    pub linked_in_url: String,
    pub portfolio_url: String,
    pub experience: String,
    pub availability: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl ResumeDetails {
    pub fn snapshot(id: String, application: &JobApplication) -> Self {
        Self {
            id,
            job_id: application.job_id.clone(),
            job_title: application.job_title.clone(),
            company: application.company.clone(),
            location: application.location.clone(),
            job_description: application.job_description.clone(),
            applicant_email: application.applicant_email.clone(),
            applicant_id: application.applicant_id.clone(),
            full_name: application.full_name.clone(),
            phone_number: application.phone_number.clone(),
            resume_file_name: application.resume_file_name.clone(),
            resume_file_type: application.resume_file_type.clone(),
            resume_base64: application.resume_base64.clone(),
            resume_file_size: application.resume_file_size,
            cover_letter: application.cover_letter.clone(),
            linked_in_url: application.linked_in_url.clone(),
            portfolio_url: application.portfolio_url.clone(),
            experience: application.experience.clone(),
            availability: application.availability.clone(),
            status: application.status,
            applied_at: application.applied_at,
        }
    }
}

/// Recruiter view pairing an application with the applicant's profile, if one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationWithProfile {
    pub application: JobApplication,
    #[serde(rename = "userProfile")]
    pub profile: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_parsing_rejects_legacy_values() {
        assert_eq!(
            ApplicationStatus::parse_pipeline("Interview_Scheduled"),
            Some(ApplicationStatus::InterviewScheduled)
        );
        assert_eq!(ApplicationStatus::parse("offer"), Some(ApplicationStatus::Offer));
        assert_eq!(ApplicationStatus::parse_pipeline("offer"), None);
        assert_eq!(ApplicationStatus::parse_pipeline("hired"), None);
    }

    #[test]
    fn form_accepts_numeric_and_string_file_sizes() {
        let numeric: ApplicationForm =
            serde_json::from_str(r#"{"jobId":"job-1","resumeFileSize":2048}"#).expect("parses");
        assert_eq!(numeric.resume_file_size, Some(2048));

        let text: ApplicationForm =
            serde_json::from_str(r#"{"jobId":"job-1","resumeFileSize":"4096"}"#).expect("parses");
        assert_eq!(text.resume_file_size, Some(4096));

        let junk: ApplicationForm =
            serde_json::from_str(r#"{"jobId":"job-1","resumeFileSize":"big"}"#).expect("parses");
        assert_eq!(junk.resume_file_size, None);
    }

    #[test]
    fn draft_reports_missing_required_fields() {
        let draft = JobDraft {
            title: Some("Backend Engineer".to_string()),
            company: Some("  ".to_string()),
            ..JobDraft::default()
        };
        assert_eq!(
            draft.missing_fields(),
            vec!["company", "location", "description"]
        );
    }
}
