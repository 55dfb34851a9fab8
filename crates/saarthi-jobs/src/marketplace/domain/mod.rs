//! Records exchanged with the SPA. Field names serialize in camelCase.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize};

mod hackathons;
mod jobs;
mod matching;
mod notifications;
mod profiles;
mod recruiting;
mod users;

pub use hackathons::{
    Hackathon, HackathonApplication, HackathonApplicationRequest, HackathonApplicationStatus,
    HackathonDraft, HackathonPhase, HackathonPhaseDraft, PhaseReview, PhaseSubmission,
    PhaseSubmissionRequest, SubmissionStatus, TeamMember,
};
pub use jobs::{
    ApplicationForm, ApplicationStatus, Job, JobApplication, JobApplicationWithProfile, JobDraft,
    ResumeDetails,
};
pub use matching::{rank_jobs, CandidatePreferences, RecommendedJob};
pub use notifications::{Notification, NotificationKind};
pub use profiles::{
    CertificationFile, EducationEntry, ProfessionalExperience, ProfilePatch, Project, UserProfile,
};
pub use recruiting::{
    ActivityKind, ActivityLog, IndustryShortlist, ResumeDownload, StudentCard, StudentFilters,
    SubscriptionFeatures, SubscriptionInfo,
};
pub use users::{
    AuthStatus, IndustryLogin, IndustryRegistration, RoleSelection, RoleUpdate, SessionUser,
    SubscriptionType, User, UserType,
};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier for marketplace accounts, applicants and industry users alike.
    UserId
);
string_id!(JobId);
string_id!(
    /// Identifier for job applications.
    ApplicationId
);
string_id!(NotificationId);
string_id!(HackathonId);
string_id!(HackathonApplicationId);
string_id!(PhaseId);
string_id!(
    /// Identifier for student profiles; the student database exposes this as `studentId`.
    ProfileId
);

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_record_id(prefix: &str) -> String {
    let id = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

/// Accepts a byte count sent either as a JSON number or a numeric string.
pub(crate) fn deserialize_file_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64)),
        Some(serde_json::Value::String(text)) => text.trim().parse::<u64>().ok(),
        _ => None,
    })
}

pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).map_or(true, str::is_empty)
}

pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
