use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    contains_ignore_case, EducationEntry, ProfessionalExperience, ProfileId, Project,
    SubscriptionType, UserId, UserProfile,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryShortlist {
    pub id: String,
    pub industry_email: String,
    pub industry_id: UserId,
    pub student_email: String,
    pub student_id: ProfileId,
    pub shortlisted_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    ProfileViewed,
    ResumeViewed,
    ResumeDownloaded,
    CandidateShortlisted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub industry_email: String,
    pub industry_id: UserId,
    pub student_email: String,
    pub student_id: ProfileId,
    pub action_type: ActivityKind,
    pub timestamp: DateTime<Utc>,
}

/// Student database query string. Every filter is optional; blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFilters {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn opt_contains(value: &Option<String>, needle: &str) -> bool {
    value
        .as_deref()
        .map_or(false, |v| contains_ignore_case(v, needle))
}

impl StudentFilters {
    pub fn matches(&self, profile: &UserProfile) -> bool {
        let education = &profile.education_entries;

        if let Some(degree) = needle(&self.degree) {
            if !education.iter().any(|e| opt_contains(&e.degree, &degree)) {
                return false;
            }
        }
        if let Some(spec) = needle(&self.specialization) {
            if !education
                .iter()
                .any(|e| opt_contains(&e.stream, &spec) || opt_contains(&e.degree, &spec))
            {
                return false;
            }
        }
        if let Some(skill) = needle(&self.skills) {
            if !profile
                .skills
                .iter()
                .any(|s| contains_ignore_case(s, &skill))
            {
                return false;
            }
        }
        if let Some(year) = self
            .graduation_year
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            if !education
                .iter()
                .any(|e| e.passing_year.as_deref().map(str::trim) == Some(year))
            {
                return false;
            }
        }
        if let Some(college) = needle(&self.college) {
            if !education
                .iter()
                .any(|e| opt_contains(&e.institution, &college))
            {
                return false;
            }
        }
        if let Some(location) = needle(&self.location) {
            let current = opt_contains(&profile.current_location, &location);
            let preferred = profile
                .preferred_locations
                .iter()
                .any(|l| contains_ignore_case(l, &location));
            if !current && !preferred {
                return false;
            }
        }
        if let Some(availability) = needle(&self.availability) {
            if !opt_contains(&profile.availability, &availability) {
                return false;
            }
        }
        if let Some(keyword) = needle(&self.keyword) {
            let by_name = opt_contains(&profile.full_name, &keyword);
            let by_skill = profile
                .skills
                .iter()
                .any(|s| contains_ignore_case(s, &keyword));
            let by_college = education
                .iter()
                .any(|e| opt_contains(&e.institution, &keyword));
            if !(by_name || by_skill || by_college) {
                return false;
            }
        }
        true
    }
}

/// Recruiter-facing student card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCard {
    pub student_id: ProfileId,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub profile_picture_base64: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub summary: Option<String>,
    pub current_location: Option<String>,
    pub preferred_locations: Vec<String>,
    pub work_preference: Option<String>,
    pub linked_in_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub availability: Option<String>,
    pub hobbies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub is_shortlisted: bool,
    pub email: String,
    pub phone_number: Option<String>,
    pub education_entries: Vec<EducationEntry>,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub institution: Option<String>,
    pub graduation_year: Option<String>,
    pub professional_experiences: Vec<ProfessionalExperience>,
    pub projects: Vec<Project>,
    pub hackathons_participated: usize,
    pub jobs_applied: usize,
    pub resume_file_name: Option<String>,
    pub resume_available: bool,
    pub resume_base64: Option<String>,
    pub profile_completeness_score: u32,
}

impl StudentCard {
    pub fn from_profile(
        profile: &UserProfile,
        is_shortlisted: bool,
        hackathons_participated: usize,
        jobs_applied: usize,
    ) -> Self {
        let graduation = profile
            .education_entries
            .iter()
            .find(|entry| entry.is_degree_level());

        Self {
            student_id: profile.id.clone(),
            full_name: profile.full_name.clone(),
            gender: profile.gender.clone(),
            profile_picture_base64: profile.profile_picture_base64.clone(),
            skills: profile.skills.clone(),
            experience: profile.experience.clone(),
            summary: profile.summary.clone(),
            current_location: profile.current_location.clone(),
            preferred_locations: profile.preferred_locations.clone(),
            work_preference: profile.work_preference.clone(),
            linked_in_url: profile.linked_in_url.clone(),
            portfolio_url: profile.portfolio_url.clone(),
            github_url: profile.github_url.clone(),
            availability: profile.availability.clone(),
            hobbies: profile.hobbies.clone(),
            created_at: profile.created_at,
            last_updated: profile.last_updated,
            is_shortlisted,
            email: profile
                .email
                .clone()
                .filter(|email| !email.is_empty())
                .unwrap_or_else(|| profile.applicant_email.clone()),
            phone_number: profile.phone_number.clone(),
            education_entries: profile.education_entries.clone(),
            degree: graduation.and_then(|g| g.degree.clone()),
            specialization: graduation.and_then(|g| g.stream.clone()),
            institution: graduation.and_then(|g| g.institution.clone()),
            graduation_year: graduation.and_then(|g| g.passing_year.clone()),
            professional_experiences: profile.professional_experiences.clone(),
            projects: profile.projects.clone(),
            hackathons_participated,
            jobs_applied,
            resume_file_name: profile.resume_file_name.clone(),
            resume_available: profile.has_resume(),
            resume_base64: profile.resume_base64.clone(),
            profile_completeness_score: profile.completeness_score(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionFeatures {
    pub view_full_resume: bool,
    pub download_resume: bool,
    pub view_contact_details: bool,
    pub shortlist_candidates: bool,
    pub unlimited_access: bool,
}

impl SubscriptionFeatures {
    /// Every tier currently unlocks the full feature set.
    pub fn for_tier(_tier: SubscriptionType) -> Self {
        Self {
            view_full_resume: true,
            download_resume: true,
            view_contact_details: true,
            shortlist_candidates: true,
            unlimited_access: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    pub subscription_type: SubscriptionType,
    pub is_paid_user: bool,
    pub features: SubscriptionFeatures,
}

impl SubscriptionInfo {
    pub fn for_tier(tier: SubscriptionType) -> Self {
        Self {
            subscription_type: tier,
            is_paid_user: tier == SubscriptionType::Paid,
            features: SubscriptionFeatures::for_tier(tier),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDownload {
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub base64_data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        let mut profile = UserProfile::empty(
            ProfileId::from("prf-7"),
            UserId::from("usr-7"),
            "ravi@example.com".to_string(),
            Utc::now(),
        );
        profile.full_name = Some("Ravi Kumar".to_string());
        profile.skills = vec!["Rust".to_string(), "PostgreSQL".to_string()];
        profile.current_location = Some("Pune".to_string());
        profile.preferred_locations = vec!["Bengaluru".to_string()];
        profile.availability = Some("Immediately".to_string());
        profile.education_entries = vec![
            EducationEntry {
                level: Some("Class 12th".to_string()),
                board: Some("CBSE".to_string()),
                passing_year: Some("2019".to_string()),
                ..EducationEntry::default()
            },
            EducationEntry {
                level: Some("Graduation".to_string()),
                degree: Some("B.Tech".to_string()),
                stream: Some("Computer Science".to_string()),
                institution: Some("COEP Technological University".to_string()),
                passing_year: Some("2023".to_string()),
                ..EducationEntry::default()
            },
        ];
        profile
    }

    #[test]
    fn filters_combine_conjunctively() {
        let profile = profile();
        let filters = StudentFilters {
            degree: Some("b.tech".to_string()),
            specialization: Some("computer".to_string()),
            graduation_year: Some("2023".to_string()),
            location: Some("bengaluru".to_string()),
            ..StudentFilters::default()
        };
        assert!(filters.matches(&profile));

        let wrong_year = StudentFilters {
            graduation_year: Some("202".to_string()),
            ..filters.clone()
        };
        assert!(!wrong_year.matches(&profile));
    }

    #[test]
    fn keyword_matches_name_skill_or_college() {
        let profile = profile();
        for keyword in ["ravi", "postgres", "coep"] {
            let filters = StudentFilters {
                keyword: Some(keyword.to_string()),
                ..StudentFilters::default()
            };
            assert!(filters.matches(&profile), "keyword {keyword} should match");
        }
        let miss = StudentFilters {
            keyword: Some("kotlin".to_string()),
            ..StudentFilters::default()
        };
        assert!(!miss.matches(&profile));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let filters = StudentFilters {
            skills: Some("   ".to_string()),
            ..StudentFilters::default()
        };
        assert!(filters.matches(&profile()));
    }

    #[test]
    fn card_summarises_degree_level_education() {
        let card = StudentCard::from_profile(&profile(), true, 2, 3);
        assert_eq!(card.degree.as_deref(), Some("B.Tech"));
        assert_eq!(card.specialization.as_deref(), Some("Computer Science"));
        assert_eq!(card.graduation_year.as_deref(), Some("2023"));
        assert_eq!(card.email, "ravi@example.com");
        assert!(card.is_shortlisted);
        assert!(!card.resume_available);
        assert_eq!(card.hackathons_participated, 2);
    }
}
