use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{deserialize_file_size, ProfileId, UserId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    /// "Class 12th", "Graduation", "Post Graduation", ...
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub board: Option<String>,
    #[serde(default)]
    pub passing_year: Option<String>,
    #[serde(default)]
    pub percentage: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
}

impl EducationEntry {
    pub fn is_degree_level(&self) -> bool {
        self.level.as_deref().map_or(false, |level| {
            level.eq_ignore_ascii_case("Graduation") || level.eq_ignore_ascii_case("Post Graduation")
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalExperience {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current_job: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_base64: Option<String>,
    #[serde(default, deserialize_with = "deserialize_file_size")]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub issuing_organization: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

/// Applicant profile; recruiters browse these through the student database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: ProfileId,
    pub applicant_email: String,
    pub applicant_id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub profile_picture_file_name: Option<String>,
    #[serde(default)]
    pub profile_picture_file_type: Option<String>,
    #[serde(default)]
    pub profile_picture_base64: Option<String>,
    #[serde(default)]
    pub profile_picture_file_size: Option<u64>,
    #[serde(default)]
    pub resume_file_name: Option<String>,
    #[serde(default)]
    pub resume_file_type: Option<String>,
    #[serde(default)]
    pub resume_base64: Option<String>,
    #[serde(default)]
    pub resume_file_size: Option<u64>,
    #[serde(default)]
    pub current_position: Option<String>,
    #[serde(default)]
    pub current_company: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub professional_experiences: Vec<ProfessionalExperience>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub work_preference: Option<String>,
    #[serde(default)]
    pub willing_to_relocate: Option<bool>,
    #[serde(default)]
    pub linked_in_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<String>,
    #[serde(default)]
    pub cover_letter_template: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub education_entries: Vec<EducationEntry>,
    #[serde(default)]
    pub certifications: Option<String>,
    #[serde(default)]
    pub certification_files: Vec<CertificationFile>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl UserProfile {
    pub fn empty(
        id: ProfileId,
        applicant_id: UserId,
        applicant_email: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            applicant_email,
            applicant_id,
            full_name: None,
            phone_number: None,
            email: None,
            gender: None,
            profile_picture_file_name: None,
            profile_picture_file_type: None,
            profile_picture_base64: None,
            profile_picture_file_size: None,
            resume_file_name: None,
            resume_file_type: None,
            resume_base64: None,
            resume_file_size: None,
            current_position: None,
            current_company: None,
            experience: None,
            professional_experiences: Vec::new(),
            skills: Vec::new(),
            summary: None,
            current_location: None,
            preferred_locations: Vec::new(),
            preferred_location: None,
            work_preference: None,
            willing_to_relocate: None,
            linked_in_url: None,
            portfolio_url: None,
            github_url: None,
            website_url: None,
            availability: None,
            expected_salary: None,
            cover_letter_template: None,
            education: None,
            education_entries: Vec::new(),
            certifications: None,
            certification_files: Vec::new(),
            hobbies: Vec::new(),
            projects: Vec::new(),
            created_at: now,
            last_updated: now,
        }
    }

    pub fn has_resume(&self) -> bool {
        self.resume_base64
            .as_deref()
            .map_or(false, |data| !data.is_empty())
    }

    /// Share of the twelve headline fields that are filled, as a 0-100 integer.
    pub fn completeness_score(&self) -> u32 {
        let filled = |value: &Option<String>| value.as_deref().map_or(false, |v| !v.is_empty());
        let checks = [
            filled(&self.full_name),
            filled(&self.email),
            filled(&self.phone_number),
            filled(&self.profile_picture_base64),
            filled(&self.resume_base64),
            !self.skills.is_empty(),
            !self.education_entries.is_empty(),
            !self.professional_experiences.is_empty(),
            !self.projects.is_empty(),
            filled(&self.summary),
            filled(&self.linked_in_url),
            filled(&self.current_location),
        ];
        let score = checks.iter().filter(|passed| **passed).count() as u32;
        score * 100 / checks.len() as u32
    }

    pub fn apply(&mut self, patch: ProfilePatch, now: DateTime<Utc>) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = Some(value);
                })*
            };
        }
        macro_rules! replace {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field {
                    self.$field = value;
                })*
            };
        }

        take!(
            full_name,
            phone_number,
            email,
            gender,
            profile_picture_file_name,
            profile_picture_file_type,
            profile_picture_base64,
            profile_picture_file_size,
            resume_file_name,
            resume_file_type,
            resume_base64,
            resume_file_size,
            current_position,
            current_company,
            experience,
            summary,
            current_location,
            preferred_location,
            work_preference,
            willing_to_relocate,
            linked_in_url,
            portfolio_url,
            github_url,
            website_url,
            availability,
            expected_salary,
            cover_letter_template,
            education,
            certifications,
        );
        replace!(
            professional_experiences,
            skills,
            preferred_locations,
            education_entries,
            certification_files,
            hobbies,
            projects,
        );
        self.last_updated = now;
    }
}

/// Partial profile update: only keys present in the request change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub profile_picture_file_name: Option<String>,
    #[serde(default)]
    pub profile_picture_file_type: Option<String>,
    #[serde(default)]
    pub profile_picture_base64: Option<String>,
    #[serde(default, deserialize_with = "deserialize_file_size")]
    pub profile_picture_file_size: Option<u64>,
    #[serde(default)]
    pub resume_file_name: Option<String>,
    #[serde(default)]
    pub resume_file_type: Option<String>,
    #[serde(default)]
    pub resume_base64: Option<String>,
    #[serde(default, deserialize_with = "deserialize_file_size")]
    pub resume_file_size: Option<u64>,
    #[serde(default)]
    pub current_position: Option<String>,
    #[serde(default)]
    pub current_company: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub professional_experiences: Option<Vec<ProfessionalExperience>>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub preferred_locations: Option<Vec<String>>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub work_preference: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub willing_to_relocate: Option<bool>,
    #[serde(default)]
    pub linked_in_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<String>,
    #[serde(default)]
    pub cover_letter_template: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub education_entries: Option<Vec<EducationEntry>>,
    #[serde(default)]
    pub certifications: Option<String>,
    #[serde(default)]
    pub certification_files: Option<Vec<CertificationFile>>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub hobbies: Option<Vec<String>>,
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
}

/// A list of strings, or one comma-separated string.
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrText {
        List(Vec<String>),
        Text(String),
    }

    let raw = Option::<ListOrText>::deserialize(deserializer)?;
    Ok(raw.map(|value| {
        let items = match value {
            ListOrText::List(items) => items,
            ListOrText::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }))
}

fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Bool(flag)) => Some(flag),
        Some(serde_json::Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile::empty(
            ProfileId::from("prf-1"),
            UserId::from("usr-1"),
            "asha@example.com".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn patch_accepts_comma_separated_skills_and_string_flags() {
        let patch: ProfilePatch = serde_json::from_str(
            r#"{"skills":"Rust, SQL , ,React","willingToRelocate":"true","resumeFileSize":"900"}"#,
        )
        .expect("patch parses");
        assert_eq!(
            patch.skills,
            Some(vec!["Rust".to_string(), "SQL".to_string(), "React".to_string()])
        );
        assert_eq!(patch.willing_to_relocate, Some(true));
        assert_eq!(patch.resume_file_size, Some(900));
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut profile = profile();
        profile.summary = Some("Existing summary".to_string());
        profile.skills = vec!["Go".to_string()];

        let patch: ProfilePatch =
            serde_json::from_str(r#"{"fullName":"Asha Rao"}"#).expect("patch parses");
        profile.apply(patch, Utc::now());

        assert_eq!(profile.full_name.as_deref(), Some("Asha Rao"));
        assert_eq!(profile.summary.as_deref(), Some("Existing summary"));
        assert_eq!(profile.skills, vec!["Go".to_string()]);
    }

    #[test]
    fn completeness_counts_twelve_fields() {
        let mut profile = profile();
        assert_eq!(profile.completeness_score(), 0);

        profile.full_name = Some("Asha Rao".to_string());
        profile.email = Some("asha@example.com".to_string());
        profile.skills = vec!["Rust".to_string()];
        assert_eq!(profile.completeness_score(), 25);

        profile.summary = Some(String::new());
        assert_eq!(profile.completeness_score(), 25);
    }
}
