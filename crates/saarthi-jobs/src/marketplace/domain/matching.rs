//! Job recommendations: how well a posting fits an applicant's profile.
//!
//! The score is a weighted sum of three partial scores, each on a 0-100 scale:
//! skills (50%), location (30%) and experience (20%).

use serde::{Deserialize, Serialize};

use super::{Job, UserProfile};

const SKILLS_WEIGHT: f64 = 0.50;
const LOCATION_WEIGHT: f64 = 0.30;
const EXPERIENCE_WEIGHT: f64 = 0.20;

const NEUTRAL: f64 = 50.0;
const REMOTE_LOCATION: f64 = 75.0;
const UNKNOWN_EXPERIENCE: f64 = 30.0;
const PENALTY_PER_MISSING_YEAR: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedJob {
    pub job: Job,
    pub match_percentage: f64,
}

/// The parts of a profile that recommendations look at, lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePreferences {
    pub skills: Vec<String>,
    pub locations: Vec<String>,
    pub years_of_experience: Option<u32>,
}

impl CandidatePreferences {
    /// Preferred locations plus the single preferred location; the current location
    /// is used only when neither is set.
    pub fn from_profile(profile: &UserProfile) -> Self {
        let skills = profile
            .skills
            .iter()
            .map(|skill| skill.trim().to_lowercase())
            .filter(|skill| !skill.is_empty())
            .collect();

        let mut locations: Vec<String> = profile
            .preferred_locations
            .iter()
            .map(|location| location.to_lowercase())
            .collect();
        if let Some(preferred) = profile.preferred_location.as_deref().filter(|l| !l.is_empty()) {
            locations.push(preferred.to_lowercase());
        }
        if locations.is_empty() {
            if let Some(current) = profile.current_location.as_deref() {
                locations.push(current.to_lowercase());
            }
        }

        Self {
            skills,
            locations,
            years_of_experience: profile.experience.as_deref().and_then(parse_years),
        }
    }

    /// Match percentage in `0.0..=100.0`.
    pub fn score(&self, job: &Job) -> f64 {
        let score = self.skills_score(job) * SKILLS_WEIGHT
            + self.location_score(job) * LOCATION_WEIGHT
            + self.experience_score(job) * EXPERIENCE_WEIGHT;
        score.min(100.0)
    }

    fn skills_score(&self, job: &Job) -> f64 {
        if self.skills.is_empty() {
            return 0.0;
        }
        if job.skills.is_empty() {
            return NEUTRAL;
        }
        let matched = job
            .skills
            .iter()
            .map(|skill| skill.trim().to_lowercase())
            .filter(|skill| {
                self.skills
                    .iter()
                    .any(|own| skill.contains(own.as_str()) || own.contains(skill.as_str()))
            })
            .count();
        matched as f64 / job.skills.len() as f64 * 100.0
    }

    fn location_score(&self, job: &Job) -> f64 {
        if self.locations.is_empty() {
            return NEUTRAL;
        }
        let location = job.location.to_lowercase();
        let matches = self
            .locations
            .iter()
            .any(|wanted| location.contains(wanted.as_str()) || wanted.contains(location.as_str()));
        if matches {
            100.0
        } else if location.contains("remote") {
            REMOTE_LOCATION
        } else {
            0.0
        }
    }

    fn experience_score(&self, job: &Job) -> f64 {
        let required = match job.years_of_experience {
            None | Some(0) => return NEUTRAL,
            Some(years) => years,
        };
        let Some(have) = self.years_of_experience else {
            return UNKNOWN_EXPERIENCE;
        };
        if have >= required {
            return 100.0;
        }
        let gap = f64::from(required - have);
        (100.0 - gap * PENALTY_PER_MISSING_YEAR).max(0.0)
    }
}

/// First run of digits in free text such as "5", "5 years" or "3-5 yrs".
pub(crate) fn parse_years(raw: &str) -> Option<u32> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Jobs with a positive score, best match first.
pub fn rank_jobs(preferences: &CandidatePreferences, jobs: Vec<Job>) -> Vec<RecommendedJob> {
    let mut ranked: Vec<RecommendedJob> = jobs
        .into_iter()
        .map(|job| RecommendedJob {
            match_percentage: preferences.score(&job),
            job,
        })
        .filter(|entry| entry.match_percentage > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
    ranked
}
