//! JSearch (RapidAPI) lookups behind the public job listings page.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ClientError;
use crate::http::check_response;

pub const JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";
const DEFAULT_QUERY: &str = "developer jobs";
const DEFAULT_COUNTRY: &str = "us";

/// One listing from `/search` or `/job-details`. Only the fields the listings page
/// shows are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchJob {
    pub job_id: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub employer_name: Option<String>,
    #[serde(default)]
    pub employer_logo: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub job_city: Option<String>,
    #[serde(default)]
    pub job_country: Option<String>,
    #[serde(default)]
    pub job_employment_type: Option<String>,
    #[serde(default)]
    pub job_apply_link: Option<String>,
    #[serde(default)]
    pub job_is_remote: Option<bool>,
}

impl SearchJob {
    /// "City, Country" as the listing card prints it.
    pub fn location(&self) -> String {
        format!(
            "{}, {}",
            self.job_city.as_deref().unwrap_or_default(),
            self.job_country.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryEstimate {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub publisher_name: Option<String>,
    #[serde(default)]
    pub min_salary: Option<f64>,
    #[serde(default)]
    pub max_salary: Option<f64>,
    #[serde(default)]
    pub median_salary: Option<f64>,
    #[serde(default)]
    pub salary_period: Option<String>,
    #[serde(default)]
    pub salary_currency: Option<String>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

pub struct JobSearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl JobSearchClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_base_url(api_key, format!("https://{JSEARCH_HOST}"))
    }

    /// Point at another host speaking the same API, e.g. a local stub.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Reads the key from `JSEARCH_API_KEY`; `None` when it is not set.
    pub fn from_env() -> Result<Option<Self>, ClientError> {
        std::env::var("JSEARCH_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
            .transpose()
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ClientError> {
        let request = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", JSEARCH_HOST)
            .query(query);
        let resp = check_response(request.send().await?).await?;
        let envelope: Envelope<T> = resp.json().await?;
        Ok(envelope.data)
    }

    /// One page of listings. Blank arguments fall back to "developer jobs" in the US.
    pub async fn search(
        &self,
        query: &str,
        country: &str,
        page: u32,
    ) -> Result<Vec<SearchJob>, ClientError> {
        let query = non_blank(query, DEFAULT_QUERY);
        let country = non_blank(country, DEFAULT_COUNTRY);
        self.get(
            "/search",
            &[
                ("query", query.to_string()),
                ("page", page.max(1).to_string()),
                ("num_pages", "1".to_string()),
                ("country", country.to_string()),
                ("date_posted", "all".to_string()),
            ],
        )
        .await
    }

    pub async fn details(
        &self,
        job_id: &str,
        country: &str,
    ) -> Result<Option<SearchJob>, ClientError> {
        let jobs = self
            .get(
                "/job-details",
                &[
                    ("job_id", job_id.to_string()),
                    ("country", non_blank(country, DEFAULT_COUNTRY).to_string()),
                ],
            )
            .await?;
        Ok(jobs.into_iter().next())
    }

    /// Salary ranges for a title near a location; failures yield an empty list.
    pub async fn estimated_salaries(
        &self,
        job_title: &str,
        location: &str,
        radius_km: u32,
    ) -> Vec<SalaryEstimate> {
        let result = self
            .get(
                "/estimated-salary",
                &[
                    ("job_title", job_title.to_string()),
                    ("location", location.to_string()),
                    ("radius", radius_km.to_string()),
                ],
            )
            .await;
        result.unwrap_or_else(|err| {
            warn!(error = %err, job_title, "salary estimate lookup failed");
            Vec::new()
        })
    }
}

fn non_blank<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
