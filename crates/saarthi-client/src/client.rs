//! Typed wrapper over the marketplace REST API.
//!
//! The underlying `reqwest` client keeps a cookie jar, so a successful industry
//! login (or an imported session cookie) authenticates every later call the way
//! the browser's `withCredentials` requests do. Redirects are not followed; the
//! sign-in and logout endpoints answer with redirects meant for a browser.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use saarthi_jobs::marketplace::domain::{
    ApplicationForm, AuthStatus, Hackathon, HackathonApplication, HackathonApplicationRequest,
    HackathonDraft, IndustryLogin, IndustryRegistration, Job, JobApplication,
    JobApplicationWithProfile, JobDraft, Notification, PhaseReview, PhaseSubmissionRequest,
    ProfilePatch, RecommendedJob, ResumeDetails, ResumeDownload, RoleSelection, RoleUpdate,
    SessionUser, StudentFilters, SubscriptionInfo, SubscriptionType, User, UserProfile,
};
use saarthi_jobs::marketplace::{ShortlistPage, StudentDetail, StudentPage};

use crate::error::ClientError;
use crate::http::check_response;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Deserialize)]
struct Count {
    count: u64,
}

#[derive(Deserialize)]
struct Message {
    message: String,
}

async fn redirect_target(resp: reqwest::Response) -> Result<String, ClientError> {
    if !resp.status().is_redirection() {
        check_response(resp).await?;
        return Err(ClientError::Api {
            status: 502,
            message: "expected a redirect".to_string(),
        });
    }
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| ClientError::Api {
            status: 502,
            message: "redirect without a Location header".to_string(),
        })
}

/// Cookie-carrying client bound to one marketplace deployment.
#[derive(Clone)]
pub struct SaarthiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SaarthiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Bound to `SAARTHI_API_URL`, or the local development server.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url =
            std::env::var("SAARTHI_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let resp = check_response(request.send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.fetch(self.request(Method::GET, path)).await
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.fetch(self.request(method, path).json(body)).await
    }

    async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ClientError> {
        self.fetch(self.request(method, path)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        check_response(self.request(Method::DELETE, path).send().await?).await?;
        Ok(())
    }

    // auth

    /// Where the browser goes to start Google sign-in.
    pub fn google_login_url(&self) -> String {
        self.url("/oauth2/authorization/google")
    }

    /// Start Google sign-in outside a browser: keeps the anti-forgery cookie and
    /// returns the consent URL the user has to visit.
    pub async fn begin_google_sign_in(&self) -> Result<String, ClientError> {
        let resp = self
            .request(Method::GET, "/oauth2/authorization/google")
            .send()
            .await?;
        redirect_target(resp).await
    }

    /// Finish sign-in with the `code` and `state` Google handed back; the session
    /// cookie is kept for later calls. Returns where the browser would land next.
    pub async fn finish_google_sign_in(
        &self,
        code: &str,
        state: &str,
    ) -> Result<String, ClientError> {
        let resp = self
            .request(Method::GET, "/login/oauth2/code/google")
            .query(&[("code", code), ("state", state)])
            .send()
            .await?;
        redirect_target(resp).await
    }

    pub async fn auth_status(&self) -> Result<AuthStatus, ClientError> {
        self.get("/api/auth/me").await
    }

    pub async fn register_industry(
        &self,
        registration: &IndustryRegistration,
    ) -> Result<User, ClientError> {
        self.send(Method::POST, "/api/auth/industry/register", registration)
            .await
    }

    /// Logs in and keeps the returned session cookie for later calls.
    pub async fn login_industry(&self, login: &IndustryLogin) -> Result<User, ClientError> {
        self.send(Method::POST, "/api/auth/industry/login", login)
            .await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let resp = self.request(Method::POST, "/logout").send().await?;
        if resp.status().is_redirection() {
            return Ok(());
        }
        check_response(resp).await?;
        Ok(())
    }

    // users

    pub async fn save_role(&self, selection: &RoleSelection) -> Result<User, ClientError> {
        self.send(Method::POST, "/api/user/save-role", selection)
            .await
    }

    pub async fn current_user(&self) -> Result<SessionUser, ClientError> {
        self.get("/api/user/me").await
    }

    pub async fn update_role(&self, update: &RoleUpdate) -> Result<SessionUser, ClientError> {
        self.send(Method::PUT, "/api/user/update-profile", update)
            .await
    }

    // jobs

    pub async fn jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.get("/api/jobs").await
    }

    pub async fn job(&self, id: &str) -> Result<Job, ClientError> {
        self.get(&format!("/api/jobs/{}", urlencoding::encode(id)))
            .await
    }

    /// Postings ranked against the signed-in applicant's profile.
    pub async fn recommended_jobs(&self) -> Result<Vec<RecommendedJob>, ClientError> {
        self.get("/api/jobs/recommended/jobs").await
    }

    pub async fn create_job(&self, draft: &JobDraft) -> Result<Job, ClientError> {
        self.send(Method::POST, "/api/jobs", draft).await
    }

    pub async fn update_job(&self, id: &str, draft: &JobDraft) -> Result<Job, ClientError> {
        self.send(
            Method::PUT,
            &format!("/api/jobs/{}", urlencoding::encode(id)),
            draft,
        )
        .await
    }

    pub async fn delete_job(&self, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/api/jobs/{}", urlencoding::encode(id)))
            .await
    }

    /// One-click apply using the signed-in account's details.
    pub async fn apply_to_job(&self, id: &str) -> Result<JobApplication, ClientError> {
        self.send_empty(
            Method::POST,
            &format!("/api/jobs/{}/apply", urlencoding::encode(id)),
        )
        .await
    }

    // applications

    pub async fn record_application(
        &self,
        form: &ApplicationForm,
    ) -> Result<JobApplication, ClientError> {
        self.send(Method::POST, "/api/applications", form).await
    }

    pub async fn my_applications(&self) -> Result<Vec<JobApplication>, ClientError> {
        self.get("/api/applications").await
    }

    pub async fn my_posted_jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.get("/api/applications/my-jobs").await
    }

    pub async fn resume_details(&self) -> Result<Vec<ResumeDetails>, ClientError> {
        self.get("/api/applications/resume-details").await
    }

    pub async fn applications_for_job(
        &self,
        job_id: &str,
    ) -> Result<Vec<JobApplication>, ClientError> {
        self.get(&format!(
            "/api/applications/job/{}",
            urlencoding::encode(job_id)
        ))
        .await
    }

    pub async fn applicant_profiles_for_job(
        &self,
        job_id: &str,
    ) -> Result<Vec<JobApplicationWithProfile>, ClientError> {
        self.get(&format!(
            "/api/applications/job/{}/profiles",
            urlencoding::encode(job_id)
        ))
        .await
    }

    pub async fn applications_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<JobApplication>, ClientError> {
        self.get(&format!(
            "/api/applications/by-email/{}",
            urlencoding::encode(email)
        ))
        .await
    }

    pub async fn update_application_status(
        &self,
        id: &str,
        status: &str,
    ) -> Result<JobApplication, ClientError> {
        self.send(
            Method::PUT,
            &format!("/api/applications/{}/status", urlencoding::encode(id)),
            &json!({ "status": status }),
        )
        .await
    }

    // notifications

    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        self.get("/api/notifications").await
    }

    pub async fn unread_count(&self) -> Result<u64, ClientError> {
        let count: Count = self.get("/api/notifications/unread-count").await?;
        Ok(count.count)
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<Notification, ClientError> {
        self.send_empty(
            Method::PUT,
            &format!("/api/notifications/{}/read", urlencoding::encode(id)),
        )
        .await
    }

    /// Returns how many notifications changed.
    pub async fn mark_all_notifications_read(&self) -> Result<u64, ClientError> {
        let count: Count = self
            .send_empty(Method::PUT, "/api/notifications/mark-all-read")
            .await?;
        Ok(count.count)
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/api/notifications/{}", urlencoding::encode(id)))
            .await
    }

    // hackathons

    pub async fn hackathons(&self) -> Result<Vec<Hackathon>, ClientError> {
        self.get("/api/hackathons").await
    }

    pub async fn my_hackathons(&self) -> Result<Vec<Hackathon>, ClientError> {
        self.get("/api/hackathons/my-hackathons").await
    }

    pub async fn hackathon(&self, id: &str) -> Result<Hackathon, ClientError> {
        self.get(&format!("/api/hackathons/{}", urlencoding::encode(id)))
            .await
    }

    pub async fn create_hackathon(&self, draft: &HackathonDraft) -> Result<Hackathon, ClientError> {
        self.send(Method::POST, "/api/hackathons", draft).await
    }

    pub async fn update_hackathon(
        &self,
        id: &str,
        draft: &HackathonDraft,
    ) -> Result<Hackathon, ClientError> {
        self.send(
            Method::PUT,
            &format!("/api/hackathons/{}", urlencoding::encode(id)),
            draft,
        )
        .await
    }

    pub async fn delete_hackathon(&self, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/api/hackathons/{}", urlencoding::encode(id)))
            .await
    }

    pub async fn apply_to_hackathon(
        &self,
        hackathon_id: &str,
        request: &HackathonApplicationRequest,
    ) -> Result<HackathonApplication, ClientError> {
        self.send(
            Method::POST,
            &format!(
                "/api/hackathon-applications/{}/apply",
                urlencoding::encode(hackathon_id)
            ),
            request,
        )
        .await
    }

    pub async fn my_hackathon_applications(
        &self,
    ) -> Result<Vec<HackathonApplication>, ClientError> {
        self.get("/api/hackathon-applications/my-applications")
            .await
    }

    pub async fn hackathon_applications(
        &self,
        hackathon_id: &str,
    ) -> Result<Vec<HackathonApplication>, ClientError> {
        self.get(&format!(
            "/api/hackathon-applications/hackathon/{}",
            urlencoding::encode(hackathon_id)
        ))
        .await
    }

    pub async fn hackathon_application(
        &self,
        id: &str,
    ) -> Result<HackathonApplication, ClientError> {
        self.get(&format!(
            "/api/hackathon-applications/{}",
            urlencoding::encode(id)
        ))
        .await
    }

    pub async fn submit_phase(
        &self,
        application_id: &str,
        phase_id: &str,
        submission: &PhaseSubmissionRequest,
    ) -> Result<HackathonApplication, ClientError> {
        self.send(
            Method::POST,
            &format!(
                "/api/hackathon-applications/{}/phases/{}/submit",
                urlencoding::encode(application_id),
                urlencoding::encode(phase_id)
            ),
            submission,
        )
        .await
    }

    pub async fn review_phase(
        &self,
        application_id: &str,
        phase_id: &str,
        review: &PhaseReview,
    ) -> Result<HackathonApplication, ClientError> {
        self.send(
            Method::PUT,
            &format!(
                "/api/hackathon-applications/{}/phases/{}/review",
                urlencoding::encode(application_id),
                urlencoding::encode(phase_id)
            ),
            review,
        )
        .await
    }

    pub async fn generate_certificates(
        &self,
        application_id: &str,
    ) -> Result<HackathonApplication, ClientError> {
        self.send_empty(
            Method::POST,
            &format!(
                "/api/certificates/generate/{}",
                urlencoding::encode(application_id)
            ),
        )
        .await
    }

    /// Certificate page HTML for the entry, or for one team member.
    pub async fn certificate_html(
        &self,
        application_id: &str,
        email: Option<&str>,
    ) -> Result<String, ClientError> {
        let mut query = vec![("applicationId", application_id)];
        if let Some(email) = email {
            query.push(("email", email));
        }
        let request = self
            .request(Method::GET, "/api/certificates/view")
            .query(&query);
        let resp = check_response(request.send().await?).await?;
        Ok(resp.text().await?)
    }

    // profile

    /// `None` until the applicant saves a profile for the first time.
    pub async fn profile(&self) -> Result<Option<UserProfile>, ClientError> {
        match self.get("/api/profile").await {
            Ok(profile) => Ok(Some(profile)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn save_profile(&self, patch: &ProfilePatch) -> Result<UserProfile, ClientError> {
        self.send(Method::POST, "/api/profile", patch).await
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<UserProfile, ClientError> {
        self.send(Method::PUT, "/api/profile", patch).await
    }

    // student database

    pub async fn students(&self, filters: &StudentFilters) -> Result<StudentPage, ClientError> {
        self.fetch(self.request(Method::GET, "/api/students").query(filters))
            .await
    }

    pub async fn student(&self, id: &str) -> Result<StudentDetail, ClientError> {
        self.get(&format!("/api/students/{}", urlencoding::encode(id)))
            .await
    }

    /// Returns the server's confirmation message.
    pub async fn shortlist_student(&self, id: &str) -> Result<String, ClientError> {
        let message: Message = self
            .send_empty(
                Method::POST,
                &format!("/api/students/{}/shortlist", urlencoding::encode(id)),
            )
            .await?;
        Ok(message.message)
    }

    pub async fn remove_shortlisted_student(&self, id: &str) -> Result<String, ClientError> {
        let message: Message = self
            .send_empty(
                Method::DELETE,
                &format!("/api/students/{}/shortlist", urlencoding::encode(id)),
            )
            .await?;
        Ok(message.message)
    }

    pub async fn shortlisted_students(&self) -> Result<ShortlistPage, ClientError> {
        self.get("/api/students/shortlisted").await
    }

    pub async fn download_resume(&self, id: &str) -> Result<ResumeDownload, ClientError> {
        self.get(&format!(
            "/api/students/{}/resume/download",
            urlencoding::encode(id)
        ))
        .await
    }

    pub async fn subscription(&self) -> Result<SubscriptionInfo, ClientError> {
        self.get("/api/students/subscription/info").await
    }

    pub async fn update_subscription(
        &self,
        tier: SubscriptionType,
    ) -> Result<SubscriptionInfo, ClientError> {
        self.send(
            Method::POST,
            "/api/students/subscription/update",
            &json!({ "subscriptionType": tier.as_str() }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let client = SaarthiClient::new("http://localhost:8080/").expect("client");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.google_login_url(),
            "http://localhost:8080/oauth2/authorization/google"
        );
    }
}
