//! End-to-end scenarios driven through the public marketplace router: sign-in flows,
//! the job board, the recruiter pipeline and hackathon certificates.

mod common {
    use std::sync::Arc;

    use axum::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{HeaderMap, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use saarthi_jobs::marketplace::{
        marketplace_router, ExternalIdentity, IdentityError, IdentityProvider,
        InMemoryMarketplaceStore, LogMailer, Marketplace, MarketplaceSettings,
    };

    pub(super) const APPLICANT_EMAIL: &str = "ravi.kumar@example.com";

    struct StaticIdentity;

    #[async_trait]
    impl IdentityProvider for StaticIdentity {
        fn authorization_url(&self, state: &str) -> Result<String, IdentityError> {
            Ok(format!("https://accounts.example.test/auth?state={state}"))
        }

        async fn exchange(&self, code: &str) -> Result<ExternalIdentity, IdentityError> {
            if code != "good-code" {
                return Err(IdentityError::Api {
                    status: 400,
                    message: "invalid_grant".to_string(),
                });
            }
            Ok(ExternalIdentity {
                email: APPLICANT_EMAIL.to_string(),
                name: Some("Ravi Kumar".to_string()),
                picture: Some("https://img.example.test/ravi.png".to_string()),
            })
        }
    }

    pub(super) fn build_router() -> Router {
        let marketplace = Marketplace::new(
            Arc::new(InMemoryMarketplaceStore::default()),
            Arc::new(LogMailer::new("no-reply@saarthi.test")),
            Arc::new(StaticIdentity),
            MarketplaceSettings::default(),
        );
        marketplace_router(Arc::new(marketplace))
    }

    pub(super) struct Reply {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Value,
        pub text: String,
    }

    impl Reply {
        /// `name=value` part of the first Set-Cookie header for `name`.
        pub(super) fn cookie(&self, name: &str) -> Option<String> {
            self.headers
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .filter_map(|value| value.split(';').next())
                .find(|pair| pair.starts_with(&format!("{name}=")))
                .map(str::to_string)
        }

        pub(super) fn location(&self) -> &str {
            self.headers
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
        }
    }

    pub(super) async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router dispatch");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), 4 * 1024 * 1024)
            .await
            .expect("body");
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Reply {
            status,
            headers,
            body,
            text,
        }
    }

    /// Complete the Google redirect dance and pick the applicant role.
    pub(super) async fn applicant_session(router: &Router) -> String {
        let start = send(router, "GET", "/oauth2/authorization/google", None, None).await;
        assert_eq!(start.status, StatusCode::FOUND);
        let state_cookie = start.cookie("SAARTHI_OAUTH_STATE").expect("state cookie");
        let state = state_cookie
            .split_once('=')
            .map(|(_, value)| value.to_string())
            .expect("state value");
        assert!(start.location().ends_with(&format!("state={state}")));

        let callback = send(
            router,
            "GET",
            &format!("/login/oauth2/code/google?code=good-code&state={state}"),
            Some(&state_cookie),
            None,
        )
        .await;
        assert_eq!(callback.status, StatusCode::FOUND);
        assert_eq!(callback.location(), "http://localhost:5173");
        let session = callback.cookie("SAARTHI_SESSION").expect("session cookie");

        let role = send(
            router,
            "POST",
            "/api/user/save-role",
            None,
            Some(json!({ "email": APPLICANT_EMAIL, "userType": "APPLICANT" })),
        )
        .await;
        assert_eq!(role.status, StatusCode::OK);
        session
    }

    pub(super) async fn industry_session(router: &Router, email: &str, company: &str) -> String {
        let registered = send(
            router,
            "POST",
            "/api/auth/industry/register",
            None,
            Some(json!({ "companyName": company, "email": email, "password": "hunter2-but-longer" })),
        )
        .await;
        assert_eq!(registered.status, StatusCode::OK);
        assert!(registered.body.get("passwordHash").is_none());

        let login = send(
            router,
            "POST",
            "/api/auth/industry/login",
            None,
            Some(json!({ "email": email, "password": "hunter2-but-longer" })),
        )
        .await;
        assert_eq!(login.status, StatusCode::OK);
        login.cookie("SAARTHI_SESSION").expect("session cookie")
    }

    pub(super) async fn post_job(router: &Router, session: &str) -> String {
        let created = send(
            router,
            "POST",
            "/api/jobs",
            Some(session),
            Some(json!({
                "title": "Backend Engineer",
                "company": "Acme",
                "location": "Pune",
                "description": "Own the payments API.",
                "skills": ["Rust", "PostgreSQL"],
                "jobMinSalary": 1200000,
                "jobSalaryCurrency": "INR"
            })),
        )
        .await;
        assert_eq!(created.status, StatusCode::CREATED);
        created.body["id"].as_str().expect("job id").to_string()
    }
}

mod auth {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::common::*;

    #[tokio::test]
    async fn anonymous_visitors_get_safe_defaults() {
        let router = build_router();

        let me = send(&router, "GET", "/api/auth/me", None, None).await;
        assert_eq!(me.status, StatusCode::OK);
        assert_eq!(me.body, json!({ "authenticated": false }));

        let badge = send(&router, "GET", "/api/notifications/unread-count", None, None).await;
        assert_eq!(badge.body, json!({ "count": 0 }));

        let user = send(&router, "GET", "/api/user/me", None, None).await;
        assert_eq!(user.status, StatusCode::UNAUTHORIZED);
        assert_eq!(user.body["error"], "Authentication required. Please log in.");

        let jobs = send(&router, "GET", "/api/jobs", None, None).await;
        assert_eq!(jobs.status, StatusCode::OK);
        assert_eq!(jobs.body, json!([]));
    }

    #[tokio::test]
    async fn google_sign_in_opens_a_session() {
        let router = build_router();
        let session = applicant_session(&router).await;

        let me = send(&router, "GET", "/api/auth/me", Some(&session), None).await;
        assert_eq!(me.body["authenticated"], true);
        assert_eq!(me.body["email"], APPLICANT_EMAIL);
        assert_eq!(me.body["picture"], "https://img.example.test/ravi.png");

        let user = send(&router, "GET", "/api/user/me", Some(&session), None).await;
        assert_eq!(user.status, StatusCode::OK);
        assert_eq!(user.body["userType"], "APPLICANT");
        assert_eq!(user.body["authenticated"], true);
    }

    #[tokio::test]
    async fn callback_with_forged_state_is_rejected() {
        let router = build_router();
        let reply = send(
            &router,
            "GET",
            "/login/oauth2/code/google?code=good-code&state=forged",
            Some("SAARTHI_OAUTH_STATE=expected"),
            None,
        )
        .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert!(reply.cookie("SAARTHI_SESSION").is_none());
    }

    #[tokio::test]
    async fn declined_consent_redirects_with_failure_flag() {
        let router = build_router();
        let reply = send(
            &router,
            "GET",
            "/login/oauth2/code/google?error=access_denied",
            None,
            None,
        )
        .await;
        assert_eq!(reply.status, StatusCode::FOUND);
        assert_eq!(reply.location(), "http://localhost:5173/?login=failed");
    }

    #[tokio::test]
    async fn logout_revokes_the_session() {
        let router = build_router();
        let session = applicant_session(&router).await;

        let logout = send(&router, "POST", "/logout", Some(&session), None).await;
        assert_eq!(logout.status, StatusCode::FOUND);
        assert_eq!(logout.cookie("SAARTHI_SESSION").as_deref(), Some("SAARTHI_SESSION="));

        let me = send(&router, "GET", "/api/user/me", Some(&session), None).await;
        assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn industry_login_reports_wrong_password() {
        let router = build_router();
        industry_session(&router, "hr@acme.test", "Acme").await;
        let reply = send(
            &router,
            "POST",
            "/api/auth/industry/login",
            None,
            Some(json!({ "email": "hr@acme.test", "password": "wrong" })),
        )
        .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.body["error"], "Incorrect password");
    }
}

mod hiring {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::common::*;

    #[tokio::test]
    async fn applicant_applies_and_recruiter_moves_the_pipeline() {
        let router = build_router();
        let recruiter = industry_session(&router, "hr@acme.test", "Acme").await;
        let job_id = post_job(&router, &recruiter).await;
        let applicant = applicant_session(&router).await;

        let applied = send(
            &router,
            "POST",
            "/api/applications",
            Some(&applicant),
            Some(json!({
                "jobId": job_id,
                "jobTitle": "Backend Engineer",
                "company": "Acme",
                "coverLetter": "I like payments.",
                "resumeFileName": "ravi.pdf",
                "resumeFileSize": "2048"
            })),
        )
        .await;
        assert_eq!(applied.status, StatusCode::CREATED);
        assert_eq!(applied.body["status"], "pending");
        assert_eq!(applied.body["resumeFileSize"], 2048);
        let application_id = applied.body["id"].as_str().expect("id").to_string();

        let again = send(
            &router,
            "POST",
            &format!("/api/jobs/{job_id}/apply"),
            Some(&applicant),
            None,
        )
        .await;
        assert_eq!(again.status, StatusCode::BAD_REQUEST);
        assert_eq!(again.body["error"], "You have already applied to this job");

        let inbox = send(&router, "GET", "/api/notifications", Some(&recruiter), None).await;
        assert_eq!(inbox.body[0]["type"], "new_application");

        let listed = send(
            &router,
            "GET",
            &format!("/api/applications/job/{job_id}"),
            Some(&recruiter),
            None,
        )
        .await;
        assert_eq!(listed.status, StatusCode::OK);
        assert_eq!(listed.body.as_array().map(Vec::len), Some(1));

        let forbidden = send(
            &router,
            "GET",
            &format!("/api/applications/job/{job_id}"),
            Some(&applicant),
            None,
        )
        .await;
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

        let moved = send(
            &router,
            "PUT",
            &format!("/api/applications/{application_id}/status"),
            Some(&recruiter),
            Some(json!({ "status": "call_scheduled" })),
        )
        .await;
        assert_eq!(moved.status, StatusCode::OK);
        assert_eq!(moved.body["status"], "call_scheduled");

        let bad = send(
            &router,
            "PUT",
            &format!("/api/applications/{application_id}/status"),
            Some(&recruiter),
            Some(json!({ "status": "hired" })),
        )
        .await;
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let unread = send(
            &router,
            "GET",
            "/api/notifications/unread-count",
            Some(&applicant),
            None,
        )
        .await;
        assert_eq!(unread.body["count"], 1);

        let cleared = send(
            &router,
            "PUT",
            "/api/notifications/mark-all-read",
            Some(&applicant),
            None,
        )
        .await;
        assert_eq!(cleared.body["count"], 1);

        let mine = send(&router, "GET", "/api/applications", Some(&applicant), None).await;
        assert_eq!(mine.body[0]["status"], "call_scheduled");
    }

    #[tokio::test]
    async fn missing_job_is_not_found_and_profile_is_required_first() {
        let router = build_router();
        let applicant = applicant_session(&router).await;

        let job = send(&router, "GET", "/api/jobs/job-404", None, None).await;
        assert_eq!(job.status, StatusCode::NOT_FOUND);

        let profile = send(&router, "GET", "/api/profile", Some(&applicant), None).await;
        assert_eq!(profile.status, StatusCode::NOT_FOUND);

        let saved = send(
            &router,
            "PUT",
            "/api/profile",
            Some(&applicant),
            Some(json!({ "skills": "Rust, Go ,", "willingToRelocate": "true" })),
        )
        .await;
        assert_eq!(saved.status, StatusCode::OK);
        assert_eq!(saved.body["skills"], json!(["Rust", "Go"]));
        assert_eq!(saved.body["willingToRelocate"], true);
    }

    #[tokio::test]
    async fn recommendations_and_applicant_profiles_for_recruiters() {
        let router = build_router();
        let recruiter = industry_session(&router, "hr@acme.test", "Acme").await;
        let job_id = post_job(&router, &recruiter).await;
        let applicant = applicant_session(&router).await;

        let saved = send(
            &router,
            "POST",
            "/api/profile",
            Some(&applicant),
            Some(json!({ "skills": "Rust, PostgreSQL", "currentLocation": "Pune" })),
        )
        .await;
        assert_eq!(saved.status, StatusCode::OK);

        let recommended = send(
            &router,
            "GET",
            "/api/jobs/recommended/jobs",
            Some(&applicant),
            None,
        )
        .await;
        assert_eq!(recommended.status, StatusCode::OK);
        assert_eq!(recommended.body[0]["job"]["id"], job_id.as_str());
        assert_eq!(recommended.body[0]["matchPercentage"], 90.0);

        let denied = send(
            &router,
            "GET",
            "/api/jobs/recommended/jobs",
            Some(&recruiter),
            None,
        )
        .await;
        assert_eq!(denied.status, StatusCode::FORBIDDEN);

        let applied = send(
            &router,
            "POST",
            &format!("/api/jobs/{job_id}/apply"),
            Some(&applicant),
            None,
        )
        .await;
        assert_eq!(applied.status, StatusCode::CREATED);

        let rows = send(
            &router,
            "GET",
            &format!("/api/applications/job/{job_id}/profiles"),
            Some(&recruiter),
            None,
        )
        .await;
        assert_eq!(rows.status, StatusCode::OK);
        assert_eq!(rows.body[0]["userProfile"]["skills"], json!(["Rust", "PostgreSQL"]));
        assert!(rows.body[0].get("profile").is_none());
    }

    #[tokio::test]
    async fn recruiter_searches_and_shortlists_students() {
        let router = build_router();
        let applicant = applicant_session(&router).await;
        send(
            &router,
            "POST",
            "/api/profile",
            Some(&applicant),
            Some(json!({
                "fullName": "Ravi Kumar",
                "skills": ["Rust"],
                "educationEntries": [{
                    "level": "Graduation",
                    "degree": "B.Tech",
                    "institution": "COEP",
                    "passingYear": "2023"
                }]
            })),
        )
        .await;
        let recruiter = industry_session(&router, "talent@acme.test", "Acme").await;

        let page = send(
            &router,
            "GET",
            "/api/students?skills=rust&graduationYear=2023",
            Some(&recruiter),
            None,
        )
        .await;
        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.body["totalCount"], 1);
        assert_eq!(page.body["subscriptionType"], "FREE");
        let student_id = page.body["students"][0]["studentId"]
            .as_str()
            .expect("student id")
            .to_string();

        let shortlisted = send(
            &router,
            "POST",
            &format!("/api/students/{student_id}/shortlist"),
            Some(&recruiter),
            None,
        )
        .await;
        assert_eq!(shortlisted.body["message"], "Student shortlisted successfully");

        let list = send(&router, "GET", "/api/students/shortlisted", Some(&recruiter), None).await;
        assert_eq!(list.body["totalCount"], 1);

        let info = send(
            &router,
            "GET",
            "/api/students/subscription/info",
            Some(&recruiter),
            None,
        )
        .await;
        assert_eq!(info.body["isPaidUser"], false);

        let denied = send(&router, "GET", "/api/students", Some(&applicant), None).await;
        assert_eq!(denied.status, StatusCode::FORBIDDEN);
    }
}

mod hackathons {
    use axum::http::header::CONTENT_TYPE;
    use axum::http::StatusCode;
    use serde_json::json;

    use super::common::*;

    #[tokio::test]
    async fn team_entry_through_to_certificate() {
        let router = build_router();
        let organiser = industry_session(&router, "events@acme.test", "Acme").await;
        let created = send(
            &router,
            "POST",
            "/api/hackathons",
            Some(&organiser),
            Some(json!({
                "title": "Build for Bharat",
                "company": "Acme",
                "description": "Civic tech weekend",
                "teamSize": 4,
                "phases": [{ "name": "Ideation", "description": "Pitch", "uploadFormat": "PDF" }]
            })),
        )
        .await;
        assert_eq!(created.status, StatusCode::CREATED);
        let hackathon_id = created.body["id"].as_str().expect("id").to_string();
        let phase_id = created.body["phases"][0]["id"]
            .as_str()
            .expect("phase id")
            .to_string();

        let applicant = applicant_session(&router).await;
        let entry = send(
            &router,
            "POST",
            &format!("/api/hackathon-applications/{hackathon_id}/apply"),
            Some(&applicant),
            Some(json!({
                "asTeam": true,
                "teamName": "Null Pointers",
                "teamSize": 2,
                "teamMembers": [
                    { "name": "Ravi Kumar", "email": APPLICANT_EMAIL, "phone": "1", "role": "Team Lead" },
                    { "name": "Meera Shah", "email": "meera@example.com", "phone": "2", "role": "Member" }
                ]
            })),
        )
        .await;
        assert_eq!(entry.status, StatusCode::CREATED);
        let application_id = entry.body["id"].as_str().expect("id").to_string();

        let submitted = send(
            &router,
            "POST",
            &format!("/api/hackathon-applications/{application_id}/phases/{phase_id}/submit"),
            Some(&applicant),
            Some(json!({ "solutionStatement": "Queue-free ration shops" })),
        )
        .await;
        assert_eq!(submitted.status, StatusCode::OK);
        assert_eq!(
            submitted.body["phaseSubmissions"][&phase_id]["status"],
            "PENDING"
        );

        let reviewed = send(
            &router,
            "PUT",
            &format!("/api/hackathon-applications/{application_id}/phases/{phase_id}/review"),
            Some(&organiser),
            Some(json!({ "status": "ACCEPTED", "score": 92 })),
        )
        .await;
        assert_eq!(reviewed.body["status"], "COMPLETED");

        let entries = send(
            &router,
            "GET",
            &format!("/api/hackathon-applications/hackathon/{hackathon_id}"),
            Some(&organiser),
            None,
        )
        .await;
        assert_eq!(entries.body.as_array().map(Vec::len), Some(1));

        let generated = send(
            &router,
            "POST",
            &format!("/api/certificates/generate/{application_id}"),
            Some(&organiser),
            None,
        )
        .await;
        assert_eq!(generated.status, StatusCode::OK);
        assert!(generated.body["teamMembers"][1]["certificateUrl"]
            .as_str()
            .expect("url")
            .contains("email=meera%40example.com"));

        let view = send(
            &router,
            "GET",
            &format!("/api/certificates/view?applicationId={application_id}&email=meera%40example.com"),
            None,
            None,
        )
        .await;
        assert_eq!(view.status, StatusCode::OK);
        assert!(view
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .starts_with("text/html"));
        assert!(view.text.contains("Meera Shah"));
        assert!(view.text.contains("Build for Bharat"));
    }
}
