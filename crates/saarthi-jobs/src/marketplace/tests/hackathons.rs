use axum::http::StatusCode;

use super::common::*;
use crate::marketplace::domain::{
    HackathonApplicationRequest, HackathonApplicationStatus, HackathonDraft, PhaseReview,
    PhaseSubmissionRequest, SubmissionStatus, TeamMember,
};

fn member(name: &str, email: &str, role: &str) -> TeamMember {
    TeamMember {
        name: name.to_string(),
        email: email.to_string(),
        phone: "9999999999".to_string(),
        role: role.to_string(),
        certificate_url: None,
    }
}

fn team_request() -> HackathonApplicationRequest {
    HackathonApplicationRequest {
        as_team: Some(true),
        team_name: Some("Null Pointers".to_string()),
        team_size: Some(2),
        team_members: vec![
            member("Ravi", "ravi@example.com", "Team Lead"),
            member("Meera <Dev>", "meera@example.com", "Member"),
        ],
    }
}

fn submission() -> PhaseSubmissionRequest {
    PhaseSubmissionRequest {
        solution_statement: Some("Offline-first attendance app".to_string()),
        file_url: Some("https://files.example/idea.pdf".to_string()),
        file_name: Some("idea.pdf".to_string()),
    }
}

#[test]
fn create_assigns_owner_and_phase_ids() {
    let fx = fixture();
    let owner = industry(&fx, "events@acme.test", "Acme");
    let hackathon = fx
        .marketplace
        .hackathons
        .create(&owner, hackathon_draft("Build for Bharat"))
        .expect("created");

    assert_eq!(hackathon.created_by_industry_id, owner.id);
    assert_eq!(hackathon.views, 0);
    assert_eq!(hackathon.phases.len(), 2);
    assert_ne!(hackathon.phases[0].id, hackathon.phases[1].id);
    assert_eq!(fx.marketplace.hackathons.mine(&owner).expect("mine").len(), 1);

    let err = fx
        .marketplace
        .hackathons
        .create(&owner, HackathonDraft::default())
        .expect_err("invalid");
    assert_eq!(
        err.to_string(),
        "Missing required fields: title, company, description"
    );
}

#[test]
fn industry_users_only_see_their_own_hackathons() {
    let fx = fixture();
    let owner = industry(&fx, "events@acme.test", "Acme");
    let rival = industry(&fx, "events@globex.test", "Globex");
    let student = applicant(&fx, "ravi@example.com", "Ravi");
    let hackathon = fx
        .marketplace
        .hackathons
        .create(&owner, hackathon_draft("Build for Bharat"))
        .expect("created");

    let err = fx
        .marketplace
        .hackathons
        .get(&rival, &hackathon.id)
        .expect_err("rival");
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert!(fx.marketplace.hackathons.get(&student, &hackathon.id).is_ok());

    let delete = fx
        .marketplace
        .hackathons
        .delete(&rival, &hackathon.id)
        .expect_err("rival delete");
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
}

#[test]
fn team_applications_are_validated() {
    let fx = fixture();
    let owner = industry(&fx, "events@acme.test", "Acme");
    let student = applicant(&fx, "ravi@example.com", "Ravi");
    let hackathon = fx
        .marketplace
        .hackathons
        .create(&owner, hackathon_draft("Build for Bharat"))
        .expect("created");
    let apps = &fx.marketplace.hackathon_applications;

    let unnamed = apps
        .apply(
            &student,
            &hackathon.id,
            HackathonApplicationRequest {
                team_name: Some(" ".to_string()),
                ..team_request()
            },
        )
        .expect_err("team name");
    assert_eq!(
        unnamed.to_string(),
        "Team name is required for team applications"
    );

    let solo_team = apps
        .apply(
            &student,
            &hackathon.id,
            HackathonApplicationRequest {
                team_size: Some(1),
                ..team_request()
            },
        )
        .expect_err("size");
    assert_eq!(solo_team.to_string(), "Team size must be greater than 1");

    let application = apps
        .apply(&student, &hackathon.id, team_request())
        .expect("applied");
    assert_eq!(application.status, HackathonApplicationStatus::Active);
    assert_eq!(application.team_size, 2);
    assert_eq!(
        application.current_phase_id.as_ref(),
        Some(&hackathon.phases[0].id)
    );
}

#[test]
fn individual_entries_force_single_member() {
    let fx = fixture();
    let owner = industry(&fx, "events@acme.test", "Acme");
    let student = applicant(&fx, "ravi@example.com", "Ravi");
    let hackathon = fx
        .marketplace
        .hackathons
        .create(&owner, hackathon_draft("Solo Sprint"))
        .expect("created");

    let application = fx
        .marketplace
        .hackathon_applications
        .apply(
            &student,
            &hackathon.id,
            HackathonApplicationRequest {
                as_team: Some(false),
                team_name: Some("Ignored".to_string()),
                team_size: Some(3),
                team_members: Vec::new(),
            },
        )
        .expect("applied");
    assert!(!application.as_team);
    assert_eq!(application.team_size, 1);
    assert_eq!(application.team_name, None);
}

#[test]
fn blank_team_size_still_accepts_teams() {
    let fx = fixture();
    let owner = industry(&fx, "events@acme.test", "Acme");
    let student = applicant(&fx, "ravi@example.com", "Ravi");
    let hackathons = &fx.marketplace.hackathons;

    let open_size = hackathons
        .create(
            &owner,
            HackathonDraft {
                team_size: Some(0),
                ..hackathon_draft("Open Hack")
            },
        )
        .expect("created");
    assert_eq!(open_size.team_size, 0);

    let unset = hackathons
        .create(
            &owner,
            HackathonDraft {
                team_size: None,
                ..hackathon_draft("Unset Hack")
            },
        )
        .expect("created");
    assert_eq!(unset.team_size, 0);

    let apps = &fx.marketplace.hackathon_applications;
    for hackathon in [&open_size, &unset] {
        let application = apps
            .apply(&student, &hackathon.id, team_request())
            .expect("team entry");
        assert!(application.as_team);
        assert_eq!(application.team_size, 2);
    }

    let kept = hackathons
        .update(
            &owner,
            &open_size.id,
            HackathonDraft {
                team_size: None,
                ..hackathon_draft("Open Hack")
            },
        )
        .expect("updated");
    assert_eq!(kept.team_size, 0);
}

#[test]
fn phase_submission_review_and_rejection() {
    let fx = fixture();
    let owner = industry(&fx, "events@acme.test", "Acme");
    let student = applicant(&fx, "ravi@example.com", "Ravi");
    let intruder = applicant(&fx, "meera@example.com", "Meera");
    let hackathon = fx
        .marketplace
        .hackathons
        .create(&owner, hackathon_draft("Build for Bharat"))
        .expect("created");
    let apps = &fx.marketplace.hackathon_applications;
    let application = apps
        .apply(&student, &hackathon.id, team_request())
        .expect("applied");
    let ideation = hackathon.phases[0].id.clone();
    let prototype = hackathon.phases[1].id.clone();

    let not_mine = apps
        .submit_phase(&intruder, &application.id, &ideation, submission())
        .expect_err("intruder");
    assert_eq!(not_mine.status(), StatusCode::FORBIDDEN);

    let no_submission = apps
        .review_phase(
            &owner,
            &application.id,
            &prototype,
            PhaseReview {
                status: SubmissionStatus::Accepted,
                score: None,
                remarks: None,
            },
        )
        .expect_err("nothing submitted");
    assert_eq!(no_submission.to_string(), "No submission found for this phase.");

    let submitted = apps
        .submit_phase(&student, &application.id, &ideation, submission())
        .expect("submitted");
    assert_eq!(
        submitted.phase_submissions[&ideation].status,
        SubmissionStatus::Pending
    );

    let reviewed = apps
        .review_phase(
            &owner,
            &application.id,
            &ideation,
            PhaseReview {
                status: SubmissionStatus::Rejected,
                score: Some(35),
                remarks: Some("Scope unclear".to_string()),
            },
        )
        .expect("reviewed");
    assert_eq!(reviewed.status, HackathonApplicationStatus::Rejected);
    assert_eq!(reviewed.phase_submissions[&ideation].score, Some(35));

    let refused = apps
        .submit_phase(&student, &application.id, &prototype, submission())
        .expect_err("rejected");
    assert_eq!(refused.to_string(), "Application is rejected.");
}

#[test]
fn accepting_the_final_phase_completes_the_entry() {
    let fx = fixture();
    let owner = industry(&fx, "events@acme.test", "Acme");
    let student = applicant(&fx, "ravi@example.com", "Ravi");
    let hackathon = fx
        .marketplace
        .hackathons
        .create(&owner, hackathon_draft("Build for Bharat"))
        .expect("created");
    let apps = &fx.marketplace.hackathon_applications;
    let application = apps
        .apply(&student, &hackathon.id, team_request())
        .expect("applied");

    for phase in &hackathon.phases {
        apps.submit_phase(&student, &application.id, &phase.id, submission())
            .expect("submitted");
        apps.review_phase(
            &owner,
            &application.id,
            &phase.id,
            PhaseReview {
                status: SubmissionStatus::Accepted,
                score: Some(80),
                remarks: None,
            },
        )
        .expect("accepted");
    }

    let finished = apps.details(&student, &application.id).expect("details");
    assert_eq!(finished.status, HackathonApplicationStatus::Completed);
    assert_eq!(
        apps.for_hackathon(&owner, &hackathon.id).expect("entries").len(),
        1
    );
}

#[test]
fn certificates_cover_each_team_member() {
    let fx = fixture();
    let owner = industry(&fx, "events@acme.test", "Acme");
    let student = applicant(&fx, "ravi@example.com", "Ravi");
    let hackathon = fx
        .marketplace
        .hackathons
        .create(&owner, hackathon_draft("Build <for> Bharat"))
        .expect("created");
    let application = fx
        .marketplace
        .hackathon_applications
        .apply(&student, &hackathon.id, team_request())
        .expect("applied");

    let pending = fx
        .marketplace
        .certificates
        .render(&application.id, None)
        .expect_err("not generated");
    assert_eq!(pending.status(), StatusCode::NOT_FOUND);

    let denied = fx
        .marketplace
        .certificates
        .generate(&student, &application.id)
        .expect_err("applicant");
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let issued = fx
        .marketplace
        .certificates
        .generate(&owner, &application.id)
        .expect("generated");
    let meera_url = issued.team_members[1]
        .certificate_url
        .as_deref()
        .expect("member url");
    assert!(meera_url.starts_with("http://localhost:8080/api/certificates/view?applicationId="));
    assert!(meera_url.ends_with("&email=meera%40example.com"));

    let page = fx
        .marketplace
        .certificates
        .render(&application.id, Some("meera@example.com"))
        .expect("rendered");
    assert!(page.contains("Certificate of Participation"));
    assert!(page.contains("Meera &lt;Dev&gt;"));
    assert!(page.contains("Build &lt;for&gt; Bharat"));
    assert!(page.contains("Authorized by Saarthi-x"));

    let lead_page = fx
        .marketplace
        .certificates
        .render(&application.id, None)
        .expect("rendered");
    assert!(lead_page.contains("<h2>Ravi</h2>"));
}
