use crate::infra::InMemoryMarketplace;
use clap::Args;
use saarthi_jobs::error::AppError;
use saarthi_jobs::marketplace::domain::{
    EducationEntry, HackathonApplicationRequest, HackathonDraft, HackathonPhaseDraft,
    IndustryRegistration, JobDraft, PhaseReview, PhaseSubmissionRequest, ProfilePatch,
    RoleSelection, StudentFilters, SubmissionStatus, TeamMember, User, UserType,
};
use saarthi_jobs::marketplace::{
    ExternalIdentity, GoogleIdentityProvider, InMemoryMarketplaceStore, LogMailer, Marketplace,
    MarketplaceSettings,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Company name used for the recruiter account.
    #[arg(long, default_value = "Acme Labs")]
    pub(crate) company: String,
    /// Skip the hackathon and certificate portion of the demo.
    #[arg(long)]
    pub(crate) skip_hackathon: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        company,
        skip_hackathon,
    } = args;
    let company = if company.trim().is_empty() {
        "Acme Labs".to_string()
    } else {
        company
    };

    let marketplace = demo_marketplace()?;
    println!("Saarthi marketplace demo (in-memory data)");

    let recruiter = marketplace.users.register_industry(IndustryRegistration {
        company_name: company.clone(),
        email: "talent@acme.example".to_string(),
        password: "demo-password-123".to_string(),
    })?;
    println!("- Industry account {} registered for {}", recruiter.id, recruiter.name);

    let applicant = sign_in_applicant(&marketplace)?;
    println!("- Applicant {} <{}> signed in with Google", applicant.name, applicant.email);

    run_hiring(&marketplace, &recruiter, &applicant, &company)?;

    if !skip_hackathon {
        run_hackathon(&marketplace, &recruiter, &applicant, &company)?;
    }

    run_student_database(&marketplace, &recruiter)?;
    Ok(())
}

fn demo_marketplace() -> Result<InMemoryMarketplace, AppError> {
    Ok(Marketplace::new(
        Arc::new(InMemoryMarketplaceStore::default()),
        Arc::new(LogMailer::new("no-reply@saarthi.local")),
        Arc::new(GoogleIdentityProvider::new(None)?),
        MarketplaceSettings::default(),
    ))
}

fn sign_in_applicant(marketplace: &InMemoryMarketplace) -> Result<User, AppError> {
    let user = marketplace.users.sign_in_external(ExternalIdentity {
        email: "priya.sharma@example.com".to_string(),
        name: Some("Priya Sharma".to_string()),
        picture: None,
    })?;
    let user = marketplace.users.save_role(RoleSelection {
        email: Some(user.email.clone()),
        user_type: Some(UserType::Applicant.as_str().to_string()),
        ..RoleSelection::default()
    })?;

    let profile = marketplace.profiles.upsert(
        &user,
        ProfilePatch {
            skills: Some(vec!["Rust".to_string(), "PostgreSQL".to_string(), "React".to_string()]),
            current_location: Some("Pune".to_string()),
            availability: Some("Immediate".to_string()),
            education_entries: Some(vec![EducationEntry {
                level: Some("Graduation".to_string()),
                degree: Some("B.Tech".to_string()),
                stream: Some("Computer Engineering".to_string()),
                institution: Some("College of Engineering Pune".to_string()),
                passing_year: Some("2024".to_string()),
                ..EducationEntry::default()
            }]),
            resume_file_name: Some("priya-sharma.pdf".to_string()),
            resume_file_type: Some("application/pdf".to_string()),
            resume_base64: Some("JVBERi0xLjQK".to_string()),
            ..ProfilePatch::default()
        },
    )?;
    println!(
        "  Profile {} saved ({}% complete)",
        profile.id,
        profile.completeness_score()
    );
    Ok(user)
}

fn run_hiring(
    marketplace: &InMemoryMarketplace,
    recruiter: &User,
    applicant: &User,
    company: &str,
) -> Result<(), AppError> {
    println!("\nHiring pipeline");
    let job = marketplace.jobs.create(
        recruiter,
        JobDraft {
            title: Some("Backend Engineer".to_string()),
            description: Some("Own the hiring APIs end to end.".to_string()),
            company: Some(company.to_string()),
            location: Some("Pune".to_string()),
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            employment_type: Some("Full-time".to_string()),
            job_min_salary: Some(1_200_000),
            job_max_salary: Some(1_800_000),
            job_salary_currency: Some("INR".to_string()),
            ..JobDraft::default()
        },
    )?;
    println!("- Posted job {} \"{}\" at {}", job.id, job.title, job.company);

    let application = marketplace.applications.apply_to_job(applicant, &job.id)?;
    println!(
        "- {} applied ({}) -> status {}",
        application.full_name,
        application.id,
        application.status.label()
    );

    for step in ["resume_viewed", "interview_scheduled"] {
        let updated = marketplace
            .applications
            .update_status(recruiter, &application.id, step)?;
        println!("  Recruiter moved application to {}", updated.status.label());
    }

    let inbox = marketplace.notifications.list(applicant)?;
    println!("- Applicant inbox ({} unread):", marketplace.notifications.unread_count(applicant)?);
    for notification in &inbox {
        println!("    - {}: {}", notification.title, notification.message);
    }
    Ok(())
}

fn run_hackathon(
    marketplace: &InMemoryMarketplace,
    organiser: &User,
    applicant: &User,
    company: &str,
) -> Result<(), AppError> {
    println!("\nHackathon");
    let phase = |name: &str, format: &str| HackathonPhaseDraft {
        name: name.to_string(),
        description: format!("{name} round"),
        upload_format: format.to_string(),
        ..HackathonPhaseDraft::default()
    };
    let hackathon = marketplace.hackathons.create(
        organiser,
        HackathonDraft {
            title: Some("Build for Bharat".to_string()),
            description: Some("Civic tech over one weekend.".to_string()),
            company: Some(company.to_string()),
            prize: Some("INR 1,00,000".to_string()),
            team_size: Some(3),
            phases: vec![phase("Ideation", "PDF"), phase("Prototype", "GitHub link")],
            ..HackathonDraft::default()
        },
    )?;
    println!(
        "- {} created with {} phases (teams up to {})",
        hackathon.title,
        hackathon.phases.len(),
        hackathon.team_size
    );

    let member = |name: &str, email: &str, role: &str| TeamMember {
        name: name.to_string(),
        email: email.to_string(),
        phone: String::new(),
        role: role.to_string(),
        certificate_url: None,
    };
    let mut entry = marketplace.hackathon_applications.apply(
        applicant,
        &hackathon.id,
        HackathonApplicationRequest {
            as_team: Some(true),
            team_name: Some("Null Pointers".to_string()),
            team_size: Some(2),
            team_members: vec![
                member(&applicant.name, &applicant.email, "Team Lead"),
                member("Arjun Mehta", "arjun.mehta@example.com", "Member"),
            ],
        },
    )?;
    println!(
        "- Team {} entered ({})",
        entry.team_name.as_deref().unwrap_or_default(),
        entry.id
    );

    for (index, phase) in hackathon.phases.iter().enumerate() {
        marketplace.hackathon_applications.submit_phase(
            applicant,
            &entry.id,
            &phase.id,
            PhaseSubmissionRequest {
                solution_statement: Some(format!("Submission for {}", phase.name)),
                ..PhaseSubmissionRequest::default()
            },
        )?;
        entry = marketplace.hackathon_applications.review_phase(
            organiser,
            &entry.id,
            &phase.id,
            PhaseReview {
                status: SubmissionStatus::Accepted,
                score: Some(80 + index as i32 * 5),
                remarks: Some("Strong work".to_string()),
            },
        )?;
        println!("  {} accepted -> entry {:?}", phase.name, entry.status);
    }

    let certified = marketplace.certificates.generate(organiser, &entry.id)?;
    for member in &certified.team_members {
        println!(
            "  Certificate for {}: {}",
            member.name,
            member.certificate_url.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn run_student_database(marketplace: &InMemoryMarketplace, recruiter: &User) -> Result<(), AppError> {
    println!("\nStudent database");
    let filters = StudentFilters {
        skills: Some("rust".to_string()),
        graduation_year: Some("2024".to_string()),
        ..StudentFilters::default()
    };
    let page = marketplace.students.list(recruiter, &filters)?;
    println!(
        "- {} student(s) match Rust / 2024 on the {} plan",
        page.total_count,
        page.subscription_type.as_str()
    );

    for student in &page.students {
        println!(
            "    - {} | {} | {} hackathon(s), {} job application(s)",
            student.full_name.as_deref().unwrap_or("Unnamed"),
            student.institution.as_deref().unwrap_or("-"),
            student.hackathons_participated,
            student.jobs_applied
        );
        let message = marketplace.students.shortlist(recruiter, &student.student_id)?;
        println!("      {message}");
        let resume = marketplace
            .students
            .download_resume(recruiter, &student.student_id)?;
        println!(
            "      Resume {} downloaded",
            resume.file_name.as_deref().unwrap_or("resume")
        );
    }

    println!("- Recruiter activity:");
    for entry in marketplace.students.activity(recruiter)? {
        println!("    - {:?} {}", entry.action_type, entry.student_email);
    }
    Ok(())
}
