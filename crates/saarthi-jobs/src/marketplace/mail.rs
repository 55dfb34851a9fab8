use tracing::info;

/// Outbound e-mail payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Outbound mail hook (SMTP relay, transactional mail API, ...).
pub trait Mailer: Send + Sync {
    fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

impl Mailer for LogMailer {
    fn send(&self, message: MailMessage) -> Result<(), MailError> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            "outbound mail"
        );
        Ok(())
    }
}

pub(crate) fn application_confirmation(
    to: &str,
    application_id: &str,
    applicant_name: &str,
    job_title: &str,
    company: &str,
) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: format!("Application received: {job_title}"),
        body: format!(
            "Hi {applicant_name},\n\nThanks for applying to {job_title} at {company}. \
             The hiring team will review your application and reach out with next steps.\n\n\
             Application ID: {application_id}\n\n\
             Team Saarthi"
        ),
    }
}
