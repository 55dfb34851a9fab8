use std::sync::Arc;

use tracing::info;

use super::domain::{HackathonApplication, HackathonApplicationId, User};
use super::error::MarketplaceError;
use super::hackathon_applications::HackathonApplicationService;
use super::hackathons::HackathonService;
use super::repository::MarketplaceStore;

/// Participation certificates for hackathon entries.
pub struct CertificateService<S> {
    store: Arc<S>,
    hackathons: Arc<HackathonService<S>>,
    applications: Arc<HackathonApplicationService<S>>,
    public_url: String,
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl<S: MarketplaceStore> CertificateService<S> {
    pub fn new(
        store: Arc<S>,
        hackathons: Arc<HackathonService<S>>,
        applications: Arc<HackathonApplicationService<S>>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            hackathons,
            applications,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn view_url(&self, id: &HackathonApplicationId, email: Option<&str>) -> String {
        let mut url = format!(
            "{}/api/certificates/view?applicationId={}",
            self.public_url,
            urlencoding::encode(id.as_str())
        );
        if let Some(email) = email {
            url.push_str("&email=");
            url.push_str(&urlencoding::encode(email));
        }
        url
    }

    /// Assign certificate links: one per team member for team entries, one per
    /// application otherwise.
    pub fn generate(
        &self,
        user: &User,
        id: &HackathonApplicationId,
    ) -> Result<HackathonApplication, MarketplaceError> {
        let mut application = self.applications.find(id)?;
        self.hackathons.owned(user, &application.hackathon_id)?;

        if application.as_team && !application.team_members.is_empty() {
            let urls: Vec<String> = application
                .team_members
                .iter()
                .map(|member| self.view_url(id, Some(&member.email)))
                .collect();
            for (member, url) in application.team_members.iter_mut().zip(urls) {
                member.certificate_url = Some(url);
            }
        }
        application.certificate_url = Some(self.view_url(id, None));

        self.store.update_hackathon_application(application.clone())?;
        info!(application_id = %id, members = application.team_members.len(), "certificates generated");
        Ok(application)
    }

    /// Render the certificate page for the application or one of its team members.
    pub fn render(
        &self,
        id: &HackathonApplicationId,
        email: Option<&str>,
    ) -> Result<String, MarketplaceError> {
        let application = self.applications.find(id)?;
        if application.certificate_url.is_none() {
            return Err(MarketplaceError::not_found(
                "Certificate has not been generated yet",
            ));
        }
        let hackathon = self
            .store
            .hackathon(&application.hackathon_id)?
            .ok_or_else(|| MarketplaceError::not_found("Hackathon not found"))?;

        let recipient = match email.map(str::trim).filter(|email| !email.is_empty()) {
            Some(email) => application
                .team_members
                .iter()
                .find(|member| member.email.eq_ignore_ascii_case(email))
                .map(|member| member.name.clone())
                .ok_or_else(|| MarketplaceError::not_found("Team member not found"))?,
            None => match self.store.user(&application.applicant_id)? {
                Some(applicant) => applicant.name,
                None => application
                    .team_members
                    .first()
                    .map(|member| member.name.clone())
                    .unwrap_or_default(),
            },
        };

        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Certificate - {hackathon}</title></head>\n\
<body style=\"font-family: Georgia, serif; text-align: center; padding: 48px;\">\n\
<h1>Certificate of Participation</h1>\n\
<p>This is to certify that</p>\n\
<h2>{name}</h2>\n\
<p>has successfully participated in the</p>\n\
<h2>{hackathon}</h2>\n\
<p>organised by {company}</p>\n\
<p><em>Authorized by Saarthi-x</em></p>\n\
</body>\n</html>\n",
            hackathon = escape_html(&hackathon.title),
            name = escape_html(&recipient),
            company = escape_html(&hackathon.company),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::escape_html;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}
