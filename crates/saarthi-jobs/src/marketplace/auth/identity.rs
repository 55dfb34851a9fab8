//! Google sign-in (OAuth 2.0 authorization-code flow).

use std::time::Duration;

use axum::async_trait;
use serde::Deserialize;

use crate::config::GoogleOAuthConfig;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Google sign-in is not configured")]
    NotConfigured,
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity provider rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("identity provider did not return a verified email")]
    MissingEmail,
}

/// Identity asserted by the external provider after a successful callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent-screen URL carrying the anti-forgery `state`.
    fn authorization_url(&self, state: &str) -> Result<String, IdentityError>;

    /// Trade an authorization code for the signed-in identity.
    async fn exchange(&self, code: &str) -> Result<ExternalIdentity, IdentityError>;
}

pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    config: Option<GoogleOAuthConfig>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleIdentityProvider {
    pub fn new(config: Option<GoogleOAuthConfig>) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, config })
    }

    fn config(&self) -> Result<&GoogleOAuthConfig, IdentityError> {
        self.config.as_ref().ok_or(IdentityError::NotConfigured)
    }
}

async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, IdentityError> {
    if !resp.status().is_success() {
        return Err(IdentityError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self, state: &str) -> Result<String, IdentityError> {
        let config = self.config()?;
        Ok(format!(
            "{AUTHORIZE_URL}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            urlencoding::encode(&config.client_id),
            urlencoding::encode(&config.redirect_uri),
            urlencoding::encode("openid email profile"),
            urlencoding::encode(state),
        ))
    }

    async fn exchange(&self, code: &str) -> Result<ExternalIdentity, IdentityError> {
        let config = self.config()?;
        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", config.client_id.as_str()),
                ("client_secret", config.client_secret.as_str()),
                ("redirect_uri", config.redirect_uri.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = check_response(resp).await?.json().await?;

        let resp = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        let info: UserInfo = check_response(resp).await?.json().await?;

        if info.email_verified == Some(false) {
            return Err(IdentityError::MissingEmail);
        }
        let email = info
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(IdentityError::MissingEmail)?;

        Ok(ExternalIdentity {
            email,
            name: info.name,
            picture: info.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_url_encodes_parameters() {
        let provider = GoogleIdentityProvider::new(Some(GoogleOAuthConfig {
            client_id: "client 1".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:8080/login/oauth2/code/google".to_string(),
        }))
        .expect("client builds");

        let url = provider.authorization_url("abc123").expect("url builds");
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=client%201"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Flogin%2Foauth2%2Fcode%2Fgoogle"
        ));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("state=abc123"));
        assert!(!url.contains("secret"));
    }

    #[test]
    fn unconfigured_provider_refuses() {
        let provider = GoogleIdentityProvider::new(None).expect("client builds");
        assert!(matches!(
            provider.authorization_url("state"),
            Err(IdentityError::NotConfigured)
        ));
    }
}
