use saarthi_jobs::marketplace::domain::{SessionUser, UserType};
use tracing::debug;

use crate::client::SaarthiClient;
use crate::error::ClientError;

/// Who is signed in, as the web app tracks it between page loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    user: Option<SessionUser>,
    email: Option<String>,
}

impl AuthState {
    /// Ask the server who the current session belongs to.
    ///
    /// `/api/user/me` carries the role; when it rejects the session, `/api/auth/me`
    /// still reports a signed-in identity that has not picked a role yet. Only
    /// transport failures and unexpected statuses are returned as errors.
    pub async fn refresh(client: &SaarthiClient) -> Result<Self, ClientError> {
        match client.current_user().await {
            Ok(user) => {
                return Ok(Self {
                    email: Some(user.email.clone()),
                    user: Some(user),
                })
            }
            Err(err) if err.is_unauthorized() => {
                debug!("no role-bearing session; checking identity only");
            }
            Err(err) => return Err(err),
        }

        let status = client.auth_status().await?;
        Ok(Self {
            user: None,
            email: status.email.filter(|_| status.authenticated),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() || self.email.is_some()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn user_type(&self) -> Option<UserType> {
        self.user.as_ref().and_then(|user| user.user_type)
    }

    /// Signed in but still on the role selection screen.
    pub fn needs_role(&self) -> bool {
        self.is_authenticated() && self.user_type().is_none()
    }

    pub fn google_login_url(client: &SaarthiClient) -> String {
        client.google_login_url()
    }
}

#[cfg(test)]
mod tests {
    use saarthi_jobs::marketplace::domain::UserId;

    use super::*;

    fn session(user_type: Option<UserType>) -> SessionUser {
        SessionUser {
            id: UserId::from("usr-1"),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            picture: None,
            user_type,
            authenticated: true,
        }
    }

    #[test]
    fn anonymous_state_has_no_role() {
        let state = AuthState::default();
        assert!(!state.is_authenticated());
        assert!(!state.needs_role());
        assert_eq!(state.user_type(), None);
    }

    #[test]
    fn role_less_session_needs_role() {
        let state = AuthState {
            user: Some(session(None)),
            email: Some("asha@example.com".to_string()),
        };
        assert!(state.needs_role());

        let chosen = AuthState {
            user: Some(session(Some(UserType::Applicant))),
            ..state
        };
        assert!(!chosen.needs_role());
        assert_eq!(chosen.user_type(), Some(UserType::Applicant));
    }
}
