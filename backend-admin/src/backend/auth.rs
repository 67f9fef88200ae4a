//! Auth-user operations
//!
//! The auth subsystem owns its user records entirely; we only list them,
//! reset a password through the admin endpoint, or attempt one interactive
//! sign-in. Admin endpoints require the service credential, which tools
//! check client-side before spending a round trip.

use super::error::{AuthError, BackendError};
use super::Backend;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

/// An identity record owned by the auth subsystem.
///
/// Only `id` is guaranteed; everything else is whatever the backend
/// currently exposes.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// An authenticated context returned by a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Deserialize)]
struct UserList {
    #[serde(default)]
    users: Vec<AuthUser>,
}

impl Backend {
    /// List every auth user. Requires the service credential.
    pub async fn list_auth_users(&self) -> Result<Vec<AuthUser>, BackendError> {
        if !self.credential().is_service() {
            return Err(BackendError::Permission(
                "listing auth users requires the service credential".to_string(),
            ));
        }

        let resp = self
            .authed(self.http.get(self.auth_url("admin/users")))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        match status {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(BackendError::Permission(format!(
                    "auth admin endpoint refused the credential ({})",
                    status
                )))
            }
            s => return Err(BackendError::Decode(format!("admin/users: {} {}", s, body))),
        }

        // Current backends wrap the list; older ones answer a bare array
        if let Ok(list) = serde_json::from_str::<UserList>(&body) {
            return Ok(list.users);
        }
        serde_json::from_str(&body)
            .map_err(|e| BackendError::Decode(format!("admin/users payload: {}", e)))
    }

    /// Reset one user's password through the admin endpoint.
    ///
    /// Destructive: fails fast on any error, touches no other account.
    pub async fn update_auth_user_password(
        &self,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<(), BackendError> {
        if !self.credential().is_service() {
            return Err(BackendError::Permission(
                "password reset requires the service credential".to_string(),
            ));
        }

        debug!(user = %user_id, "Updating auth user password");

        let resp = self
            .authed(
                self.http
                    .put(self.auth_url(&format!("admin/users/{}", user_id))),
            )
            .json(&json!({ "password": new_password }))
            .send()
            .await?;

        let status = resp.status();
        match status {
            s if s.is_success() => {
                info!(user = %user_id, "Password updated");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(BackendError::NotFound {
                table: "auth.users".to_string(),
                field: "id".to_string(),
                value: user_id.to_string(),
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackendError::Permission(
                format!("auth admin endpoint refused the credential ({})", status),
            )),
            s => {
                let body = resp.text().await.unwrap_or_default();
                Err(BackendError::Decode(format!(
                    "admin/users/{}: {} {}",
                    user_id, s, body
                )))
            }
        }
    }

    /// One interactive sign-in attempt.
    ///
    /// Failure is a classified [`AuthError`], never a panic. This is a
    /// diagnostic probe for a single account; nothing in this crate loops
    /// it over candidate passwords.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        debug!(%email, "Attempting sign-in");

        let resp = self
            .authed(self.http.post(self.auth_url("token")))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(BackendError::Auth(AuthError::classify(status, &body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| BackendError::Decode(format!("sign-in session: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_user_list_decodes() {
        let body = r#"{"users":[{"id":"0c9430b5-5282-4838-a747-0be852bfa387","email":"a@b.c","created_at":"2024-01-05T10:00:00Z"}],"aud":"authenticated"}"#;
        let list: UserList = serde_json::from_str(body).unwrap();
        assert_eq!(list.users.len(), 1);
        assert_eq!(list.users[0].email.as_deref(), Some("a@b.c"));
        assert!(list.users[0].last_sign_in_at.is_none());
    }

    #[test]
    fn test_bare_user_array_decodes() {
        let body = r#"[{"id":"0c9430b5-5282-4838-a747-0be852bfa387"}]"#;
        let users: Vec<AuthUser> = serde_json::from_str(body).unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].email.is_none());
    }

    #[test]
    fn test_session_decodes_without_user_object() {
        let body = r#"{"access_token":"jwt","token_type":"bearer","expires_in":3600}"#;
        let session: Session = serde_json::from_str(body).unwrap();
        assert_eq!(session.token_type, "bearer");
        assert_eq!(session.expires_in, Some(3600));
        assert!(session.user.is_none());
    }
}
