//! Backend connection handle
//!
//! The backend is a hosted Postgres-plus-auth service: tables are reached
//! through its REST layer under `/rest/v1`, auth users through `/auth/v1`.
//! Both authenticate with an `apikey` header and a bearer token carrying
//! the same key; the privilege level (anonymous vs. service) is embedded
//! in the key itself.

mod auth;
mod config;
mod error;
mod rest;

pub use auth::{AuthUser, Session};
pub use config::{BackendConfig, Credential};
pub use error::{AuthError, BackendError};
pub use rest::{Query, Row};

use reqwest::StatusCode;
use tracing::{debug, info};

/// One open session against the backend.
///
/// Holds the HTTP client and the credential; all table and auth operations
/// hang off this handle. Cheap to clone.
#[derive(Clone)]
pub struct Backend {
    http: reqwest::Client,
    base_url: String,
    credential: Credential,
}

impl Backend {
    /// Establish a session against the backend.
    ///
    /// Performs one probe request against the REST root so an unreachable
    /// endpoint or a rejected credential fails here, not on the first real
    /// operation.
    pub async fn connect(
        config: &BackendConfig,
        credential: Credential,
    ) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let backend = Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            credential,
        };

        backend.probe().await?;
        info!(url = %backend.base_url, privilege = backend.credential.privilege(), "Connected to backend");
        Ok(backend)
    }

    /// Probe the REST root: 200 under a valid key, 401/403 under a bad one.
    async fn probe(&self) -> Result<(), BackendError> {
        let url = format!("{}/rest/v1/", self.base_url);
        debug!(%url, "Probing backend");

        let resp = self
            .authed(self.http.get(&url))
            .send()
            .await
            .map_err(|e| BackendError::Connection {
                reason: format!("backend unreachable: {}", e),
            })?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackendError::Connection {
                reason: format!("credential rejected ({})", resp.status()),
            }),
            s => Err(BackendError::Connection {
                reason: format!("unexpected status {} from REST root", s),
            }),
        }
    }

    /// The credential this session was opened with.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Attach the `apikey` and bearer headers to a request.
    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", self.credential.key())
            .header("Authorization", format!("Bearer {}", self.credential.key()))
    }
}
