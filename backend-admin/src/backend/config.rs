//! Backend connection configuration
//!
//! All connection parameters come from the environment. Keys and URLs are
//! never inlined in the tools.

use anyhow::Result;
use common::ConfigExt;
use std::env;
use std::time::Duration;

/// Connection parameters for the hosted backend.
pub struct BackendConfig {
    /// Base URL of the backend project, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Per-request timeout so a dead endpoint fails instead of hanging
    pub timeout: Duration,
    service_key: String,
    anon_key: Option<String>,
}

impl BackendConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let anon_key = env::var("SUPABASE_ANON_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        Ok(Self {
            url: String::env_required("SUPABASE_URL")?,
            service_key: String::env_required("SUPABASE_SERVICE_ROLE_KEY")?,
            anon_key,
            timeout: Duration::from_secs(u64::env_parse("BACKEND_TIMEOUT_SECS", 10)),
        })
    }

    /// The privileged service credential (full table and auth-admin access).
    pub fn service_credential(&self) -> Credential {
        Credential::Service(self.service_key.clone())
    }

    /// The restricted anonymous credential, if one is configured.
    pub fn anon_credential(&self) -> Option<Credential> {
        self.anon_key.clone().map(Credential::Anon)
    }
}

/// A backend credential with its privilege level.
///
/// The backend embeds the role in the key itself; this enum only records
/// which kind of key we were handed so tools can refuse admin operations
/// client-side before wasting a round trip.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Service-role key: table access plus `/auth/v1/admin` endpoints
    Service(String),
    /// Anonymous key: restricted, subject to row-level security
    Anon(String),
}

impl Credential {
    pub fn key(&self) -> &str {
        match self {
            Self::Service(k) | Self::Anon(k) => k,
        }
    }

    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    pub fn privilege(&self) -> &'static str {
        match self {
            Self::Service(_) => "service",
            Self::Anon(_) => "anon",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_privilege() {
        let service = Credential::Service("key-a".into());
        let anon = Credential::Anon("key-b".into());

        assert!(service.is_service());
        assert!(!anon.is_service());
        assert_eq!(service.privilege(), "service");
        assert_eq!(anon.privilege(), "anon");
        assert_eq!(anon.key(), "key-b");
    }

    #[test]
    fn test_from_env_requires_url_and_service_key() {
        env::remove_var("SUPABASE_URL");
        env::remove_var("SUPABASE_SERVICE_ROLE_KEY");
        assert!(BackendConfig::from_env().is_err());
    }
}
