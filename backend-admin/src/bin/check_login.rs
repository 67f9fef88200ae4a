//! Single sign-in probe for one account
//!
//! Usage: check-login <email> <password>
//!
//! Makes exactly one sign-in attempt and reports the classified outcome.
//! This is a diagnostic for "can this account log in right now", run with
//! the anonymous credential like a real client would. It is deliberately
//! not a loop: do not point it at a password list.

use anyhow::{Context, Result};
use backend_admin::{Backend, BackendConfig, BackendError};
use common::init_logging;
use std::env;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_logging("check-login");

    let email = env::args()
        .nth(1)
        .context("usage: check-login <email> <password>")?;
    let password = env::args()
        .nth(2)
        .context("usage: check-login <email> <password>")?;

    let config = BackendConfig::from_env()?;
    let credential = config
        .anon_credential()
        .unwrap_or_else(|| config.service_credential());
    let backend = Backend::connect(&config, credential).await?;

    match backend.sign_in(&email, &password).await {
        Ok(session) => {
            info!(
                %email,
                token_type = %session.token_type,
                expires_in = ?session.expires_in,
                user = ?session.user.map(|u| u.id),
                "Sign-in succeeded"
            );
        }
        Err(BackendError::Auth(reason)) => {
            // Expected outcome class for a probe; report and exit cleanly
            warn!(%email, %reason, "Sign-in rejected");
        }
        Err(other) => return Err(other.into()),
    }

    Ok(())
}
