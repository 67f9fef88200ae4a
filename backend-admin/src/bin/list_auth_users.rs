//! List auth users and cross-check their profiles
//!
//! Usage: list-auth-users
//!
//! Lists every auth user and reports whether the expected one-to-one
//! `profiles` row exists. The invariant is reported, not enforced.

use anyhow::Result;
use backend_admin::{Backend, BackendConfig, Profile};
use common::init_logging;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_logging("list-auth-users");

    let config = BackendConfig::from_env()?;
    let backend = Backend::connect(&config, config.service_credential()).await?;

    let users = backend.list_auth_users().await?;
    info!(count = users.len(), "Auth users on record");

    for user in &users {
        let email = user.email.as_deref().unwrap_or("-");

        match backend.find_one::<Profile>("id", &user.id.to_string()).await? {
            Some(profile) => info!(
                id = %user.id,
                email,
                role = ?profile.role,
                last_sign_in = ?user.last_sign_in_at,
                "User"
            ),
            None => warn!(id = %user.id, email, "Auth user has no profile row"),
        }
    }

    Ok(())
}
