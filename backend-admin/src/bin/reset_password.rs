//! Explicit, auditable password reset
//!
//! Usage: reset-password <user-id> [new-password]
//!
//! Resets one auth user's password through the admin endpoint. When no
//! password is given, a random one is generated and printed once on
//! stdout. An audit line with a fresh event id is logged before the
//! mutation, so a reset that fails mid-flight is still on record.

use anyhow::{Context, Result};
use backend_admin::{Backend, BackendConfig};
use common::init_logging;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::env;
use tracing::info;
use uuid::Uuid;

const GENERATED_PASSWORD_LEN: usize = 20;

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_logging("reset-password");

    let user_id: Uuid = env::args()
        .nth(1)
        .context("usage: reset-password <user-id> [new-password]")?
        .parse()
        .context("user-id must be a UUID")?;

    let (new_password, generated) = match env::args().nth(2) {
        Some(p) => (p, false),
        None => (generate_password(), true),
    };

    let config = BackendConfig::from_env()?;
    let backend = Backend::connect(&config, config.service_credential()).await?;

    let audit_id = Uuid::new_v4();
    info!(
        audit = %audit_id,
        user = %user_id,
        credential = backend.credential().privilege(),
        generated,
        "Password reset requested"
    );

    backend
        .update_auth_user_password(user_id, &new_password)
        .await?;

    info!(audit = %audit_id, user = %user_id, "Password reset complete");

    if generated {
        // The only place the generated password is ever emitted
        println!("new password for {}: {}", user_id, new_password);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LEN);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }
}
