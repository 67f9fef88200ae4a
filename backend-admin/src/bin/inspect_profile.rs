//! Inspect a profile and its role-specific record
//!
//! Usage: inspect-profile <user-id-or-email>
//!
//! Read-only: a missing row reports "no data" and the tool keeps going,
//! it never aborts a lookup path over an absent record.

use anyhow::{Context, Result};
use backend_admin::{Backend, BackendConfig, Profile, Role};
use common::init_logging;
use std::env;
use tracing::{info, warn};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_logging("inspect-profile");

    let target = env::args()
        .nth(1)
        .context("usage: inspect-profile <user-id|email>")?;

    let config = BackendConfig::from_env()?;
    let backend = Backend::connect(&config, config.service_credential()).await?;

    let field = if target.parse::<Uuid>().is_ok() {
        "id"
    } else {
        "email"
    };

    let Some(profile) = backend.find_one::<Profile>(field, &target).await? else {
        info!(%target, "No profile found (no data)");
        return Ok(());
    };

    info!(
        id = %profile.id,
        role = ?profile.role,
        email = profile.email.as_deref().unwrap_or("-"),
        "Profile found"
    );

    let Some(table) = profile.role.as_ref().and_then(Role::table) else {
        warn!(role = ?profile.role, "Profile has no recognized role, nothing more to look up");
        return Ok(());
    };

    match backend
        .find_by_field(table, "profile_id", &profile.id.to_string())
        .await?
    {
        Some(row) => info!(table, record = %serde_json::Value::Object(row), "Role record found"),
        None => info!(table, "No role record for this profile (no data)"),
    }

    Ok(())
}
