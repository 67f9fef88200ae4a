//! Seed a patient/provider assignment
//!
//! Usage: seed-assignment <patient-id> <provider-id> <treatment-type>
//!
//! Inserts one active `patient_assignments` row, then re-lists the
//! patient's assignments to confirm the row is retrievable. Destructive
//! path: fails fast on the first error.

use anyhow::{Context, Result};
use backend_admin::{
    Backend, BackendConfig, Patient, PatientAssignment, Provider, Query, TableRecord,
};
use common::init_logging;
use std::env;
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_logging("seed-assignment");

    let args: Vec<String> = env::args().collect();
    let usage = "usage: seed-assignment <patient-id> <provider-id> <treatment-type>";

    let patient_id: Uuid = args
        .get(1)
        .context(usage)?
        .parse()
        .context("patient-id must be a UUID")?;
    let provider_id: Uuid = args
        .get(2)
        .context(usage)?
        .parse()
        .context("provider-id must be a UUID")?;
    let treatment_type = args.get(3).context(usage)?;

    let config = BackendConfig::from_env()?;
    let backend = Backend::connect(&config, config.service_credential()).await?;

    // Look both ends up first: a typo in an id should read "no patients row",
    // not a raw foreign-key violation from the backend
    backend
        .require_one::<Patient>("id", &patient_id.to_string())
        .await?;
    backend
        .require_one::<Provider>("id", &provider_id.to_string())
        .await?;

    let assignment = PatientAssignment::new(patient_id, provider_id, treatment_type);
    let created = backend
        .insert_row(PatientAssignment::TABLE, assignment.to_row()?)
        .await?;

    info!(
        id = created.get("id").and_then(|v| v.as_str()).unwrap_or("?"),
        patient = %patient_id,
        provider = %provider_id,
        treatment = %treatment_type,
        "Assignment created"
    );

    // Confirm the insert is visible through a plain lookup
    let rows = backend
        .list_rows(
            PatientAssignment::TABLE,
            Query::new().eq("patient_id", patient_id),
        )
        .await?;

    info!(count = rows.len(), patient = %patient_id, "Assignments now on record");
    Ok(())
}
