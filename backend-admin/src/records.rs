//! Typed records for the backend tables
//!
//! The schemas are owned by the backend, not by this crate, so decoding is
//! defensive: key fields aside, everything is optional and unknown fields
//! are ignored. A drifted schema degrades to missing data, never a decode
//! failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::backend::{BackendError, Row};

/// A record type bound to a named table.
pub trait TableRecord: DeserializeOwned {
    const TABLE: &'static str;
}

/// Role attribute on a profile.
///
/// Closed set plus an escape hatch: the backend may grow roles this crate
/// has never heard of, and a lookup tool should report them, not choke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Provider,
    Patient,
    #[serde(untagged)]
    Other(String),
}

impl Role {
    /// The role-specific table holding the record that back-references the
    /// profile, if this crate knows it.
    pub fn table(&self) -> Option<&'static str> {
        match self {
            Role::Admin => Some("admins"),
            Role::Provider => Some("providers"),
            Role::Patient => Some("patients"),
            Role::Other(_) => None,
        }
    }
}

/// Identity record, one per auth user (shared id).
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub email: Option<String>,
}

impl TableRecord for Profile {
    const TABLE: &'static str = "profiles";
}

#[derive(Debug, Clone, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub profile_id: Uuid,
}

impl TableRecord for Patient {
    const TABLE: &'static str = "patients";
}

#[derive(Debug, Clone, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub profile_id: Uuid,
}

impl TableRecord for Provider {
    const TABLE: &'static str = "providers";
}

#[derive(Debug, Clone, Deserialize)]
pub struct Admin {
    pub id: Uuid,
    pub profile_id: Uuid,
}

impl TableRecord for Admin {
    const TABLE: &'static str = "admins";
}

/// Associative record linking a patient to a provider for a treatment.
///
/// Uniqueness of an active (patient, provider, treatment) triple is the
/// backend's concern; nothing here checks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientAssignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub treatment_type: String,
    pub active: bool,
}

impl TableRecord for PatientAssignment {
    const TABLE: &'static str = "patient_assignments";
}

impl PatientAssignment {
    /// A new active assignment, id left for the backend to generate.
    pub fn new(patient_id: Uuid, provider_id: Uuid, treatment_type: &str) -> Self {
        Self {
            id: None,
            patient_id,
            provider_id,
            treatment_type: treatment_type.to_string(),
            active: true,
        }
    }

    /// Render as an insertable row.
    pub fn to_row(&self) -> Result<Row, BackendError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => Err(BackendError::Decode(
                "assignment did not serialize to an object".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "7b35d918-0a2f-4bfe-9c6b-ab8a6ab7a9a1";
    const ID_B: &str = "f3a02c7e-31d4-4c8e-8f1d-2d9d9a9e11b2";

    #[test]
    fn test_role_round_trip_and_unknown() {
        assert_eq!(serde_json::from_str::<Role>("\"admin\"").unwrap(), Role::Admin);
        assert_eq!(
            serde_json::from_str::<Role>("\"care_coordinator\"").unwrap(),
            Role::Other("care_coordinator".to_string())
        );
        assert_eq!(serde_json::to_string(&Role::Provider).unwrap(), "\"provider\"");
    }

    #[test]
    fn test_role_table_mapping() {
        assert_eq!(Role::Patient.table(), Some("patients"));
        assert_eq!(Role::Other("x".to_string()).table(), None);
    }

    #[test]
    fn test_profile_tolerates_schema_drift() {
        // Unknown fields ignored, known-but-absent fields default
        let body = format!(r#"{{"id":"{}","unexpected_column":42}}"#, ID_A);
        let profile: Profile = serde_json::from_str(&body).unwrap();
        assert!(profile.role.is_none());
        assert!(profile.email.is_none());
    }

    #[test]
    fn test_role_records_decode_with_extra_columns() {
        let body = format!(
            r#"{{"id":"{}","profile_id":"{}","specialty":"endocrinology"}}"#,
            ID_A, ID_B
        );
        let provider: Provider = serde_json::from_str(&body).unwrap();
        assert_eq!(provider.profile_id.to_string(), ID_B);

        let patient: Patient = serde_json::from_str(&body).unwrap();
        assert_eq!(patient.id.to_string(), ID_A);

        let admin: Admin = serde_json::from_str(&body).unwrap();
        assert_eq!(admin.profile_id, provider.profile_id);
    }

    #[test]
    fn test_new_assignment_row_omits_id() {
        let assignment = PatientAssignment::new(
            ID_A.parse().unwrap(),
            ID_B.parse().unwrap(),
            "weight_loss",
        );
        let row = assignment.to_row().unwrap();

        assert!(!row.contains_key("id"));
        assert_eq!(row["treatment_type"], Value::String("weight_loss".into()));
        assert_eq!(row["active"], Value::Bool(true));
        assert_eq!(row["patient_id"], Value::String(ID_A.into()));
    }

    #[test]
    fn test_inserted_assignment_decodes_with_generated_id() {
        let body = format!(
            r#"{{"id":"{}","patient_id":"{}","provider_id":"{}","treatment_type":"weight_loss","active":true,"created_at":"2024-03-01T09:00:00Z"}}"#,
            ID_B, ID_A, ID_B
        );
        let assignment: PatientAssignment = serde_json::from_str(&body).unwrap();
        assert!(assignment.id.is_some());
        assert!(assignment.active);
    }
}
