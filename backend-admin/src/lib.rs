//! Admin data-access helper for the hosted medical-assignment backend
//!
//! This crate consolidates what used to be a pile of one-shot scripts into
//! a single typed surface: one configured connection to the backend
//! (PostgREST tables plus the auth API), equality lookups, single-row
//! inserts, and the handful of auth-admin operations the diagnostic tools
//! need. Every operation is a single awaited round trip; there are no
//! retries, no caching, and no local state.

pub mod backend;
pub mod records;

pub use backend::{
    AuthError, AuthUser, Backend, BackendConfig, BackendError, Credential, Query, Row, Session,
};
pub use records::{Admin, Patient, PatientAssignment, Profile, Provider, Role, TableRecord};
