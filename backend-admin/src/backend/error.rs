//! Error taxonomy for backend operations
//!
//! Every failure an operation can surface is one of these variants; tools
//! report the error and halt that code path. Destructive operations
//! (inserts, password resets) fail fast; read-only lookups treat a missing
//! row as data ("no row"), not as an error, by returning `Option`.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Endpoint unreachable or credential rejected at connect time.
    #[error("connection failed: {reason}")]
    Connection { reason: String },

    /// Exactly one row was required and none matched.
    #[error("no {table} row where {field} = {value}")]
    NotFound {
        table: String,
        field: String,
        value: String,
    },

    /// Exactly one row was required and several matched.
    #[error("{count} {table} rows where {field} = {value}, expected exactly one")]
    MultipleRows {
        table: String,
        field: String,
        value: String,
        count: usize,
    },

    /// The backend refused a write: missing required field, duplicate key,
    /// or a broken foreign-key reference. Nothing was written.
    #[error("constraint violation on {table}: {message}")]
    ConstraintViolation {
        table: String,
        code: Option<String>,
        message: String,
    },

    /// The credential lacks the rights for this operation.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Interactive sign-in failed; see [`AuthError`] for the classification.
    #[error("sign-in failed: {0}")]
    Auth(#[from] AuthError),

    /// I/O-level HTTP failure (timeout, connection reset, bad TLS).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a payload we could not make sense of.
    #[error("unexpected response payload: {0}")]
    Decode(String),
}

/// Classified sign-in failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account not found")]
    AccountMissing,
    #[error("rate limited")]
    RateLimited,
    #[error("{0}")]
    Other(String),
}

/// Error body shape of the auth API.
#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

impl AuthError {
    /// Classify a failed sign-in response.
    ///
    /// A backend configured to hide whether the account exists answers a
    /// wrong password and an unknown email identically ("invalid login
    /// credentials"); only an explicit user-not-found marker maps to
    /// `AccountMissing`.
    pub fn classify(status: StatusCode, body: &str) -> AuthError {
        let parsed: AuthErrorBody = serde_json::from_str(body).unwrap_or_default();
        let code = parsed
            .error_code
            .or(parsed.error)
            .unwrap_or_default()
            .to_lowercase();
        let message = parsed
            .msg
            .or(parsed.error_description)
            .unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS || code.contains("rate_limit") {
            return AuthError::RateLimited;
        }
        if code == "user_not_found" || message.to_lowercase().contains("user not found") {
            return AuthError::AccountMissing;
        }
        if code == "invalid_grant"
            || code == "invalid_credentials"
            || message.to_lowercase().contains("invalid login credentials")
        {
            return AuthError::InvalidCredentials;
        }

        if message.is_empty() {
            AuthError::Other(format!("auth endpoint answered {}", status))
        } else {
            AuthError::Other(message)
        }
    }
}

/// Error body shape of the REST layer.
#[derive(Debug, Default, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Map a non-2xx REST response to the taxonomy.
///
/// The REST layer forwards Postgres error codes: class 23 is an integrity
/// constraint violation (23502 not-null, 23503 foreign key, 23505 unique),
/// 42501 is insufficient privilege under row-level security.
pub(crate) fn rest_error(table: &str, status: StatusCode, body: &str) -> BackendError {
    let parsed: RestErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.unwrap_or_default();
    let message = match (parsed.message, parsed.details) {
        (Some(m), Some(d)) => format!("{} ({})", m, d),
        (Some(m), None) => m,
        (None, _) => format!("REST layer answered {}", status),
    };

    if code.starts_with("23") {
        return BackendError::ConstraintViolation {
            table: table.to_string(),
            code: Some(code),
            message,
        };
    }

    if code == "42501"
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
    {
        return BackendError::Permission(message);
    }

    BackendError::Decode(format!("{}: {} {}", table, status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_password_is_invalid_credentials() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            AuthError::classify(StatusCode::BAD_REQUEST, body),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_newer_error_code_field() {
        let body = r#"{"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        assert_eq!(
            AuthError::classify(StatusCode::BAD_REQUEST, body),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_hidden_account_existence_stays_invalid_credentials() {
        // Backend hides the distinction: same body for wrong password and
        // unknown email. Must NOT classify as AccountMissing.
        let body = r#"{"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        assert_ne!(
            AuthError::classify(StatusCode::BAD_REQUEST, body),
            AuthError::AccountMissing
        );
    }

    #[test]
    fn test_explicit_user_not_found() {
        let body = r#"{"error_code":"user_not_found","msg":"User not found"}"#;
        assert_eq!(
            AuthError::classify(StatusCode::BAD_REQUEST, body),
            AuthError::AccountMissing
        );
    }

    #[test]
    fn test_rate_limit_by_status_and_code() {
        assert_eq!(
            AuthError::classify(StatusCode::TOO_MANY_REQUESTS, "{}"),
            AuthError::RateLimited
        );
        let body = r#"{"error_code":"over_request_rate_limit","msg":"Too many requests"}"#;
        assert_eq!(
            AuthError::classify(StatusCode::BAD_REQUEST, body),
            AuthError::RateLimited
        );
    }

    #[test]
    fn test_garbage_body_never_panics() {
        let err = AuthError::classify(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(err, AuthError::Other(_)));
    }

    #[test]
    fn test_not_null_violation_is_constraint() {
        let body = r#"{"code":"23502","message":"null value in column \"patient_id\" violates not-null constraint"}"#;
        match rest_error("patient_assignments", StatusCode::BAD_REQUEST, body) {
            BackendError::ConstraintViolation { table, code, .. } => {
                assert_eq!(table, "patient_assignments");
                assert_eq!(code.as_deref(), Some("23502"));
            }
            other => panic!("expected ConstraintViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_foreign_key_violation_is_constraint() {
        let body = r#"{"code":"23503","message":"insert violates foreign key constraint","details":"Key (provider_id) is not present"}"#;
        match rest_error("patient_assignments", StatusCode::CONFLICT, body) {
            BackendError::ConstraintViolation { message, .. } => {
                assert!(message.contains("provider_id"));
            }
            other => panic!("expected ConstraintViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_rls_denial_is_permission() {
        let body = r#"{"code":"42501","message":"new row violates row-level security policy"}"#;
        assert!(matches!(
            rest_error("profiles", StatusCode::FORBIDDEN, body),
            BackendError::Permission(_)
        ));
    }
}
