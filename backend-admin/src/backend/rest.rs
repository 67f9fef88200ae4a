//! Table operations over the backend's REST layer
//!
//! Equality-filtered reads and single-row inserts against the named tables
//! (`profiles`, `patients`, `providers`, `admins`, `patient_assignments`).
//! Each operation is one round trip; there is no pagination, ordering, or
//! caching beyond what the backend itself provides.

use super::error::{rest_error, BackendError};
use super::Backend;
use crate::records::TableRecord;
use serde_json::Value;
use tracing::debug;

/// One record in a named table, as a field-name → value mapping.
///
/// The table schemas are externally owned; raw rows exist so tools can
/// inspect whatever shape the backend currently has without a typed record.
pub type Row = serde_json::Map<String, Value>;

/// Equality filters plus an optional row limit.
///
/// Filters render as `field=eq.value` query parameters, the REST layer's
/// equality operator.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<(String, String)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn eq(mut self, field: &str, value: impl ToString) -> Self {
        self.filters
            .push((field.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = self.filters.clone();
        if let Some(n) = self.limit {
            params.push(("limit".to_string(), n.to_string()));
        }
        params
    }
}

/// Reduce a limit-2 result to the at-most-one contract.
fn single_row(
    mut rows: Vec<Row>,
    table: &str,
    field: &str,
    value: &str,
) -> Result<Option<Row>, BackendError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(Some(rows.remove(0))),
        n => Err(BackendError::MultipleRows {
            table: table.to_string(),
            field: field.to_string(),
            value: value.to_string(),
            count: n,
        }),
    }
}

impl Backend {
    /// List rows matching the query. An empty result is a valid outcome,
    /// not an error.
    pub async fn list_rows(&self, table: &str, query: Query) -> Result<Vec<Row>, BackendError> {
        let params = query.to_params();
        debug!(table, ?params, "Listing rows");

        let resp = self
            .authed(self.http.get(self.rest_url(table)))
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(rest_error(table, status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| BackendError::Decode(format!("{} rows: {}", table, e)))
    }

    /// Equality lookup returning at most one row.
    ///
    /// Zero matches is `None`; more than one is `MultipleRows` because the
    /// caller is asserting uniqueness by using this instead of `list_rows`.
    pub async fn find_by_field(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Row>, BackendError> {
        // limit 2 is enough to detect a violated uniqueness assumption
        let rows = self
            .list_rows(table, Query::new().eq(field, value).limit(2))
            .await?;
        single_row(rows, table, field, value)
    }

    /// Like [`find_by_field`](Self::find_by_field) but the row must exist.
    pub async fn require_by_field(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<Row, BackendError> {
        self.find_by_field(table, field, value)
            .await?
            .ok_or_else(|| BackendError::NotFound {
                table: table.to_string(),
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    /// Typed equality lookup into a record type that knows its table.
    pub async fn find_one<T: TableRecord>(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<T>, BackendError> {
        match self.find_by_field(T::TABLE, field, value).await? {
            Some(row) => serde_json::from_value(Value::Object(row))
                .map(Some)
                .map_err(|e| BackendError::Decode(format!("{} record: {}", T::TABLE, e))),
            None => Ok(None),
        }
    }

    /// Typed lookup that must find a row.
    pub async fn require_one<T: TableRecord>(
        &self,
        field: &str,
        value: &str,
    ) -> Result<T, BackendError> {
        let row = self.require_by_field(T::TABLE, field, value).await?;
        serde_json::from_value(Value::Object(row))
            .map_err(|e| BackendError::Decode(format!("{} record: {}", T::TABLE, e)))
    }

    /// Insert one row and return it as created (generated id included).
    ///
    /// Constraint failures surface as `ConstraintViolation` with nothing
    /// written; there are no partial writes to clean up.
    pub async fn insert_row(&self, table: &str, fields: Row) -> Result<Row, BackendError> {
        debug!(table, field_count = fields.len(), "Inserting row");

        let resp = self
            .authed(self.http.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(&Value::Object(fields))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(rest_error(table, status, &body));
        }

        // The REST layer answers an insert with a one-element array
        let mut rows: Vec<Row> = serde_json::from_str(&body)
            .map_err(|e| BackendError::Decode(format!("{} insert result: {}", table, e)))?;
        rows.pop()
            .ok_or_else(|| BackendError::Decode(format!("{}: insert returned no row", table)))
    }
}
