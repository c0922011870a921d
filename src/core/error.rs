//! Typed failures of the projection and ordering engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Record lacks a required field entirely. Excluded from the view.
    #[error("Malformed record {}: missing `{field}`", id.as_deref().unwrap_or("<no id>"))]
    MalformedRecord {
        id: Option<String>,
        field: &'static str,
    },

    #[error("Currency '{0}' cannot be resolved")]
    UnknownCurrency(String),

    #[error("Column '{0}' is not sortable")]
    InvalidSortColumn(String),
}
