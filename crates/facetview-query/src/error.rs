//! Error types for the query crate.
//!
//! Everything here is an integration error: the schema is static, so a bad
//! column or facet name means the host is wired wrong. Out-of-range page
//! requests are not errors and never show up here.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::FacetKind;

/// Errors raised by the browser, its configuration, and the facet pickers.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Sort requested on a column the configuration does not define.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Sort requested on a column that is defined but not sortable.
    #[error("column '{0}' is not sortable")]
    ColumnNotSortable(String),

    /// Operation names a facet the configuration does not define.
    #[error("unknown facet '{0}'")]
    UnknownFacet(String),

    /// Single-select operation on a multi-select facet, or the reverse.
    #[error("facet '{facet}' is {actual}-select, operation requires {expected}-select")]
    FacetKindMismatch {
        facet: String,
        expected: FacetKind,
        actual: FacetKind,
    },

    /// A value that is not among the facet's options.
    #[error("'{value}' is not an option of facet '{facet}'")]
    UnknownFacetValue { facet: String, value: String },

    /// Draft operation on a picker that is not open.
    #[error("picker for facet '{0}' is not open")]
    PickerClosed(String),

    /// Configuration references a field the records do not have.
    #[error("{context} references unknown field '{field}'")]
    UnknownField { context: String, field: String },

    /// A record whose field set differs from the first record's.
    #[error("record {index} has fields {found:?}, expected {expected:?}")]
    HeterogeneousRecords {
        index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Configuration is structurally invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML configuration failed to parse.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON configuration failed to parse.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    /// Create an invalid-configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an unknown-field error.
    pub fn unknown_field(context: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            context: context.into(),
            field: field.into(),
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
