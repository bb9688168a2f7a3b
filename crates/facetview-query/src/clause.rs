//! Clause types for filter predicates.
//!
//! A [`Clause`] is one predicate over a [`Record`]. A [`Filter`](crate::Filter)
//! holds a list of clauses and keeps a record only if every clause matches.

use serde::Serialize;

use crate::record::Record;
use crate::selection::ValueSet;

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use facetview_query::{Clause, Record};
///
/// let clause = Clause::search("LOVE", ["title", "artist"]);
/// let song = Record::from_pairs([("title", "Whole Lotta Love"), ("artist", "Led Zeppelin")]);
/// assert!(clause.matches(&song));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Clause {
    /// Case-insensitive substring match against any of `fields`.
    ///
    /// `needle` is stored already lowercased.
    Search { needle: String, fields: Vec<String> },
    /// Exact equality of one field.
    Eq { field: String, value: String },
    /// Membership of one field's value in a set.
    In { field: String, values: ValueSet },
}

impl Clause {
    /// Creates a search clause. The needle is lowercased once here.
    pub fn search<I, S>(needle: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Clause::Search {
            needle: needle.to_lowercase(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an equality clause.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a membership clause.
    pub fn one_of(field: impl Into<String>, values: ValueSet) -> Self {
        Clause::In {
            field: field.into(),
            values,
        }
    }

    /// Evaluates this clause against a record.
    ///
    /// A record lacking the clause's field never matches `Eq` or `In`;
    /// for `Search`, missing fields are skipped.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Clause::Search { needle, fields } => fields
                .iter()
                .filter_map(|f| record.get(f))
                .any(|haystack| haystack.to_lowercase().contains(needle.as_str())),
            Clause::Eq { field, value } => record.get(field) == Some(value.as_str()),
            Clause::In { field, values } => record.get(field).is_some_and(|v| values.contains(v)),
        }
    }

    /// Returns the field the clause tests, or `None` for multi-field search.
    pub fn field(&self) -> Option<&str> {
        match self {
            Clause::Search { .. } => None,
            Clause::Eq { field, .. } | Clause::In { field, .. } => Some(field),
        }
    }
}
