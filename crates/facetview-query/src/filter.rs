//! Filter builder and executor.
//!
//! A [`Filter`] is a conjunction of [`Clause`]s. Inactive inputs (empty search
//! text, no single value, an empty multi selection) add no clause, so an empty
//! filter keeps everything.
//!
//! ```text
//! match = search clause matches (if any)
//!       ∧ every single-facet equality matches
//!       ∧ every multi-facet membership matches
//! ```
//!
//! Filtering is a predicate selection: output order is input order.

use crate::clause::Clause;
use crate::record::Record;
use crate::selection::ValueSet;

/// A conjunction of clauses over records.
///
/// # Example
///
/// ```
/// use facetview_query::{Filter, Record};
///
/// let songs = vec![
///     Record::from_pairs([("title", "Purple Haze"), ("genre", "Rock")]),
///     Record::from_pairs([("title", "Bad Guy"), ("genre", "Pop")]),
/// ];
///
/// let filter = Filter::new().and_eq("genre", "Rock").build();
/// let kept = filter.apply(&songs);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].get("title"), Some("Purple Haze"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Creates a new empty filter.
    ///
    /// An empty filter matches all records.
    pub fn new() -> Self {
        Filter::default()
    }

    // ========================================================================
    // Clause builders
    // ========================================================================

    /// Adds a clause as-is.
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Adds a case-insensitive substring search over `fields`.
    ///
    /// Empty search text adds nothing.
    pub fn and_search<I, S>(self, text: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if text.is_empty() {
            return self;
        }
        self.and(Clause::search(text, fields))
    }

    /// Adds an exact equality clause.
    pub fn and_eq(self, field: &str, value: &str) -> Self {
        self.and(Clause::eq(field, value))
    }

    /// Adds an equality clause if a value is selected.
    pub fn and_eq_opt(self, field: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.and_eq(field, value),
            None => self,
        }
    }

    /// Adds a membership clause. An empty set adds nothing.
    pub fn and_in(self, field: &str, values: &ValueSet) -> Self {
        if values.is_empty() {
            return self;
        }
        self.and(Clause::one_of(field, values.clone()))
    }

    /// Finalizes the filter.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the clauses.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns `true` if this filter has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single record matches every clause.
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// Returns references to matching records, in input order.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Returns the indices of matching records, in input order.
    pub fn positions(&self, records: &[Record]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| i)
            .collect()
    }

    /// Counts matching records.
    pub fn count(&self, records: &[Record]) -> usize {
        records.iter().filter(|r| self.matches(r)).count()
    }
}
