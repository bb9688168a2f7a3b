//! Records and the immutable record source.
//!
//! A [`Record`] is a flat mapping of field names to string values. A
//! [`RecordSource`] is the ordered, read-only collection a browser queries.
//! Every record in a source has the same field set.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// A single flat record.
///
/// # Example
///
/// ```
/// use facetview_query::Record;
///
/// let song = Record::from_pairs([("title", "Purple Haze"), ("artist", "Jimi Hendrix")]);
/// assert_eq!(song.get("title"), Some("Purple Haze"));
/// assert_eq!(song.get("year"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Creates a record from an existing field map.
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Record { fields }
    }

    /// Creates a record from `(field, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Record {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value of a field, if the record has it.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns `true` if the record has the field.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One selectable value of a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
}

impl FacetOption {
    /// Creates an option whose label is its value.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        FacetOption {
            label: value.clone(),
            value,
        }
    }
}

/// The immutable, ordered collection of records being browsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSource {
    fields: Vec<String>,
    records: Vec<Record>,
}

impl RecordSource {
    /// Builds a source, checking that every record has the same field set.
    ///
    /// An empty source has no fields.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        let fields: Vec<String> = records
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default();

        for (index, record) in records.iter().enumerate().skip(1) {
            if !record.field_names().eq(fields.iter().map(String::as_str)) {
                return Err(QueryError::HeterogeneousRecords {
                    index,
                    expected: fields,
                    found: record.field_names().map(str::to_string).collect(),
                });
            }
        }

        Ok(RecordSource { fields, records })
    }

    /// Builds a source whose field set is known up front.
    ///
    /// Every record must carry exactly `fields`. Unlike [`RecordSource::new`],
    /// an empty source built this way still knows its fields.
    pub fn with_fields<I, S>(fields: I, records: Vec<Record>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        for (index, record) in records.iter().enumerate() {
            if !record.field_names().eq(fields.iter().map(String::as_str)) {
                return Err(QueryError::HeterogeneousRecords {
                    index,
                    expected: fields,
                    found: record.field_names().map(str::to_string).collect(),
                });
            }
        }

        Ok(RecordSource { fields, records })
    }

    /// Returns the records in source order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the field names shared by all records, sorted.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns `true` if records carry the field.
    ///
    /// A source with neither records nor known fields accepts every field
    /// name, since there is nothing to contradict it.
    pub fn has_field(&self, field: &str) -> bool {
        (self.records.is_empty() && self.fields.is_empty())
            || self.fields.iter().any(|f| f == field)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the source holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct values of a field across all records, in byte-wise order.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.get(field))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Facet options for a field: one per distinct value, labelled by value.
    pub fn facet_options(&self, field: &str) -> Vec<FacetOption> {
        self.distinct_values(field)
            .into_iter()
            .map(FacetOption::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, genre: &str) -> Record {
        Record::from_pairs([("title", title), ("genre", genre)])
    }

    #[test]
    fn record_get() {
        let r = song("Bad Guy", "Pop");
        assert_eq!(r.get("genre"), Some("Pop"));
        assert_eq!(r.get("artist"), None);
        assert!(r.has_field("title"));
    }

    #[test]
    fn source_rejects_mismatched_fields() {
        let err = RecordSource::new(vec![
            song("Bad Guy", "Pop"),
            Record::from_pairs([("title", "DNA.")]),
        ])
        .unwrap_err();

        match err {
            QueryError::HeterogeneousRecords { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn explicit_fields_survive_an_empty_source() {
        let source = RecordSource::with_fields(["title", "genre"], Vec::new()).unwrap();
        assert!(source.is_empty());
        assert_eq!(source.fields(), &["genre", "title"]);
        assert!(source.has_field("title"));
        assert!(!source.has_field("artist"));

        assert!(RecordSource::new(Vec::new()).unwrap().has_field("artist"));
    }

    #[test]
    fn explicit_fields_are_checked_against_records() {
        let err = RecordSource::with_fields(["title"], vec![song("Bad Guy", "Pop")]).unwrap_err();
        match err {
            QueryError::HeterogeneousRecords { index, .. } => assert_eq!(index, 0),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn distinct_values_are_sorted_and_unique() {
        let source = RecordSource::new(vec![
            song("a", "Rock"),
            song("b", "Pop"),
            song("c", "Rock"),
            song("d", "Hip-Hop"),
        ])
        .unwrap();

        assert_eq!(source.distinct_values("genre"), vec!["Hip-Hop", "Pop", "Rock"]);
        assert!(source.distinct_values("missing").is_empty());
    }

    #[test]
    fn facet_options_label_by_value() {
        let source = RecordSource::new(vec![song("a", "Rock")]).unwrap();
        let options = source.facet_options("genre");
        assert_eq!(options, vec![FacetOption::new("Rock")]);
        assert_eq!(options[0].label, "Rock");
    }

    #[test]
    fn empty_source_accepts_any_field() {
        let source = RecordSource::new(Vec::new()).unwrap();
        assert!(source.is_empty());
        assert!(source.has_field("anything"));
        assert!(source.fields().is_empty());
    }
}
