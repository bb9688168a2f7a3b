//! Facet selections.
//!
//! [`ValueSet`] is the multi-select selection: a set of values that keeps
//! first-insertion order so pickers can display it stably. Filtering only
//! cares about membership.

use serde::{Deserialize, Serialize};

/// An insertion-ordered set of facet values.
///
/// # Example
///
/// ```
/// use facetview_query::ValueSet;
///
/// let mut set = ValueSet::new();
/// set.toggle("ABBA");
/// set.toggle("Led Zeppelin");
/// set.toggle("ABBA");
/// assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Led Zeppelin"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ValueSet {
    values: Vec<String>,
}

impl ValueSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        ValueSet::default()
    }

    /// Returns `true` if the value is selected.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Adds a value at the end. Returns `false` if it was already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    /// Removes a value. Returns `false` if it was not present.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.values.len();
        self.values.retain(|v| v != value);
        self.values.len() != before
    }

    /// Flips membership of a value. Returns `true` if it is now selected.
    pub fn toggle(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.remove(&value) {
            false
        } else {
            self.values.push(value);
            true
        }
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of selected values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ValueSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl From<Vec<String>> for ValueSet {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<ValueSet> for Vec<String> {
    fn from(set: ValueSet) -> Self {
        set.values
    }
}

/// The committed selection of one facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetSelection {
    /// At most one value.
    Single(Option<String>),
    /// Any number of values; empty means no filter.
    Multi(ValueSet),
}

impl FacetSelection {
    /// Returns `true` if this selection filters nothing.
    pub fn is_inactive(&self) -> bool {
        match self {
            FacetSelection::Single(value) => value.is_none(),
            FacetSelection::Multi(set) => set.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_ignores_duplicates() {
        let mut set = ValueSet::new();
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn toggle_appends_new_values_at_end() {
        let mut set: ValueSet = ["b", "a"].into_iter().collect();
        assert!(set.toggle("c"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert!(!set.toggle("a"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn remove_and_clear() {
        let mut set: ValueSet = ["x", "y"].into_iter().collect();
        assert!(set.remove("x"));
        assert!(!set.remove("x"));
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn from_vec_deduplicates() {
        let set = ValueSet::from(vec!["a".to_string(), "a".to_string(), "b".to_string()]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serde_as_plain_list() {
        let set: ValueSet = ["ABBA", "Led Zeppelin"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["ABBA","Led Zeppelin"]"#);
        let back: ValueSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn inactive_selections() {
        assert!(FacetSelection::Single(None).is_inactive());
        assert!(!FacetSelection::Single(Some("Rock".into())).is_inactive());
        assert!(FacetSelection::Multi(ValueSet::new()).is_inactive());
    }
}
