//! Sort state and the stable sort engine.
//!
//! [`SortState`] is either unsorted or a `(column, direction)` pair, so a
//! column without a direction cannot be represented. Activating a column
//! walks the tri-state cycle in [`SortState::toggled`]; [`sort`] itself is
//! stateless.
//!
//! Strings compare byte-wise (`str::cmp`). Records missing the sort field go
//! after records that have it when ascending.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Direction of an active column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// Orients a field comparison. Ties stay ties in both directions.
    pub fn orient(self, ordering: Ordering) -> Ordering {
        if self == Dir::Desc {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// The direction a second activation of the same header moves to.
    /// `None` once descending, since the cycle then returns to unsorted.
    fn step(self) -> Option<Dir> {
        (self == Dir::Asc).then_some(Dir::Desc)
    }

    fn indicator(self) -> SortIndicator {
        if self == Dir::Asc {
            SortIndicator::Ascending
        } else {
            SortIndicator::Descending
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if *self == Dir::Asc { "asc" } else { "desc" })
    }
}

/// The active sort, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SortState {
    /// Source order.
    #[default]
    Unsorted,
    /// Ordered by one column.
    Sorted { column: String, dir: Dir },
}

impl SortState {
    /// Creates a sorted state.
    pub fn by(column: impl Into<String>, dir: Dir) -> Self {
        SortState::Sorted {
            column: column.into(),
            dir,
        }
    }

    /// The active column, or `None` when unsorted.
    pub fn column(&self) -> Option<&str> {
        match self {
            SortState::Unsorted => None,
            SortState::Sorted { column, .. } => Some(column),
        }
    }

    /// The active direction, or `None` when unsorted.
    pub fn dir(&self) -> Option<Dir> {
        match self {
            SortState::Unsorted => None,
            SortState::Sorted { dir, .. } => Some(*dir),
        }
    }

    /// Returns `true` if no column is active.
    pub fn is_unsorted(&self) -> bool {
        matches!(self, SortState::Unsorted)
    }

    /// The state after activating `column`.
    ///
    /// | current            | same column  | other column   |
    /// |--------------------|--------------|----------------|
    /// | unsorted           | -            | (column, asc)  |
    /// | (c, asc)           | (c, desc)    | (column, asc)  |
    /// | (c, desc)          | unsorted     | (column, asc)  |
    pub fn toggled(&self, column: &str) -> SortState {
        match self {
            SortState::Sorted { column: c, dir } if c == column => dir
                .step()
                .map_or(SortState::Unsorted, |next| SortState::by(column, next)),
            SortState::Sorted { .. } | SortState::Unsorted => SortState::by(column, Dir::Asc),
        }
    }

    /// The header indicator for `column` under this state.
    pub fn indicator(&self, column: &str) -> SortIndicator {
        match self {
            SortState::Sorted { column: c, dir } if c == column => dir.indicator(),
            _ => SortIndicator::Inactive,
        }
    }
}

impl std::fmt::Display for SortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortState::Unsorted => write!(f, "unsorted"),
            SortState::Sorted { column, dir } => write!(f, "{column} {dir}"),
        }
    }
}

/// What a column header should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    Ascending,
    Descending,
    Inactive,
}

/// Compares two optional field values.
///
/// Present values compare byte-wise; a missing value sorts after any present
/// one.
pub fn compare_values(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

/// Sorts record references by the sort state.
///
/// Unsorted leaves the input order untouched. Otherwise a stable sort on the
/// column, so equal keys keep their input order in either direction.
pub fn sort<'a>(mut records: Vec<&'a Record>, state: &SortState) -> Vec<&'a Record> {
    if let SortState::Sorted { column, dir } = state {
        records.sort_by(|a, b| dir.orient(compare_values(a.get(column), b.get(column))));
    }
    records
}

/// Sorts record positions into `records` by the sort state.
///
/// Same semantics as [`sort`], for callers that keep indices instead of
/// references.
pub fn sort_positions(positions: &mut [usize], records: &[Record], state: &SortState) {
    if let SortState::Sorted { column, dir } = state {
        positions.sort_by(|&a, &b| {
            dir.orient(compare_values(
                records[a].get(column),
                records[b].get(column),
            ))
        });
    }
}
