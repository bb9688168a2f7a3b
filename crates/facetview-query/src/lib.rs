//! Facetview query - state and derivation core for browsing tabular records.
//!
//! Facetview turns a fixed set of flat records plus a small query state into
//! the rows one page of a table should show. It supports:
//!
//! - Free-text search: case-insensitive substring match across chosen fields
//! - Single-select facets (equality) and multi-select facets (membership)
//! - A tri-state column sort cycle: unsorted, ascending, descending
//! - Fixed-size 1-based pagination that resets when filters change
//! - Draft-then-commit staging for multi-select pickers
//!
//! # Quick Start
//!
//! ```rust
//! use facetview_query::{Browser, SortIndicator};
//!
//! let mut browser = Browser::songs().unwrap();
//!
//! browser.set_search_text("love");
//! assert_eq!(browser.visible_rows()[0].get("title"), Some("Whole Lotta Love"));
//!
//! browser.set_search_text("");
//! browser.open_picker("artist").unwrap();
//! browser.toggle_draft("artist", "ABBA").unwrap();
//! assert_eq!(browser.filtered_count(), 10); // drafts do not filter
//!
//! browser.apply_picker("artist").unwrap();
//! assert_eq!(browser.filtered_count(), 2);
//!
//! browser.toggle_sort("title").unwrap();
//! assert_eq!(browser.sort_indicator("title"), SortIndicator::Ascending);
//! ```
//!
//! # Derivation
//!
//! Every committed change re-runs the whole pipeline:
//!
//! ```text
//! records ──filter──▶ matches ──sort──▶ ordered ──paginate──▶ visible rows
//! ```
//!
//! ```text
//! match = search text is empty or some searchable field contains it
//!       ∧ every selected single facet equals its field
//!       ∧ every non-empty multi facet contains its field
//! ```
//!
//! The engines ([`Filter`], [`sort`], [`paginate`]) are pure functions and can
//! be used without a [`Browser`].

mod browser;
mod clause;
mod config;
mod error;
mod filter;
mod intent;
mod ordering;
mod pagination;
mod record;
pub mod sample;
mod selection;
mod staging;

// Re-export public API
pub use browser::{Browser, Listener, QueryState, Snapshot};
pub use clause::Clause;
pub use config::{BrowserConfig, ColumnConfig, FacetConfig, FacetKind};
pub use error::{QueryError, Result};
pub use filter::Filter;
pub use intent::Intent;
pub use ordering::{compare_values, sort, sort_positions, Dir, SortIndicator, SortState};
pub use pagination::{clamp_page, paginate, total_pages, Page, PageInfo, DEFAULT_PAGE_SIZE};
pub use record::{FacetOption, Record, RecordSource};
pub use selection::{FacetSelection, ValueSet};
pub use staging::{MultiSelectPicker, PickerState};
