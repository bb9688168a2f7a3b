//! Draft-then-commit state for multi-select facet pickers.
//!
//! A picker is `Closed` or `Open` with its own draft and option search text.
//! The draft is a separate copy of the committed selection: edits never touch
//! the committed value, and only [`MultiSelectPicker::commit`] hands a new
//! selection back to the caller.
//!
//! ```text
//!            open(committed)
//!   Closed ──────────────────▶ Open { draft = committed.clone(), search = "" }
//!     ▲                            │ toggle / remove_one / clear_all / set_search_text
//!     │      commit() -> draft     │
//!     └────────────────────────────┤
//!     │      cancel()              │
//!     └────────────────────────────┘
//! ```

use crate::error::{QueryError, Result};
use crate::record::FacetOption;
use crate::selection::ValueSet;

/// Picker lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Closed,
    Open { draft: ValueSet, search: String },
}

/// One multi-select picker.
///
/// # Example
///
/// ```
/// use facetview_query::{FacetOption, MultiSelectPicker, ValueSet};
///
/// let options = vec![FacetOption::new("ABBA"), FacetOption::new("Led Zeppelin")];
/// let mut picker = MultiSelectPicker::new("artist", "Artist", options);
/// let committed = ValueSet::new();
///
/// picker.open(&committed);
/// picker.toggle("ABBA").unwrap();
/// picker.cancel();
/// assert!(committed.is_empty());
///
/// picker.open(&committed);
/// picker.toggle("ABBA").unwrap();
/// let applied = picker.commit().unwrap();
/// assert_eq!(applied.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelectPicker {
    facet: String,
    label: String,
    options: Vec<FacetOption>,
    state: PickerState,
}

impl MultiSelectPicker {
    /// Creates a closed picker over `options`.
    pub fn new(facet: impl Into<String>, label: impl Into<String>, options: Vec<FacetOption>) -> Self {
        MultiSelectPicker {
            facet: facet.into(),
            label: label.into(),
            options,
            state: PickerState::Closed,
        }
    }

    /// The facet name this picker edits.
    pub fn facet(&self) -> &str {
        &self.facet
    }

    /// All options, in facet order.
    pub fn options(&self) -> &[FacetOption] {
        &self.options
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &PickerState {
        &self.state
    }

    /// Returns `true` while open.
    pub fn is_open(&self) -> bool {
        matches!(self.state, PickerState::Open { .. })
    }

    /// The live draft, if open.
    pub fn draft(&self) -> Option<&ValueSet> {
        match &self.state {
            PickerState::Open { draft, .. } => Some(draft),
            PickerState::Closed => None,
        }
    }

    /// The option search text, if open.
    pub fn search_text(&self) -> Option<&str> {
        match &self.state {
            PickerState::Open { search, .. } => Some(search),
            PickerState::Closed => None,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Opens the picker, seeding the draft from `committed`.
    ///
    /// Opening an already open picker reseeds it.
    pub fn open(&mut self, committed: &ValueSet) {
        tracing::trace!(facet = %self.facet, seeded = committed.len(), "picker opened");
        self.state = PickerState::Open {
            draft: committed.clone(),
            search: String::new(),
        };
    }

    /// Closes the picker and returns the draft to be committed.
    pub fn commit(&mut self) -> Result<ValueSet> {
        match std::mem::take(&mut self.state) {
            PickerState::Open { draft, .. } => {
                tracing::trace!(facet = %self.facet, selected = draft.len(), "picker committed");
                Ok(draft)
            }
            PickerState::Closed => Err(QueryError::PickerClosed(self.facet.clone())),
        }
    }

    /// Closes the picker, discarding the draft. Closed pickers stay closed.
    pub fn cancel(&mut self) {
        if self.is_open() {
            tracing::trace!(facet = %self.facet, "picker cancelled");
        }
        self.state = PickerState::Closed;
    }

    // ========================================================================
    // Draft edits
    // ========================================================================

    /// Flips membership of `value` in the draft.
    pub fn toggle(&mut self, value: &str) -> Result<()> {
        self.ensure_option(value)?;
        self.draft_mut()?.toggle(value);
        Ok(())
    }

    /// Removes `value` from the draft. Removing an unselected value is a no-op.
    pub fn remove_one(&mut self, value: &str) -> Result<()> {
        self.draft_mut()?.remove(value);
        Ok(())
    }

    /// Empties the draft.
    pub fn clear_all(&mut self) -> Result<()> {
        self.draft_mut()?.clear();
        Ok(())
    }

    /// Sets the text that narrows the displayed options. Does not touch the draft.
    pub fn set_search_text(&mut self, text: &str) -> Result<()> {
        match &mut self.state {
            PickerState::Open { search, .. } => {
                *search = text.to_string();
                Ok(())
            }
            PickerState::Closed => Err(QueryError::PickerClosed(self.facet.clone())),
        }
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Options whose label contains the search text, case-insensitively.
    ///
    /// A closed picker shows every option.
    pub fn visible_options(&self) -> Vec<&FacetOption> {
        let needle = self.search_text().unwrap_or("").to_lowercase();
        self.options
            .iter()
            .filter(|o| o.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Draft values resolved to options, in draft order.
    pub fn selected_options(&self) -> Vec<&FacetOption> {
        let Some(draft) = self.draft() else {
            return Vec::new();
        };
        draft
            .iter()
            .filter_map(|v| self.options.iter().find(|o| o.value == v))
            .collect()
    }

    /// Returns `true` if `value` is checked in the draft.
    pub fn is_checked(&self, value: &str) -> bool {
        self.draft().is_some_and(|d| d.contains(value))
    }

    /// `"Selected (<n>)"` over the live draft.
    pub fn selected_heading(&self) -> String {
        format!("Selected ({})", self.draft().map_or(0, ValueSet::len))
    }

    /// Trigger text: `"<Label> (<n>)"` from the committed selection, or the
    /// bare label when nothing is committed.
    pub fn trigger_label(&self, committed: &ValueSet) -> String {
        if committed.is_empty() {
            self.label.clone()
        } else {
            format!("{} ({})", self.label, committed.len())
        }
    }

    fn ensure_option(&self, value: &str) -> Result<()> {
        if self.options.iter().any(|o| o.value == value) {
            Ok(())
        } else {
            Err(QueryError::UnknownFacetValue {
                facet: self.facet.clone(),
                value: value.to_string(),
            })
        }
    }

    fn draft_mut(&mut self) -> Result<&mut ValueSet> {
        match &mut self.state {
            PickerState::Open { draft, .. } => Ok(draft),
            PickerState::Closed => Err(QueryError::PickerClosed(self.facet.clone())),
        }
    }
}
