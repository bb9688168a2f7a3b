//! The query state controller.
//!
//! A [`Browser`] owns the composite query state (search text, facet
//! selections, sort, page) and the multi-select pickers. Every mutation goes
//! through one of its methods, and every mutation ends in a full re-derivation:
//!
//! ```text
//! records ──filter──▶ matches ──sort──▶ ordered ──paginate──▶ visible rows
//! ```
//!
//! Changing the search text or a committed facet selection resets the page to
//! 1. Sorting keeps the page. If a derivation leaves the current page past the
//! last page, the page resets to 1.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{BrowserConfig, FacetKind};
use crate::error::{QueryError, Result};
use crate::filter::Filter;
use crate::intent::Intent;
use crate::ordering::{sort_positions, SortIndicator, SortState};
use crate::pagination::{paginate, total_pages, PageInfo};
use crate::record::{FacetOption, Record, RecordSource};
use crate::selection::{FacetSelection, ValueSet};
use crate::staging::MultiSelectPicker;

/// The committed query inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    search: String,
    facets: BTreeMap<String, FacetSelection>,
    sort: SortState,
    page: usize,
}

impl QueryState {
    fn initial(config: &BrowserConfig) -> Self {
        let facets = config
            .facets
            .iter()
            .map(|f| {
                let selection = match f.kind {
                    FacetKind::Single => FacetSelection::Single(None),
                    FacetKind::Multi => FacetSelection::Multi(ValueSet::new()),
                };
                (f.name.clone(), selection)
            })
            .collect();

        QueryState {
            search: String::new(),
            facets,
            sort: SortState::Unsorted,
            page: 1,
        }
    }

    /// The search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Committed facet selections by facet name.
    pub fn facets(&self) -> &BTreeMap<String, FacetSelection> {
        &self.facets
    }

    /// The sort state.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// The current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub rows: Vec<Record>,
    pub page: PageInfo,
    pub sort: SortState,
    pub search: String,
    pub facets: BTreeMap<String, FacetSelection>,
    /// Rows matching the current filters.
    pub filtered_count: usize,
    /// Rows in the source.
    pub total_count: usize,
    /// Applied filters, e.g. `search "love", genre = Rock`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_summary: Option<String>,
}

/// Callback run after each change to the committed query state.
pub type Listener = Box<dyn FnMut(&Snapshot)>;

#[derive(Debug, Clone, Default)]
struct Derived {
    /// Indices into the source: filtered, then sorted.
    ordered: Vec<usize>,
    /// The slice of `ordered` on the current page.
    visible: Vec<usize>,
    info: PageInfo,
}

/// Faceted, sortable, paginated view over a [`RecordSource`].
///
/// # Example
///
/// ```
/// use facetview_query::Browser;
///
/// let mut browser = Browser::songs().unwrap();
/// browser.set_single_facet("genre", Some("Rock")).unwrap();
/// browser.toggle_sort("title").unwrap();
///
/// let titles: Vec<&str> = browser
///     .visible_rows()
///     .iter()
///     .filter_map(|r| r.get("title"))
///     .collect();
/// assert_eq!(titles[0], "All Along the Watchtower");
/// assert_eq!(titles.len(), 4);
/// ```
pub struct Browser {
    source: Arc<RecordSource>,
    config: BrowserConfig,
    options: BTreeMap<String, Vec<FacetOption>>,
    pickers: BTreeMap<String, MultiSelectPicker>,
    state: QueryState,
    derived: Derived,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("records", &self.source.len())
            .field("config", &self.config)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Browser {
    /// Builds a browser after validating `config` against `source`.
    pub fn new(source: Arc<RecordSource>, config: BrowserConfig) -> Result<Self> {
        config.validate(&source)?;

        let options: BTreeMap<String, Vec<FacetOption>> = config
            .facets
            .iter()
            .map(|f| (f.name.clone(), source.facet_options(&f.field)))
            .collect();

        let pickers = config
            .facets
            .iter()
            .filter(|f| f.kind == FacetKind::Multi)
            .map(|f| {
                let picker = MultiSelectPicker::new(
                    f.name.clone(),
                    f.display_label(),
                    options.get(&f.name).cloned().unwrap_or_default(),
                );
                (f.name.clone(), picker)
            })
            .collect();

        let state = QueryState::initial(&config);
        let mut browser = Browser {
            source,
            config,
            options,
            pickers,
            state,
            derived: Derived::default(),
            listeners: Vec::new(),
        };
        browser.rederive();

        tracing::debug!(
            records = browser.source.len(),
            facets = browser.config.facets.len(),
            page_size = browser.config.page_size.get(),
            "browser ready"
        );
        Ok(browser)
    }

    /// A browser over the bundled song sample.
    pub fn songs() -> Result<Self> {
        Browser::new(Arc::new(crate::sample::songs()), BrowserConfig::songs())
    }

    /// Registers a listener called after every change to the committed state.
    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The records being browsed.
    pub fn source(&self) -> &RecordSource {
        &self.source
    }

    /// The configuration in force.
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// The committed query state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Rows on the current page.
    pub fn visible_rows(&self) -> Vec<&Record> {
        self.rows_at(&self.derived.visible)
    }

    /// All filtered rows in display order, across pages.
    pub fn ordered_rows(&self) -> Vec<&Record> {
        self.rows_at(&self.derived.ordered)
    }

    /// Current page and page count.
    pub fn pagination_info(&self) -> PageInfo {
        self.derived.info
    }

    /// Number of rows matching the current filters.
    pub fn filtered_count(&self) -> usize {
        self.derived.ordered.len()
    }

    /// The active sort.
    pub fn sort_state(&self) -> &SortState {
        &self.state.sort
    }

    /// Header indicator for a column.
    pub fn sort_indicator(&self, column: &str) -> SortIndicator {
        self.state.sort.indicator(column)
    }

    /// The search text.
    pub fn search_text(&self) -> &str {
        &self.state.search
    }

    /// A facet's options, derived once from the records.
    pub fn facet_options(&self, facet: &str) -> Result<&[FacetOption]> {
        self.options
            .get(facet)
            .map(Vec::as_slice)
            .ok_or_else(|| QueryError::UnknownFacet(facet.to_string()))
    }

    /// The committed value of a single-select facet.
    pub fn single_facet(&self, facet: &str) -> Result<Option<&str>> {
        self.config.find_facet_of_kind(facet, FacetKind::Single)?;
        match self.state.facets.get(facet) {
            Some(FacetSelection::Single(value)) => Ok(value.as_deref()),
            _ => Err(QueryError::UnknownFacet(facet.to_string())),
        }
    }

    /// The committed selection of a multi-select facet.
    pub fn multi_facet(&self, facet: &str) -> Result<&ValueSet> {
        self.config.find_facet_of_kind(facet, FacetKind::Multi)?;
        match self.state.facets.get(facet) {
            Some(FacetSelection::Multi(values)) => Ok(values),
            _ => Err(QueryError::UnknownFacet(facet.to_string())),
        }
    }

    /// A multi-select facet's picker.
    pub fn picker(&self, facet: &str) -> Result<&MultiSelectPicker> {
        self.config.find_facet_of_kind(facet, FacetKind::Multi)?;
        self.pickers
            .get(facet)
            .ok_or_else(|| QueryError::UnknownFacet(facet.to_string()))
    }

    /// Trigger label of any facet.
    ///
    /// Single-select: `"Genre: Rock"` or `"Genre"`. Multi-select:
    /// `"Artist (2)"` or `"Artist"`, counting the committed selection.
    pub fn facet_label(&self, facet: &str) -> Result<String> {
        let config = self.config.find_facet(facet)?;
        match config.kind {
            FacetKind::Single => {
                let label = config.display_label();
                let selected = self.single_facet(facet)?.and_then(|value| {
                    self.options
                        .get(facet)
                        .and_then(|opts| opts.iter().find(|o| o.value == value))
                        .map(|o| o.label.as_str())
                        .or(Some(value))
                });
                Ok(match selected {
                    Some(option) => format!("{label}: {option}"),
                    None => label.to_string(),
                })
            }
            FacetKind::Multi => Ok(self.picker(facet)?.trigger_label(self.multi_facet(facet)?)),
        }
    }

    /// A readable summary of active filters, or `None` when nothing filters.
    pub fn filter_summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.state.search.is_empty() {
            parts.push(format!("search {:?}", self.state.search));
        }
        for facet in &self.config.facets {
            let Some(selection) = self.state.facets.get(&facet.name) else {
                continue;
            };
            if selection.is_inactive() {
                continue;
            }
            match selection {
                FacetSelection::Single(value) => {
                    parts.push(format!("{} = {}", facet.name, value.as_deref().unwrap_or("")));
                }
                FacetSelection::Multi(values) => {
                    let joined = values.iter().collect::<Vec<_>>().join(", ");
                    parts.push(format!("{} in [{}]", facet.name, joined));
                }
            }
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Everything needed to draw the current frame.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.visible_rows().into_iter().cloned().collect(),
            page: self.derived.info,
            sort: self.state.sort.clone(),
            search: self.state.search.clone(),
            facets: self.state.facets.clone(),
            filtered_count: self.filtered_count(),
            total_count: self.source.len(),
            filter_summary: self.filter_summary(),
        }
    }

    // ========================================================================
    // Query mutations
    // ========================================================================

    /// Replaces the search text and returns to page 1.
    pub fn set_search_text(&mut self, text: &str) {
        tracing::debug!(search = %text, "search text set");
        self.mutate(|state| {
            state.search = text.to_string();
            state.page = 1;
        });
    }

    /// Sets or clears a single-select facet and returns to page 1.
    pub fn set_single_facet(&mut self, facet: &str, value: Option<&str>) -> Result<()> {
        self.config.find_facet_of_kind(facet, FacetKind::Single)?;
        if let Some(value) = value {
            self.ensure_option(facet, value)?;
        }
        tracing::debug!(facet, value = ?value, "single facet set");

        let key = facet.to_string();
        let selection = FacetSelection::Single(value.map(str::to_string));
        self.mutate(|state| {
            state.facets.insert(key, selection);
            state.page = 1;
        });
        Ok(())
    }

    /// Picks a single-select option, or clears it if it is already picked.
    pub fn choose_single_facet(&mut self, facet: &str, value: &str) -> Result<()> {
        let next = match self.single_facet(facet)? {
            Some(current) if current == value => None,
            _ => Some(value),
        };
        self.set_single_facet(facet, next)
    }

    /// Replaces a multi-select facet's committed selection and returns to page 1.
    pub fn commit_multi_facet(&mut self, facet: &str, values: ValueSet) -> Result<()> {
        self.config.find_facet_of_kind(facet, FacetKind::Multi)?;
        for value in values.iter() {
            self.ensure_option(facet, value)?;
        }
        tracing::debug!(facet, selected = values.len(), "multi facet committed");

        let key = facet.to_string();
        self.mutate(|state| {
            state.facets.insert(key, FacetSelection::Multi(values));
            state.page = 1;
        });
        Ok(())
    }

    /// Activates a column header: unsorted → asc → desc → unsorted.
    ///
    /// A different column always starts ascending. The page is kept.
    pub fn toggle_sort(&mut self, column: &str) -> Result<()> {
        self.config.sortable_column(column)?;
        let next = self.state.sort.toggled(column);
        tracing::debug!(column, sort = %next, "sort toggled");
        self.mutate(|state| state.sort = next);
        Ok(())
    }

    /// Jumps to `page` if it is within `[1, total_pages]`; otherwise nothing.
    pub fn set_page(&mut self, page: usize) {
        if page < 1 || page > self.derived.info.total_pages {
            tracing::debug!(
                page,
                total_pages = self.derived.info.total_pages,
                "page request out of range ignored"
            );
            return;
        }
        self.mutate(|state| state.page = page);
    }

    /// Moves one page forward unless already on the last page.
    pub fn next_page(&mut self) {
        if self.derived.info.has_next() {
            self.set_page(self.state.page + 1);
        }
    }

    /// Moves one page back unless already on the first page.
    pub fn previous_page(&mut self) {
        if self.derived.info.has_previous() {
            self.set_page(self.state.page - 1);
        }
    }

    // ========================================================================
    // Picker mutations
    // ========================================================================

    /// Opens a picker, seeding its draft from the committed selection.
    pub fn open_picker(&mut self, facet: &str) -> Result<()> {
        let committed = self.multi_facet(facet)?.clone();
        self.picker_mut(facet)?.open(&committed);
        Ok(())
    }

    /// Opens a closed picker or cancels an open one.
    pub fn toggle_picker(&mut self, facet: &str) -> Result<()> {
        if self.picker(facet)?.is_open() {
            self.cancel_picker(facet)
        } else {
            self.open_picker(facet)
        }
    }

    /// Closes a picker, discarding its draft.
    pub fn cancel_picker(&mut self, facet: &str) -> Result<()> {
        self.picker_mut(facet)?.cancel();
        Ok(())
    }

    /// Closes a picker and commits its draft.
    ///
    /// The draft is checked before the picker closes, so a rejected draft
    /// leaves the picker open with its edits intact.
    pub fn apply_picker(&mut self, facet: &str) -> Result<()> {
        let picker = self.picker(facet)?;
        let draft = picker
            .draft()
            .ok_or_else(|| QueryError::PickerClosed(facet.to_string()))?;
        for value in draft.iter() {
            self.ensure_option(facet, value)?;
        }
        let draft = self.picker_mut(facet)?.commit()?;
        self.commit_multi_facet(facet, draft)
    }

    /// Flips one value in an open picker's draft.
    pub fn toggle_draft(&mut self, facet: &str, value: &str) -> Result<()> {
        self.picker_mut(facet)?.toggle(value)
    }

    /// Drops one value from an open picker's draft.
    pub fn remove_draft(&mut self, facet: &str, value: &str) -> Result<()> {
        self.picker_mut(facet)?.remove_one(value)
    }

    /// Empties an open picker's draft.
    pub fn clear_draft(&mut self, facet: &str) -> Result<()> {
        self.picker_mut(facet)?.clear_all()
    }

    /// Sets an open picker's option search text.
    pub fn set_picker_search(&mut self, facet: &str, text: &str) -> Result<()> {
        self.picker_mut(facet)?.set_search_text(text)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Applies one intent.
    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        match intent {
            Intent::Search { text } => {
                self.set_search_text(&text);
                Ok(())
            }
            Intent::SetSingle { facet, value } => self.set_single_facet(&facet, value.as_deref()),
            Intent::ChooseSingle { facet, value } => self.choose_single_facet(&facet, &value),
            Intent::CommitMulti { facet, values } => self.commit_multi_facet(&facet, values),
            Intent::TogglePicker { facet } => self.toggle_picker(&facet),
            Intent::OpenPicker { facet } => self.open_picker(&facet),
            Intent::CancelPicker { facet } => self.cancel_picker(&facet),
            Intent::ApplyPicker { facet } => self.apply_picker(&facet),
            Intent::ToggleDraft { facet, value } => self.toggle_draft(&facet, &value),
            Intent::RemoveDraft { facet, value } => self.remove_draft(&facet, &value),
            Intent::ClearDraft { facet } => self.clear_draft(&facet),
            Intent::PickerSearch { facet, text } => self.set_picker_search(&facet, &text),
            Intent::Sort { column } => self.toggle_sort(&column),
            Intent::Page { page } => {
                self.set_page(page);
                Ok(())
            }
            Intent::NextPage => {
                self.next_page();
                Ok(())
            }
            Intent::PreviousPage => {
                self.previous_page();
                Ok(())
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn rows_at(&self, positions: &[usize]) -> Vec<&Record> {
        let records = self.source.records();
        positions.iter().map(|&i| &records[i]).collect()
    }

    fn picker_mut(&mut self, facet: &str) -> Result<&mut MultiSelectPicker> {
        self.config.find_facet_of_kind(facet, FacetKind::Multi)?;
        self.pickers
            .get_mut(facet)
            .ok_or_else(|| QueryError::UnknownFacet(facet.to_string()))
    }

    fn ensure_option(&self, facet: &str, value: &str) -> Result<()> {
        let known = self
            .options
            .get(facet)
            .is_some_and(|opts| opts.iter().any(|o| o.value == value));
        if known {
            Ok(())
        } else {
            Err(QueryError::UnknownFacetValue {
                facet: facet.to_string(),
                value: value.to_string(),
            })
        }
    }

    /// Applies `update`, re-derives, and notifies listeners if anything changed.
    fn mutate(&mut self, update: impl FnOnce(&mut QueryState)) {
        let before = self.state.clone();
        update(&mut self.state);
        self.rederive();

        if self.state != before && !self.listeners.is_empty() {
            let snapshot = self.snapshot();
            for listener in &mut self.listeners {
                listener(&snapshot);
            }
        }
    }

    fn rederive(&mut self) {
        let records = self.source.records();
        let mut ordered = build_filter(&self.config, &self.state).positions(records);
        sort_positions(&mut ordered, records, &self.state.sort);

        let total = total_pages(ordered.len(), self.config.page_size);
        if self.state.page > total {
            tracing::debug!(
                page = self.state.page,
                total_pages = total,
                "page past end after derivation, reset to 1"
            );
            self.state.page = 1;
        }

        let page = paginate(&ordered, self.config.page_size, self.state.page);
        let visible = page.items.to_vec();
        let info = page.info;

        tracing::trace!(
            matched = ordered.len(),
            page = info.current_page,
            total_pages = info.total_pages,
            visible = visible.len(),
            "rederived"
        );
        self.derived = Derived {
            ordered,
            visible,
            info,
        };
    }
}

fn build_filter(config: &BrowserConfig, state: &QueryState) -> Filter {
    let mut filter = Filter::new().and_search(&state.search, config.searchable_fields.iter().cloned());
    for facet in &config.facets {
        filter = match state.facets.get(&facet.name) {
            Some(FacetSelection::Single(value)) => filter.and_eq_opt(&facet.field, value.as_deref()),
            Some(FacetSelection::Multi(values)) => filter.and_in(&facet.field, values),
            None => filter,
        };
    }
    filter.build()
}
