//! Browser configuration.
//!
//! A [`BrowserConfig`] is the static schema the host supplies: page size,
//! searchable fields, facets and table columns. It loads from YAML or JSON
//! and is validated against a [`RecordSource`] before a browser is built.
//!
//! ```yaml
//! page_size: 10
//! searchable_fields: [title, artist, genre]
//! facets:
//!   - name: artist
//!     label: Artist
//!     kind: multi
//!     field: artist
//!     search_placeholder: Search Artists
//!   - name: genre
//!     label: Genre
//!     kind: single
//!     field: genre
//! columns:
//!   - { field: title, header: Title, sortable: true }
//!   - { field: artist, header: Artist, sortable: true }
//!   - { field: genre, header: Genre }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::record::RecordSource;

/// Whether a facet takes one value or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    Single,
    Multi,
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetKind::Single => write!(f, "single"),
            FacetKind::Multi => write!(f, "multi"),
        }
    }
}

/// One facet: a named filter over a record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetConfig {
    pub name: String,
    /// Trigger label. Defaults to the name.
    #[serde(default)]
    pub label: Option<String>,
    pub kind: FacetKind,
    /// Record field the facet filters on.
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_placeholder: Option<String>,
}

impl FacetConfig {
    /// Creates a facet whose name, label and field are the same string.
    pub fn new(field: impl Into<String>, kind: FacetKind) -> Self {
        let field = field.into();
        FacetConfig {
            name: field.clone(),
            label: None,
            kind,
            field,
            search_placeholder: None,
        }
    }

    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the picker search placeholder.
    pub fn search_placeholder(mut self, text: impl Into<String>) -> Self {
        self.search_placeholder = Some(text.into());
        self
    }

    /// The label, falling back to the name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// One table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub field: String,
    /// Header text. Defaults to the field name.
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub sortable: bool,
}

impl ColumnConfig {
    /// Creates a column.
    pub fn new(field: impl Into<String>, header: impl Into<String>, sortable: bool) -> Self {
        ColumnConfig {
            field: field.into(),
            header: Some(header.into()),
            sortable,
        }
    }

    /// The header, falling back to the field name.
    pub fn display_header(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.field)
    }
}

fn default_page_size() -> NonZeroUsize {
    DEFAULT_PAGE_SIZE
}

/// Static browser schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroUsize,
    pub searchable_fields: Vec<String>,
    #[serde(default)]
    pub facets: Vec<FacetConfig>,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

impl BrowserConfig {
    /// Creates a config with the default page size and no facets or columns.
    pub fn new<I, S>(searchable_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BrowserConfig {
            page_size: DEFAULT_PAGE_SIZE,
            searchable_fields: searchable_fields.into_iter().map(Into::into).collect(),
            facets: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Sets the page size.
    pub fn page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Adds a facet.
    pub fn facet(mut self, facet: FacetConfig) -> Self {
        self.facets.push(facet);
        self
    }

    /// Adds a column.
    pub fn column(mut self, column: ColumnConfig) -> Self {
        self.columns.push(column);
        self
    }

    /// Configuration for the bundled song sample.
    pub fn songs() -> Self {
        BrowserConfig::new(["title", "artist", "genre"])
            .facet(
                FacetConfig::new("artist", FacetKind::Multi)
                    .label("Artist")
                    .search_placeholder("Search Artists"),
            )
            .facet(FacetConfig::new("genre", FacetKind::Single).label("Genre"))
            .column(ColumnConfig::new("title", "Title", true))
            .column(ColumnConfig::new("artist", "Artist", true))
            .column(ColumnConfig::new("genre", "Genre", false))
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Parses YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a config file. `.json` files parse as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| QueryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Finds a facet by name.
    pub fn find_facet(&self, name: &str) -> Result<&FacetConfig> {
        self.facets
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| QueryError::UnknownFacet(name.to_string()))
    }

    /// Finds a facet by name and checks its kind.
    pub fn find_facet_of_kind(&self, name: &str, expected: FacetKind) -> Result<&FacetConfig> {
        let facet = self.find_facet(name)?;
        if facet.kind != expected {
            return Err(QueryError::FacetKindMismatch {
                facet: name.to_string(),
                expected,
                actual: facet.kind,
            });
        }
        Ok(facet)
    }

    /// Finds a column by field and checks that it is sortable.
    pub fn sortable_column(&self, field: &str) -> Result<&ColumnConfig> {
        let column = self
            .columns
            .iter()
            .find(|c| c.field == field)
            .ok_or_else(|| QueryError::UnknownColumn(field.to_string()))?;
        if !column.sortable {
            return Err(QueryError::ColumnNotSortable(field.to_string()));
        }
        Ok(column)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Checks the config against the records it will browse.
    pub fn validate(&self, source: &RecordSource) -> Result<()> {
        if self.searchable_fields.is_empty() {
            return Err(QueryError::invalid_config(
                "searchable_fields must name at least one field",
            ));
        }
        for field in &self.searchable_fields {
            if !source.has_field(field) {
                return Err(QueryError::unknown_field("searchable_fields", field));
            }
        }

        let mut names = BTreeSet::new();
        for facet in &self.facets {
            if !names.insert(facet.name.as_str()) {
                return Err(QueryError::invalid_config(format!(
                    "duplicate facet name '{}'",
                    facet.name
                )));
            }
            if !source.has_field(&facet.field) {
                return Err(QueryError::unknown_field(
                    format!("facet '{}'", facet.name),
                    &facet.field,
                ));
            }
        }

        let mut fields = BTreeSet::new();
        for column in &self.columns {
            if !fields.insert(column.field.as_str()) {
                return Err(QueryError::invalid_config(format!(
                    "duplicate column '{}'",
                    column.field
                )));
            }
            if !source.has_field(&column.field) {
                return Err(QueryError::unknown_field("columns", &column.field));
            }
        }

        Ok(())
    }
}
