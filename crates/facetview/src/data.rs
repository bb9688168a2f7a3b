//! Dataset and configuration loading.
//!
//! Datasets come from the bundled sample, a JSON array of flat objects, or a
//! CSV file with a header row. Without an explicit config, a dataset file gets
//! a plain table: every field searchable and sortable, no facets.

use std::path::Path;

use anyhow::{bail, Context, Result};
use facetview_query::{sample, BrowserConfig, ColumnConfig, Record, RecordSource};
use serde_json::Value;

/// Dataset file formats, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(DataFormat::Json),
            Some("csv") => Ok(DataFormat::Csv),
            _ => bail!(
                "cannot tell the format of {} (expected .json or .csv)",
                path.display()
            ),
        }
    }
}

/// Loads records from `path`, or the song sample when `None`.
pub fn load_source(path: Option<&Path>) -> Result<RecordSource> {
    let Some(path) = path else {
        return Ok(sample::songs());
    };

    let source = match DataFormat::from_path(path)? {
        DataFormat::Json => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let records =
                parse_json(&text).with_context(|| format!("invalid dataset {}", path.display()))?;
            RecordSource::new(records)?
        }
        DataFormat::Csv => {
            let reader = csv::Reader::from_path(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            parse_csv(reader).with_context(|| format!("invalid dataset {}", path.display()))?
        }
    };

    tracing::debug!(path = %path.display(), records = source.len(), "dataset loaded");
    Ok(source)
}

/// Parses a JSON array of flat objects.
///
/// Strings are taken as-is, numbers and booleans are stringified, and `null`
/// becomes the empty string. Nested values are rejected.
pub fn parse_json(text: &str) -> Result<Vec<Record>> {
    let rows: Vec<serde_json::Map<String, Value>> =
        serde_json::from_str(text).context("expected an array of objects")?;

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let mut pairs = Vec::with_capacity(row.len());
            for (field, value) in row {
                let text = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Array(_) | Value::Object(_) => {
                        bail!("record {index}: field '{field}' is not a scalar")
                    }
                };
                pairs.push((field, text));
            }
            Ok(Record::from_pairs(pairs))
        })
        .collect()
}

/// Parses CSV with a header row.
///
/// The header names the fields, so a file with no data rows still yields a
/// source that knows them.
pub fn parse_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<RecordSource> {
    let headers = reader.headers().context("missing header row")?.clone();
    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("record {index}"))?;
        records.push(Record::from_pairs(headers.iter().zip(row.iter())));
    }
    Ok(RecordSource::with_fields(headers.iter(), records)?)
}

/// Loads the browser config.
///
/// An explicit path wins. Otherwise the sample gets its own config and a
/// dataset file gets [`plain_config`].
pub fn load_config(
    path: Option<&Path>,
    data: Option<&Path>,
    source: &RecordSource,
) -> Result<BrowserConfig> {
    match (path, data) {
        (Some(path), _) => BrowserConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        (None, None) => Ok(BrowserConfig::songs()),
        (None, Some(data)) => {
            if source.fields().is_empty() {
                bail!(
                    "{} has no records to take field names from; pass --config",
                    data.display()
                );
            }
            Ok(plain_config(source))
        }
    }
}

/// Every field searchable and sortable, in field order, with no facets.
pub fn plain_config(source: &RecordSource) -> BrowserConfig {
    source.fields().iter().fold(
        BrowserConfig::new(source.fields().iter().cloned()),
        |config, field| config.column(ColumnConfig::new(field.as_str(), field.as_str(), true)),
    )
}
