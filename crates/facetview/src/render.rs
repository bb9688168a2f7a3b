//! Text and JSON rendering of browser frames.
//!
//! A text frame is the facet bar, the table with sort indicators on its
//! headers, the pager, and a panel for every open picker. JSON frames are the
//! browser [`Snapshot`](facetview_query::Snapshot) on one line.

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use console::Style;
use facetview_query::{Browser, FacetKind, SortIndicator};
use serde_json::json;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a table cell may get before it is truncated.
const MAX_CELL_WIDTH: usize = 32;

/// Column separator.
const GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders frames in one output format.
#[derive(Debug, Clone)]
pub struct Renderer {
    format: OutputFormat,
    styled: bool,
}

impl Renderer {
    pub fn new(format: OutputFormat, styled: bool) -> Self {
        Renderer { format, styled }
    }

    /// A renderer that never emits ANSI codes.
    pub fn plain(format: OutputFormat) -> Self {
        Renderer::new(format, false)
    }

    /// The whole current frame.
    pub fn frame(&self, browser: &Browser) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(&browser.snapshot())?),
            OutputFormat::Text => self.text_frame(browser),
        }
    }

    /// Every facet with its options.
    pub fn facets(&self, browser: &Browser) -> Result<String> {
        let config = browser.config();
        match self.format {
            OutputFormat::Json => {
                let mut facets = Vec::with_capacity(config.facets.len());
                for facet in &config.facets {
                    let options = browser.facet_options(&facet.name)?;
                    facets.push(json!({
                        "name": facet.name,
                        "label": facet.display_label(),
                        "kind": facet.kind,
                        "field": facet.field,
                        "options": options,
                    }));
                }
                Ok(serde_json::to_string_pretty(&facets)?)
            }
            OutputFormat::Text => {
                let mut out = String::new();
                for facet in &config.facets {
                    let options = browser.facet_options(&facet.name)?;
                    let heading = format!(
                        "{} ({}-select on '{}', {} options)",
                        facet.display_label(),
                        facet.kind,
                        facet.field,
                        options.len()
                    );
                    writeln!(out, "{}", self.paint(&heading, &Style::new().bold()))?;
                    for option in options {
                        writeln!(out, "  {}", option.label)?;
                    }
                }
                if config.facets.is_empty() {
                    writeln!(out, "No facets configured.")?;
                }
                Ok(out.trim_end().to_string())
            }
        }
    }

    fn text_frame(&self, browser: &Browser) -> Result<String> {
        let mut out = String::new();
        self.write_filters(&mut out, browser)?;
        self.write_table(&mut out, browser)?;
        self.write_pager(&mut out, browser)?;
        self.write_pickers(&mut out, browser)?;
        Ok(out.trim_end().to_string())
    }

    fn write_filters(&self, out: &mut String, browser: &Browser) -> Result<()> {
        if !browser.search_text().is_empty() {
            writeln!(out, "Search: {:?}", browser.search_text())?;
        }
        let facets = &browser.config().facets;
        if !facets.is_empty() {
            let mut labels = Vec::with_capacity(facets.len());
            for facet in facets {
                labels.push(format!("[{}]", browser.facet_label(&facet.name)?));
            }
            writeln!(out, "{}", labels.join(" "))?;
        }
        Ok(())
    }

    fn write_table(&self, out: &mut String, browser: &Browser) -> Result<()> {
        let rows = browser.visible_rows();
        if rows.is_empty() {
            writeln!(out, "No results.")?;
            return Ok(());
        }

        let columns = &browser.config().columns;
        let headers: Vec<String> = columns
            .iter()
            .map(|c| match browser.sort_indicator(&c.field) {
                SortIndicator::Ascending => format!("{} ▲", c.display_header()),
                SortIndicator::Descending => format!("{} ▼", c.display_header()),
                SortIndicator::Inactive => c.display_header().to_string(),
            })
            .collect();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| truncate_to_width(row.get(&c.field).unwrap_or(""), MAX_CELL_WIDTH))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                cells
                    .iter()
                    .map(|r| r[i].width())
                    .chain(std::iter::once(h.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header_line = join_padded(&headers, &widths);
        writeln!(out, "{}", self.paint(&header_line, &Style::new().bold()))?;
        for row in &cells {
            writeln!(out, "{}", join_padded(row, &widths))?;
        }
        Ok(())
    }

    fn write_pager(&self, out: &mut String, browser: &Browser) -> Result<()> {
        let info = browser.pagination_info();
        if !info.is_visible() {
            return Ok(());
        }
        let prev = if info.has_previous() { "<" } else { " " };
        let next = if info.has_next() { ">" } else { " " };
        let line = format!(
            "{prev} Page {} {next}  ({} of {} rows)",
            info.label(),
            browser.filtered_count(),
            browser.source().len()
        );
        writeln!(out, "{}", self.paint(&line, &Style::new().dim()))?;
        Ok(())
    }

    fn write_pickers(&self, out: &mut String, browser: &Browser) -> Result<()> {
        for facet in &browser.config().facets {
            if facet.kind != FacetKind::Multi {
                continue;
            }
            let picker = browser.picker(&facet.name)?;
            if !picker.is_open() {
                continue;
            }

            writeln!(out)?;
            let title = format!("{} picker", facet.display_label());
            writeln!(out, "{}", self.paint(&title, &Style::new().cyan().bold()))?;
            let placeholder = facet.search_placeholder.as_deref().unwrap_or("Search");
            writeln!(out, "  {placeholder}: {}", picker.search_text().unwrap_or(""))?;

            let visible = picker.visible_options();
            if visible.is_empty() {
                writeln!(out, "  (no matching options)")?;
            }
            for option in visible {
                let mark = if picker.is_checked(&option.value) { "x" } else { " " };
                writeln!(out, "  [{mark}] {}", option.label)?;
            }

            writeln!(out, "  {}", picker.selected_heading())?;
            for option in picker.selected_options() {
                writeln!(out, "    {}", option.label)?;
            }
        }
        Ok(())
    }

    fn paint(&self, text: &str, style: &Style) -> String {
        if self.styled {
            style.apply_to(text).force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(cell.width());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(GAP);
    line.trim_end().to_string()
}

/// Fits `text` into `max_width` terminal columns. A cut cell ends in `…`,
/// which takes one of those columns.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let cut = text
        .char_indices()
        .find_map(|(at, c)| {
            used += c.width().unwrap_or(0);
            (used > budget).then_some(at)
        })
        .unwrap_or(text.len());
    format!("{}…", &text[..cut])
}
