//! Command line interface.
//!
//! ## Commands
//!
//! - `show` - apply one query and print the resulting page
//! - `facets` - list every facet and its options
//! - `session` - read commands line by line and print a frame after each

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use facetview_query::{Browser, FacetKind, ValueSet};

use crate::data;
use crate::render::{OutputFormat, Renderer};
use crate::session;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Facetview - browse tabular records with search, facets, sorting and paging
#[derive(Parser, Debug)]
#[command(name = "facetview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Dataset file (.json or .csv). Defaults to the bundled song sample
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Browser config file (.yaml or .json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// When to color text output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Log output format (logs go to stderr; filter with FACETVIEW_LOG)
    #[arg(long, global = true, value_enum, default_value_t)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply one query and print the resulting page
    Show {
        /// Search text
        #[arg(short, long)]
        search: Option<String>,

        /// Facet selection; repeat to pick several values of a multi-select facet
        #[arg(long = "facet", value_name = "NAME=VALUE")]
        facets: Vec<String>,

        /// Column to sort by
        #[arg(long, value_name = "COLUMN")]
        sort: Option<String>,

        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Page to show
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// List facets and their options
    Facets,

    /// Read commands line by line and print a frame after each
    Session {
        /// Read commands from a file instead of stdin
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn styled(self, format: OutputFormat) -> bool {
        format == OutputFormat::Text
            && match self {
                ColorChoice::Auto => console::colors_enabled(),
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Builds the browser described by the global options.
pub fn open_browser(cli: &Cli) -> Result<Browser> {
    let source = data::load_source(cli.data.as_deref())?;
    let config = data::load_config(cli.config.as_deref(), cli.data.as_deref(), &source)?;
    Browser::new(Arc::new(source), config).context("config does not fit the dataset")
}

pub fn run(cli: Cli) -> Result<()> {
    let mut browser = open_browser(&cli)?;
    let renderer = Renderer::new(cli.format, cli.color.styled(cli.format));

    match cli.command {
        Commands::Show {
            search,
            facets,
            sort,
            desc,
            page,
        } => {
            apply_query(
                &mut browser,
                search.as_deref(),
                &facets,
                sort.as_deref(),
                desc,
                page,
            )?;
            println!("{}", renderer.frame(&browser)?);
        }
        Commands::Facets => println!("{}", renderer.facets(&browser)?),
        Commands::Session { script } => {
            let input: Box<dyn BufRead> = match script {
                Some(path) => Box::new(BufReader::new(
                    File::open(&path)
                        .with_context(|| format!("failed to open {}", path.display()))?,
                )),
                None => Box::new(io::stdin().lock()),
            };
            let stats = session::run(
                &mut browser,
                &renderer,
                input,
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            )?;
            tracing::info!(applied = stats.applied, failed = stats.failed, "session ended");
        }
    }
    Ok(())
}

/// Applies the `show` options in order: search, facets, sort, page.
pub fn apply_query(
    browser: &mut Browser,
    search: Option<&str>,
    facets: &[String],
    sort: Option<&str>,
    desc: bool,
    page: usize,
) -> Result<()> {
    if let Some(text) = search {
        browser.set_search_text(text);
    }

    let mut multi: BTreeMap<String, ValueSet> = BTreeMap::new();
    for spec in facets {
        let (name, value) = spec
            .split_once('=')
            .ok_or_else(|| anyhow!("--facet expects NAME=VALUE, got '{spec}'"))?;
        let kind = browser.config().find_facet(name)?.kind;
        match kind {
            FacetKind::Single => browser.set_single_facet(name, Some(value))?,
            FacetKind::Multi => {
                multi.entry(name.to_string()).or_default().insert(value);
            }
        }
    }
    for (name, values) in multi {
        browser.commit_multi_facet(&name, values)?;
    }

    if let Some(column) = sort {
        browser.toggle_sort(column)?;
        if desc {
            browser.toggle_sort(column)?;
        }
    }

    browser.set_page(page);
    if browser.state().page() != page {
        tracing::warn!(
            page,
            total_pages = browser.pagination_info().total_pages,
            "requested page out of range, showing page 1"
        );
    }
    Ok(())
}
