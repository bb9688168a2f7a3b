//! Interactive intent sessions.
//!
//! A session reads one command per line, turns it into an [`Intent`], feeds it
//! to the browser and renders the new frame. Lines are split shell-style, so
//! values with spaces are quoted: `choose genre "Hip-Hop"`, `toggle artist
//! "Led Zeppelin"`. A line starting with `{` is read as a JSON intent.
//!
//! Failed commands are reported and the session carries on.

use std::io::{BufRead, Write};

use anyhow::Result;
use facetview_query::{Browser, Intent};
use thiserror::Error;

use crate::render::Renderer;

pub const HELP: &str = "\
commands:
  search [text...]            set the search text (no text clears it)
  set <facet> [value]         set or clear a single-select facet
  choose <facet> <value>      pick a single-select value, again to clear
  commit <facet> [values...]  replace a multi-select facet's selection
  picker <facet>              open a picker, or cancel it if open
  open|cancel|apply <facet>   open, discard or apply a picker
  toggle <facet> <value>      flip a value in an open picker
  remove <facet> <value>      drop a value from an open picker
  clear <facet>               empty an open picker
  find <facet> [text...]      narrow an open picker's options
  sort <column>               cycle a column's sort
  page <n> | next | prev      move between pages
  show | help | quit";

/// A parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Show,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not split line: {0}")]
    Split(String),

    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    Arity {
        command: String,
        expected: &'static str,
    },

    #[error("'{0}' is not a page number")]
    BadPage(String),

    #[error("invalid JSON intent: {0}")]
    Json(String),
}

/// Parses one line.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Command::Empty);
    }
    if line.starts_with('{') {
        return serde_json::from_str(line)
            .map(Command::Intent)
            .map_err(|e| ParseError::Json(e.to_string()));
    }

    let words = shell_words::split(line).map_err(|e| ParseError::Split(e.to_string()))?;
    let Some((command, args)) = words.split_first() else {
        return Ok(Command::Empty);
    };

    let arity = |expected: &'static str| ParseError::Arity {
        command: command.clone(),
        expected,
    };
    let facet = || args.first().cloned().ok_or_else(|| arity("a facet name"));
    let facet_value = || match args {
        [facet, value] => Ok((facet.clone(), value.clone())),
        _ => Err(arity("a facet name and a value")),
    };

    let intent = match command.as_str() {
        "show" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),

        "search" => Intent::Search {
            text: args.join(" "),
        },
        "set" => match args {
            [facet] => Intent::SetSingle {
                facet: facet.clone(),
                value: None,
            },
            [facet, value] => Intent::SetSingle {
                facet: facet.clone(),
                value: Some(value.clone()),
            },
            _ => return Err(arity("a facet name and an optional value")),
        },
        "choose" => {
            let (facet, value) = facet_value()?;
            Intent::ChooseSingle { facet, value }
        }
        "commit" => {
            let facet = facet()?;
            Intent::CommitMulti {
                facet,
                values: args[1..].iter().cloned().collect(),
            }
        }
        "picker" => Intent::TogglePicker { facet: facet()? },
        "open" => Intent::OpenPicker { facet: facet()? },
        "cancel" => Intent::CancelPicker { facet: facet()? },
        "apply" => Intent::ApplyPicker { facet: facet()? },
        "toggle" => {
            let (facet, value) = facet_value()?;
            Intent::ToggleDraft { facet, value }
        }
        "remove" => {
            let (facet, value) = facet_value()?;
            Intent::RemoveDraft { facet, value }
        }
        "clear" => Intent::ClearDraft { facet: facet()? },
        "find" => {
            let facet = facet()?;
            Intent::PickerSearch {
                facet,
                text: args[1..].join(" "),
            }
        }
        "sort" => match args {
            [column] => Intent::Sort {
                column: column.clone(),
            },
            _ => return Err(arity("a column")),
        },
        "page" => match args {
            [page] => Intent::Page {
                page: page
                    .parse()
                    .map_err(|_| ParseError::BadPage(page.clone()))?,
            },
            _ => return Err(arity("a page number")),
        },
        "next" => Intent::NextPage,
        "prev" | "previous" => Intent::PreviousPage,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Command::Intent(intent))
}

/// Counts from a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub applied: usize,
    pub failed: usize,
}

/// Runs a session until end of input or `quit`.
///
/// Frames go to `out`; command errors go to `err`.
pub fn run<R, W, E>(
    browser: &mut Browser,
    renderer: &Renderer,
    input: R,
    out: &mut W,
    err: &mut E,
) -> Result<SessionStats>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut stats = SessionStats::default();
    writeln!(out, "{}", renderer.frame(browser)?)?;

    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                stats.failed += 1;
                writeln!(err, "line {}: {e}", number + 1)?;
                continue;
            }
        };

        match command {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Show => writeln!(out, "{}", renderer.frame(browser)?)?,
            Command::Intent(intent) => {
                tracing::debug!(line = number + 1, ?intent, "dispatching");
                match browser.dispatch(intent) {
                    Ok(()) => {
                        stats.applied += 1;
                        writeln!(out, "{}", renderer.frame(browser)?)?;
                    }
                    Err(e) => {
                        stats.failed += 1;
                        tracing::warn!(line = number + 1, error = %e, "intent rejected");
                        writeln!(err, "line {}: {e}", number + 1)?;
                    }
                }
            }
        }
    }

    tracing::debug!(applied = stats.applied, failed = stats.failed, "session finished");
    out.flush()?;
    Ok(stats)
}
