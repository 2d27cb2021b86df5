//! Terminal input parsing
//!
//! Each input line becomes a [`Command`], which is then resolved against the
//! latest snapshot into the session events it stands for.

use crate::session::{AppId, Event, SessionState};
use thiserror::Error;

/// What the user asked for on one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Select(Selection),
    /// Request more evidence for a transcript entry (1-based), or the latest
    /// entry that offers it
    More(Option<usize>),
    Say(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 1-based position in the displayed results
    Position(usize),
    Id(AppId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: /{0}")]
    Unknown(String),
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("Not a number: {0}")]
    InvalidNumber(String),
    #[error("No result numbered {0}")]
    NoSuchResult(usize),
    #[error("No transcript entry numbered {0}")]
    NoSuchEntry(usize),
    #[error("No answer to request more reviews for")]
    NothingToExpand,
}

/// Parse one line; blank lines yield `None`.
///
/// Messages keep their surrounding whitespace.
///
/// # Errors
///
/// Unknown commands and malformed arguments.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Some(Command::Say(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name {
        // An empty query is still submitted
        "search" | "s" => Command::Search(arg.to_string()),
        "select" | "open" => Command::Select(parse_selection(arg)?),
        "more" | "m" => {
            if arg.is_empty() {
                Command::More(None)
            } else {
                Command::More(Some(parse_number(arg)?))
            }
        }
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_selection(arg: &str) -> Result<Selection, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument("select"));
    }
    match arg.strip_prefix('#') {
        Some(id) => id
            .parse()
            .map(Selection::Id)
            .map_err(|_| CommandError::InvalidNumber(arg.to_string())),
        None => parse_number(arg).map(Selection::Position),
    }
}

fn parse_number(arg: &str) -> Result<usize, CommandError> {
    arg.parse()
        .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
}

impl Command {
    /// Events this command stands for, given what the user currently sees
    ///
    /// # Errors
    ///
    /// A position or entry that does not exist in `state`.
    pub fn into_events(self, state: &SessionState) -> Result<Vec<Event>, CommandError> {
        let events = match self {
            Command::Search(text) => vec![Event::QueryEdited { text }, Event::SearchSubmitted],
            Command::Select(Selection::Id(app_id)) => vec![Event::ItemClicked { app_id }],
            Command::Select(Selection::Position(n)) => {
                let item = n
                    .checked_sub(1)
                    .and_then(|i| state.results().get(i))
                    .ok_or(CommandError::NoSuchResult(n))?;
                vec![Event::ItemClicked { app_id: item.id }]
            }
            Command::More(Some(n)) => {
                let entry = n.checked_sub(1).ok_or(CommandError::NoSuchEntry(n))?;
                vec![Event::EvidenceRequested { entry }]
            }
            Command::More(None) => {
                let entry = state
                    .log()
                    .latest_evidence_target()
                    .ok_or(CommandError::NothingToExpand)?;
                vec![Event::EvidenceRequested { entry }]
            }
            Command::Say(text) => vec![Event::DraftEdited { text }, Event::MessageSubmitted],
            Command::Quit => Vec::new(),
        };
        Ok(events)
    }
}
