//! Plain-text rendering of a session snapshot

use crate::session::{MessageEntry, Sender, SessionState};
use std::fmt::Write;

const EVIDENCE_HEADING: &str = "Most Relevant Review:";

/// Render the whole screen for `state`
#[must_use]
pub fn render(state: &SessionState) -> String {
    let mut out = String::new();

    if let Some(error) = state.error() {
        let _ = writeln!(out, "! {error}");
        out.push('\n');
    }

    render_results(state, &mut out);
    render_selected(state, &mut out);
    render_conversation(state, &mut out);

    if !state.draft().is_empty() {
        let _ = writeln!(out, "> {}", state.draft());
    }
    out
}

fn render_results(state: &SessionState, out: &mut String) {
    if state.results().is_empty() {
        return;
    }
    let _ = writeln!(out, "== Results for \"{}\" ==", state.search_query());
    for (n, item) in state.results().iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {} (#{})", n + 1, item.title, item.id);
    }
    out.push('\n');
}

fn render_selected(state: &SessionState, out: &mut String) {
    let Some(detail) = state.selected() else {
        return;
    };
    let _ = writeln!(out, "== {} ({}) ==", detail.name, detail.price);
    if !detail.genres.is_empty() {
        let _ = writeln!(out, "Genres: {}", detail.genres.join(", "));
    }
    if !detail.developers.is_empty() {
        let _ = writeln!(out, "Developers: {}", detail.developers.join(", "));
    }
    out.push('\n');
}

fn render_conversation(state: &SessionState, out: &mut String) {
    if state.log().is_empty() {
        return;
    }
    out.push_str("== Conversation ==\n");
    for (n, entry) in state.log().entries().iter().enumerate() {
        render_entry(n + 1, entry, out);
    }
    out.push('\n');
}

fn render_entry(number: usize, entry: &MessageEntry, out: &mut String) {
    let who = match entry.sender() {
        Sender::User => "you",
        Sender::System => "assistant",
    };
    let mut lines = entry.text().lines();
    let first = lines.next().unwrap_or("");
    let _ = write!(out, "[{number}] {who}: {first}");
    if entry.accepts_more_evidence() {
        let _ = write!(out, "  (/more {number} for additional reviews)");
    }
    out.push('\n');
    for line in lines {
        let _ = writeln!(out, "    {line}");
    }

    if let Some(evidence) = entry.evidence() {
        let _ = writeln!(out, "    {EVIDENCE_HEADING}");
        for line in evidence.lines() {
            let _ = writeln!(out, "    | {line}");
        }
    }
}
