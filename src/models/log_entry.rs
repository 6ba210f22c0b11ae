//! Log Entry Model
//!
//! A single element appended to the visual log. The markup is already
//! converted; surfaces only place it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an entry represents in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// A converted line of game output
    Line,
    /// Placeholder for an empty line
    BlankLine,
    /// The prompt closing a batch
    Prompt,
}

impl EntryKind {
    /// Class name a markup surface tags the element with
    pub fn css_class(self) -> &'static str {
        match self {
            EntryKind::Line => "line",
            EntryKind::BlankLine => "blank line",
            EntryKind::Prompt => "prompt",
        }
    }
}

/// One appended log element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: EntryKind,
    /// Converted content
    pub markup: String,
    /// When this entry was rendered
    pub rendered_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(kind: EntryKind, markup: String) -> Self {
        Self {
            kind,
            markup,
            rendered_at: Utc::now(),
        }
    }

    /// The entry wrapped in its element, e.g. `<div class="line">...</div>`
    pub fn to_html(&self) -> String {
        format!("<div class=\"{}\">{}</div>", self.kind.css_class(), self.markup)
    }
}
