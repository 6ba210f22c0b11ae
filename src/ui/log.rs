//! Buffered log surface
//!
//! Keeps every appended entry in order together with the scroll offset and
//! container height. A host redraws from [`BufferedLog::entries`]; the
//! offset is expressed in entries, where `entries().len()` is the bottom.

use super::{LogContainer, LogSurface};
use crate::models::{EntryKind, LogEntry};

#[derive(Debug, Clone, Default)]
pub struct BufferedLog {
    entries: Vec<LogEntry>,
    scroll_offset: usize,
    height: f32,
}

impl BufferedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Whether the view shows the latest entry
    pub fn is_at_bottom(&self) -> bool {
        self.scroll_offset == self.entries.len()
    }

    /// Entries of a given kind, in order
    pub fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// The whole log as HTML elements
    pub fn to_html(&self) -> String {
        self.entries.iter().map(LogEntry::to_html).collect()
    }
}

impl LogSurface for BufferedLog {
    fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.entries.len();
    }
}

impl LogContainer for BufferedLog {
    fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    fn height(&self) -> f32 {
        self.height
    }
}
