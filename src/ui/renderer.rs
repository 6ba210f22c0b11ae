//! Line renderer
//!
//! Appends one [`LineBatch`] to a log surface: each line in order, a blank
//! marker in place of empty lines, then the prompt, then a scroll to the
//! bottom. Nothing already on the surface is touched.

use super::LogSurface;
use crate::ansi::{AnsiHtmlConverter, MarkupConverter};
use crate::config::UiConfig;
use crate::models::{EntryKind, LineBatch, LogEntry};

pub struct LineRenderer {
    converter: Box<dyn MarkupConverter>,
    blank_marker: String,
}

impl LineRenderer {
    /// Renderer using the stock ANSI converter
    pub fn new(config: &UiConfig) -> Self {
        Self::with_converter(config, Box::new(AnsiHtmlConverter::new()))
    }

    /// Renderer using a caller-supplied converter
    pub fn with_converter(config: &UiConfig, converter: Box<dyn MarkupConverter>) -> Self {
        Self {
            converter,
            blank_marker: config.blank_marker.clone(),
        }
    }

    /// Append `batch` to `log`; returns the number of entries appended
    pub fn render(&mut self, batch: &LineBatch, log: &mut dyn LogSurface) -> usize {
        let mut appended = 0;

        for (key, text) in batch.lines() {
            let entry = if text.is_empty() {
                LogEntry::new(EntryKind::BlankLine, self.blank_marker.clone())
            } else {
                let markup = self.converter.convert(text);
                if markup.is_empty() {
                    // Control codes only; still occupies a row
                    trace!("Line {} converted to nothing, rendering blank", key);
                    LogEntry::new(EntryKind::BlankLine, self.blank_marker.clone())
                } else {
                    LogEntry::new(EntryKind::Line, markup)
                }
            };
            log.append(entry);
            appended += 1;
        }

        let prompt = self.converter.convert(batch.prompt());
        log.append(LogEntry::new(EntryKind::Prompt, prompt));
        appended += 1;

        log.scroll_to_bottom();
        appended
    }
}
