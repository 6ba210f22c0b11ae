//! UI components and rendering
//!
//! The relay never touches a concrete widget toolkit. Handlers work against
//! three small surfaces: the log the lines are appended to, the container
//! whose height follows the window, and the single-line input control.
//! [`BufferedLog`] and [`TextInput`] are in-memory implementations that
//! hosts can render from and tests can inspect.

pub mod gate;
pub mod input;
pub mod log;
pub mod renderer;
pub mod viewport;

// Re-exports for convenience
pub use gate::ConnectivityGate;
pub use input::{InputRelay, SubmitOutcome, SubmitStatus, TextInput};
pub use log::BufferedLog;
pub use renderer::LineRenderer;
pub use viewport::ViewportSizer;

use crate::models::LogEntry;

/// Append-only visual log
pub trait LogSurface {
    /// Add an entry after everything already shown
    fn append(&mut self, entry: LogEntry);

    /// Scroll so the most recent entry is visible
    fn scroll_to_bottom(&mut self);
}

/// Element whose height is driven by the window
pub trait LogContainer {
    fn set_height(&mut self, height: f32);

    fn height(&self) -> f32;
}

/// Single-line text input
pub trait InputControl {
    /// Current text
    fn value(&self) -> String;

    /// Highlight the whole text so the next keystroke replaces it
    fn select_all(&mut self);

    /// Give the control keyboard focus
    fn focus(&mut self);

    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;
}
