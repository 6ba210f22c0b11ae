//! Input relay
//!
//! Forwards whatever is in the input control to the bridge when the form
//! is submitted. The text is left in place and highlighted so the player
//! can repeat it with Enter or overwrite it by typing.

use super::InputControl;
use crate::config::ProcedureConfig;
use crate::context::SessionContext;
use std::ops::Range;

/// In-memory single-line input
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    /// Selected byte range, if any
    selection: Option<Range<usize>>,
    enabled: bool,
    focused: bool,
}

impl TextInput {
    /// New input; disabled until a session opens it
    pub fn new() -> Self {
        Self {
            value: String::new(),
            selection: None,
            enabled: false,
            focused: false,
        }
    }

    /// Replace the text, as typing would; ignored while disabled
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        if !self.enabled {
            return false;
        }
        self.value = value.into();
        self.selection = None;
        true
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    /// Whether the entire text is highlighted
    pub fn is_all_selected(&self) -> bool {
        self.selection == Some(0..self.value.len())
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputControl for TextInput {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn select_all(&mut self) {
        self.selection = Some(0..self.value.len());
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// What happened to a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// One call carrying the text was issued
    Sent,
    /// No live session, or the control was disabled; nothing was sent
    Dropped,
    /// The session refused the call
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub status: SubmitStatus,
    /// The form's own submission/navigation must not run
    pub default_prevented: bool,
}

/// Relays form submissions to the input procedure
#[derive(Debug, Clone)]
pub struct InputRelay {
    procedure: String,
}

impl InputRelay {
    pub fn new(procedures: &ProcedureConfig) -> Self {
        Self {
            procedure: procedures.input.clone(),
        }
    }

    /// Handle one submission of the input form
    ///
    /// A disabled control cannot be submitted, so nothing is sent for it.
    pub async fn submit(
        &self,
        ctx: &SessionContext,
        input: &mut dyn InputControl,
    ) -> SubmitOutcome {
        if !input.is_enabled() {
            debug!("Input disabled, ignoring submit");
            return SubmitOutcome {
                status: SubmitStatus::Dropped,
                default_prevented: true,
            };
        }

        let value = input.value();

        let status = match ctx
            .call(&self.procedure, vec![serde_json::Value::String(value)])
            .await
        {
            Ok(()) => SubmitStatus::Sent,
            Err(e) if e.is_disconnected() => {
                warn!("Dropping input, not connected to Sage");
                SubmitStatus::Dropped
            }
            Err(e) => {
                error!("Failed to relay input: {}", e);
                SubmitStatus::Failed
            }
        };

        input.select_all();

        SubmitOutcome {
            status,
            default_prevented: true,
        }
    }
}
