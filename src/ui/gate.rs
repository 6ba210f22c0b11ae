//! Connectivity gate
//!
//! Closes the input while the bridge reports the game link is down and
//! reopens it when the link returns.

use super::InputControl;
use crate::models::ConnectivityState;

#[derive(Debug, Clone, Default)]
pub struct ConnectivityGate {
    current: ConnectivityState,
}

impl ConnectivityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last state applied
    pub fn current(&self) -> ConnectivityState {
        self.current
    }

    /// Enable or disable `input`; returns whether the control changed
    pub fn apply(&mut self, state: ConnectivityState, input: &mut dyn InputControl) -> bool {
        self.current = state;
        let enabled = state.is_connected();
        if input.is_enabled() == enabled {
            return false;
        }

        input.set_enabled(enabled);
        debug!("Input {}", if enabled { "enabled" } else { "disabled" });
        true
    }
}
