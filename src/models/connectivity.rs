//! Upstream connectivity as reported by the bridge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Whether the bridge's game connection is up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectivityState {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectivityState {
    /// Decode the boolean payload of the connectivity topic
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        value
            .as_bool()
            .map(Self::from)
            .ok_or_else(|| Error::RenderInputInvalid {
                reason: format!("expected a boolean connectivity flag, got {}", value),
            })
    }

    pub fn is_connected(self) -> bool {
        self == ConnectivityState::Connected
    }
}

impl From<bool> for ConnectivityState {
    fn from(connected: bool) -> Self {
        if connected {
            ConnectivityState::Connected
        } else {
            ConnectivityState::Disconnected
        }
    }
}
