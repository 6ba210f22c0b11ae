//! Configuration management for sage-relay
//!
//! Holds the endpoint, topic and procedure names, and UI constants used by
//! the relay client. Every section defaults to the values the Sage bridge
//! ships with, so an empty or partial file is valid.

pub mod loader;

use serde::{Deserialize, Serialize};

/// Main configuration structure for sage-relay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transport endpoint configuration
    pub transport: TransportConfig,

    /// Topic namespace and topic names
    pub topics: TopicConfig,

    /// Remote procedure names
    pub procedures: ProcedureConfig,

    /// UI configuration
    pub ui: UiConfig,
}

/// Where the bridge listens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// URL scheme for the session endpoint
    pub scheme: String,

    /// Port the bridge listens on
    pub port: u16,

    /// Host used when the client is not served from a network origin
    pub local_host: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            scheme: "ws".to_string(),
            port: 9000,
            local_host: "localhost".to_string(),
        }
    }
}

/// Topic namespace and the two consumed topics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Short alias registered for the event namespace
    pub prefix_alias: String,

    /// URI the alias expands to
    pub prefix_uri: String,

    /// Topic carrying line batches
    pub instream: String,

    /// Topic carrying the upstream connectivity flag
    pub connected: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            prefix_alias: "event".to_string(),
            prefix_uri: "http://sage/event#".to_string(),
            instream: "event:instream".to_string(),
            connected: "event:connected".to_string(),
        }
    }
}

/// Remote procedures the client calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcedureConfig {
    /// Queried once after the session is established
    pub is_connected: String,

    /// Receives the user's submitted text
    pub input: String,
}

impl Default for ProcedureConfig {
    fn default() -> Self {
        Self {
            is_connected: "http://sage/is_connected".to_string(),
            input: "http://sage/input".to_string(),
        }
    }
}

/// UI-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Height reserved below the log for the input form
    pub footer_height: f32,

    /// Clamp the log height at zero when the window is shorter than the footer
    pub clamp_negative_height: bool,

    /// Markup appended in place of an empty line
    pub blank_marker: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            footer_height: 70.0,
            clamp_negative_height: true,
            blank_marker: "&nbsp;".to_string(),
        }
    }
}
