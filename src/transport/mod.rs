//! Transport Session Abstraction
//!
//! The relay never speaks the publish/subscribe wire protocol itself. A
//! [`Transport`] establishes a [`Session`], and the completed connect hands
//! back the channel the session delivers [`SessionEvent`]s on. Since the
//! channel only exists once the connect has finished, establishment always
//! precedes the first topic delivery.
//!
//! - [`endpoint`] - where to connect, derived from the page origin
//! - [`prefix`] - compact URI (`event:instream`) expansion
//! - [`memory`] - in-process bridge for tests and embedding

pub mod endpoint;
pub mod memory;
pub mod prefix;

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

pub use endpoint::{Endpoint, PageOrigin};
pub use memory::{MemoryBridge, RecordedCall};
pub use prefix::PrefixMap;

/// Something delivered by a live session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// An event published on a subscribed topic (full URI)
    Publish {
        topic: String,
        payload: serde_json::Value,
    },
    /// The session is gone
    Closed { code: u16, reason: String },
}

/// An established session plus its event stream
pub struct Connection {
    pub session: Arc<dyn Session>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session", &self.session.id())
            .finish_non_exhaustive()
    }
}

/// Establishes sessions with the bridge
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a session with the bridge at `endpoint`
    ///
    /// # Errors
    /// Returns `ConnectFailed` when no session could be established
    async fn connect(&self, endpoint: &Endpoint) -> Result<Connection>;
}

/// Operations on a live session
///
/// Topics and procedures may be given as full URIs or as compact URIs using
/// an alias registered through [`Session::prefix`].
#[async_trait]
pub trait Session: Send + Sync {
    /// Identifier assigned when the session was established
    fn id(&self) -> &str;

    /// Register `alias` as shorthand for `uri`
    fn prefix(&self, alias: &str, uri: &str) -> Result<()>;

    /// Start receiving events published on `topic`
    async fn subscribe(&self, topic: &str) -> Result<()>;

    /// Invoke a remote procedure without waiting for its result
    async fn call(&self, procedure: &str, args: Vec<serde_json::Value>) -> Result<()>;

    /// Whether the session can still be used
    fn is_open(&self) -> bool;

    /// Tear the session down; further calls fail with `SessionClosed`
    async fn close(&self);
}
