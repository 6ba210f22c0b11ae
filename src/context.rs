//! Connection context
//!
//! Holds the one live session, if any. The client controller owns the
//! context and is the only thing that establishes or clears it; handlers
//! borrow it and treat an empty context as "nothing to talk to".

use crate::error::{Error, Result};
use crate::transport::Session;
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct SessionContext {
    session: Option<Arc<dyn Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live session, if one is established and still open
    pub fn session(&self) -> Option<&Arc<dyn Session>> {
        self.session.as_ref().filter(|s| s.is_open())
    }

    /// The live session, or `NotConnected`
    pub fn require(&self) -> Result<&Arc<dyn Session>> {
        self.session().ok_or(Error::NotConnected)
    }

    pub fn is_established(&self) -> bool {
        self.session().is_some()
    }

    /// Issue a fire-and-forget call on the live session
    pub async fn call(&self, procedure: &str, args: Vec<serde_json::Value>) -> Result<()> {
        self.require()?.call(procedure, args).await
    }

    /// Store a freshly established session, replacing any previous one
    pub(crate) fn establish(&mut self, session: Arc<dyn Session>) {
        self.session = Some(session);
    }

    /// Forget the session; returns it so the caller can close it
    pub(crate) fn clear(&mut self) -> Option<Arc<dyn Session>> {
        self.session.take()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("session", &self.session.as_ref().map(|s| s.id().to_string()))
            .finish()
    }
}
