//! In-process bridge
//!
//! A [`Transport`] that never leaves the process. It records every prefix,
//! subscription and call a client makes, lets the owner publish events and
//! drop sessions, and can be told to refuse connections. Hosts that embed
//! the relay next to the game loop use it directly; tests use it to drive
//! the client end to end.

use super::{Connection, Endpoint, PrefixMap, Session, SessionEvent, Transport};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use uuid::Uuid;

/// A call as the bridge received it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub session_id: String,
    /// Procedure URI after prefix expansion
    pub procedure: String,
    pub args: Vec<serde_json::Value>,
}

/// Event the bridge publishes whenever a procedure is called
#[derive(Debug, Clone)]
struct AutoReply {
    procedure: String,
    topic: String,
    payload: serde_json::Value,
}

#[derive(Debug)]
struct SessionSlot {
    id: String,
    tx: mpsc::UnboundedSender<SessionEvent>,
    subscriptions: HashSet<String>,
    open: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct BridgeState {
    refuse_reason: Option<String>,
    connect_attempts: usize,
    sessions: Vec<SessionSlot>,
    calls: Vec<RecordedCall>,
    auto_replies: Vec<AutoReply>,
}

/// Shared handle to an in-process bridge
#[derive(Debug, Clone, Default)]
pub struct MemoryBridge {
    state: Arc<Mutex<BridgeState>>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every following connect fail with `reason`
    pub fn refuse_connections(&self, reason: impl Into<String>) {
        self.lock().refuse_reason = Some(reason.into());
    }

    /// Undo [`MemoryBridge::refuse_connections`]
    pub fn accept_connections(&self) {
        self.lock().refuse_reason = None;
    }

    /// Publish `payload` on `topic` when `procedure` is called
    pub fn reply_on_call(
        &self,
        procedure: impl Into<String>,
        topic: impl Into<String>,
        payload: serde_json::Value,
    ) {
        self.lock().auto_replies.push(AutoReply {
            procedure: procedure.into(),
            topic: topic.into(),
            payload,
        });
    }

    /// Deliver an event to every open session subscribed to `topic`
    ///
    /// Returns the number of sessions it reached.
    pub fn publish(&self, topic: &str, payload: serde_json::Value) -> usize {
        let state = self.lock();
        Self::deliver(&state, topic, &payload)
    }

    fn deliver(state: &BridgeState, topic: &str, payload: &serde_json::Value) -> usize {
        let mut delivered = 0;
        for slot in &state.sessions {
            if !slot.open.load(Ordering::SeqCst) || !slot.subscriptions.contains(topic) {
                continue;
            }
            let event = SessionEvent::Publish {
                topic: topic.to_string(),
                payload: payload.clone(),
            };
            if slot.tx.send(event).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Tear down every open session, telling each client why
    pub fn drop_sessions(&self, code: u16, reason: &str) -> usize {
        let mut state = self.lock();
        let mut dropped = 0;
        for slot in state.sessions.iter_mut() {
            if slot.open.swap(false, Ordering::SeqCst) {
                let _ = slot.tx.send(SessionEvent::Closed {
                    code,
                    reason: reason.to_string(),
                });
                dropped += 1;
            }
        }
        state.sessions.retain(|slot| slot.open.load(Ordering::SeqCst));
        dropped
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls received for one procedure
    pub fn calls_to(&self, procedure: &str) -> Vec<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.procedure == procedure)
            .cloned()
            .collect()
    }

    /// Topics the open sessions are subscribed to
    pub fn subscriptions(&self) -> Vec<String> {
        let state = self.lock();
        let mut topics: Vec<String> = state
            .sessions
            .iter()
            .filter(|slot| slot.open.load(Ordering::SeqCst))
            .flat_map(|slot| slot.subscriptions.iter().cloned())
            .collect();
        topics.sort();
        topics
    }

    pub fn open_sessions(&self) -> usize {
        self.lock()
            .sessions
            .iter()
            .filter(|slot| slot.open.load(Ordering::SeqCst))
            .count()
    }

    pub fn connect_attempts(&self) -> usize {
        self.lock().connect_attempts
    }
}

#[async_trait]
impl Transport for MemoryBridge {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Connection> {
        let mut state = self.lock();
        state.connect_attempts += 1;

        if let Some(reason) = &state.refuse_reason {
            return Err(Error::ConnectFailed {
                endpoint: endpoint.to_string(),
                reason: reason.clone(),
            });
        }

        // Clients that dropped their connection without closing
        state.sessions.retain(|slot| {
            if slot.tx.is_closed() {
                slot.open.store(false, Ordering::SeqCst);
                debug!("Memory bridge pruned abandoned session {}", slot.id);
                false
            } else {
                true
            }
        });

        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4().to_string();
        let open = Arc::new(AtomicBool::new(true));
        state.sessions.push(SessionSlot {
            id: id.clone(),
            tx,
            subscriptions: HashSet::new(),
            open: Arc::clone(&open),
        });
        debug!("Memory bridge accepted session {} on {}", id, endpoint);

        let session = MemorySession {
            id,
            bridge: self.clone(),
            prefixes: Mutex::new(PrefixMap::new()),
            open,
        };

        Ok(Connection {
            session: Arc::new(session),
            events: rx,
        })
    }
}

/// Client side of an in-process session
#[derive(Debug)]
struct MemorySession {
    id: String,
    bridge: MemoryBridge,
    prefixes: Mutex<PrefixMap>,
    open: Arc<AtomicBool>,
}

impl MemorySession {
    fn resolve(&self, uri: &str) -> Result<String> {
        self.prefixes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .resolve(uri)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::SessionClosed)
        }
    }
}

#[async_trait]
impl Session for MemorySession {
    fn id(&self) -> &str {
        &self.id
    }

    fn prefix(&self, alias: &str, uri: &str) -> Result<()> {
        self.ensure_open()?;
        self.prefixes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(alias, uri);
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<()> {
        self.ensure_open()?;
        let uri = self.resolve(topic).map_err(|e| Error::SubscribeFailed {
            topic: topic.to_string(),
            reason: e.to_string(),
        })?;

        let mut state = self.bridge.lock();
        let slot = state
            .sessions
            .iter_mut()
            .find(|slot| slot.id == self.id)
            .ok_or(Error::SessionClosed)?;
        slot.subscriptions.insert(uri);
        Ok(())
    }

    async fn call(&self, procedure: &str, args: Vec<serde_json::Value>) -> Result<()> {
        self.ensure_open()?;
        let uri = self.resolve(procedure).map_err(|e| Error::CallFailed {
            procedure: procedure.to_string(),
            reason: e.to_string(),
        })?;

        let mut state = self.bridge.lock();
        state.calls.push(RecordedCall {
            session_id: self.id.clone(),
            procedure: uri.clone(),
            args,
        });

        let replies: Vec<AutoReply> = state
            .auto_replies
            .iter()
            .filter(|reply| reply.procedure == uri)
            .cloned()
            .collect();
        for reply in replies {
            MemoryBridge::deliver(&state, &reply.topic, &reply.payload);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            let mut state = self.bridge.lock();
            state.sessions.retain(|slot| slot.id != self.id);
            debug!("Memory session {} closed by client", self.id);
        }
    }
}
