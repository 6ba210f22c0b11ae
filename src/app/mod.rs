//! Relay client
//!
//! [`RelayClient`] is the session bootstrap: it picks the endpoint, opens
//! the session, wires the topics, and owns the [`SessionContext`] every
//! handler borrows. It also owns the log and input surfaces so a single
//! task can drive everything.
//!
//! ## Lifecycle
//!
//! ```text
//!  start() ──connect──▶ established ──prefix/subscribe/is_connected──▶ events
//!     │                      │
//!     └── ConnectFailed      └── Closed / stream end ──▶ teardown()
//! ```
//!
//! - `mod.rs` - client struct, bootstrap and teardown
//! - `events.rs` - session event dispatch and the run loop

mod events;

pub use events::UiEvent;

use crate::ansi::MarkupConverter;
use crate::config::Config;
use crate::context::SessionContext;
use crate::error::Result;
use crate::models::ConnectivityState;
use crate::transport::{Endpoint, PageOrigin, PrefixMap, SessionEvent, Transport};
use crate::ui::{
    ConnectivityGate, InputControl, InputRelay, LineRenderer, LogContainer, LogSurface,
    SubmitOutcome, ViewportSizer,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Client for one Sage bridge
pub struct RelayClient<L, I> {
    config: Config,
    transport: Arc<dyn Transport>,
    endpoint: Endpoint,
    ctx: SessionContext,
    instream_topic: String,
    connected_topic: String,
    renderer: LineRenderer,
    relay: InputRelay,
    gate: ConnectivityGate,
    sizer: ViewportSizer,
    log: L,
    input: I,
    window_height: f32,
}

impl<L, I> RelayClient<L, I>
where
    L: LogSurface + LogContainer,
    I: InputControl,
{
    /// Build a client for a page loaded from `origin`
    ///
    /// # Errors
    /// Returns `UnknownPrefix` when a configured topic uses an alias other
    /// than the configured one.
    pub fn new(
        config: Config,
        transport: Arc<dyn Transport>,
        origin: &PageOrigin,
        log: L,
        input: I,
    ) -> Result<Self> {
        let endpoint = Endpoint::for_origin(origin, &config.transport);
        Self::with_endpoint(config, transport, endpoint, log, input)
    }

    /// Build a client for an explicit endpoint
    pub fn with_endpoint(
        config: Config,
        transport: Arc<dyn Transport>,
        endpoint: Endpoint,
        log: L,
        input: I,
    ) -> Result<Self> {
        let mut prefixes = PrefixMap::new();
        prefixes.insert(&config.topics.prefix_alias, &config.topics.prefix_uri);
        let instream_topic = prefixes.resolve(&config.topics.instream)?;
        let connected_topic = prefixes.resolve(&config.topics.connected)?;

        Ok(Self {
            renderer: LineRenderer::new(&config.ui),
            relay: InputRelay::new(&config.procedures),
            gate: ConnectivityGate::new(),
            sizer: ViewportSizer::new(&config.ui),
            config,
            transport,
            endpoint,
            ctx: SessionContext::new(),
            instream_topic,
            connected_topic,
            log,
            input,
            window_height: 0.0,
        })
    }

    /// Swap the converter used for line and prompt markup
    pub fn with_converter(mut self, converter: Box<dyn MarkupConverter>) -> Self {
        self.renderer = LineRenderer::with_converter(&self.config.ui, converter);
        self
    }

    /// Bring the client up in a window of `window_height`
    ///
    /// Sizes the log, focuses the input, then connects. Once the session is
    /// live the input is enabled; a later `false` on the connectivity topic
    /// disables it again. On success the session's event channel is returned for [`RelayClient::run`] or
    /// [`RelayClient::handle_event`]. Returns `Ok(None)` if a session is
    /// already live.
    ///
    /// # Errors
    /// Returns `ConnectFailed` when the bridge cannot be reached; the client
    /// is left disconnected with input disabled.
    pub async fn start(
        &mut self,
        window_height: f32,
    ) -> Result<Option<mpsc::UnboundedReceiver<SessionEvent>>> {
        self.resize(window_height);
        self.input.focus();
        self.input.select_all();

        if self.ctx.is_established() {
            warn!("Already connected to Sage, not opening a second session");
            return Ok(None);
        }

        info!("Connecting to Sage at {}", self.endpoint);
        let connection = match self.transport.connect(&self.endpoint).await {
            Ok(connection) => connection,
            Err(e) => {
                error!("Could not connect to Sage: {}", e);
                self.ctx.clear();
                self.gate
                    .apply(ConnectivityState::Disconnected, &mut self.input);
                return Err(e);
            }
        };

        let session = connection.session;
        self.ctx.establish(Arc::clone(&session));
        info!("Connected to Sage (session {})", session.id());

        // Open for typing until the bridge reports the game link is down
        self.input.set_enabled(true);

        let topics = &self.config.topics;
        if let Err(e) = session.prefix(&topics.prefix_alias, &topics.prefix_uri) {
            warn!("Failed to register prefix '{}': {}", topics.prefix_alias, e);
        }
        for topic in [&topics.instream, &topics.connected] {
            if let Err(e) = session.subscribe(topic).await {
                warn!("Failed to subscribe to {}: {}", topic, e);
            }
        }
        if let Err(e) = session
            .call(&self.config.procedures.is_connected, Vec::new())
            .await
        {
            warn!("Failed to query upstream connectivity: {}", e);
        }

        Ok(Some(connection.events))
    }

    /// Forget the session and fall back to the disconnected posture
    pub fn teardown(&mut self, code: u16, reason: &str) {
        if self.ctx.clear().is_some() {
            info!("Disconnected from Sage ({}: {})", code, reason);
        }
        self.gate
            .apply(ConnectivityState::Disconnected, &mut self.input);
    }

    /// Close the session from this side
    pub async fn shutdown(&mut self) {
        if let Some(session) = self.ctx.clear() {
            session.close().await;
            info!("Closed session {}", session.id());
        }
        self.gate
            .apply(ConnectivityState::Disconnected, &mut self.input);
    }

    /// The input form was submitted
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.relay.submit(&self.ctx, &mut self.input).await
    }

    /// The window's viewable height changed
    pub fn resize(&mut self, window_height: f32) -> f32 {
        self.window_height = window_height;
        self.sizer.apply(window_height, &mut self.log)
    }

    pub fn is_connected(&self) -> bool {
        self.ctx.is_established()
    }

    /// Upstream game connectivity as last reported by the bridge
    pub fn upstream(&self) -> ConnectivityState {
        self.gate.current()
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn window_height(&self) -> f32 {
        self.window_height
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }
}
