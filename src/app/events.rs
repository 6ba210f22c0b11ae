//! Session event dispatch
//!
//! Routes topic deliveries to the renderer and the connectivity gate, and
//! runs the client's single event loop over session events and UI events.

use super::RelayClient;
use crate::models::{ConnectivityState, LineBatch};
use crate::transport::SessionEvent;
use crate::ui::{InputControl, LogContainer, LogSurface};
use tokio::sync::mpsc;

/// Input from the hosting UI
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The input form was submitted
    Submit,
    /// The window's viewable height changed
    Resize { height: f32 },
    /// The page is going away
    Shutdown,
}

impl<L, I> RelayClient<L, I>
where
    L: LogSurface + LogContainer,
    I: InputControl,
{
    /// Apply one session event; returns `false` once the session is gone
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Publish { topic, payload } => {
                if topic == self.instream_topic {
                    match LineBatch::from_value(payload) {
                        Ok(batch) => {
                            let appended = self.renderer.render(&batch, &mut self.log);
                            trace!("Rendered {} log entries", appended);
                        }
                        Err(e) => warn!("Ignoring line batch: {}", e),
                    }
                } else if topic == self.connected_topic {
                    match ConnectivityState::from_value(&payload) {
                        Ok(state) => {
                            self.gate.apply(state, &mut self.input);
                        }
                        Err(e) => warn!("Ignoring connectivity update: {}", e),
                    }
                } else {
                    debug!("Ignoring event on unexpected topic {}", topic);
                }
                true
            }
            SessionEvent::Closed { code, reason } => {
                self.teardown(code, &reason);
                false
            }
        }
    }

    /// Pump session and UI events until the session ends or the UI shuts down
    pub async fn run(
        &mut self,
        mut events: mpsc::UnboundedReceiver<SessionEvent>,
        mut ui_events: mpsc::UnboundedReceiver<UiEvent>,
    ) {
        let mut ui_open = true;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if !self.handle_event(event) {
                            break;
                        }
                    }
                    None => {
                        self.teardown(1006, "event stream ended");
                        break;
                    }
                },
                ui_event = ui_events.recv(), if ui_open => match ui_event {
                    Some(UiEvent::Submit) => {
                        self.submit().await;
                    }
                    Some(UiEvent::Resize { height }) => {
                        self.resize(height);
                    }
                    Some(UiEvent::Shutdown) => {
                        self.shutdown().await;
                        break;
                    }
                    None => ui_open = false,
                },
            }
        }

        debug!("Relay event loop finished");
    }
}
