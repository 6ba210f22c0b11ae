//! sage-relay - live text-stream relay client for the Sage game bridge
//!
//! Sage sits between a MUD and its players. This crate is the player-side
//! half: it opens a publish/subscribe session with the bridge, appends the
//! game's output to a log, and sends what the player types back upstream.
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`app`] - [`RelayClient`]: session bootstrap, event dispatch, run loop
//! - [`transport`] - session traits, endpoint selection, in-process bridge
//! - [`context`] - the connection context handlers borrow
//! - [`models`] - line batches, connectivity, log entries
//! - [`mod@error`] - Error types and Result aliases
//!
//! ### UI Components
//!
//! - [`ui`] - line renderer, input relay, connectivity gate, viewport sizing
//! - [`ansi`] - terminal color codes to styled markup
//!
//! ### Utilities
//!
//! - [`config`] - TOML/JSON configuration with defaults
//! - [`logging`] - `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use sage_relay::transport::{MemoryBridge, PageOrigin};
//! use sage_relay::ui::{BufferedLog, TextInput};
//! use sage_relay::RelayClient;
//! use std::sync::Arc;
//!
//! # async fn demo() -> sage_relay::Result<()> {
//! let config = sage_relay::init()?;
//! let bridge = MemoryBridge::new();
//! let mut client = RelayClient::new(
//!     config,
//!     Arc::new(bridge),
//!     &PageOrigin::File,
//!     BufferedLog::new(),
//!     TextInput::new(),
//! )?;
//!
//! if let Some(events) = client.start(600.0).await? {
//!     let (_ui_tx, ui_rx) = tokio::sync::mpsc::unbounded_channel();
//!     client.run(events, ui_rx).await;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Threading
//!
//! One task drives a client. The only suspension points are the connect
//! and the outbound calls; session events arrive on a channel that exists
//! only once the connect has completed.

#[macro_use]
extern crate tracing;

pub mod ansi;
pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod transport;
pub mod ui;

// Re-exports for core functionality
pub use app::{RelayClient, UiEvent};
pub use config::loader::ConfigLoader;
pub use config::Config;
pub use context::SessionContext;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use models::{ConnectivityState, LineBatch};

/// The current version of sage-relay from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The crate name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Load configuration, falling back to defaults
///
/// A configuration file that exists but fails to parse or validate is
/// reported and replaced by the defaults rather than failing startup.
pub fn init() -> Result<Config> {
    info!("Initializing {} v{}", NAME, VERSION);

    let config = match ConfigLoader::load() {
        Ok(config) => {
            debug!("Configuration loaded");
            config
        }
        Err(e) => {
            warn!("Failed to load configuration: {}. Using defaults", e);
            Config::default()
        }
    };

    Ok(config)
}
