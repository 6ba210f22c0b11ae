//! Integration Tests for the Relay Session Flow
//!
//! Drives a client end to end against the in-process bridge: bootstrap,
//! line delivery, connectivity gating, input relay and resizing.

use sage_relay::models::EntryKind;
use sage_relay::transport::{MemoryBridge, PageOrigin, SessionEvent};
use sage_relay::ui::{BufferedLog, InputControl, LogContainer, SubmitStatus, TextInput};
use sage_relay::{Config, RelayClient, UiEvent};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

const INSTREAM: &str = "http://sage/event#instream";
const CONNECTED: &str = "http://sage/event#connected";

fn new_client(bridge: &MemoryBridge) -> RelayClient<BufferedLog, TextInput> {
    RelayClient::new(
        Config::default(),
        Arc::new(bridge.clone()),
        &PageOrigin::Network {
            hostname: "mud.example.org".to_string(),
        },
        BufferedLog::new(),
        TextInput::new(),
    )
    .expect("default config builds a client")
}

/// Bridge that answers the startup connectivity query with `upstream`
fn bridge_reporting(upstream: bool) -> MemoryBridge {
    let bridge = MemoryBridge::new();
    bridge.reply_on_call("http://sage/is_connected", CONNECTED, json!(upstream));
    bridge
}

#[tokio::test]
async fn test_bootstrap_enables_input_from_connectivity_reply() {
    let bridge = bridge_reporting(true);
    let mut client = new_client(&bridge);
    assert_eq!(client.endpoint().url(), "ws://mud.example.org:9000");

    let mut events = client.start(600.0).await.unwrap().expect("new session");

    // The reply to is_connected is the first thing delivered
    let event = events.recv().await.unwrap();
    assert_eq!(
        event,
        SessionEvent::Publish {
            topic: CONNECTED.to_string(),
            payload: json!(true)
        }
    );
    client.handle_event(event);
    assert!(client.input().is_enabled());
}

#[tokio::test]
async fn test_submit_look_sends_exactly_one_call() {
    let bridge = bridge_reporting(true);
    let mut client = new_client(&bridge);
    let mut events = client.start(600.0).await.unwrap().unwrap();
    let event = events.recv().await.unwrap();
    client.handle_event(event);

    client.input_mut().set_value("look");
    let outcome = client.submit().await;

    assert_eq!(outcome.status, SubmitStatus::Sent);
    assert!(outcome.default_prevented);

    let calls = bridge.calls_to("http://sage/input");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, vec![json!("look")]);

    // Text stays and is highlighted for the next command
    assert_eq!(client.input().value(), "look");
    assert!(client.input().is_all_selected());
}

#[tokio::test]
async fn test_submit_without_session_sends_nothing() {
    let bridge = MemoryBridge::new();
    bridge.refuse_connections("bridge offline");
    let mut client = new_client(&bridge);

    assert!(client.start(600.0).await.is_err());
    let outcome = client.submit().await;

    assert_eq!(outcome.status, SubmitStatus::Dropped);
    assert!(outcome.default_prevented);
    assert!(bridge.calls().is_empty());
}

#[tokio::test]
async fn test_submit_after_bridge_drop_is_dropped() {
    let bridge = bridge_reporting(true);
    let mut client = new_client(&bridge);
    let mut events = client.start(600.0).await.unwrap().unwrap();
    let event = events.recv().await.unwrap();
    client.handle_event(event);

    bridge.drop_sessions(1001, "bridge restarting");
    let event = events.recv().await.unwrap();
    assert!(!client.handle_event(event));
    assert!(!client.is_connected());
    assert!(!client.input().is_enabled());

    let before = bridge.calls().len();
    let outcome = client.submit().await;
    assert_eq!(outcome.status, SubmitStatus::Dropped);
    assert_eq!(bridge.calls().len(), before);
}

#[tokio::test]
async fn test_line_batches_render_in_order() {
    let bridge = bridge_reporting(false);
    let mut client = new_client(&bridge);
    let mut events = client.start(600.0).await.unwrap().unwrap();
    assert!(client.input().is_enabled());
    let event = events.recv().await.unwrap();
    client.handle_event(event);
    assert!(!client.input().is_enabled());

    bridge.publish(
        INSTREAM,
        json!({
            "lines": {"0": "A rat scurries past.", "1": "", "2": "\u{1b}[33mYou have 3 gold.\u{1b}[0m"},
            "prompt": "100h, 80m ex-"
        }),
    );
    bridge.publish(INSTREAM, json!({"lines": {}, "prompt": "100h, 80m ex-"}));

    for _ in 0..2 {
        let event = events.recv().await.unwrap();
        client.handle_event(event);
    }

    let kinds: Vec<EntryKind> = client.log().entries().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::Line,
            EntryKind::BlankLine,
            EntryKind::Line,
            EntryKind::Prompt,
            EntryKind::Prompt,
        ]
    );
    assert_eq!(client.log().entries()[0].markup, "A rat scurries past.");
    assert!(client.log().is_at_bottom());
}

#[tokio::test]
async fn test_resize_updates_log_height() {
    let bridge = MemoryBridge::new();
    let mut client = new_client(&bridge);

    client.start(500.0).await.unwrap();
    assert_eq!(client.log().height(), 430.0);

    client.resize(800.0);
    assert_eq!(client.log().height(), 730.0);
    assert_eq!(client.window_height(), 800.0);
}

#[tokio::test]
async fn test_run_loop_handles_ui_and_session_events() {
    let bridge = bridge_reporting(true);
    let mut client = new_client(&bridge);
    let events = client.start(500.0).await.unwrap().unwrap();

    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    ui_tx.send(UiEvent::Resize { height: 800.0 }).unwrap();
    ui_tx.send(UiEvent::Shutdown).unwrap();

    client.run(events, ui_rx).await;

    assert_eq!(client.log().height(), 730.0);
    assert!(!client.is_connected());
    assert_eq!(bridge.open_sessions(), 0);
}

#[tokio::test]
async fn test_run_loop_ends_when_bridge_closes() {
    let bridge = MemoryBridge::new();
    let mut client = new_client(&bridge);
    let events = client.start(500.0).await.unwrap().unwrap();

    bridge.publish(INSTREAM, json!({"lines": {"0": "Goodbye."}, "prompt": ""}));
    bridge.drop_sessions(1000, "shutdown");

    let (_ui_tx, ui_rx) = mpsc::unbounded_channel();
    client.run(events, ui_rx).await;

    assert_eq!(client.log().len(), 2);
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_run_loop_waits_while_nothing_happens() {
    let bridge = MemoryBridge::new();
    let mut client = new_client(&bridge);
    let events = client.start(500.0).await.unwrap().unwrap();
    let (ui_tx, ui_rx) = mpsc::unbounded_channel();

    {
        let mut run = tokio_test::task::spawn(client.run(events, ui_rx));
        tokio_test::assert_pending!(run.poll());

        // Closing the UI side alone does not end the session
        drop(ui_tx);
        tokio_test::assert_pending!(run.poll());

        bridge.drop_sessions(1000, "shutdown");
        assert!(run.is_woken());
        tokio_test::assert_ready!(run.poll());
    }

    assert!(!client.is_connected());
}
