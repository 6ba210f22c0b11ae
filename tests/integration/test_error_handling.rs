//! Integration Tests for Error Handling
//!
//! None of these failures may take the client down; each leaves it in a
//! usable, well-defined state.

use sage_relay::transport::{Endpoint, MemoryBridge, PageOrigin, SessionEvent};
use sage_relay::ui::{BufferedLog, InputControl, SubmitStatus, TextInput};
use sage_relay::{Config, Error, RelayClient};
use serde_json::json;
use std::sync::Arc;

fn client_with(config: Config, bridge: &MemoryBridge) -> RelayClient<BufferedLog, TextInput> {
    RelayClient::new(
        config,
        Arc::new(bridge.clone()),
        &PageOrigin::File,
        BufferedLog::new(),
        TextInput::new(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_connect_failure_is_reported_not_fatal() {
    let bridge = MemoryBridge::new();
    bridge.refuse_connections("connection refused");
    let mut client = client_with(Config::default(), &bridge);

    let err = client.start(600.0).await.unwrap_err();
    match err {
        Error::ConnectFailed { endpoint, reason } => {
            assert_eq!(endpoint, "ws://localhost:9000");
            assert_eq!(reason, "connection refused");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Sizing and focus still happened
    assert_eq!(client.log().entries().len(), 0);
    assert!(client.input().is_focused());
    assert!(!client.input().is_enabled());
}

#[tokio::test]
async fn test_retry_after_failed_connect() {
    let bridge = MemoryBridge::new();
    bridge.refuse_connections("not yet");
    let mut client = client_with(Config::default(), &bridge);

    assert!(client.start(600.0).await.is_err());
    bridge.accept_connections();
    assert!(client.start(600.0).await.unwrap().is_some());
    assert!(client.is_connected());
    assert_eq!(bridge.connect_attempts(), 2);
}

#[tokio::test]
async fn test_malformed_payloads_leave_state_untouched() {
    let bridge = MemoryBridge::new();
    let mut client = client_with(Config::default(), &bridge);
    client.start(600.0).await.unwrap();

    let bad = [
        ("http://sage/event#instream", json!(null)),
        ("http://sage/event#instream", json!({"lines": {"0": 1}, "prompt": ""})),
        ("http://sage/event#instream", json!({"lines": {}})),
        ("http://sage/event#connected", json!(1)),
    ];
    for (topic, payload) in bad {
        assert!(client.handle_event(SessionEvent::Publish {
            topic: topic.to_string(),
            payload,
        }));
    }

    assert!(client.log().is_empty());
    // Still open from bootstrap; a non-boolean report changes nothing
    assert!(client.input().is_enabled());
    assert!(client.is_connected());
}

#[tokio::test]
async fn test_rejected_call_reports_failure() {
    let mut config = Config::default();
    // No alias "sage" is ever registered, so the session cannot expand it
    config.procedures.input = "sage:input".to_string();

    let bridge = MemoryBridge::new();
    bridge.reply_on_call("http://sage/is_connected", "http://sage/event#connected", json!(true));
    let mut client = client_with(config, &bridge);
    let mut events = client.start(600.0).await.unwrap().unwrap();
    let event = events.recv().await.unwrap();
    client.handle_event(event);

    client.input_mut().set_value("say hi");
    let outcome = client.submit().await;

    assert_eq!(outcome.status, SubmitStatus::Failed);
    assert!(outcome.default_prevented);
    assert!(client.input().is_all_selected());
    assert!(bridge.calls_to("http://sage/input").is_empty());
}

#[tokio::test]
async fn test_explicit_endpoint() {
    let bridge = MemoryBridge::new();
    let mut client = RelayClient::with_endpoint(
        Config::default(),
        Arc::new(bridge.clone()),
        Endpoint::from_url("ws://10.0.0.5:9000"),
        BufferedLog::new(),
        TextInput::new(),
    )
    .unwrap();

    assert_eq!(client.endpoint().url(), "ws://10.0.0.5:9000");
    assert!(client.start(600.0).await.is_ok());
}
