//! Shared test fixtures.

#![allow(dead_code, unused_imports)]

use widgetwire::lifecycle::RequestController;
use widgetwire::session::UiSession;
use widgetwire::widgets::WidgetKind;

/// An inbound message carrying no operations.
pub const EMPTY_REQUEST: &str = r#"{"operations":[]}"#;

/// Install a test tracing subscriber; repeated calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A session holding one slider under the root shell, plus a default
/// controller. Returns (controller, session, slider id).
pub fn session_with_slider() -> (RequestController, UiSession, String) {
    init_tracing();
    let controller = RequestController::new();
    let mut session = UiSession::new("test-session");
    let root = session.root_id().to_string();
    let slider = session
        .create_widget(&root, WidgetKind::Slider, Vec::new())
        .expect("slider created");
    (controller, session, slider)
}

/// Build an inbound message with one set record.
pub fn set_request(target: &str, name: &str, value: serde_json::Value) -> String {
    serde_json::json!({
        "operations": [
            {"target": target, "action": "set", "properties": {name: value}}
        ]
    })
    .to_string()
}

/// Build an inbound message with one notify record.
pub fn notify_request(target: &str, event: &str) -> String {
    serde_json::json!({
        "operations": [
            {"target": target, "action": "notify", "event": event, "properties": {}}
        ]
    })
    .to_string()
}
