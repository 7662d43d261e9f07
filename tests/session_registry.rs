//! Session registry: lookup, removal, id uniqueness, and per-session
//! isolation across threads.

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use common::{init_tracing, EMPTY_REQUEST};
use widgetwire::lifecycle::RequestController;
use widgetwire::session::{SessionRegistry, UiSession};
use widgetwire::widgets::WidgetKind;

#[test]
fn register_lookup_and_remove() {
    init_tracing();
    let registry = SessionRegistry::new();
    assert!(registry.is_empty());

    registry.create_session("alpha");
    registry.create_session("beta");
    assert_eq!(registry.len(), 2);
    assert!(registry.session("alpha").is_some());
    assert!(registry.session("gamma").is_none());

    assert!(registry.remove_session("alpha"));
    assert!(!registry.remove_session("alpha"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn widget_ids_are_unique_across_sessions() {
    init_tracing();
    let mut ids = HashSet::new();
    for session_id in ["one", "two", "three"] {
        let mut session = UiSession::new(session_id);
        let root = session.root_id().to_string();
        assert!(ids.insert(root.clone()));
        for _ in 0..3 {
            let id = session
                .create_widget(&root, WidgetKind::Label, Vec::new())
                .unwrap();
            assert!(ids.insert(id));
        }
    }
}

#[test]
fn unknown_session_yields_no_result() {
    init_tracing();
    let registry = SessionRegistry::new();
    let controller = RequestController::new();
    assert!(registry
        .process_request(&controller, "missing", EMPTY_REQUEST)
        .is_none());
}

#[test]
fn sessions_process_independently_across_threads() {
    init_tracing();
    let registry = Arc::new(SessionRegistry::new());
    let controller = Arc::new(RequestController::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let controller = Arc::clone(&controller);
            thread::spawn(move || {
                let session_id = format!("client-{i}");
                let session = registry.create_session(&session_id);
                {
                    let mut session = session.lock();
                    let root = session.root_id().to_string();
                    session
                        .create_widget(&root, WidgetKind::Button, Vec::new())
                        .unwrap();
                }
                for _ in 0..5 {
                    registry
                        .process_request(&controller, &session_id, EMPTY_REQUEST)
                        .unwrap()
                        .unwrap();
                }
                let session = registry.session(&session_id).unwrap();
                let session = session.lock();
                assert_eq!(session.request_counter(), 5);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.len(), 4);
}
