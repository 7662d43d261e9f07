//! Remote object queueing, merging and state guards.

mod common;

use widgetwire::protocol::{MessageWriter, Operation, PropertyMap, PropertyValue};
use widgetwire::remote::{RemoteObject, RequestContext, SyncError};

fn ctx() -> RequestContext {
    RequestContext::begin(1)
}

fn flush(remote: &mut RemoteObject) -> widgetwire::Message {
    let mut writer = MessageWriter::new();
    remote.render(&mut writer);
    writer.finish()
}

#[test]
fn operations_are_not_rendered_until_render() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("testId", "type");
    remote.create(&ctx).unwrap();
    remote.call(&ctx, "method", None).unwrap();

    assert!(remote.has_pending());
    let message = flush(&mut remote);
    assert_eq!(message.operation_count(), 2);
}

#[test]
fn create_carries_type() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "ui.Shell");
    remote.create(&ctx).unwrap();

    let message = flush(&mut remote);
    match message.find_create("w1").unwrap() {
        Operation::Create { object_type, .. } => assert_eq!(object_type, "ui.Shell"),
        _ => unreachable!(),
    }
}

#[test]
fn set_value_kinds_survive_to_the_wire() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "type");
    remote.set(&ctx, "key", "value").unwrap();
    remote.set(&ctx, "key2", 2).unwrap();
    remote.set(&ctx, "key3", 3.5).unwrap();
    remote.set(&ctx, "key4", true).unwrap();
    remote.set(&ctx, "key5", vec![1i64, 2, 3]).unwrap();

    let message = flush(&mut remote);
    assert_eq!(message.operation_count(), 1);
    assert_eq!(message.find_set_property("w1", "key"), Some(&PropertyValue::from("value")));
    assert_eq!(message.find_set_property("w1", "key2"), Some(&PropertyValue::Int(2)));
    assert_eq!(message.find_set_property("w1", "key3"), Some(&PropertyValue::Float(3.5)));
    assert_eq!(message.find_set_property("w1", "key4"), Some(&PropertyValue::Bool(true)));
    assert_eq!(
        message.find_set_property("w1", "key5"),
        Some(&PropertyValue::IntList(vec![1, 2, 3]))
    );
}

#[test]
fn set_before_render_folds_into_create() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "ui.Shell");
    remote.create(&ctx).unwrap();
    remote.set(&ctx, "foo", 23).unwrap();

    let message = flush(&mut remote);
    assert_eq!(message.operation_count(), 1);
    let create = message.find_create("w1").unwrap();
    assert_eq!(create.property("foo"), Some(&PropertyValue::Int(23)));
}

#[test]
fn style_flags_fold_into_create_styles() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "ui.Button");
    remote.create(&ctx).unwrap();
    remote
        .set(&ctx, "style", vec!["PUSH".to_string(), "BORDER".to_string()])
        .unwrap();

    let message = flush(&mut remote);
    match message.find_create("w1").unwrap() {
        Operation::Create { styles, .. } => {
            assert_eq!(styles, &["PUSH".to_string(), "BORDER".to_string()]);
        }
        _ => unreachable!(),
    }
}

#[test]
fn listen_before_render_folds_into_create() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "ui.Slider");
    remote.create(&ctx).unwrap();
    remote.listen(&ctx, "selection", true).unwrap();

    let message = flush(&mut remote);
    assert_eq!(message.operation_count(), 1);
    match message.find_create("w1").unwrap() {
        Operation::Create { listeners, .. } => assert_eq!(listeners.get("selection"), Some(&true)),
        _ => unreachable!(),
    }
}

#[test]
fn listen_toggles_collapse_last_write_wins() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "type");
    remote.listen(&ctx, "selection", true).unwrap();
    remote.listen(&ctx, "selection", false).unwrap();
    remote.listen(&ctx, "fake2", true).unwrap();

    let message = flush(&mut remote);
    assert_eq!(message.operation_count(), 1);
    assert_eq!(message.find_listen_property("w1", "selection"), Some(false));
    assert_eq!(message.find_listen_property("w1", "fake2"), Some(true));
}

#[test]
fn calls_render_as_distinct_records_in_order() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "type");
    remote.call(&ctx, "method", None).unwrap();
    let mut arguments = PropertyMap::new();
    arguments.insert("key1".to_string(), PropertyValue::from("a"));
    arguments.insert("key2".to_string(), PropertyValue::Int(3));
    remote.call(&ctx, "method2", Some(arguments)).unwrap();

    let message = flush(&mut remote);
    let calls = message.calls_for("w1");
    assert_eq!(calls.len(), 2);
    match calls[0] {
        Operation::Call { method, .. } => assert_eq!(method, "method"),
        _ => unreachable!(),
    }
    match calls[1] {
        Operation::Call { method, arguments, .. } => {
            assert_eq!(method, "method2");
            assert_eq!(arguments.get("key1"), Some(&PropertyValue::from("a")));
            assert_eq!(arguments.get("key2"), Some(&PropertyValue::Int(3)));
        }
        _ => unreachable!(),
    }
}

#[test]
fn execute_script_renders_type_and_body() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "type");
    remote
        .execute_script(&ctx, "text/javascript", "var x = 5;")
        .unwrap();

    let message = flush(&mut remote);
    match &message.operations()[0] {
        Operation::ExecuteScript { script_type, script, .. } => {
            assert_eq!(script_type, "text/javascript");
            assert_eq!(script, "var x = 5;");
        }
        _ => unreachable!(),
    }
}

#[test]
fn render_clears_the_queue() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "type");
    remote.set(&ctx, "property", 23).unwrap();

    let first = flush(&mut remote);
    let second = flush(&mut remote);
    assert_eq!(first.operation_count(), 1);
    assert_eq!(second.operation_count(), 0);
}

#[test]
fn destroy_is_rendered_and_idempotent() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "type");
    assert!(!remote.is_destroyed());
    remote.destroy(&ctx).unwrap();
    remote.destroy(&ctx).unwrap();
    assert!(remote.is_destroyed());

    let message = flush(&mut remote);
    assert_eq!(message.operation_count(), 1);
    assert!(message.destroys("w1"));
}

#[test]
fn mutation_after_destroy_is_rejected() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "type");
    remote.destroy(&ctx).unwrap();

    assert_eq!(remote.set(&ctx, "x", 3), Err(SyncError::Destroyed));
    assert_eq!(remote.listen(&ctx, "selection", true), Err(SyncError::Destroyed));
    assert_eq!(remote.call(&ctx, "method", None), Err(SyncError::Destroyed));
    assert_eq!(
        remote.set(&ctx, "x", 3).unwrap_err().to_string(),
        "Remote object is destroyed"
    );

    // Only the single Destroy record remains pending.
    let message = flush(&mut remote);
    assert_eq!(message.operation_count(), 1);
}

#[test]
fn wrong_thread_mutation_is_rejected_and_enqueues_nothing() {
    let ctx = ctx();
    let mut remote = RemoteObject::new("w1", "type");

    let (remote, error) = std::thread::spawn(move || {
        let error = remote.set(&ctx, "x", 1).unwrap_err();
        (remote, error)
    })
    .join()
    .unwrap();

    assert_eq!(error, SyncError::WrongThread);
    assert_eq!(error.to_string(), "Remote object called from wrong thread");
    let mut remote = remote;
    assert!(!remote.has_pending());
    let message = flush(&mut remote);
    assert_eq!(message.operation_count(), 0);
}
