//! Integration tests for `off` and `once`.

use devents::{Callback, EventMap};
use devents_test::{Recorder, test_context, test_emitter};
use serde_json::json;

#[test]
fn test_off_without_arguments_clears_everything() {
    let emitter = test_emitter();
    let recorder = Recorder::new();

    emitter.on("a", &recorder.callback("a"), None).unwrap();
    emitter.on("b all", &recorder.callback("b"), None).unwrap();
    emitter.off(None, None, None);

    emitter.trigger("a", &[]);
    emitter.trigger("b", &[]);
    assert!(recorder.is_empty());
    assert!(emitter.event_names().is_empty());
}

#[test]
fn test_off_by_name() {
    let emitter = test_emitter();
    let recorder = Recorder::new();

    emitter.on("a", &recorder.callback("a1"), None).unwrap();
    emitter.on("a", &recorder.callback("a2"), None).unwrap();
    emitter.on("b", &recorder.callback("b"), None).unwrap();
    emitter.off("a", None, None);

    assert!(!emitter.has_handlers("a"));
    assert_eq!(emitter.event_names(), vec!["b"]);
}

#[test]
fn test_off_by_name_and_callback_keeps_unrelated() {
    let emitter = test_emitter();
    let recorder = Recorder::new();
    let target = recorder.callback("target");

    emitter.on("x", &target, None).unwrap();
    emitter.on("x", &recorder.callback("other"), None).unwrap();
    emitter.on("y", &target, None).unwrap();
    emitter.off("x", &target, None);

    emitter.trigger("x", &[]);
    emitter.trigger("y", &[]);
    assert_eq!(recorder.labels(), vec!["other", "target"]);
}

#[test]
fn test_off_with_multiple_names() {
    let emitter = test_emitter();
    let recorder = Recorder::new();
    let callback = recorder.callback("fn");

    emitter.on("a b c", &callback, None).unwrap();
    emitter.off("a  c", &callback, None);

    assert_eq!(emitter.event_names(), vec!["b"]);
}

#[test]
fn test_off_requires_every_supplied_filter() {
    let emitter = test_emitter();
    let recorder = Recorder::new();
    let callback = recorder.callback("fn");
    let (ctx1, ctx2) = (test_context("one"), test_context("two"));

    emitter.on("x", &callback, &ctx1).unwrap();
    emitter.on("x", &callback, &ctx2).unwrap();
    emitter.on("x", &callback, None).unwrap();

    emitter.off("x", &callback, &ctx1);
    assert_eq!(emitter.handler_count("x"), 2);

    // A context filter never matches a handler registered without one.
    emitter.off(None, None, &ctx2);
    assert_eq!(emitter.handler_count("x"), 1);

    emitter.trigger("x", &[]);
    assert_eq!(recorder.count("fn"), 1);
}

#[test]
fn test_off_by_callback_across_names() {
    let emitter = test_emitter();
    let recorder = Recorder::new();
    let callback = recorder.callback("fn");
    let keep = recorder.callback("keep");

    emitter.on("a b", &callback, None).unwrap();
    emitter.on("b", &keep, None).unwrap();
    emitter.off(None, &callback, None);

    assert_eq!(emitter.event_names(), vec!["b"]);
    assert_eq!(emitter.handler_count("b"), 1);
}

#[test]
fn test_off_with_event_map() {
    let emitter = test_emitter();
    let recorder = Recorder::new();
    let (fn1, fn2) = (recorder.callback("fn1"), recorder.callback("fn2"));

    emitter.on("a b", &fn1, None).unwrap();
    emitter.on("b", &fn2, None).unwrap();
    emitter.off(EventMap::new().with("a", &fn1), None, None);

    emitter.trigger("a", &[]).trigger("b", &[]);
    assert_eq!(recorder.labels(), vec!["fn1", "fn2"]);
    assert_eq!(emitter.event_names(), vec!["b"]);
}

#[test]
fn test_off_with_event_map_uses_entry_callbacks() {
    let emitter = test_emitter();
    let recorder = Recorder::new();
    let (fn1, fn2) = (recorder.callback("fn1"), recorder.callback("fn2"));
    let ctx = test_context("ctx");

    emitter.on("a", &fn1, &ctx).unwrap();
    emitter.on("a b", &fn2, None).unwrap();

    // Entry callbacks take precedence over the standalone one; the context
    // still narrows every entry.
    let map = EventMap::new().with("a b", &fn2).with("a", &fn1);
    emitter.off(map.clone(), &fn1, &ctx);
    assert_eq!(emitter.handler_count("a"), 1);
    assert_eq!(emitter.handler_count("b"), 1);

    emitter.off(map, None, None);
    assert!(emitter.event_names().is_empty());
}

#[test]
fn test_off_with_empty_event_map_removes_nothing() {
    let emitter = test_emitter();
    let recorder = Recorder::new();

    emitter.on("a", &recorder.callback("a"), None).unwrap();
    emitter.off(EventMap::new(), None, None);

    assert!(emitter.has_handlers("a"));
}

#[test]
fn test_off_on_empty_emitter_is_noop() {
    let emitter = test_emitter();
    emitter.off("missing", None, None).off(None, None, None);
    assert!(emitter.event_names().is_empty());
}

#[test]
fn test_once_fires_exactly_once() {
    let emitter = test_emitter();
    let recorder = Recorder::new();

    emitter.once("x", &recorder.callback("fn"), None).unwrap();
    emitter.trigger("x", &[json!(1)]);
    emitter.trigger("x", &[json!(2)]);

    assert_eq!(recorder.args_of("fn"), vec![vec![json!(1)]]);
    assert!(!emitter.has_handlers("x"));
}

#[test]
fn test_once_with_multiple_names_fires_once_per_name() {
    let emitter = test_emitter();
    let recorder = Recorder::new();

    emitter.once("a b", &recorder.callback("fn"), None).unwrap();
    for _ in 0..2 {
        emitter.trigger("a", &[]);
        emitter.trigger("b", &[]);
    }

    assert_eq!(recorder.count("fn"), 2);
    assert!(emitter.event_names().is_empty());
}

#[test]
fn test_once_map_with_context() {
    let emitter = test_emitter();
    let recorder = Recorder::new();
    let ctx = test_context("ctx");
    let map = EventMap::new()
        .with("a", &recorder.callback("a"))
        .with("b", &recorder.callback("b"));

    emitter.once(map, None, &ctx).unwrap();
    emitter.trigger("a", &[]).trigger("a", &[]).trigger("b", &[]);

    assert_eq!(recorder.labels(), vec!["a", "b"]);
    assert!(recorder.calls().iter().all(|call| call.receiver == ctx));
}

#[test]
fn test_off_with_original_removes_once_wrapper() {
    let emitter = test_emitter();
    let recorder = Recorder::new();
    let callback = recorder.callback("fn");

    emitter.once("x", &callback, None).unwrap();
    emitter.on("x", &recorder.callback("other"), None).unwrap();
    emitter.off("x", &callback, None);
    emitter.trigger("x", &[]);

    assert_eq!(recorder.labels(), vec!["other"]);
}

#[test]
fn test_once_reentrant_trigger_runs_once() {
    let emitter = test_emitter();
    let recorder = Recorder::new();
    let inner = recorder.callback("fn");

    let handle = emitter.clone();
    let reentrant = Callback::new(move |ctx, args| {
        inner.call(ctx, args);
        handle.trigger("x", args);
    });

    emitter.once("x", &reentrant, None).unwrap();
    emitter.trigger("x", &[]);

    assert_eq!(recorder.count("fn"), 1);
}

#[test]
fn test_once_on_all_channel() {
    let emitter = test_emitter();
    let recorder = Recorder::new();

    emitter.once("all", &recorder.callback("all"), None).unwrap();
    emitter.trigger("a", &[]);
    emitter.trigger("b", &[]);

    assert_eq!(recorder.args_of("all"), vec![vec![json!("a")]]);
}
