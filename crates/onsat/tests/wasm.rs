//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use onsat::browser::RafScheduler;
use onsat::{mount_counter, mount_stats, FrameScheduler, WidgetId};

fn document() -> web_sys::Document {
    web_sys::window()
        .expect("window")
        .document()
        .expect("document")
}

fn fresh_element(id: &str) -> web_sys::Element {
    let document = document();
    if let Some(old) = document.get_element_by_id(id) {
        old.remove();
    }
    let element = document.create_element("div").expect("create div");
    element.set_id(id);
    document
        .body()
        .expect("body")
        .append_child(&element)
        .expect("append");
    element
}

fn texts(values: &js_sys::Array) -> Vec<String> {
    values.iter().filter_map(|v| v.as_string()).collect()
}

// ============================================================================
// Mounting
// ============================================================================

#[wasm_bindgen_test]
fn test_mount_counter_renders_initial_state() {
    let element = fresh_element("countries");
    let handle = mount_counter(
        "countries",
        r#"{"end": 50, "suffix": "+", "label": "Countries Served"}"#,
    )
    .expect("mount");

    let value = element
        .query_selector(".onsat-counter__value")
        .expect("query")
        .expect("value element");
    assert_eq!(value.text_content().as_deref(), Some("0+"));

    let label = element
        .query_selector(".onsat-counter__label")
        .expect("query")
        .expect("label element");
    assert_eq!(label.text_content().as_deref(), Some("Countries Served"));

    assert_eq!(texts(&handle.values()), vec!["0+"]);
    assert!(!handle.is_settled());
    handle.unmount();
}

#[wasm_bindgen_test]
fn test_mount_counter_rejects_bad_config() {
    fresh_element("bad");
    let err = mount_counter("bad", r#"{"end": 50}"#).err().expect("error");
    assert!(err.as_string().unwrap_or_default().contains("JSON"));

    let err = mount_counter("bad", r#"{"end": 5, "duration": 0, "label": "x"}"#)
        .err()
        .expect("error");
    assert!(err.as_string().unwrap_or_default().contains("duration"));
}

#[wasm_bindgen_test]
fn test_mount_counter_missing_element() {
    let err = mount_counter("does-not-exist", r#"{"end": 1, "label": "x"}"#)
        .err()
        .expect("error");
    assert_eq!(
        err.as_string().as_deref(),
        Some("Element 'does-not-exist' not found")
    );
}

#[wasm_bindgen_test]
fn test_mount_stats_default_section() {
    let container = fresh_element("stats-host");
    let handle = mount_stats("stats-host", "").expect("mount");

    assert!(container.query_selector("style").expect("query").is_some());
    assert_eq!(
        container
            .query_selector_all(".onsat-counter")
            .expect("query")
            .length(),
        4
    );
    assert_eq!(texts(&handle.values()), vec!["0M+", "0+", "0%", "0%"]);

    handle.unmount();
    assert_eq!(texts(&handle.values()), vec!["0M+", "0+", "0%", "0%"]);
}

#[wasm_bindgen_test]
fn test_mount_stats_id_with_selector_characters() {
    let container = fresh_element("stats-quoted");
    let manifest = r#"
stats:
  id: 'impact "2024" \ v2'
  heading: Global Impact
  counters:
    - { end: 50, suffix: "+", label: Countries Served }
    - { end: 30, suffix: "%", label: Fuel Savings }
"#;
    let handle = mount_stats("stats-quoted", manifest).expect("mount");

    assert_eq!(
        container
            .query_selector_all(".onsat-counter")
            .expect("query")
            .length(),
        2
    );
    assert_eq!(texts(&handle.values()), vec!["0+", "0%"]);
    handle.unmount();
}

#[wasm_bindgen_test]
fn test_mount_stats_invalid_manifest() {
    fresh_element("stats-bad");
    let err = mount_stats("stats-bad", "stats:\n  heading: H\n  counters: []\n")
        .err()
        .expect("error");
    assert!(err.as_string().unwrap_or_default().contains("no counters"));
}

// ============================================================================
// Scheduler
// ============================================================================

#[wasm_bindgen_test]
fn test_raf_scheduler_queue_and_cancel() {
    let window = web_sys::window().expect("window");
    let mut scheduler = RafScheduler::new(window);

    let a = scheduler.request_frame(WidgetId::new(1));
    let b = scheduler.request_frame(WidgetId::new(2));
    assert_eq!(scheduler.pending(), 2);
    // no callback yet, so nothing is armed
    assert!(!scheduler.is_armed());

    assert!(scheduler.cancel_frame(a));
    assert!(!scheduler.cancel_frame(a));

    let frames = scheduler.begin_frame(16.0);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].handle, b);
    assert_eq!(frames[0].timestamp_ms, 16.0);
}

#[wasm_bindgen_test]
fn test_raf_scheduler_arms_once_and_disarms_when_empty() {
    use wasm_bindgen::closure::Closure;

    let window = web_sys::window().expect("window");
    let mut scheduler = RafScheduler::new(window);
    scheduler.set_callback(Closure::new(|_ts: f64| {}));

    let a = scheduler.request_frame(WidgetId::new(1));
    assert!(scheduler.is_armed());
    let b = scheduler.request_frame(WidgetId::new(2));
    assert!(scheduler.is_armed());

    scheduler.cancel_frame(a);
    assert!(scheduler.is_armed());
    scheduler.cancel_frame(b);
    assert!(!scheduler.is_armed());

    scheduler.request_frame(WidgetId::new(3));
    scheduler.shutdown();
    assert!(!scheduler.is_armed());
    assert_eq!(scheduler.pending(), 0);
}

#[wasm_bindgen_test]
fn test_init_logging_twice() {
    onsat::init_logging("debug");
    onsat::init_logging("not-a-level");
    assert_eq!(log::max_level(), log::LevelFilter::Warn);
}
