//! Mounting counters onto DOM elements.

use super::observer::VisibilityWatch;
use super::raf::RafScheduler;
use onsat_core::{Brick, WidgetId, DEFAULT_THRESHOLD};
use onsat_widgets::{Counter, RampPhase, StatsSection};
use onsat_yaml::{CounterConfig, StatsManifest};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element};

const COUNTER_SELECTOR: &str = ".onsat-counter";
const VALUE_SELECTOR: &str = ".onsat-counter__value";

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn document() -> Result<Document, JsValue> {
    window()
        .ok_or("No window")?
        .document()
        .ok_or_else(|| "No document".into())
}

fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| format!("Element '{id}' not found").into())
}

fn value_element(root: &Element) -> Result<Element, JsValue> {
    root.query_selector(VALUE_SELECTOR)?
        .ok_or_else(|| format!("'{VALUE_SELECTOR}' missing in counter markup").into())
}

/// One counter and the elements it drives.
struct Slot {
    counter: Counter,
    target: Element,
    value: Element,
}

/// Shared state behind a [`MountHandle`].
struct Host {
    slots: Vec<Slot>,
    scheduler: RafScheduler,
    watch: Option<VisibilityWatch>,
}

impl Host {
    fn mount(slots: Vec<Slot>, threshold: f32) -> Result<Rc<RefCell<Self>>, JsValue> {
        let window = window().ok_or("No window")?;
        let host = Rc::new(RefCell::new(Self {
            slots,
            scheduler: RafScheduler::new(window),
            watch: None,
        }));

        let weak = Rc::downgrade(&host);
        host.borrow_mut()
            .scheduler
            .set_callback(Closure::new(move |timestamp_ms: f64| {
                with_host(&weak, |host| host.on_frame(timestamp_ms));
            }));

        let weak = Rc::downgrade(&host);
        let watch = VisibilityWatch::new(threshold, move |index| {
            with_host(&weak, |host| host.on_visible(index));
        })?;
        for (index, slot) in host.borrow().slots.iter().enumerate() {
            watch.observe(&slot.target, index)?;
        }
        host.borrow_mut().watch = Some(watch);

        Ok(host)
    }

    fn on_visible(&mut self, index: usize) {
        let Self {
            slots, scheduler, ..
        } = self;
        match slots.get_mut(index) {
            Some(slot) => {
                slot.counter.notify_visible(scheduler);
            }
            None => log::warn!("visibility for unknown counter {index}"),
        }
    }

    fn on_frame(&mut self, timestamp_ms: f64) {
        let Self {
            slots, scheduler, ..
        } = self;
        for frame in scheduler.begin_frame(timestamp_ms) {
            if let Some(slot) = slots.iter_mut().find(|s| s.counter.id() == frame.owner) {
                slot.counter.on_frame(&frame, scheduler);
            }
        }
        for slot in slots.iter_mut() {
            if slot.counter.take_dirty() {
                slot.value
                    .set_text_content(Some(&slot.counter.display_text()));
            }
        }
    }

    fn unmount(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.disconnect();
        }
        let Self {
            slots, scheduler, ..
        } = self;
        for slot in slots.iter_mut() {
            slot.counter.unmount(scheduler);
        }
        scheduler.shutdown();
    }

    fn is_settled(&self) -> bool {
        self.slots
            .iter()
            .all(|s| s.counter.phase() == RampPhase::Complete)
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn with_host(weak: &Weak<RefCell<Host>>, f: impl FnOnce(&mut Host)) {
    let Some(host) = weak.upgrade() else {
        return;
    };
    // a handle method may still hold the borrow
    let Ok(mut host) = host.try_borrow_mut() else {
        log::warn!("host busy; callback skipped");
        return;
    };
    f(&mut host);
}

/// Handle to mounted counters. Unmounts when freed.
#[wasm_bindgen]
pub struct MountHandle {
    host: Rc<RefCell<Host>>,
}

#[wasm_bindgen]
impl MountHandle {
    /// Stop observing, cancel any pending frame and freeze the values.
    pub fn unmount(&self) {
        self.host.borrow_mut().unmount();
    }

    /// Whether every counter has reached its target.
    #[wasm_bindgen(js_name = isSettled)]
    pub fn is_settled(&self) -> bool {
        self.host.borrow().is_settled()
    }

    /// Current counter texts, in mount order.
    pub fn values(&self) -> js_sys::Array {
        self.host
            .borrow()
            .slots
            .iter()
            .map(|s| JsValue::from_str(&s.counter.display_text()))
            .collect()
    }
}

/// Mount a single counter into the element with id `element_id`.
///
/// `config_json` holds `end`, `label` and optionally `duration` and
/// `suffix`, e.g. `{"end": 50, "suffix": "+", "label": "Countries Served"}`.
#[wasm_bindgen]
pub fn mount_counter(element_id: &str, config_json: &str) -> Result<MountHandle, JsValue> {
    let config = CounterConfig::from_json(config_json).map_err(to_js)?;
    let document = document()?;
    let root = element_by_id(&document, element_id)?;

    let counter = Counter::new(WidgetId::new(1), config).with_test_id(element_id);
    root.set_inner_html(&counter.to_html());
    let value = value_element(&root)?;

    log::debug!("mounted counter '{}' on #{element_id}", counter.config().label);
    let host = Host::mount(
        vec![Slot {
            counter,
            target: root,
            value,
        }],
        DEFAULT_THRESHOLD,
    )?;
    Ok(MountHandle { host })
}

/// Render the statistics section into `container_id` and mount its counters.
///
/// An empty `manifest_yaml` mounts the built-in "Global Impact" section.
#[wasm_bindgen]
pub fn mount_stats(container_id: &str, manifest_yaml: &str) -> Result<MountHandle, JsValue> {
    let manifest = if manifest_yaml.trim().is_empty() {
        StatsManifest::default()
    } else {
        StatsManifest::from_yaml(manifest_yaml).map_err(to_js)?
    };
    let section = StatsSection::from_manifest(&manifest);
    if !section.can_render() {
        return Err(to_js(section.verify().failure_summary()));
    }

    let document = document()?;
    let container = element_by_id(&document, container_id)?;
    container.set_inner_html(&format!(
        "<style>{}</style>{}",
        section.to_css(),
        section.to_html()
    ));

    // counters render in order, so the n-th counter element belongs to the
    // n-th counter whatever the section id contains
    let threshold = manifest.stats.threshold;
    let elements = container.query_selector_all(COUNTER_SELECTOR)?;
    let mut slots = Vec::with_capacity(section.counters().len());
    for (i, counter) in section.into_counters().into_iter().enumerate() {
        let target = u32::try_from(i)
            .ok()
            .and_then(|i| elements.item(i))
            .and_then(|node| node.dyn_into::<Element>().ok())
            .ok_or_else(|| to_js(format!("counter {i} missing from markup")))?;
        let value = value_element(&target)?;
        slots.push(Slot {
            counter,
            target,
            value,
        });
    }

    log::debug!(
        "mounted stats section '{}' with {} counters on #{container_id}",
        manifest.stats.id,
        slots.len()
    );
    let host = Host::mount(slots, threshold)?;
    Ok(MountHandle { host })
}
