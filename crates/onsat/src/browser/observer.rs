//! Trigger-once `IntersectionObserver` wrapper.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// Attribute carrying a target's index in the host.
pub const INDEX_ATTRIBUTE: &str = "data-onsat-index";

/// Watches elements and reports each one the first time at least
/// `threshold` of it is on screen. Reported elements are unobserved.
///
/// Disconnects when dropped.
pub struct VisibilityWatch {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl VisibilityWatch {
    /// Create a watch calling `on_enter` with the value of
    /// [`INDEX_ATTRIBUTE`] of each element that becomes visible.
    pub fn new(
        threshold: f32,
        mut on_enter: impl FnMut(usize) + 'static,
    ) -> Result<Self, JsValue> {
        let threshold = f64::from(threshold.clamp(0.0, 1.0));

        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() || entry.intersection_ratio() < threshold {
                        continue;
                    }
                    let target = entry.target();
                    observer.unobserve(&target);
                    match target
                        .get_attribute(INDEX_ATTRIBUTE)
                        .and_then(|v| v.parse::<usize>().ok())
                    {
                        Some(index) => on_enter(index),
                        None => log::warn!("visible element without {INDEX_ATTRIBUTE}"),
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    /// Start watching `element` as target `index`.
    pub fn observe(&self, element: &Element, index: usize) -> Result<(), JsValue> {
        element.set_attribute(INDEX_ATTRIBUTE, &index.to_string())?;
        self.observer.observe(element);
        Ok(())
    }

    /// Stop watching everything.
    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for VisibilityWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
