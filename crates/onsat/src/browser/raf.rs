//! `requestAnimationFrame` backed [`FrameScheduler`].
//!
//! All widget requests share one browser animation frame: requests go into a
//! [`FrameQueue`], and at most one `requestAnimationFrame` is outstanding
//! while the queue is non-empty. The host's frame callback calls
//! [`RafScheduler::begin_frame`] to take the due frames.

use onsat_core::{Frame, FrameHandle, FrameQueue, FrameScheduler, WidgetId};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Frame scheduler driven by the browser's refresh.
pub struct RafScheduler {
    window: Window,
    queue: FrameQueue,
    raf_id: Option<i32>,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl RafScheduler {
    /// Create a scheduler. Nothing is requested until a callback is set.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self {
            window,
            queue: FrameQueue::new(),
            raf_id: None,
            callback: None,
        }
    }

    /// Set the function the browser calls with each frame timestamp.
    pub fn set_callback(&mut self, callback: Closure<dyn FnMut(f64)>) {
        self.disarm();
        self.callback = Some(callback);
        self.arm();
    }

    /// Number of pending requests.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether a browser animation frame is outstanding.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.raf_id.is_some()
    }

    /// Take the frames due at `timestamp_ms`. Call once per browser frame.
    pub fn begin_frame(&mut self, timestamp_ms: f64) -> Vec<Frame> {
        self.raf_id = None;
        self.queue.drain(timestamp_ms)
    }

    /// Cancel the browser frame and drop every pending request.
    pub fn shutdown(&mut self) {
        self.disarm();
        let dropped = self.queue.drain(0.0).len();
        if dropped > 0 {
            log::debug!("dropped {dropped} pending frame requests");
        }
    }

    fn arm(&mut self) {
        if self.raf_id.is_some() || self.queue.is_empty() {
            return;
        }
        let Some(callback) = &self.callback else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.raf_id = Some(id),
            Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
        }
    }

    fn disarm(&mut self) {
        if let Some(id) = self.raf_id.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame({id}) failed: {err:?}");
            }
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self, owner: WidgetId) -> FrameHandle {
        let handle = self.queue.request(owner);
        self.arm();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let cancelled = self.queue.cancel(handle);
        if self.queue.is_empty() {
            self.disarm();
        }
        cancelled
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}
