//! Frame scheduling: the host's per-frame callback primitive.
//!
//! Widgets never loop or sleep. A widget that wants to animate asks a
//! [`FrameScheduler`] for one frame, receives a [`Frame`] when the host next
//! refreshes, and asks again if it is not finished. Requests made while a
//! frame is being dispatched are delivered on the following frame, which is
//! how `requestAnimationFrame` behaves.
//!
//! [`FrameQueue`] holds the pending requests and is shared by every host:
//! [`FrameClock`] drives it from simulated time for tests and headless runs,
//! the browser host drives it from `requestAnimationFrame`.
//!
//! ```
//! use onsat_core::{FrameClock, FrameScheduler, WidgetId};
//!
//! let mut clock = FrameClock::new(60);
//! let handle = clock.request_frame(WidgetId::new(7));
//!
//! let frames = clock.tick();
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].handle, handle);
//!
//! // Nothing was re-requested, so the next tick is empty.
//! assert!(clock.tick().is_empty());
//! ```

use crate::widget::WidgetId;
use std::collections::BTreeMap;

/// Identifies one outstanding frame request.
///
/// Handles are issued in increasing order, so sorting by handle gives
/// request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Raw handle value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A delivered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// The request this frame answers
    pub handle: FrameHandle,
    /// Widget that requested the frame
    pub owner: WidgetId,
    /// Frame timestamp in milliseconds (host clock, monotonic)
    pub timestamp_ms: f64,
}

/// Host frame scheduler.
pub trait FrameScheduler {
    /// Request a single frame on behalf of `owner`.
    fn request_frame(&mut self, owner: WidgetId) -> FrameHandle;

    /// Cancel a pending request.
    ///
    /// Returns `true` if the request was still pending. A cancelled request
    /// is never delivered.
    fn cancel_frame(&mut self, handle: FrameHandle) -> bool;
}

/// Pending frame requests in request order.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_handle: u64,
    pending: BTreeMap<FrameHandle, WidgetId>,
}

impl FrameQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a request and return its handle.
    pub fn request(&mut self, owner: WidgetId) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.insert(handle, owner);
        handle
    }

    /// Remove a pending request.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let removed = self.pending.remove(&handle).is_some();
        if removed {
            log::trace!("frame {} cancelled", handle.0);
        }
        removed
    }

    /// Check whether a request is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Number of pending requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending request as a frame stamped with `timestamp_ms`.
    ///
    /// Requests made after this call land in the next drain.
    pub fn drain(&mut self, timestamp_ms: f64) -> Vec<Frame> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(handle, owner)| Frame {
                handle,
                owner,
                timestamp_ms,
            })
            .collect()
    }
}

/// Deterministic frame scheduler driven by simulated time.
#[derive(Debug)]
pub struct FrameClock {
    queue: FrameQueue,
    now_ms: f64,
    interval_ms: f64,
    frames_fired: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameClock {
    /// Create a clock at `t = 0` refreshing at `fps` frames per second.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        let interval_ms = if fps > 0 {
            1000.0 / f64::from(fps)
        } else {
            1000.0 / 60.0
        };
        Self::with_interval(interval_ms)
    }

    /// Create a clock with an explicit frame interval in milliseconds.
    #[must_use]
    pub fn with_interval(interval_ms: f64) -> Self {
        Self {
            queue: FrameQueue::new(),
            now_ms: 0.0,
            interval_ms: interval_ms.max(f64::EPSILON),
            frames_fired: 0,
        }
    }

    /// Current simulated time.
    #[must_use]
    pub const fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Frame interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Total frames delivered so far.
    #[must_use]
    pub const fn frames_fired(&self) -> u64 {
        self.frames_fired
    }

    /// Number of requests waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Check whether a request is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.queue.is_pending(handle)
    }

    /// Advance one frame interval and deliver pending requests.
    pub fn tick(&mut self) -> Vec<Frame> {
        self.tick_by(self.interval_ms)
    }

    /// Advance by `delta_ms` and deliver pending requests.
    ///
    /// Negative deltas are treated as zero; simulated time never runs
    /// backwards.
    pub fn tick_by(&mut self, delta_ms: f64) -> Vec<Frame> {
        self.now_ms += delta_ms.max(0.0);
        let frames = self.queue.drain(self.now_ms);
        self.frames_fired += frames.len() as u64;
        frames
    }

    /// Tick until `until_ms`, handing each delivered frame to `dispatch`.
    ///
    /// `dispatch` receives the clock so it can request follow-up frames.
    pub fn run_until<F>(&mut self, until_ms: f64, mut dispatch: F)
    where
        F: FnMut(Frame, &mut Self),
    {
        while self.now_ms + self.interval_ms <= until_ms {
            for frame in self.tick() {
                dispatch(frame, self);
            }
        }
    }
}

impl FrameScheduler for FrameClock {
    fn request_frame(&mut self, owner: WidgetId) -> FrameHandle {
        self.queue.request(owner)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        self.queue.cancel(handle)
    }
}
