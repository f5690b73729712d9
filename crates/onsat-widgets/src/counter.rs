//! Animated statistic counter.
//!
//! A counter shows `0` until its element is at least half on screen, then
//! counts up to its target over a fixed duration, one frame at a time:
//!
//! - The first frame after the visibility edge records the start time `t0`.
//! - Every frame computes `progress = (t - t0) / duration`. While
//!   `progress < 1` the displayed value is `floor(target * progress)` and
//!   another frame is requested.
//! - Once `progress >= 1` the displayed value is exactly `target` and no
//!   further frames are requested.
//!
//! Fractional targets such as `99.9` therefore jump from an integer straight
//! to the exact target on the last frame.
//!
//! ```
//! use onsat_core::{FrameClock, WidgetId};
//! use onsat_widgets::Counter;
//! use onsat_yaml::CounterConfig;
//!
//! let mut clock = FrameClock::with_interval(1000.0);
//! let mut counter = Counter::new(WidgetId::new(1), CounterConfig::new(50.0, "Countries Served").suffix("+"));
//!
//! counter.notify_visible(&mut clock);
//! for _ in 0..3 {
//!     for frame in clock.tick() {
//!         counter.on_frame(&frame, &mut clock);
//!     }
//! }
//! assert_eq!(counter.display_text(), "50+");
//! ```

use crate::format::NumberFormat;
use crate::text::Text;
use onsat_core::{
    escape_html, widget::LayoutResult, AccessibleRole, Brick, BrickAssertion, BrickBudget,
    BrickVerification, Canvas, Color, Constraints, FontWeight, Frame, FrameHandle,
    FrameScheduler, ObserverOptions, Rect, Size, TypeId, VisibilityEdge, VisibilityObserver,
    Widget, WidgetId,
};
use onsat_yaml::CounterConfig;
use std::time::Duration;

/// Gap between the number and its caption, in pixels.
const LINE_GAP: f32 = 8.0;

/// Minimum contrast for the large number against its background.
const MIN_NUMBER_CONTRAST: f32 = 3.0;

/// Where a counter's ramp is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampPhase {
    /// Waiting for the visibility edge
    #[default]
    Idle,
    /// Counting up, one frame at a time
    Running,
    /// Reached the target; terminal
    Complete,
    /// Torn down; terminal
    Detached,
}

/// What a frame did to the ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampStep {
    /// Value updated, another frame is wanted
    Continue,
    /// Value snapped to the target; no more frames
    Finished,
    /// Frame was not for this ramp, or the ramp is not running
    Ignored,
}

/// The count-up state machine, free of any scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterRamp {
    target: f64,
    duration_ms: u32,
    phase: RampPhase,
    started: bool,
    started_at: Option<f64>,
    value: f64,
}

impl CounterRamp {
    /// Create an idle ramp showing 0.
    #[must_use]
    pub const fn new(target: f64, duration_ms: u32) -> Self {
        Self {
            target,
            duration_ms,
            phase: RampPhase::Idle,
            started: false,
            started_at: None,
            value: 0.0,
        }
    }

    /// Target value.
    #[must_use]
    pub const fn target(&self) -> f64 {
        self.target
    }

    /// Ramp duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> RampPhase {
        self.phase
    }

    /// Currently displayed value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Timestamp of the first frame, once one has arrived.
    #[must_use]
    pub const fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    /// Whether the ramp has ever left `Idle` through [`CounterRamp::start`].
    #[must_use]
    pub const fn has_started(&self) -> bool {
        self.started
    }

    /// `Idle → Running`. Returns `false` in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != RampPhase::Idle {
            return false;
        }
        self.phase = RampPhase::Running;
        self.started = true;
        true
    }

    /// Advance to `now_ms`.
    pub fn step(&mut self, now_ms: f64) -> RampStep {
        if self.phase != RampPhase::Running {
            return RampStep::Ignored;
        }

        let t0 = *self.started_at.get_or_insert(now_ms);
        let progress = (now_ms - t0) / f64::from(self.duration_ms);

        if progress < 1.0 {
            // a late or early timestamp never moves the display backwards
            self.value = self.value.max((self.target * progress).floor());
            RampStep::Continue
        } else {
            self.value = self.target;
            self.phase = RampPhase::Complete;
            RampStep::Finished
        }
    }

    /// Enter the terminal `Detached` phase. The value is frozen.
    pub fn detach(&mut self) {
        self.phase = RampPhase::Detached;
    }
}

/// Snapshot of a counter's data.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterState {
    /// Final value to reach
    pub target: f64,
    /// Ramp duration in milliseconds
    pub duration_ms: u32,
    /// Appended after the formatted number
    pub suffix: String,
    /// Caption shown under the number
    pub label: String,
    /// Set once the element has been seen
    pub has_started: bool,
    /// Currently rendered value
    pub displayed_value: f64,
}

/// Counter widget: a large animated number over a caption.
#[derive(Debug)]
pub struct Counter {
    id: WidgetId,
    config: CounterConfig,
    ramp: CounterRamp,
    observer: VisibilityObserver,
    pending: Option<FrameHandle>,
    format: NumberFormat,
    background: Color,
    value_text: Text,
    label_text: Text,
    dirty: bool,
    test_id_value: Option<String>,
    bounds: Rect,
    laid_out: bool,
}

impl Counter {
    /// Create a counter showing 0.
    #[must_use]
    pub fn new(id: WidgetId, config: CounterConfig) -> Self {
        let ramp = CounterRamp::new(config.end, config.duration_ms);
        let format = NumberFormat::default();
        let value_text = Text::new(format!("{}{}", format.format(0.0), config.suffix))
            .font_size(48.0)
            .font_weight(FontWeight::Bold)
            .color(Color::WHITE)
            .class_name("onsat-counter__value");
        let label_text = Text::new(config.label.clone())
            .font_size(16.0)
            .color(Color::PALE_BLUE)
            .class_name("onsat-counter__label");

        Self {
            id,
            config,
            ramp,
            observer: VisibilityObserver::default(),
            pending: None,
            format,
            background: Color::BRAND_BLUE,
            value_text,
            label_text,
            dirty: false,
            test_id_value: None,
            bounds: Rect::default(),
            laid_out: false,
        }
    }

    /// Set the visibility observer options (threshold 0.5, once, by default).
    #[must_use]
    pub fn with_observer_options(mut self, options: ObserverOptions) -> Self {
        self.observer = VisibilityObserver::new(options);
        self
    }

    /// Set the host number format.
    #[must_use]
    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        let text = self.display_text();
        self.value_text.set_content(text);
        self
    }

    /// Set the background the counter is drawn on.
    #[must_use]
    pub const fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Widget ID; frames for this counter carry it as owner.
    #[must_use]
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    /// Static configuration.
    #[must_use]
    pub const fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// The underlying ramp.
    #[must_use]
    pub const fn ramp(&self) -> &CounterRamp {
        &self.ramp
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> RampPhase {
        self.ramp.phase()
    }

    /// Currently displayed value.
    #[must_use]
    pub const fn displayed_value(&self) -> f64 {
        self.ramp.value()
    }

    /// Whether the visibility edge has been seen.
    #[must_use]
    pub const fn has_started(&self) -> bool {
        self.ramp.has_started()
    }

    /// Start time recorded by the first frame.
    #[must_use]
    pub const fn started_at(&self) -> Option<f64> {
        self.ramp.started_at()
    }

    /// The outstanding frame request, if any. There is never more than one.
    #[must_use]
    pub const fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Snapshot of the counter's data.
    #[must_use]
    pub fn state(&self) -> CounterState {
        CounterState {
            target: self.config.end,
            duration_ms: self.config.duration_ms,
            suffix: self.config.suffix.clone(),
            label: self.config.label.clone(),
            has_started: self.has_started(),
            displayed_value: self.displayed_value(),
        }
    }

    /// Formatted value followed by the suffix, e.g. `"1,000+"`.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!("{}{}", self.format.format(self.ramp.value()), self.config.suffix)
    }

    /// Returns `true` once after every change of the displayed text.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Observe the laid-out element against `viewport`; starts the ramp on
    /// the first entry. Returns `true` if this call started it.
    ///
    /// Before the first layout there is no element to observe and this
    /// never starts the ramp.
    pub fn observe(&mut self, viewport: &Rect, scheduler: &mut dyn FrameScheduler) -> bool {
        if !self.laid_out {
            log::trace!("counter {} observed before layout", self.id.0);
            return false;
        }
        let element = self.bounds;
        self.observe_rect(&element, viewport, scheduler)
    }

    /// Like [`Counter::observe`], with an explicit element rectangle.
    pub fn observe_rect(
        &mut self,
        element: &Rect,
        viewport: &Rect,
        scheduler: &mut dyn FrameScheduler,
    ) -> bool {
        match self.observer.observe(element, viewport) {
            Some(VisibilityEdge::Entered) => self.notify_visible(scheduler),
            _ => false,
        }
    }

    /// Handle the "became visible" edge.
    ///
    /// Starts the ramp and requests its first frame. A no-op once started
    /// or after unmount; returns whether the ramp started.
    pub fn notify_visible(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        if !self.ramp.start() {
            log::trace!("counter {} ignored visibility edge ({:?})", self.id.0, self.phase());
            return false;
        }
        self.observer.detach();
        self.pending = Some(scheduler.request_frame(self.id));
        log::debug!(
            "counter {} '{}' started: 0 -> {} over {}ms",
            self.id.0,
            self.config.label,
            self.config.end,
            self.config.duration_ms
        );
        true
    }

    /// Handle a delivered frame.
    ///
    /// Frames this counter did not request, or that arrive after unmount,
    /// are ignored.
    pub fn on_frame(&mut self, frame: &Frame, scheduler: &mut dyn FrameScheduler) -> RampStep {
        if frame.owner != self.id || self.pending != Some(frame.handle) {
            log::warn!(
                "counter {} ignored stale frame {} (pending {:?})",
                self.id.0,
                frame.handle.get(),
                self.pending.map(FrameHandle::get)
            );
            return RampStep::Ignored;
        }
        self.pending = None;

        let step = self.ramp.step(frame.timestamp_ms);
        self.refresh_text();

        match step {
            RampStep::Continue => {
                self.pending = Some(scheduler.request_frame(self.id));
                log::trace!(
                    "counter {} at {} (t={:.1}ms)",
                    self.id.0,
                    self.ramp.value(),
                    frame.timestamp_ms
                );
            }
            RampStep::Finished => {
                log::debug!("counter {} finished at {}", self.id.0, self.ramp.value());
            }
            RampStep::Ignored => {}
        }
        step
    }

    /// Tear down: cancel the outstanding frame and freeze the counter.
    ///
    /// Returns `true` if a pending frame was cancelled.
    pub fn unmount(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        let cancelled = self
            .pending
            .take()
            .is_some_and(|handle| scheduler.cancel_frame(handle));
        self.ramp.detach();
        self.observer.detach();
        log::debug!(
            "counter {} unmounted at {} (cancelled frame: {cancelled})",
            self.id.0,
            self.ramp.value()
        );
        cancelled
    }

    fn refresh_text(&mut self) {
        let text = self.display_text();
        if self.value_text.set_content(text) {
            self.dirty = true;
        }
    }
}

impl Widget for Counter {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        // size for the final text so the layout does not shift while counting
        let final_text = format!(
            "{}{}",
            self.format.format(self.config.end),
            self.config.suffix
        );
        let value = Text::new(final_text)
            .font_size(48.0)
            .measure(Constraints::unbounded());
        let label = self.label_text.measure(Constraints::unbounded());
        constraints.constrain(Size::new(
            value.width.max(label.width),
            value.height + LINE_GAP + label.height,
        ))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.laid_out = true;
        let value_height = self.value_text.line_height_px();
        self.value_text
            .layout(Rect::new(bounds.x, bounds.y, bounds.width, value_height));
        self.label_text.layout(Rect::new(
            bounds.x,
            bounds.y + value_height + LINE_GAP,
            bounds.width,
            self.label_text.line_height_px(),
        ));
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        self.value_text.paint(canvas);
        self.label_text.paint(canvas);
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.config.label)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Status
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Brick for Counter {
    fn brick_name(&self) -> &'static str {
        "Counter"
    }

    fn assertions(&self) -> &[BrickAssertion] {
        &[
            BrickAssertion::TextVisible,
            BrickAssertion::ContrastRatio(MIN_NUMBER_CONTRAST),
            BrickAssertion::MaxLatencyMs(16),
        ]
    }

    fn budget(&self) -> BrickBudget {
        BrickBudget::uniform(16)
    }

    fn verify(&self) -> BrickVerification {
        let mut passed = Vec::new();
        let mut failed = Vec::new();

        if self.config.label.trim().is_empty() {
            failed.push((BrickAssertion::TextVisible, "Counter label is empty".into()));
        } else {
            passed.push(BrickAssertion::TextVisible);
        }

        let ratio = Color::WHITE.contrast_ratio(&self.background);
        if ratio >= MIN_NUMBER_CONTRAST {
            passed.push(BrickAssertion::ContrastRatio(MIN_NUMBER_CONTRAST));
        } else {
            failed.push((
                BrickAssertion::ContrastRatio(MIN_NUMBER_CONTRAST),
                format!("number contrast {ratio:.2}:1 against background"),
            ));
        }

        passed.push(BrickAssertion::MaxLatencyMs(16));

        BrickVerification {
            passed,
            failed,
            verification_time: Duration::from_micros(10),
        }
    }

    fn to_html(&self) -> String {
        let test_id = self
            .test_id_value
            .as_deref()
            .map(|id| format!(r#" data-testid="{}""#, escape_html(id)))
            .unwrap_or_default();
        format!(
            r#"<div class="onsat-counter"{test_id} data-end="{}">{}{}</div>"#,
            self.config.end,
            self.value_text.to_html(),
            self.label_text.to_html()
        )
    }

    fn to_css(&self) -> String {
        format!(
            ".onsat-counter {{\n    text-align: center;\n}}\n{}\n{}",
            self.value_text.to_css(),
            self.label_text.to_css()
        )
    }
}
