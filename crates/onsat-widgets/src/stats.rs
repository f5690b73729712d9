//! The statistics band: heading, subheading and a responsive grid of
//! [`Counter`]s that each start when scrolled into view.

use crate::counter::{Counter, RampPhase, RampStep};
use crate::text::{Text, TextTag};
use onsat_core::{
    escape_html, widget::LayoutResult, AccessibleRole, Brick, BrickAssertion, BrickBudget,
    BrickVerification, Canvas, Color, Constraints, FontWeight, Frame, FrameClock,
    FrameScheduler, Rect, Size, TypeId, Widget, WidgetId,
};
use onsat_yaml::{StatsManifest, StatsSectionConfig};
use std::time::Duration;

const SECTION_PADDING_Y: f32 = 96.0;
const MAX_CONTENT_WIDTH: f32 = 1280.0;
const SUBHEADING_GAP: f32 = 16.0;
const HEADER_GAP: f32 = 64.0;
const GRID_GAP: f32 = 48.0;

/// Grid columns for a viewport width: 1, 2 from 768px, 4 from 1024px.
#[must_use]
pub fn columns_for_width(width: f32) -> usize {
    if width >= 1024.0 {
        4
    } else if width >= 768.0 {
        2
    } else {
        1
    }
}

fn horizontal_padding(width: f32) -> f32 {
    if width >= 1024.0 {
        32.0
    } else if width >= 640.0 {
        24.0
    } else {
        16.0
    }
}

/// Where everything goes for a given section origin and width.
struct Arrangement {
    heading: Rect,
    subheading: Rect,
    cells: Vec<Rect>,
    height: f32,
}

/// The "Global Impact" statistics section.
#[derive(Debug)]
pub struct StatsSection {
    config: StatsSectionConfig,
    heading: Text,
    subheading: Text,
    counters: Vec<Counter>,
    background: Color,
    bounds: Rect,
}

impl StatsSection {
    /// Build a section from its configuration.
    ///
    /// Counter `i` gets widget id `i + 1` and test id `"{section}-counter-{i}"`.
    #[must_use]
    pub fn new(config: StatsSectionConfig) -> Self {
        let options = config.observer_options();
        let counters = config
            .counters
            .iter()
            .enumerate()
            .map(|(i, counter)| {
                Counter::new(WidgetId::new(i as u64 + 1), counter.clone())
                    .with_observer_options(options)
                    .with_test_id(format!("{}-counter-{i}", config.id))
            })
            .collect();

        let heading = Text::new(config.heading.clone())
            .tag(TextTag::Heading)
            .font_size(36.0)
            .font_weight(FontWeight::Bold)
            .color(Color::WHITE)
            .class_name("onsat-stats__heading");
        let subheading = Text::new(config.subheading.clone())
            .tag(TextTag::Paragraph)
            .font_size(20.0)
            .color(Color::PALE_BLUE)
            .class_name("onsat-stats__subheading");

        Self {
            config,
            heading,
            subheading,
            counters,
            background: Color::BRAND_BLUE,
            bounds: Rect::default(),
        }
    }

    /// The section shipped on the landing page.
    #[must_use]
    pub fn global_impact() -> Self {
        Self::new(StatsSectionConfig::global_impact())
    }

    /// Build from a parsed manifest.
    #[must_use]
    pub fn from_manifest(manifest: &StatsManifest) -> Self {
        Self::new(manifest.stats.clone())
    }

    /// Section configuration.
    #[must_use]
    pub const fn config(&self) -> &StatsSectionConfig {
        &self.config
    }

    /// Counters, left to right.
    #[must_use]
    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    /// Find a counter by widget id.
    #[must_use]
    pub fn counter(&self, id: WidgetId) -> Option<&Counter> {
        self.counters.iter().find(|c| c.id() == id)
    }

    /// Find a counter by widget id, mutably.
    pub fn counter_mut(&mut self, id: WidgetId) -> Option<&mut Counter> {
        self.counters.iter_mut().find(|c| c.id() == id)
    }

    /// Take the counters out of the section, e.g. to drive them from a host
    /// that tracks visibility itself.
    #[must_use]
    pub fn into_counters(self) -> Vec<Counter> {
        self.counters
    }

    /// Current text of every counter, e.g. `["0M+", "0+", "0%", "0%"]`.
    #[must_use]
    pub fn display_texts(&self) -> Vec<String> {
        self.counters.iter().map(Counter::display_text).collect()
    }

    /// Whether every counter has finished.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.counters
            .iter()
            .all(|c| c.phase() == RampPhase::Complete)
    }

    /// Number of counters currently waiting for a frame.
    #[must_use]
    pub fn animating(&self) -> usize {
        self.counters
            .iter()
            .filter(|c| c.pending_frame().is_some())
            .count()
    }

    /// Feed the current viewport to every counter's observer.
    ///
    /// Returns how many counters started on this call.
    pub fn observe(&mut self, viewport: &Rect, scheduler: &mut dyn FrameScheduler) -> usize {
        self.counters
            .iter_mut()
            .map(|c| c.observe(viewport, scheduler))
            .filter(|&started| started)
            .count()
    }

    /// Route a delivered frame to the counter that requested it.
    pub fn dispatch(&mut self, frame: &Frame, scheduler: &mut dyn FrameScheduler) -> RampStep {
        match self.counters.iter_mut().find(|c| c.id() == frame.owner) {
            Some(counter) => counter.on_frame(frame, scheduler),
            None => {
                log::warn!("frame {} for unknown counter {}", frame.handle.get(), frame.owner.0);
                RampStep::Ignored
            }
        }
    }

    /// Unmount every counter. Returns how many pending frames were cancelled.
    pub fn unmount(&mut self, scheduler: &mut dyn FrameScheduler) -> usize {
        let cancelled = self
            .counters
            .iter_mut()
            .map(|c| c.unmount(scheduler))
            .filter(|&cancelled| cancelled)
            .count();
        log::debug!("stats section '{}' unmounted ({cancelled} frames cancelled)", self.config.id);
        cancelled
    }

    /// Start every idle counter and run them to completion on a private clock.
    ///
    /// The first frame records each start time; later frames jump by the
    /// longest duration, so this takes a handful of frames whatever the
    /// durations are. Counters already animating on another scheduler are
    /// left alone.
    pub fn run_to_completion(&mut self) {
        let mut clock = FrameClock::default();
        for counter in &mut self.counters {
            counter.notify_visible(&mut clock);
        }
        let longest = self
            .counters
            .iter()
            .map(|c| f64::from(c.config().duration_ms))
            .fold(clock.interval_ms(), f64::max);

        let mut delta = clock.interval_ms();
        while clock.pending() > 0 {
            for frame in clock.tick_by(delta) {
                self.dispatch(&frame, &mut clock);
            }
            delta = longest;
        }
    }

    fn arrange(&self, origin_x: f32, origin_y: f32, width: f32) -> Arrangement {
        let pad_x = horizontal_padding(width);
        let content_width = (width - 2.0 * pad_x).clamp(0.0, MAX_CONTENT_WIDTH);
        let content_x = origin_x + (width - content_width) / 2.0;

        let mut y = origin_y + SECTION_PADDING_Y;
        let heading = Rect::new(content_x, y, content_width, self.heading.line_height_px());
        y += heading.height + SUBHEADING_GAP;
        let subheading = Rect::new(content_x, y, content_width, self.subheading.line_height_px());
        y += subheading.height + HEADER_GAP;

        let columns = columns_for_width(width);
        let gaps = GRID_GAP * (columns.saturating_sub(1)) as f32;
        let cell_width = ((content_width - gaps) / columns as f32).max(0.0);
        let cell_constraints = Constraints::loose(Size::new(cell_width, f32::INFINITY));

        let mut cells = Vec::with_capacity(self.counters.len());
        for row in self.counters.chunks(columns) {
            let row_height = row
                .iter()
                .map(|c| c.measure(cell_constraints).height)
                .fold(0.0_f32, f32::max);
            for (col, _) in row.iter().enumerate() {
                let x = content_x + col as f32 * (cell_width + GRID_GAP);
                cells.push(Rect::new(x, y, cell_width, row_height));
            }
            y += row_height + GRID_GAP;
        }
        if !self.counters.is_empty() {
            y -= GRID_GAP;
        }

        Arrangement {
            heading,
            subheading,
            cells,
            height: y + SECTION_PADDING_Y - origin_y,
        }
    }
}

impl Widget for StatsSection {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let width = if constraints.has_bounded_width() {
            constraints.max_width
        } else {
            MAX_CONTENT_WIDTH
        };
        let arrangement = self.arrange(0.0, 0.0, width);
        constraints.constrain(Size::new(width, arrangement.height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        let arrangement = self.arrange(bounds.x, bounds.y, bounds.width);
        self.heading.layout(arrangement.heading);
        self.subheading.layout(arrangement.subheading);
        for (counter, cell) in self.counters.iter_mut().zip(arrangement.cells) {
            counter.layout(cell);
        }
        self.bounds = Rect::new(bounds.x, bounds.y, bounds.width, arrangement.height);
        LayoutResult {
            size: self.bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds, self.background);
        self.heading.paint(canvas);
        self.subheading.paint(canvas);
        for counter in &self.counters {
            counter.paint(canvas);
        }
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.config.heading)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Region
    }

    fn test_id(&self) -> Option<&str> {
        Some(&self.config.id)
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Brick for StatsSection {
    fn brick_name(&self) -> &'static str {
        "StatsSection"
    }

    fn assertions(&self) -> &[BrickAssertion] {
        &[BrickAssertion::TextVisible, BrickAssertion::MaxLatencyMs(16)]
    }

    fn budget(&self) -> BrickBudget {
        BrickBudget::uniform(16)
    }

    fn verify(&self) -> BrickVerification {
        let mut passed = Vec::new();
        let mut failed = Vec::new();

        if self.heading.can_render() {
            passed.push(BrickAssertion::TextVisible);
        } else {
            failed.push((BrickAssertion::TextVisible, "Section heading is empty".into()));
        }

        let counters = BrickAssertion::element_present(".onsat-counter");
        if self.counters.is_empty() {
            failed.push((counters, "Section has no counters".into()));
        } else if let Some(bad) = self.counters.iter().position(|c| !c.can_render()) {
            let reason = self.counters[bad].verify().failure_summary();
            failed.push((counters, format!("counter {bad}: {reason}")));
        } else {
            passed.push(counters);
        }

        passed.push(BrickAssertion::MaxLatencyMs(16));

        BrickVerification {
            passed,
            failed,
            verification_time: Duration::from_micros(50),
        }
    }

    fn to_html(&self) -> String {
        let counters: String = self.counters.iter().map(Brick::to_html).collect();
        let subheading = if self.config.subheading.is_empty() {
            String::new()
        } else {
            self.subheading.to_html()
        };
        format!(
            r#"<section id="{}" class="onsat-stats"><div class="onsat-stats__header">{}{}</div><div class="onsat-stats__grid">{counters}</div></section>"#,
            escape_html(&self.config.id),
            self.heading.to_html(),
            subheading,
        )
    }

    fn to_css(&self) -> String {
        let mut css = format!(
            ".onsat-stats {{\n    background-color: {};\n    padding: {SECTION_PADDING_Y}px 16px;\n}}\n\
             .onsat-stats__header {{\n    text-align: center;\n    margin-bottom: {HEADER_GAP}px;\n}}\n\
             .onsat-stats__grid {{\n    display: grid;\n    grid-template-columns: repeat(1, minmax(0, 1fr));\n    gap: {GRID_GAP}px;\n    max-width: {MAX_CONTENT_WIDTH}px;\n    margin: 0 auto;\n}}\n\
             @media (min-width: 768px) {{\n    .onsat-stats__grid {{ grid-template-columns: repeat(2, minmax(0, 1fr)); }}\n}}\n\
             @media (min-width: 1024px) {{\n    .onsat-stats__grid {{ grid-template-columns: repeat(4, minmax(0, 1fr)); }}\n}}\n",
            self.background.to_hex()
        );
        css.push_str(&self.heading.to_css());
        css.push('\n');
        css.push_str(&self.subheading.to_css());
        // every counter shares the same classes
        if let Some(counter) = self.counters.first() {
            css.push('\n');
            css.push_str(&counter.to_css());
        }
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onsat_core::{DrawCommand, RecordingCanvas};

    const DESKTOP: f32 = 1280.0;

    fn laid_out(y: f32) -> StatsSection {
        let mut section = StatsSection::global_impact();
        let size = section.measure(Constraints::loose(Size::new(DESKTOP, f32::INFINITY)));
        section.layout(Rect::new(0.0, y, DESKTOP, size.height));
        section
    }

    #[test]
    fn test_columns_for_width() {
        assert_eq!(columns_for_width(375.0), 1);
        assert_eq!(columns_for_width(768.0), 2);
        assert_eq!(columns_for_width(1023.0), 2);
        assert_eq!(columns_for_width(1024.0), 4);
    }

    #[test]
    fn test_global_impact_initial_texts() {
        let section = StatsSection::global_impact();
        assert_eq!(section.display_texts(), vec!["0M+", "0+", "0%", "0%"]);
        assert_eq!(section.counters()[2].test_id(), Some("stats-counter-2"));
    }

    #[test]
    fn test_desktop_layout_is_one_row() {
        let section = laid_out(0.0);
        let ys: Vec<f32> = section.counters().iter().map(|c| c.bounds().y).collect();
        assert!(ys.iter().all(|&y| y == ys[0]));
        let xs: Vec<f32> = section.counters().iter().map(|c| c.bounds().x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_mobile_layout_stacks() {
        let mut section = StatsSection::global_impact();
        section.layout(Rect::new(0.0, 0.0, 375.0, 0.0));
        let ys: Vec<f32> = section.counters().iter().map(|c| c.bounds().y).collect();
        assert!(ys.windows(2).all(|w| w[0] < w[1]));
        assert!(section.bounds().height > laid_out(0.0).bounds().height);
    }

    #[test]
    fn test_scroll_starts_all_counters_once() {
        let mut clock = FrameClock::new(60);
        let mut section = laid_out(2000.0);
        let grid_y = section.counters()[0].bounds().y;

        assert_eq!(section.observe(&Rect::new(0.0, 0.0, DESKTOP, 800.0), &mut clock), 0);
        assert_eq!(
            section.observe(&Rect::new(0.0, grid_y - 400.0, DESKTOP, 800.0), &mut clock),
            4
        );
        assert_eq!(
            section.observe(&Rect::new(0.0, grid_y - 300.0, DESKTOP, 800.0), &mut clock),
            0
        );
        assert_eq!(section.animating(), 4);

        clock.run_until(2100.0, |frame, clock| {
            section.dispatch(&frame, clock);
        });
        assert!(section.is_settled());
        assert_eq!(section.display_texts(), vec!["1M+", "50+", "99.9%", "30%"]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_unmount_cancels_everything() {
        let mut clock = FrameClock::new(60);
        let mut section = laid_out(0.0);
        section.observe(&Rect::new(0.0, 0.0, DESKTOP, 2000.0), &mut clock);
        for frame in clock.tick() {
            section.dispatch(&frame, &mut clock);
        }

        assert_eq!(section.unmount(&mut clock), 4);
        assert_eq!(clock.pending(), 0);
        assert!(section
            .counters()
            .iter()
            .all(|c| c.phase() == RampPhase::Detached));
    }

    #[test]
    fn test_dispatch_unknown_owner_is_ignored() {
        let mut clock = FrameClock::new(60);
        let mut section = StatsSection::global_impact();
        let handle = clock.request_frame(WidgetId::new(42));
        let frame = Frame {
            handle,
            owner: WidgetId::new(42),
            timestamp_ms: 0.0,
        };
        assert_eq!(section.dispatch(&frame, &mut clock), RampStep::Ignored);
    }

    #[test]
    fn test_run_to_completion() {
        let mut section = StatsSection::global_impact();
        section.run_to_completion();
        assert!(section.is_settled());
        assert_eq!(section.display_texts(), vec!["1M+", "50+", "99.9%", "30%"]);
    }

    #[test]
    fn test_run_to_completion_longest_duration_steps_once() {
        let mut config = StatsSectionConfig::global_impact();
        config.counters[1].duration_ms = u32::MAX;
        config.counters[2].duration_ms = 1;
        let mut section = StatsSection::new(config);
        section.run_to_completion();

        assert!(section.is_settled());
        assert_eq!(section.display_texts(), vec!["1M+", "50+", "99.9%", "30%"]);
        assert!(section
            .counters()
            .iter()
            .all(|c| c.started_at() == Some(1000.0 / 60.0)));
    }

    #[test]
    fn test_paint_background_then_texts() {
        let section = laid_out(0.0);
        let mut canvas = RecordingCanvas::new();
        section.paint(&mut canvas);

        assert!(matches!(
            canvas.commands()[0],
            DrawCommand::Rect { color, .. } if color == Color::BRAND_BLUE
        ));
        assert_eq!(
            canvas.texts(),
            vec![
                "Global Impact",
                "Our reach and performance in numbers",
                "0M+",
                "Connected Vehicles",
                "0+",
                "Countries Served",
                "0%",
                "Uptime Guarantee",
                "0%",
                "Fuel Savings",
            ]
        );
    }

    #[test]
    fn test_html_structure() {
        let html = StatsSection::global_impact().to_html();
        assert!(html.starts_with(r#"<section id="stats" class="onsat-stats">"#));
        assert!(html.contains(r#"<h2 class="onsat-stats__heading">Global Impact</h2>"#));
        assert_eq!(html.matches(r#"class="onsat-counter""#).count(), 4);
        assert!(html.ends_with("</div></section>"));
    }

    #[test]
    fn test_html_omits_empty_subheading() {
        let mut config = StatsSectionConfig::global_impact();
        config.subheading.clear();
        let html = StatsSection::new(config).to_html();
        assert!(!html.contains("<p"));
    }

    #[test]
    fn test_css_has_responsive_grid() {
        let css = StatsSection::global_impact().to_css();
        assert!(css.contains("@media (min-width: 1024px)"));
        assert!(css.contains("repeat(4, minmax(0, 1fr))"));
        assert_eq!(css.matches(".onsat-counter {").count(), 1);
    }

    #[test]
    fn test_verify() {
        assert!(StatsSection::global_impact().can_render());

        let mut config = StatsSectionConfig::global_impact();
        config.heading.clear();
        let verification = StatsSection::new(config).verify();
        assert!(!verification.is_valid());
    }

    #[test]
    fn test_accessibility() {
        let section = StatsSection::global_impact();
        assert_eq!(section.accessible_role(), AccessibleRole::Region);
        assert_eq!(section.accessible_name(), Some("Global Impact"));
    }
}
