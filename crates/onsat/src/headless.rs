//! Headless runs of the statistics section on a deterministic frame clock.
//!
//! The page is scrolled to the top until `visible_at_ms`, then jumps so the
//! first row of counters sits in the middle of the viewport. Every frame
//! that delivers at least one counter frame is recorded.

use onsat_core::{Constraints, FrameClock, Rect, Size, Widget};
use onsat_widgets::StatsSection;
use serde::{Deserialize, Serialize};

/// Scroll script and clock settings for a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Simulation {
    /// Frame rate of the simulated display
    pub fps: u32,
    /// When the section is scrolled into view; `None` never scrolls
    pub visible_at_ms: Option<f64>,
    /// Stop after this much simulated time
    pub until_ms: f64,
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            fps: 60,
            visible_at_ms: Some(0.0),
            until_ms: 3000.0,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

/// Displayed text of every counter at one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Frame timestamp in milliseconds
    pub t_ms: f64,
    /// Counter texts, left to right
    pub values: Vec<String>,
}

/// Outcome of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Counter labels, left to right
    pub labels: Vec<String>,
    /// Initial texts followed by one sample per animated frame
    pub samples: Vec<Sample>,
    /// Timestamp of the frame on which the last counter finished
    pub settled_at_ms: Option<f64>,
    /// Total frames delivered to counters
    pub frames: u64,
}

impl Report {
    /// Texts at the end of the run.
    #[must_use]
    pub fn final_values(&self) -> &[String] {
        self.samples
            .last()
            .map(|s| s.values.as_slice())
            .unwrap_or_default()
    }
}

impl Simulation {
    /// Run `section` through the scroll script.
    ///
    /// The section is laid out two viewports down the page.
    pub fn run(&self, section: &mut StatsSection) -> Report {
        let size = section.measure(Constraints::loose(Size::new(
            self.viewport_width,
            f32::INFINITY,
        )));
        let section_y = self.viewport_height * 2.0;
        section.layout(Rect::new(0.0, section_y, self.viewport_width, size.height));

        let scroll_target = section.counters().first().map_or(section_y, |c| {
            let cell = c.bounds();
            cell.y - (self.viewport_height - cell.height) / 2.0
        });

        let mut clock = FrameClock::new(self.fps);
        let mut samples = vec![Sample {
            t_ms: 0.0,
            values: section.display_texts(),
        }];
        let mut settled_at_ms = None;

        log::debug!(
            "simulating '{}' at {} fps until {}ms (visible at {:?})",
            section.config().id,
            self.fps,
            self.until_ms,
            self.visible_at_ms
        );

        while clock.now_ms() + clock.interval_ms() <= self.until_ms {
            let scroll_y = match self.visible_at_ms {
                Some(at) if clock.now_ms() >= at => scroll_target,
                _ => 0.0,
            };
            let viewport = Rect::new(0.0, scroll_y, self.viewport_width, self.viewport_height);
            section.observe(&viewport, &mut clock);

            let frames = clock.tick();
            if frames.is_empty() {
                continue;
            }
            for frame in &frames {
                section.dispatch(frame, &mut clock);
            }
            samples.push(Sample {
                t_ms: clock.now_ms(),
                values: section.display_texts(),
            });
            if settled_at_ms.is_none() && section.is_settled() {
                settled_at_ms = Some(clock.now_ms());
            }
        }

        Report {
            labels: section
                .counters()
                .iter()
                .map(|c| c.config().label.clone())
                .collect(),
            samples,
            settled_at_ms,
            frames: clock.frames_fired(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_settles() {
        let mut section = StatsSection::global_impact();
        let report = Simulation::default().run(&mut section);

        assert_eq!(report.samples[0].values, vec!["0M+", "0+", "0%", "0%"]);
        assert_eq!(report.final_values(), ["1M+", "50+", "99.9%", "30%"]);
        let settled = report.settled_at_ms.expect("settles");
        assert!(settled >= 2000.0 && settled < 2100.0);
        assert_eq!(report.labels[3], "Fuel Savings");
    }

    #[test]
    fn test_never_visible_has_no_frames() {
        let mut section = StatsSection::global_impact();
        let sim = Simulation {
            visible_at_ms: None,
            until_ms: 10_000.0,
            ..Simulation::default()
        };
        let report = sim.run(&mut section);

        assert_eq!(report.frames, 0);
        assert_eq!(report.samples.len(), 1);
        assert_eq!(report.final_values(), ["0M+", "0+", "0%", "0%"]);
        assert_eq!(report.settled_at_ms, None);
    }

    #[test]
    fn test_late_scroll_delays_start() {
        let mut section = StatsSection::global_impact();
        let sim = Simulation {
            visible_at_ms: Some(1000.0),
            until_ms: 2500.0,
            ..Simulation::default()
        };
        let report = sim.run(&mut section);

        assert!(report.samples[1].t_ms > 1000.0);
        assert_eq!(report.settled_at_ms, None);
        assert_ne!(report.final_values()[1], "50+");
    }

    #[test]
    fn test_small_viewport_still_reaches_half_visibility() {
        let mut section = StatsSection::global_impact();
        let sim = Simulation {
            viewport_width: 375.0,
            viewport_height: 200.0,
            ..Simulation::default()
        };
        let report = sim.run(&mut section);
        // single column: only the first counter is centred on screen
        assert_eq!(report.final_values()[0], "1M+");
    }

    #[test]
    fn test_report_serializes() {
        let mut section = StatsSection::global_impact();
        let sim = Simulation {
            until_ms: 100.0,
            ..Simulation::default()
        };
        let json = serde_json::to_value(sim.run(&mut section)).expect("json");
        assert!(json["samples"].is_array());
        assert_eq!(json["labels"][0], "Connected Vehicles");
    }
}
