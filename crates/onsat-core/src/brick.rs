//! Brick types: verifiable assertions, render budgets and HTML/CSS output.
//!
//! Every widget is also a brick. Before a widget paints, its assertions are
//! verified; a falsified brick is not rendered.

use std::time::Duration;

/// Brick assertion that must be verified at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum BrickAssertion {
    /// Text content must be visible (non-empty)
    TextVisible,

    /// WCAG 2.1 contrast ratio requirement
    ContrastRatio(f32),

    /// Maximum render latency in milliseconds
    MaxLatencyMs(u32),

    /// Element must be present in DOM
    ElementPresent(String),
}

impl BrickAssertion {
    /// Create a max latency assertion
    #[must_use]
    pub const fn max_latency_ms(ms: u32) -> Self {
        Self::MaxLatencyMs(ms)
    }

    /// Create an element presence assertion
    #[must_use]
    pub fn element_present(selector: impl Into<String>) -> Self {
        Self::ElementPresent(selector.into())
    }
}

/// Performance budget for a brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickBudget {
    /// Maximum time for measure phase
    pub measure_ms: u32,
    /// Maximum time for layout phase
    pub layout_ms: u32,
    /// Maximum time for paint phase
    pub paint_ms: u32,
    /// Total budget
    pub total_ms: u32,
}

impl BrickBudget {
    /// Create a budget with equal distribution across phases
    #[must_use]
    pub const fn uniform(total_ms: u32) -> Self {
        let phase_ms = total_ms / 3;
        Self {
            measure_ms: phase_ms,
            layout_ms: phase_ms,
            paint_ms: phase_ms,
            total_ms,
        }
    }

    /// Convert to Duration
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_millis(self.total_ms as u64)
    }
}

impl Default for BrickBudget {
    fn default() -> Self {
        // one frame at 60fps
        Self::uniform(16)
    }
}

/// Result of verifying brick assertions
#[derive(Debug, Clone)]
pub struct BrickVerification {
    /// All assertions that passed
    pub passed: Vec<BrickAssertion>,
    /// All assertions that failed with reasons
    pub failed: Vec<(BrickAssertion, String)>,
    /// Time taken to verify
    pub verification_time: Duration,
}

impl BrickVerification {
    /// Check if all assertions passed
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failed.is_empty()
    }

    /// Human readable list of failures, for logging.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        self.failed
            .iter()
            .map(|(assertion, reason)| format!("{assertion:?}: {reason}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Core Brick trait.
///
/// Defines the assertions that must pass for the brick to be valid, its
/// performance budget, and deterministic HTML/CSS generation.
pub trait Brick: Send + Sync {
    /// Get the brick's unique type name
    fn brick_name(&self) -> &'static str;

    /// Get all assertions for this brick
    fn assertions(&self) -> &[BrickAssertion];

    /// Get the performance budget
    fn budget(&self) -> BrickBudget;

    /// Verify all assertions against current state
    fn verify(&self) -> BrickVerification;

    /// Generate HTML for this brick. Same state, same output.
    fn to_html(&self) -> String;

    /// Generate CSS for this brick, scoped by class name.
    fn to_css(&self) -> String;

    /// Check if this brick can be rendered (all assertions pass)
    fn can_render(&self) -> bool {
        self.verify().is_valid()
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick_budget_uniform() {
        let b = BrickBudget::uniform(16);
        assert_eq!(b.total_ms, 16);
        assert_eq!(b.measure_ms, 5);
        assert_eq!(b.as_duration(), Duration::from_millis(16));
        assert_eq!(BrickBudget::default(), b);
    }

    #[test]
    fn test_brick_verification_invalid() {
        let v = BrickVerification {
            passed: vec![],
            failed: vec![(BrickAssertion::TextVisible, "label is empty".into())],
            verification_time: Duration::from_micros(1),
        };
        assert!(!v.is_valid());
        assert_eq!(v.failure_summary(), "TextVisible: label is empty");
    }

    #[test]
    fn test_brick_assertion_constructors() {
        assert_eq!(BrickAssertion::max_latency_ms(16), BrickAssertion::MaxLatencyMs(16));
        assert_eq!(
            BrickAssertion::element_present("#stats"),
            BrickAssertion::ElementPresent("#stats".into())
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Fuel Savings"), "Fuel Savings");
        assert_eq!(
            escape_html(r#"<b>"R&D"</b> 'x'"#),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt; &#39;x&#39;"
        );
    }
}
