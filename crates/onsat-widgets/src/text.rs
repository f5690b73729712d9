//! Text widget for headings, numbers and captions.

use onsat_core::{
    escape_html, widget::LayoutResult, AccessibleRole, Brick, BrickAssertion, BrickBudget,
    BrickVerification, Canvas, Color, Constraints, FontWeight, Rect, Size, TextStyle, TypeId,
    Widget,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTML element a text line renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextTag {
    /// `<div>`
    #[default]
    Div,
    /// `<h2>`
    Heading,
    /// `<p>`
    Paragraph,
}

impl TextTag {
    const fn name(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Heading => "h2",
            Self::Paragraph => "p",
        }
    }
}

/// A single styled line of text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    content: String,
    color: Color,
    font_size: f32,
    font_weight: FontWeight,
    line_height: f32,
    tag: TextTag,
    class_name: String,
    #[serde(skip)]
    bounds: Rect,
}

impl Text {
    /// Create new text widget.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            color: Color::BLACK,
            font_size: 16.0,
            font_weight: FontWeight::Normal,
            line_height: 1.2,
            tag: TextTag::Div,
            class_name: "onsat-text".to_string(),
            bounds: Rect::default(),
        }
    }

    /// Set text color.
    #[must_use]
    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set font size.
    #[must_use]
    pub const fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set font weight.
    #[must_use]
    pub const fn font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }

    /// Set the HTML element.
    #[must_use]
    pub const fn tag(mut self, tag: TextTag) -> Self {
        self.tag = tag;
        self
    }

    /// Set the CSS class.
    #[must_use]
    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = class.into();
        self
    }

    /// Get the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the text content. Returns `true` if it changed.
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        let content = content.into();
        if content == self.content {
            return false;
        }
        self.content = content;
        true
    }

    /// Line height in pixels.
    #[must_use]
    pub fn line_height_px(&self) -> f32 {
        self.font_size * self.line_height
    }

    fn style(&self) -> TextStyle {
        TextStyle {
            size: self.font_size,
            color: self.color,
            weight: self.font_weight,
        }
    }

    // ~0.6em per character; good enough without font metrics
    fn estimate_size(&self) -> Size {
        let width = self.content.chars().count() as f32 * self.font_size * 0.6;
        Size::new(width, self.line_height_px())
    }
}

impl Widget for Text {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(self.estimate_size())
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.draw_text(&self.content, self.bounds.origin(), &self.style());
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn accessible_role(&self) -> AccessibleRole {
        if self.tag == TextTag::Heading {
            AccessibleRole::Heading
        } else {
            AccessibleRole::Generic
        }
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Brick for Text {
    fn brick_name(&self) -> &'static str {
        "Text"
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

        if self.content.is_empty() {
            failed.push((BrickAssertion::TextVisible, "Text content is empty".into()));
        } else {
            passed.push(BrickAssertion::TextVisible);
        }
        passed.push(BrickAssertion::MaxLatencyMs(16));

        BrickVerification {
            passed,
            failed,
            verification_time: Duration::from_micros(10),
        }
    }

    fn to_html(&self) -> String {
        let tag = self.tag.name();
        format!(
            r#"<{tag} class="{}">{}</{tag}>"#,
            escape_html(&self.class_name),
            escape_html(&self.content)
        )
    }

    fn to_css(&self) -> String {
        format!(
            ".{} {{\n    color: {};\n    font-size: {}px;\n    font-weight: {};\n    line-height: {};\n}}",
            self.class_name,
            self.color.to_hex(),
            self.font_size,
            self.font_weight.css_weight(),
            self.line_height
        )
    }
}
