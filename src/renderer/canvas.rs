//! Drawing surface abstraction and the SVG implementation.

use super::resources::{Font, FontStyle};

/// Path-based drawing surface the bar renderers paint onto.
///
/// Coordinates are absolute user units. State (font, color, line width)
/// stays active until it is changed again.
pub trait Canvas {
    fn set_font(&mut self, font: &Font);
    fn set_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Stroke the current path and start a new one.
    fn stroke(&mut self);
    /// Draw text with its top-left corner at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

// ═══════════════════════════════════════════════════════════════════════
// SvgCanvas
// ═══════════════════════════════════════════════════════════════════════

/// Accumulates SVG elements and produces the final document string.
pub struct SvgCanvas {
    elements: Vec<String>,
    width: f64,
    height: f64,
    font: Option<Font>,
    color: String,
    line_width: f64,
    path: String,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
            font: None,
            color: "#000000".to_string(),
            line_width: 1.0,
            path: String::new(),
        }
    }

    /// Filled rectangle, used for the page background.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x, y, w, h, fill
        ));
    }

    /// Number of elements emitted so far.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl Canvas for SvgCanvas {
    fn set_font(&mut self, font: &Font) {
        self.font = Some(font.clone());
    }

    fn set_color(&mut self, color: &str) {
        self.color = color.to_string();
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        self.path.push_str(&format!("M{:.1},{:.1}", x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push_str(&format!(" L{:.1},{:.1}", x, y));
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let d = std::mem::take(&mut self.path);
        self.elements.push(format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{:.1}" stroke-linecap="square"/>"#,
            d, self.color, self.line_width
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let (family, size, style) = match &self.font {
            Some(f) => (f.family.as_str(), f.size, f.style),
            None => ("serif", 12.0, FontStyle::Plain),
        };
        let style_attr = match style {
            FontStyle::Plain => "",
            FontStyle::Bold => r#" font-weight="bold""#,
            FontStyle::Italic => r#" font-style="italic""#,
        };
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.1}"{} fill="{}" dominant-baseline="hanging" xml:space="preserve">{}</text>"#,
            x,
            y,
            escape_xml(family),
            size,
            style_attr,
            escape_xml(&self.color),
            escape_xml(text)
        ));
    }
}

/// Escape text for use in SVG character data and quoted attribute values.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ═══════════════════════════════════════════════════════════════════════
// Empty SVG fallback
// ═══════════════════════════════════════════════════════════════════════

pub(crate) fn empty_svg(message: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 100\">\
         <text x=\"200\" y=\"50\" text-anchor=\"middle\" font-size=\"14\" fill=\"gray\">{}</text>\
         </svg>",
        message
    )
}

// ═══════════════════════════════════════════════════════════════════════
// Recording canvas (tests)
// ═══════════════════════════════════════════════════════════════════════
