//! Alternate endings (volta brackets) drawn above a measure.
//!
//! The row shows an L-shaped bracket across the bar with the ending
//! numbers ("1. 2. ") next to its left edge. Bars without endings still
//! register beat glyphs so the row lines up with the staff below it.

use super::bar_renderer::*;
use super::canvas::Canvas;
use super::constants::*;
use super::glyphs::BarGlyphs;
use super::resources::RenderingResources;
use crate::model::{Measure, MAX_ALTERNATE_ENDINGS};

/// 0-based ending positions set in `bits`, ascending.
///
/// Only bits `0..max_endings` are tested; anything above the bound (or
/// above the width of `bits`) is never read.
pub fn decode_alternate_endings(bits: u32, max_endings: u32) -> Vec<u32> {
    (0..max_endings.min(u32::BITS))
        .filter(|&i| bits & (1 << i) != 0)
        .collect()
}

pub struct AlternateEndingsBarRenderer {
    bounds: BarBounds,
    endings: Vec<u32>,
    endings_label: String,
    is_empty: bool,
}

impl AlternateEndingsBarRenderer {
    pub fn new(bar: &Measure) -> Self {
        let endings = decode_alternate_endings(bar.alternate_endings as u32, MAX_ALTERNATE_ENDINGS);
        log::trace!("measure {}: alternate endings {:?}", bar.number, endings);
        let is_empty = endings.is_empty();
        Self {
            bounds: BarBounds::default(),
            endings,
            endings_label: String::new(),
            is_empty,
        }
    }

    /// 0-based ending positions of this bar.
    pub fn endings(&self) -> &[u32] {
        &self.endings
    }

    /// Label built by the last layout pass, e.g. `"1. 2. "`.
    pub fn endings_label(&self) -> &str {
        &self.endings_label
    }
}

impl BarRenderer for AlternateEndingsBarRenderer {
    fn bounds(&self) -> &BarBounds {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut BarBounds {
        &mut self.bounds
    }

    fn is_empty(&self) -> bool {
        self.is_empty
    }

    fn create_beat_glyphs(&mut self, bar: &Measure, glyphs: &mut BarGlyphs) {
        // empty glyphs serve as alignment references and give the row its width
        create_placeholder_glyphs(bar, glyphs);
    }

    fn do_layout(&mut self, ctx: &mut LayoutContext<'_>) {
        layout_beat_glyphs(&mut self.bounds, ctx);
        if self.bounds.index == 0 {
            ctx.staff.top_spacing = ENDINGS_TOP_SPACING;
            ctx.staff.bottom_spacing = ENDINGS_BOTTOM_SPACING;
        }
        self.bounds.height = ctx.resources.words_font.size;

        self.endings_label = self
            .endings
            .iter()
            .map(|e| format!("{}. ", e + 1))
            .collect();
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, resources: &RenderingResources) {
        if self.endings.is_empty() {
            return;
        }
        let BarBounds { x, y, width, height, scale, .. } = self.bounds;

        canvas.set_color(&resources.main_glyph_color);
        canvas.set_line_width(ENDINGS_LINE_WIDTH * scale);
        canvas.set_font(&resources.words_font);
        canvas.move_to(cx + x, cy + y + height);
        canvas.line_to(cx + x, cy + y);
        canvas.line_to(cx + x + width, cy + y);
        canvas.stroke();

        // padding and y are scaled, x is not
        canvas.fill_text(&self.endings_label, cx + x + ENDINGS_PADDING * scale, cy + y * scale);
    }
}
