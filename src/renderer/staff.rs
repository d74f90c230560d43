//! Main staff row: five staff lines, barlines and the measure number
//! at the start of each system.

use super::bar_renderer::*;
use super::canvas::Canvas;
use super::constants::*;
use super::glyphs::BarGlyphs;
use super::resources::RenderingResources;
use crate::model::Measure;

pub struct StaffBarRenderer {
    bounds: BarBounds,
    measure_number: i32,
}

impl StaffBarRenderer {
    pub fn new(bar: &Measure) -> Self {
        Self {
            bounds: BarBounds::default(),
            measure_number: bar.number,
        }
    }
}

impl BarRenderer for StaffBarRenderer {
    fn bounds(&self) -> &BarBounds {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut BarBounds {
        &mut self.bounds
    }

    fn is_empty(&self) -> bool {
        false
    }

    fn create_beat_glyphs(&mut self, bar: &Measure, glyphs: &mut BarGlyphs) {
        create_placeholder_glyphs(bar, glyphs);
    }

    fn do_layout(&mut self, ctx: &mut LayoutContext<'_>) {
        layout_beat_glyphs(&mut self.bounds, ctx);
        self.bounds.height = STAFF_HEIGHT * ctx.resources.scale;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, resources: &RenderingResources) {
        let BarBounds { index, x, y, width, height, scale } = self.bounds;
        let left = cx + x;
        let right = left + width;
        let top = cy + y;

        canvas.set_color(&resources.staff_line_color);
        canvas.set_line_width(STAFF_LINE_WIDTH * scale);
        for i in 0..5 {
            let ly = top + i as f64 * STAFF_LINE_SPACING * scale;
            canvas.move_to(left, ly);
            canvas.line_to(right, ly);
        }
        canvas.stroke();

        canvas.set_color(&resources.bar_separator_color);
        canvas.set_line_width(BARLINE_WIDTH * scale);
        if index == 0 {
            canvas.move_to(left, top);
            canvas.line_to(left, top + height);
        }
        canvas.move_to(right, top);
        canvas.line_to(right, top + height);
        canvas.stroke();

        // Measure number at the start of each system line
        if index == 0 && self.measure_number > 1 {
            let font = &resources.bar_number_font;
            canvas.set_font(font);
            canvas.set_color(&resources.bar_number_color);
            canvas.fill_text(
                &self.measure_number.to_string(),
                left,
                top - font.size - 2.0 * scale,
            );
        }
    }
}
