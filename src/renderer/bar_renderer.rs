//! The bar renderer lifecycle shared by every row variant.
//!
//! A renderer is constructed from its measure, registers its beat glyphs
//! once, and is then laid out and painted any number of times, always in
//! that order. Everything it works on besides its own state (glyph
//! container, staff spacing, resources, canvas) is lent per call.

use super::canvas::Canvas;
use super::glyphs::{BarGlyphs, BeatContainerGlyph};
use super::resources::RenderingResources;
use crate::model::Measure;

/// Position and size of one renderer's row, relative to its staff.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BarBounds {
    /// Position of the renderer within its staff on the current system
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// Vertical space reserved above and below a staff's renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaffSpacing {
    pub top_spacing: f64,
    pub bottom_spacing: f64,
}

/// Everything a layout pass lends to a renderer.
pub struct LayoutContext<'a> {
    pub glyphs: &'a mut BarGlyphs,
    pub staff: &'a mut StaffSpacing,
    pub resources: &'a RenderingResources,
}

pub trait BarRenderer {
    fn bounds(&self) -> &BarBounds;

    fn bounds_mut(&mut self) -> &mut BarBounds;

    /// Whether the renderer has nothing to draw for its measure.
    fn is_empty(&self) -> bool;

    /// Register one beat container per timed event of every voice.
    fn create_beat_glyphs(&mut self, bar: &Measure, glyphs: &mut BarGlyphs);

    fn do_layout(&mut self, ctx: &mut LayoutContext<'_>);

    /// Paint relative to the containing offset `(cx, cy)`.
    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, resources: &RenderingResources);

    /// Stretch the renderer to a column width chosen by the layout.
    fn scale_to_width(&mut self, glyphs: &mut BarGlyphs, width: f64) {
        glyphs.scale_to_width(width);
        self.bounds_mut().width = width;
    }
}

/// Base layout step: lay out the beat glyphs and take their width.
pub(crate) fn layout_beat_glyphs(bounds: &mut BarBounds, ctx: &mut LayoutContext<'_>) {
    ctx.glyphs.do_layout(ctx.resources);
    bounds.width = ctx.glyphs.width;
    bounds.scale = ctx.resources.scale;
}

/// Placeholder beat glyphs for every voice of `bar`, aligned to its beats.
pub(crate) fn create_placeholder_glyphs(bar: &Measure, glyphs: &mut BarGlyphs) {
    for (v, voice) in bar.voices.iter().enumerate() {
        for (i, beat) in voice.beats.iter().enumerate() {
            let container = BeatContainerGlyph::new(beat, i, glyphs.get_or_create_voice_container(v));
            glyphs.add_beat_glyph(container);
        }
    }
}
