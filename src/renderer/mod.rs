//! Score renderer: lays out a parsed Score and paints it as SVG.
//!
//! Every part is drawn as a plain five-line staff with an alternate
//! endings row above it. The endings row only shows up on systems where
//! at least one measure belongs to a repeat ending.

mod bar_renderer;
mod canvas;
mod constants;
mod endings;
mod glyphs;
mod layout;
mod resources;
mod staff;

use serde::{Deserialize, Serialize};

use crate::model::*;
use canvas::empty_svg;
use constants::*;
use layout::{compute_layout, paint_layout};

pub use bar_renderer::{BarBounds, BarRenderer, LayoutContext, StaffSpacing};
pub use canvas::{Canvas, SvgCanvas};
pub use endings::{decode_alternate_endings, AlternateEndingsBarRenderer};
pub use glyphs::{BarGlyphs, BeatContainerGlyph, BeatGlyph, BeatOnNoteGlyph, VoiceContainerGlyph};
pub use resources::{Font, FontStyle, RenderSettings, RenderingResources};
pub use staff::StaffBarRenderer;

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Render a parsed Score into a complete SVG string.
pub fn render_score_to_svg(score: &Score, settings: &RenderSettings) -> String {
    if score.parts.is_empty() {
        return empty_svg("No parts in score");
    }

    let resources = RenderingResources::from_settings(settings);
    let layout = compute_layout(score, settings, &resources);

    let mut svg = SvgCanvas::new(settings.page_width, layout.total_height);
    svg.fill_rect(0.0, 0.0, settings.page_width, layout.total_height, "white");
    render_header(&mut svg, score, settings.page_width, &resources);
    paint_layout(&layout, &mut svg, &resources);

    svg.build()
}

fn render_header(canvas: &mut dyn Canvas, score: &Score, page_width: f64, resources: &RenderingResources) {
    let Some(ref title) = score.title else {
        return;
    };
    // text is anchored at its left edge, so center by a rough width estimate
    let font = &resources.title_font;
    let approx_width = title.chars().count() as f64 * font.size * 0.5;
    canvas.set_font(font);
    canvas.set_color(&resources.main_glyph_color);
    canvas.fill_text(title, (page_width - approx_width) / 2.0, PAGE_MARGIN_TOP);

    if let Some(ref composer) = score.composer {
        let font = &resources.bar_number_font;
        let approx_width = composer.chars().count() as f64 * font.size * 0.5;
        canvas.set_font(font);
        canvas.fill_text(
            composer,
            page_width - PAGE_MARGIN_RIGHT - approx_width,
            PAGE_MARGIN_TOP + HEADER_HEIGHT / 2.0,
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Measure position helpers
// ═══════════════════════════════════════════════════════════════════════

/// Where one measure ended up on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurePosition {
    pub measure_idx: usize,
    pub system_idx: usize,
    pub x: f64,
    pub width: f64,
}

/// Vertical extent of one system (line of music).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemPosition {
    pub y: f64,
    pub height: f64,
}

/// Compute the visual position of each measure and system in the SVG
/// that [`render_score_to_svg`] would produce for the same settings.
pub fn compute_measure_positions(
    score: &Score,
    settings: &RenderSettings,
) -> (Vec<MeasurePosition>, Vec<SystemPosition>) {
    if score.parts.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let resources = RenderingResources::from_settings(settings);
    let layout = compute_layout(score, settings, &resources);

    let mut measures = Vec::new();
    let mut systems = Vec::with_capacity(layout.systems.len());
    for (system_idx, system) in layout.systems.iter().enumerate() {
        systems.push(SystemPosition {
            y: system.y,
            height: system.height,
        });
        let mut x = system.x;
        for (&measure_idx, &width) in system.measures.iter().zip(&system.column_widths) {
            measures.push(MeasurePosition {
                measure_idx,
                system_idx,
                x,
                width,
            });
            x += width;
        }
    }
    (measures, systems)
}
