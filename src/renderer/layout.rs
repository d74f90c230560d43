//! Layout computation: determines how measures are grouped into systems
//! and how every staff row is sized and positioned.
//!
//! Each part contributes two staves per system: the alternate-endings
//! row on top of the main staff. All rows of one measure column share a
//! width, so the endings bracket always spans exactly its bar.

use super::bar_renderer::*;
use super::canvas::Canvas;
use super::constants::*;
use super::endings::AlternateEndingsBarRenderer;
use super::glyphs::BarGlyphs;
use super::resources::{RenderSettings, RenderingResources};
use super::staff::StaffBarRenderer;
use crate::model::*;

// ═══════════════════════════════════════════════════════════════════════
// Layout structures
// ═══════════════════════════════════════════════════════════════════════

pub(crate) struct ScoreLayout {
    pub(crate) systems: Vec<SystemLayout>,
    pub(crate) total_height: f64,
}

pub(crate) struct SystemLayout {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) height: f64,
    /// Indices of the measures on this system
    pub(crate) measures: Vec<usize>,
    pub(crate) column_widths: Vec<f64>,
    pub(crate) staves: Vec<StaffLayout>,
}

/// Which row a staff renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StaffKind {
    AlternateEndings,
    Main,
}

impl StaffKind {
    const PER_PART: [StaffKind; 2] = [StaffKind::AlternateEndings, StaffKind::Main];

    fn create_renderer(self, bar: &Measure) -> Box<dyn BarRenderer> {
        match self {
            StaffKind::AlternateEndings => Box::new(AlternateEndingsBarRenderer::new(bar)),
            StaffKind::Main => Box::new(StaffBarRenderer::new(bar)),
        }
    }

    fn default_spacing(self, scale: f64) -> StaffSpacing {
        match self {
            StaffKind::AlternateEndings => StaffSpacing::default(),
            StaffKind::Main => StaffSpacing {
                top_spacing: STAFF_TOP_SPACING * scale,
                bottom_spacing: STAFF_BOTTOM_SPACING * scale,
            },
        }
    }
}

pub(crate) struct StaffLayout {
    pub(crate) kind: StaffKind,
    /// Offset from the system's top
    pub(crate) y: f64,
    pub(crate) height: f64,
    pub(crate) spacing: StaffSpacing,
    pub(crate) bars: Vec<BarSlot>,
}

impl StaffLayout {
    /// A staff whose renderers are all empty takes no space and is not painted.
    pub(crate) fn is_visible(&self) -> bool {
        self.bars.iter().any(|b| !b.renderer.is_empty())
    }
}

/// A renderer together with the beat glyphs it registered.
pub(crate) struct BarSlot {
    pub(crate) renderer: Box<dyn BarRenderer>,
    pub(crate) glyphs: BarGlyphs,
}

impl BarSlot {
    fn layout(&mut self, staff: &mut StaffSpacing, resources: &RenderingResources) {
        let mut ctx = LayoutContext {
            glyphs: &mut self.glyphs,
            staff,
            resources,
        };
        self.renderer.do_layout(&mut ctx);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Main layout computation
// ═══════════════════════════════════════════════════════════════════════

pub(crate) fn compute_layout(
    score: &Score,
    settings: &RenderSettings,
    resources: &RenderingResources,
) -> ScoreLayout {
    let scale = resources.scale;
    let content_width = settings.page_width - PAGE_MARGIN_LEFT - PAGE_MARGIN_RIGHT;
    let measure_count = score.measure_count();
    let staff_kinds: Vec<(usize, StaffKind)> = (0..score.parts.len())
        .flat_map(|p| StaffKind::PER_PART.into_iter().map(move |k| (p, k)))
        .collect();

    // ── Renderers per measure column; beat glyphs are created once ──
    let empty = Measure::default();
    let mut columns: Vec<Vec<BarSlot>> = (0..measure_count)
        .map(|mi| {
            staff_kinds
                .iter()
                .map(|&(p, kind)| {
                    let bar = score.parts[p].measures.get(mi).unwrap_or(&empty);
                    let mut renderer = kind.create_renderer(bar);
                    let mut glyphs = BarGlyphs::new();
                    renderer.create_beat_glyphs(bar, &mut glyphs);
                    BarSlot { renderer, glyphs }
                })
                .collect()
        })
        .collect();

    // ── Probe pass: minimum width of every column ──
    let min_widths: Vec<f64> = columns
        .iter_mut()
        .map(|column| {
            let mut scratch = StaffSpacing::default();
            column
                .iter_mut()
                .map(|slot| {
                    slot.layout(&mut scratch, resources);
                    slot.renderer.bounds().width
                })
                .fold(0.0, f64::max)
        })
        .collect();

    // ── Group measures into systems ──
    let mut system_groups: Vec<Vec<usize>> = Vec::new();
    let mut current_group: Vec<usize> = Vec::new();
    let mut current_width = 0.0;
    for (mi, &min_w) in min_widths.iter().enumerate() {
        if !current_group.is_empty() && current_width + min_w > content_width {
            system_groups.push(std::mem::take(&mut current_group));
            current_width = 0.0;
        }
        current_group.push(mi);
        current_width += min_w;
    }
    if !current_group.is_empty() {
        system_groups.push(current_group);
    }

    let has_header = score.title.is_some() || score.composer.is_some();
    let mut current_y = PAGE_MARGIN_TOP + if has_header { HEADER_HEIGHT } else { 0.0 };

    let mut columns = columns.into_iter();
    let mut systems = Vec::with_capacity(system_groups.len());

    for group in system_groups {
        let group_min: f64 = group.iter().map(|&mi| min_widths[mi]).sum();
        let stretch = if settings.stretch_systems && group_min > 0.0 {
            (content_width / group_min).max(1.0)
        } else {
            1.0
        };
        let column_widths: Vec<f64> = group.iter().map(|&mi| min_widths[mi] * stretch).collect();

        let mut staves: Vec<StaffLayout> = staff_kinds
            .iter()
            .map(|&(_, kind)| StaffLayout {
                kind,
                y: 0.0,
                height: 0.0,
                spacing: kind.default_spacing(scale),
                bars: Vec::with_capacity(group.len()),
            })
            .collect();
        for column in columns.by_ref().take(group.len()) {
            for (staff, slot) in staves.iter_mut().zip(column) {
                staff.bars.push(slot);
            }
        }

        // ── Final pass with indices for this system, then stretch ──
        for staff in &mut staves {
            let mut x = 0.0;
            for (j, slot) in staff.bars.iter_mut().enumerate() {
                slot.renderer.bounds_mut().index = j;
                slot.layout(&mut staff.spacing, resources);
                slot.renderer.scale_to_width(&mut slot.glyphs, column_widths[j]);
                slot.renderer.bounds_mut().x = x;
                x += column_widths[j];
            }
        }

        // ── Stack staves vertically ──
        let mut y = 0.0;
        for (s, staff) in staves.iter_mut().enumerate() {
            staff.y = y;
            if staff.is_visible() {
                let content = staff
                    .bars
                    .iter()
                    .map(|b| b.renderer.bounds().height)
                    .fold(0.0, f64::max);
                for slot in &mut staff.bars {
                    slot.renderer.bounds_mut().y = staff.spacing.top_spacing;
                }
                staff.height = staff.spacing.top_spacing + content + staff.spacing.bottom_spacing;
            }
            y += staff.height;

            let last_of_part = staff.kind == StaffKind::Main;
            if last_of_part && s + 1 < staff_kinds.len() {
                y += PART_GAP * scale;
            }
        }

        systems.push(SystemLayout {
            x: PAGE_MARGIN_LEFT,
            y: current_y,
            height: y,
            measures: group,
            column_widths,
            staves,
        });
        current_y += y + SYSTEM_SPACING * scale;
    }

    log::debug!(
        "layout: {} measures on {} systems, height {:.1}",
        measure_count,
        systems.len(),
        current_y
    );

    ScoreLayout {
        systems,
        total_height: current_y + PAGE_MARGIN_BOTTOM,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Painting
// ═══════════════════════════════════════════════════════════════════════

pub(crate) fn paint_layout(layout: &ScoreLayout, canvas: &mut dyn Canvas, resources: &RenderingResources) {
    for system in &layout.systems {
        for staff in system.staves.iter().filter(|s| s.is_visible()) {
            let cy = system.y + staff.y;
            for slot in &staff.bars {
                slot.renderer.paint(system.x, cy, canvas, resources);
            }
        }
    }
}
