//! Shared constants for the score renderer (all in SVG user units, before scaling).

// ── Page & margins ──────────────────────────────────────────────────
pub(crate) const DEFAULT_PAGE_WIDTH: f64 = 820.0;
pub(crate) const PAGE_MARGIN_LEFT: f64 = 50.0;
pub(crate) const PAGE_MARGIN_RIGHT: f64 = 30.0;
pub(crate) const PAGE_MARGIN_TOP: f64 = 30.0;
pub(crate) const PAGE_MARGIN_BOTTOM: f64 = 40.0;

// ── Header ──────────────────────────────────────────────────────────
pub(crate) const HEADER_HEIGHT: f64 = 70.0; // space for title + composer

// ── Staff dimensions ────────────────────────────────────────────────
pub(crate) const STAFF_LINE_SPACING: f64 = 10.0; // distance between staff lines
pub(crate) const STAFF_HEIGHT: f64 = 40.0; // 5 lines, 4 spaces
pub(crate) const STAFF_TOP_SPACING: f64 = 16.0; // room for the measure number
pub(crate) const STAFF_BOTTOM_SPACING: f64 = 10.0;
pub(crate) const SYSTEM_SPACING: f64 = 40.0; // vertical space between systems
pub(crate) const PART_GAP: f64 = 30.0; // vertical gap between different parts/instruments
pub(crate) const STAFF_LINE_WIDTH: f64 = 0.8;
pub(crate) const BARLINE_WIDTH: f64 = 1.0;

// ── Alternate endings ───────────────────────────────────────────────
pub(crate) const ENDINGS_PADDING: f64 = 3.0; // label inset from the bracket
pub(crate) const ENDINGS_TOP_SPACING: f64 = 5.0;
pub(crate) const ENDINGS_BOTTOM_SPACING: f64 = 4.0;
pub(crate) const ENDINGS_LINE_WIDTH: f64 = 1.0;

// ── Beat spacing ────────────────────────────────────────────────────
pub(crate) const QUARTER_MIN_WIDTH: f64 = 55.0; // horizontal space per quarter note
pub(crate) const BEAT_MIN_WIDTH: f64 = 12.0; // narrowest slot a single beat may get
pub(crate) const BAR_PADDING_LEFT: f64 = 14.0;
pub(crate) const BAR_PADDING_RIGHT: f64 = 14.0;
pub(crate) const MIN_MEASURE_WIDTH: f64 = 38.0;

// ── Fonts ───────────────────────────────────────────────────────────
pub(crate) const SERIF_FONT: &str = "Georgia, 'Times New Roman', serif";
pub(crate) const WORDS_FONT_SIZE: f64 = 15.0;
pub(crate) const BAR_NUMBER_FONT_SIZE: f64 = 11.0;
pub(crate) const TITLE_FONT_SIZE: f64 = 22.0;

// ── Colors ──────────────────────────────────────────────────────────
pub(crate) const MAIN_GLYPH_COLOR: &str = "#1a1a1a";
pub(crate) const STAFF_COLOR: &str = "#555555";
pub(crate) const BARLINE_COLOR: &str = "#333333";
pub(crate) const BAR_NUMBER_COLOR: &str = "#555555";
