//! Render settings and the fonts/colors derived from them.

use serde::{Deserialize, Serialize};

use super::constants::*;
use crate::error::{ScoreError, ScoreResult};

/// User-facing render configuration.
///
/// Every field has a default, so a JSON document only needs to name the
/// values it overrides: `{"scale": 1.5}` is a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Global zoom applied to fonts and layout distances
    pub scale: f64,
    /// SVG width in user units
    pub page_width: f64,
    /// Font family used for labels and the header
    pub serif_font: String,
    /// Size of the alternate-ending label font at scale 1
    pub words_font_size: f64,
    /// Size of the measure-number font at scale 1
    pub bar_number_font_size: f64,
    /// Size of the title font at scale 1
    pub title_font_size: f64,
    /// Stretch every system to the full content width
    pub stretch_systems: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            page_width: DEFAULT_PAGE_WIDTH,
            serif_font: SERIF_FONT.to_string(),
            words_font_size: WORDS_FONT_SIZE,
            bar_number_font_size: BAR_NUMBER_FONT_SIZE,
            title_font_size: TITLE_FONT_SIZE,
            stretch_systems: true,
        }
    }
}

impl RenderSettings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> ScoreResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the layout cannot work with.
    pub fn validate(&self) -> ScoreResult<()> {
        let positive = [
            ("scale", self.scale),
            ("page_width", self.page_width),
            ("words_font_size", self.words_font_size),
            ("bar_number_font_size", self.bar_number_font_size),
            ("title_font_size", self.title_font_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ScoreError::InvalidSettings(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Plain,
    Bold,
    Italic,
}

/// A font as handed to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    /// Nominal size in user units (already scaled)
    pub size: f64,
    pub style: FontStyle,
}

impl Font {
    pub fn new(family: &str, size: f64, style: FontStyle) -> Self {
        Self {
            family: family.to_string(),
            size,
            style,
        }
    }
}

/// Fonts, colors and scale shared by all renderers during one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingResources {
    /// Font for alternate-ending labels and other words above the staff
    pub words_font: Font,
    pub bar_number_font: Font,
    pub title_font: Font,
    pub main_glyph_color: String,
    pub staff_line_color: String,
    pub bar_separator_color: String,
    pub bar_number_color: String,
    pub scale: f64,
}

impl RenderingResources {
    /// Default resources at the given scale.
    pub fn new(scale: f64) -> Self {
        Self::from_settings(&RenderSettings {
            scale,
            ..RenderSettings::default()
        })
    }

    /// Build resources from settings; font sizes are multiplied by the scale.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let scale = settings.scale;
        let family = settings.serif_font.as_str();
        Self {
            words_font: Font::new(family, settings.words_font_size * scale, FontStyle::Plain),
            bar_number_font: Font::new(family, settings.bar_number_font_size * scale, FontStyle::Italic),
            title_font: Font::new(family, settings.title_font_size * scale, FontStyle::Bold),
            main_glyph_color: MAIN_GLYPH_COLOR.to_string(),
            staff_line_color: STAFF_COLOR.to_string(),
            bar_separator_color: BARLINE_COLOR.to_string(),
            bar_number_color: BAR_NUMBER_COLOR.to_string(),
            scale,
        }
    }
}

impl Default for RenderingResources {
    fn default() -> Self {
        Self::new(1.0)
    }
}
