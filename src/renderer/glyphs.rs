//! Beat layout glyphs: the per-beat slots a bar renderer registers so
//! that every staff of a measure column negotiates the same width.
//!
//! Glyphs here carry no ink. They only hold positions and widths; bar
//! renderers draw their own content relative to them.

use super::constants::*;
use super::resources::RenderingResources;
use crate::model::Beat;

/// Slot for everything drawn in front of the notes (accidentals, grace notes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeatGlyph {
    pub x: f64,
    pub width: f64,
}

/// Slot for the notes themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeatOnNoteGlyph {
    pub x: f64,
    pub width: f64,
}

/// One timed event of one voice, as seen by the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatContainerGlyph {
    pub voice_index: usize,
    pub beat_index: usize,
    /// Onset in quarter notes
    pub start: f64,
    /// Duration in quarter notes
    pub duration: f64,
    pub pre_notes: BeatGlyph,
    pub on_notes: BeatOnNoteGlyph,
    pub x: f64,
    pub width: f64,
    /// Narrowest width the content of this beat accepts
    pub min_width: f64,
}

impl BeatContainerGlyph {
    pub fn new(beat: &Beat, beat_index: usize, voice: &VoiceContainerGlyph) -> Self {
        Self {
            voice_index: voice.voice_index,
            beat_index,
            start: beat.start,
            duration: beat.duration,
            pre_notes: BeatGlyph::default(),
            on_notes: BeatOnNoteGlyph::default(),
            x: 0.0,
            width: 0.0,
            min_width: 0.0,
        }
    }

    pub fn do_layout(&mut self, scale: f64) {
        self.pre_notes.x = 0.0;
        self.on_notes.x = self.pre_notes.x + self.pre_notes.width;
        self.min_width = self.on_notes.x + self.on_notes.width + BEAT_MIN_WIDTH * scale;
    }
}

/// All beat containers of one voice within a bar.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceContainerGlyph {
    /// Position of the voice within its measure
    pub voice_index: usize,
    pub beat_glyphs: Vec<BeatContainerGlyph>,
    pub width: f64,
}

impl VoiceContainerGlyph {
    fn new(voice_index: usize) -> Self {
        Self {
            voice_index,
            beat_glyphs: Vec::new(),
            width: 0.0,
        }
    }
}

/// Beat glyph container for one bar renderer.
///
/// Owned by the layout, lent to the renderer while it registers its
/// beats and during every layout pass. Beats of all voices sit on one
/// time grid: `x = padding + start * quarter_width`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarGlyphs {
    voices: Vec<VoiceContainerGlyph>,
    padding_left: f64,
    padding_right: f64,
    quarter_width: f64,
    /// Length of the content in quarter notes
    length: f64,
    pub width: f64,
}

impl BarGlyphs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_voice_container(&mut self, voice_index: usize) -> &mut VoiceContainerGlyph {
        let pos = match self.voices.iter().position(|v| v.voice_index == voice_index) {
            Some(pos) => pos,
            None => {
                self.voices.push(VoiceContainerGlyph::new(voice_index));
                self.voices.len() - 1
            }
        };
        &mut self.voices[pos]
    }

    pub fn add_beat_glyph(&mut self, glyph: BeatContainerGlyph) {
        self.get_or_create_voice_container(glyph.voice_index)
            .beat_glyphs
            .push(glyph);
    }

    pub fn voices(&self) -> &[VoiceContainerGlyph] {
        &self.voices
    }

    pub fn beat_count(&self) -> usize {
        self.voices.iter().map(|v| v.beat_glyphs.len()).sum()
    }

    /// Lay out all beats at their narrowest spacing and compute the
    /// minimum bar width.
    pub fn do_layout(&mut self, resources: &RenderingResources) {
        let scale = resources.scale;
        self.padding_left = BAR_PADDING_LEFT * scale;
        self.padding_right = BAR_PADDING_RIGHT * scale;

        let mut quarter_width = QUARTER_MIN_WIDTH * scale;
        let mut length: f64 = 0.0;
        for beat in self.voices.iter_mut().flat_map(|v| v.beat_glyphs.iter_mut()) {
            beat.do_layout(scale);
            length = length.max(beat.start + beat.duration);
            if beat.duration > 0.0 {
                quarter_width = quarter_width.max(beat.min_width / beat.duration);
            }
        }
        self.quarter_width = quarter_width;
        self.length = length;
        self.width = (self.padding_left + length * quarter_width + self.padding_right)
            .max(MIN_MEASURE_WIDTH * scale);
        self.position_beats();
    }

    /// Stretch the time grid so the bar spans `width`.
    pub fn scale_to_width(&mut self, width: f64) {
        if self.length > 0.0 {
            let content = width - self.padding_left - self.padding_right;
            self.quarter_width = (content / self.length).max(0.0);
        }
        self.width = width;
        self.position_beats();
    }

    fn position_beats(&mut self) {
        for voice in &mut self.voices {
            for beat in &mut voice.beat_glyphs {
                beat.x = self.padding_left + beat.start * self.quarter_width;
                beat.width = (beat.duration * self.quarter_width).max(beat.min_width);
            }
            voice.width = voice
                .beat_glyphs
                .last()
                .map_or(0.0, |b| b.x + b.width);
        }
    }
}
