//! Data model for a parsed score.
//!
//! Only the information the layout needs is kept: measures, their
//! alternate-ending bitmask, and the timed events of each voice.

use serde::{Deserialize, Serialize};

/// Number of alternate endings a measure can carry. Bit `i` of
/// [`Measure::alternate_endings`] stands for ending number `i + 1`.
pub const MAX_ALTERNATE_ENDINGS: u32 = 8;

/// A complete musical score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    /// Title of the piece
    pub title: Option<String>,
    /// Composer name
    pub composer: Option<String>,
    /// MusicXML version (e.g., "3.1", "4.0")
    pub version: Option<String>,
    /// Musical parts (instruments)
    pub parts: Vec<Part>,
}

/// A musical part (one instrument).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Part identifier (e.g., "P1")
    pub id: String,
    /// Part name (e.g., "Classical Guitar")
    pub name: String,
    /// Ordered list of measures
    pub measures: Vec<Measure>,
}

/// A single measure (bar) of music.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Measure {
    /// Measure number
    pub number: i32,
    /// Whether this is an implicit measure (e.g., pickup/anacrusis)
    pub implicit: bool,
    /// Bitmask of the repeat endings this measure belongs to
    pub alternate_endings: u8,
    /// Independent voices, ordered by voice number
    pub voices: Vec<Voice>,
}

/// An independent rhythmic line within a measure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    /// Voice number as written in the source (1-based)
    pub number: i32,
    /// Timed events in sequence order
    pub beats: Vec<Beat>,
}

/// A timed event: a rest or a note/chord at one position in a voice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    /// Onset from the start of the measure, in quarter notes
    pub start: f64,
    /// Duration in quarter notes
    pub duration: f64,
    /// Whether this beat is a rest
    pub rest: bool,
    /// Number of notes sounding on this beat (0 for rests)
    pub notes: usize,
}

impl Score {
    /// Create a new empty score.
    pub fn new() -> Self {
        Self {
            title: None,
            composer: None,
            version: None,
            parts: Vec::new(),
        }
    }

    /// Get the number of measures (taken from the first part).
    pub fn measure_count(&self) -> usize {
        self.parts.first().map_or(0, |p| p.measures.len())
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Measure {
    /// Create an empty measure with the given number.
    pub fn new(number: i32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// 1-based ending numbers this measure belongs to, ascending.
    pub fn alternate_ending_numbers(&self) -> Vec<u32> {
        (0..MAX_ALTERNATE_ENDINGS)
            .filter(|i| self.alternate_endings & (1 << i) != 0)
            .map(|i| i + 1)
            .collect()
    }

    /// Total length of the measure's content, in quarter notes.
    pub fn content_length(&self) -> f64 {
        self.voices
            .iter()
            .flat_map(|v| v.beats.iter())
            .map(|b| b.start + b.duration)
            .fold(0.0, f64::max)
    }
}
