//! voltalib: alternate ending (volta) rendering for music notation layouts.
//!
//! Reads MusicXML (.musicxml) and compressed MXL (.mxl) files, decodes the
//! repeat endings every measure belongs to, and renders the score as SVG
//! with ending brackets ("1. 2. ") above the staff.
//!
//! # Example
//! ```no_run
//! use voltalib::{parse_file, render_score_to_svg, RenderSettings};
//!
//! let score = parse_file("path/to/score.musicxml").unwrap();
//! for (i, m) in score.parts[0].measures.iter().enumerate() {
//!     println!("measure {}: endings {:?}", i + 1, m.alternate_ending_numbers());
//! }
//! let svg = render_score_to_svg(&score, &RenderSettings::default());
//! ```

pub mod error;
pub mod model;
pub mod mxl;
pub mod parser;
pub mod renderer;

use std::path::Path;

pub use error::{ScoreError, ScoreResult};
pub use model::*;
pub use mxl::parse_mxl;
pub use parser::parse_musicxml;
pub use renderer::{
    compute_measure_positions, render_score_to_svg, MeasurePosition, RenderSettings,
    SystemPosition,
};

/// Parse a MusicXML file from a file path.
/// Automatically detects format based on file extension:
/// - `.musicxml` or `.xml` → uncompressed MusicXML
/// - `.mxl` → compressed MXL (ZIP archive)
pub fn parse_file<P: AsRef<Path>>(path: P) -> ScoreResult<Score> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_bytes(&data, path.extension().and_then(|e| e.to_str()))
}

/// Parse MusicXML from raw bytes with an optional format hint.
/// If `extension` is None, tries to auto-detect the format.
pub fn parse_bytes(data: &[u8], extension: Option<&str>) -> ScoreResult<Score> {
    match extension {
        Some("mxl") => parse_mxl(data),
        Some("musicxml") | Some("xml") => parse_musicxml(std::str::from_utf8(data)?),
        _ => {
            // Auto-detect: try as XML first, then as MXL
            if let Ok(xml) = std::str::from_utf8(data) {
                if xml.trim_start().starts_with('<') {
                    return parse_musicxml(xml);
                }
            }
            parse_mxl(data)
        }
    }
}

/// Convert a parsed score to a JSON string.
pub fn score_to_json(score: &Score) -> ScoreResult<String> {
    Ok(serde_json::to_string_pretty(score)?)
}

/// Parse a MusicXML file and render it directly to SVG.
pub fn render_file_to_svg<P: AsRef<Path>>(path: P, settings: &RenderSettings) -> ScoreResult<String> {
    let score = parse_file(path)?;
    Ok(render_score_to_svg(&score, settings))
}

/// Parse MusicXML bytes and render to SVG.
pub fn render_bytes_to_svg(
    data: &[u8],
    extension: Option<&str>,
    settings: &RenderSettings,
) -> ScoreResult<String> {
    let score = parse_bytes(data, extension)?;
    Ok(render_score_to_svg(&score, settings))
}
