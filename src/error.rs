//! Error types for import and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading scores or render settings.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// Reading a score file from disk failed
    #[error("Failed to read file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// MusicXML bytes are not valid UTF-8
    #[error("Invalid UTF-8 in MusicXML file: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Malformed XML
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Document is well-formed but not a partwise score
    #[error("Unsupported root element: '{0}'. Only 'score-partwise' is supported.")]
    UnsupportedRoot(String),

    /// The .mxl archive itself could not be opened
    #[error("Failed to open MXL archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// An entry inside the archive could not be read
    #[error("Failed to read '{name}' from MXL archive: {source}")]
    ArchiveEntry {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// container.xml exists but names no rootfile
    #[error("No rootfile found in container.xml")]
    MissingRootfile,

    /// Archive has neither container.xml nor a MusicXML entry
    #[error("No MusicXML file found in archive. Files: {0:?}")]
    NoMusicXml(Vec<String>),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Render settings failed validation
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),
}

/// Result type for score operations
pub type ScoreResult<T> = Result<T, ScoreError>;
