//! MXL file handler: reads compressed MusicXML (.mxl) archives.
//!
//! An .mxl file is a ZIP archive containing:
//!   - META-INF/container.xml : declares the root MusicXML file path
//!   - <rootfile>.xml         : the actual MusicXML content (e.g., score.xml)
//!   - (optional) other files : images, sounds, etc.

use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::{ScoreError, ScoreResult};
use crate::model::Score;
use crate::parser;

/// Read and parse a .mxl file from raw bytes.
pub fn parse_mxl(data: &[u8]) -> ScoreResult<Score> {
    let xml = extract_musicxml_from_mxl(data)?;
    parser::parse_musicxml(&xml)
}

/// Extract the MusicXML content string from .mxl bytes.
pub fn extract_musicxml_from_mxl(data: &[u8]) -> ScoreResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let root_file_path = find_root_file(&mut archive)?;
    log::debug!("MXL root file: {}", root_file_path);

    let mut root_file = archive.by_name(&root_file_path)?;
    let mut xml = String::new();
    root_file
        .read_to_string(&mut xml)
        .map_err(|source| ScoreError::ArchiveEntry {
            name: root_file_path.clone(),
            source,
        })?;

    Ok(xml)
}

/// Locate the root MusicXML file: container.xml first, then any
/// top-level .xml/.musicxml entry.
fn find_root_file(archive: &mut ZipArchive<Cursor<&[u8]>>) -> ScoreResult<String> {
    let container_xml = match archive.by_name("META-INF/container.xml") {
        Ok(mut container_file) => {
            let mut xml = String::new();
            container_file
                .read_to_string(&mut xml)
                .map_err(|source| ScoreError::ArchiveEntry {
                    name: "META-INF/container.xml".to_string(),
                    source,
                })?;
            Some(xml)
        }
        Err(_) => None,
    };

    if let Some(xml) = container_xml {
        let doc = roxmltree::Document::parse(&xml)?;
        return doc
            .descendants()
            .filter(|n| n.tag_name().name() == "rootfile")
            .find_map(|n| n.attribute("full-path"))
            .map(String::from)
            .ok_or(ScoreError::MissingRootfile);
    }

    let names: Vec<String> = archive.file_names().map(String::from).collect();
    let found = names
        .iter()
        .find(|name| {
            !name.starts_with("META-INF/")
                && (name.ends_with(".xml") || name.ends_with(".musicxml"))
        })
        .cloned();
    found.ok_or(ScoreError::NoMusicXml(names))
}
