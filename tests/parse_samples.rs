//! Integration tests: parse the sample files in the sheetmusic/ directory.

use std::io::{Cursor, Write};
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use voltalib::{parse_bytes, parse_file, parse_mxl, score_to_json, Score, ScoreError};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn sheetmusic_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sheetmusic")
}

fn volta_study_xml() -> String {
    std::fs::read_to_string(sheetmusic_dir().join("volta-study.musicxml"))
        .expect("Failed to read volta-study.musicxml")
}

/// Pack MusicXML into an in-memory .mxl archive.
fn build_mxl(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container>
  <rootfiles>
    <rootfile full-path="score.xml" media-type="application/vnd.recordare.musicxml+xml"/>
  </rootfiles>
</container>"#;

// ─── Uncompressed MusicXML (.musicxml) ──────────────────────────────

#[test]
fn parse_volta_study_musicxml() {
    let path = sheetmusic_dir().join("volta-study.musicxml");
    let score = parse_file(&path).expect("Failed to parse volta-study.musicxml");

    assert_score_volta_study(&score);
}

fn assert_score_volta_study(score: &Score) {
    assert_eq!(score.title.as_deref(), Some("Volta Study"));
    assert_eq!(score.composer.as_deref(), Some("Traditional"));
    assert_eq!(score.version.as_deref(), Some("4.0"));

    assert_eq!(score.parts.len(), 1);
    let part = &score.parts[0];
    assert_eq!(part.id, "P1");
    assert_eq!(part.name, "Violin");
    assert_eq!(part.measures.len(), 9);

    // 1st ending spans measures 5–6, 2nd/3rd ending spans 7–8
    let masks: Vec<u8> = part.measures.iter().map(|m| m.alternate_endings).collect();
    assert_eq!(masks, vec![0, 0, 0, 0, 0b001, 0b001, 0b110, 0b110, 0]);
    assert_eq!(part.measures[6].alternate_ending_numbers(), vec![2, 3]);

    // Beats per voice
    let beat_counts: Vec<usize> = part.measures[..4]
        .iter()
        .map(|m| m.voices[0].beats.len())
        .collect();
    assert_eq!(beat_counts, vec![4, 2, 8, 1]);

    let m7 = &part.measures[6];
    assert_eq!(m7.voices.len(), 2);
    assert_eq!(m7.voices[1].number, 2);
    assert_eq!(m7.voices[1].beats.len(), 2);
    assert_eq!(m7.voices[1].beats[0].notes, 2);
    assert_eq!(m7.voices[1].beats[1].start, 2.0);

    let m9 = &part.measures[8];
    assert!(m9.voices[0].beats[0].rest);
    assert_eq!(m9.content_length(), 4.0);
}

#[test]
fn parse_bytes_detects_xml_without_extension() {
    let xml = volta_study_xml();
    let score = parse_bytes(xml.as_bytes(), None).expect("Failed to auto-detect MusicXML");
    assert_score_volta_study(&score);
}

// ─── Compressed MXL (.mxl) ──────────────────────────────────────────

#[test]
fn parse_volta_study_mxl() {
    let xml = volta_study_xml();
    let data = build_mxl(&[("META-INF/container.xml", CONTAINER_XML), ("score.xml", &xml)]);

    let score = parse_mxl(&data).expect("Failed to parse MXL");
    assert_score_volta_study(&score);

    let detected = parse_bytes(&data, None).expect("Failed to auto-detect MXL");
    assert_eq!(detected.parts[0].measures.len(), 9);
}

#[test]
fn mxl_without_container_falls_back_to_xml_entry() {
    let xml = volta_study_xml();
    let data = build_mxl(&[("readme.txt", "hello"), ("volta.musicxml", &xml)]);
    let score = parse_bytes(&data, Some("mxl")).expect("Failed to parse MXL without container");
    assert_score_volta_study(&score);
}

#[test]
fn mxl_without_musicxml_is_an_error() {
    let data = build_mxl(&[("readme.txt", "hello")]);
    match parse_mxl(&data) {
        Err(ScoreError::NoMusicXml(names)) => assert_eq!(names, vec!["readme.txt".to_string()]),
        other => panic!("expected NoMusicXml, got {other:?}"),
    }
}

#[test]
fn container_without_rootfile_is_an_error() {
    let data = build_mxl(&[("META-INF/container.xml", "<container><rootfiles/></container>")]);
    assert!(matches!(parse_mxl(&data), Err(ScoreError::MissingRootfile)));
}

// ─── Errors & export ────────────────────────────────────────────────

#[test]
fn missing_file_reports_path() {
    let path = sheetmusic_dir().join("does-not-exist.musicxml");
    let err = parse_file(&path).unwrap_err();
    assert!(matches!(err, ScoreError::Io { .. }));
    assert!(err.to_string().contains("does-not-exist.musicxml"));
}

#[test]
fn invalid_utf8_is_rejected_for_xml_extension() {
    let err = parse_bytes(&[0x3c, 0xff, 0xfe], Some("musicxml")).unwrap_err();
    assert!(matches!(err, ScoreError::Utf8(_)));
}

#[test]
fn score_exports_to_json() {
    let score = parse_bytes(volta_study_xml().as_bytes(), Some("musicxml")).unwrap();
    let json = score_to_json(&score).expect("Failed to serialize score");
    assert!(json.contains("\"alternate_endings\": 6"));

    let back: Score = serde_json::from_str(&json).expect("Failed to read JSON back");
    assert_eq!(back.parts[0].measures[4].alternate_endings, 1);
}
