//! Rendering tests: parse sample files and render to SVG.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use voltalib::{
    compute_measure_positions, parse_file, render_file_to_svg, render_score_to_svg,
    RenderSettings, Score,
};

fn sheetmusic_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sheetmusic")
}

fn output_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_output");
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn volta_study() -> Score {
    parse_file(sheetmusic_dir().join("volta-study.musicxml")).expect("Failed to parse volta-study")
}

fn without_endings(score: &Score) -> Score {
    let mut stripped = score.clone();
    for part in &mut stripped.parts {
        for measure in &mut part.measures {
            measure.alternate_endings = 0;
        }
    }
    stripped
}

#[test]
fn render_volta_study_svg() {
    let path = sheetmusic_dir().join("volta-study.musicxml");
    let svg = render_file_to_svg(&path, &RenderSettings::default()).expect("Failed to render volta-study");

    assert!(svg.starts_with("<svg"), "Output should be SVG");
    assert!(svg.contains("</svg>"), "SVG should be closed");
    assert!(svg.contains("Volta Study"), "SVG should contain title");

    // One label per bar inside an ending
    assert_eq!(svg.matches(">1. </text>").count(), 2);
    assert_eq!(svg.matches(">2. 3. </text>").count(), 2);

    let out = output_dir().join("volta-study.svg");
    std::fs::write(&out, &svg).expect("Failed to write SVG");
    println!("✓ Rendered volta-study.svg ({} bytes)", svg.len());
    println!("  Output: {}", out.display());
}

#[test]
fn score_without_endings_has_no_brackets() {
    let score = without_endings(&volta_study());
    let svg = render_score_to_svg(&score, &RenderSettings::default());
    assert!(!svg.contains(". </text>"), "no ending labels expected");
    assert!(svg.contains("<path"), "staff lines are still drawn");
}

#[test]
fn endings_do_not_change_measure_positions() {
    let score = volta_study();
    let settings = RenderSettings::default();

    let (with, _) = compute_measure_positions(&score, &settings);
    let (without, _) = compute_measure_positions(&without_endings(&score), &settings);
    assert_eq!(with, without);
    assert_eq!(with.len(), 9);
}

#[test]
fn endings_row_adds_height_only_where_used() {
    let score = volta_study();
    let settings = RenderSettings::default();

    let (measures, systems) = compute_measure_positions(&score, &settings);
    let (_, plain_systems) = compute_measure_positions(&without_endings(&score), &settings);
    assert_eq!(systems.len(), plain_systems.len());

    for (idx, (with, plain)) in systems.iter().zip(&plain_systems).enumerate() {
        let has_endings = measures
            .iter()
            .filter(|m| m.system_idx == idx)
            .any(|m| score.parts[0].measures[m.measure_idx].alternate_endings != 0);
        if has_endings {
            // top spacing 5 + words font 15 + bottom spacing 4
            assert_eq!(with.height, plain.height + 24.0);
        } else {
            assert_eq!(with.height, plain.height);
        }
    }
}

#[test]
fn measures_fill_each_system() {
    let settings = RenderSettings::default();
    let (measures, systems) = compute_measure_positions(&volta_study(), &settings);
    assert!(systems.len() > 1, "nine measures should not fit on one line");

    for idx in 0..systems.len() {
        let row: Vec<_> = measures.iter().filter(|m| m.system_idx == idx).collect();
        let first = row.first().expect("system without measures");
        let last = row.last().expect("system without measures");
        assert_eq!(first.x, 50.0);
        assert!((last.x + last.width - (settings.page_width - 30.0)).abs() < 1e-6);
    }
}

#[test]
fn scaled_render_uses_scaled_fonts() {
    let settings = RenderSettings::from_json(r#"{"scale": 2.0, "page_width": 1640}"#).unwrap();
    let svg = render_score_to_svg(&volta_study(), &settings);
    assert!(svg.contains(r#"font-size="30.0""#), "words font should be 15 × 2");

    let out = output_dir().join("volta-study-2x.svg");
    std::fs::write(&out, &svg).expect("Failed to write SVG");
}

#[test]
fn empty_score_renders_placeholder() {
    let svg = render_score_to_svg(&Score::new(), &RenderSettings::default());
    assert!(svg.contains("No parts in score"));
    let (measures, systems) = compute_measure_positions(&Score::new(), &RenderSettings::default());
    assert!(measures.is_empty() && systems.is_empty());
}
