//! MusicXML parser: converts MusicXML XML into the Score data model.

use std::collections::BTreeMap;

use roxmltree::{Document, Node};

use crate::error::{ScoreError, ScoreResult};
use crate::model::*;

/// Parse a MusicXML XML string into a Score.
pub fn parse_musicxml(xml: &str) -> ScoreResult<Score> {
    // MusicXML files include a DOCTYPE declaration, so we must allow DTDs
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, options)?;
    let root = doc.root_element();

    if root.tag_name().name() != "score-partwise" {
        return Err(ScoreError::UnsupportedRoot(root.tag_name().name().to_string()));
    }

    let mut score = Score::new();
    score.version = root.attribute("version").map(String::from);

    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "work" => parse_work(&child, &mut score),
            "movement-title" => {
                if score.title.is_none() {
                    score.title = child.text().map(|t| t.trim().to_string());
                }
            }
            "identification" => parse_identification(&child, &mut score),
            "part-list" => parse_part_list(&child, &mut score),
            "part" => parse_part(&child, &mut score),
            _ => {}
        }
    }

    log::debug!(
        "parsed score: {} parts, {} measures",
        score.parts.len(),
        score.measure_count()
    );
    Ok(score)
}

// ─── Work / identification ───────────────────────────────────────────

fn parse_work(node: &Node, score: &mut Score) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "work-title" {
            score.title = child.text().map(|t| t.trim().to_string());
        }
    }
}

fn parse_identification(node: &Node, score: &mut Score) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "creator" && child.attribute("type") == Some("composer") {
            score.composer = child.text().map(|t| t.trim().to_string());
        }
    }
}

// ─── Part list ───────────────────────────────────────────────────────

fn parse_part_list(node: &Node, score: &mut Score) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "score-part" {
            let id = child.attribute("id").unwrap_or("").to_string();
            let name = child
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == "part-name")
                .and_then(|n| n.text())
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
            score.parts.push(Part {
                id,
                name,
                measures: Vec::new(),
            });
        }
    }
}

// ─── Part (measures) ─────────────────────────────────────────────────

/// Running state carried from one measure to the next within a part.
struct PartState {
    divisions: i32,
    /// Endings opened by a `start` mark and not yet closed
    open_endings: u8,
}

fn parse_part(node: &Node, score: &mut Score) {
    let part_id = node.attribute("id").unwrap_or("");

    let part = match score.parts.iter_mut().find(|p| p.id == part_id) {
        Some(p) => p,
        None => {
            log::warn!("part '{}' is not declared in the part-list, skipping", part_id);
            return;
        }
    };

    let mut state = PartState {
        divisions: 1,
        open_endings: 0,
    };

    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "measure" {
            part.measures.push(parse_measure(&child, &mut state));
        }
    }
}

// ─── Measure ─────────────────────────────────────────────────────────

/// A `<ending>` mark found on one of the measure's barlines.
struct EndingMark {
    mask: u8,
    closes: bool,
}

fn parse_measure(node: &Node, state: &mut PartState) -> Measure {
    let number = node
        .attribute("number")
        .and_then(|n| n.parse::<i32>().ok())
        .unwrap_or(0);
    let mut measure = Measure::new(number);
    measure.implicit = node.attribute("implicit") == Some("yes");

    // voice number → beats; BTreeMap keeps voices ordered by number
    let mut voices: BTreeMap<i32, Vec<Beat>> = BTreeMap::new();
    let mut marks: Vec<EndingMark> = Vec::new();
    let mut position: i32 = 0;

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "attributes" => {
                if let Some(d) = child
                    .children()
                    .find(|n| n.is_element() && n.tag_name().name() == "divisions")
                    .and_then(|n| parse_i32(&n))
                {
                    if d > 0 {
                        state.divisions = d;
                    }
                }
            }
            "note" => parse_note(&child, state.divisions, &mut position, &mut voices),
            "backup" => {
                let d = child_i32(&child, "duration").unwrap_or(0).max(0);
                position = position.saturating_sub(d).max(0);
            }
            "forward" => {
                let d = child_i32(&child, "duration").unwrap_or(0).max(0);
                position = position.saturating_add(d);
            }
            "barline" => {
                if let Some(mark) = parse_barline_ending(&child) {
                    marks.push(mark);
                }
            }
            _ => {}
        }
    }

    // Start marks open an ending on this measure; stop/discontinue marks
    // close it after this measure.
    let mut mask = state.open_endings;
    let mut closes = false;
    for mark in &marks {
        mask |= mark.mask;
        if mark.closes {
            closes = true;
        } else {
            state.open_endings = mark.mask;
        }
    }
    if closes {
        state.open_endings = 0;
    }
    measure.alternate_endings = mask;

    measure.voices = voices
        .into_iter()
        .map(|(number, beats)| Voice { number, beats })
        .collect();
    measure
}

// ─── Note ────────────────────────────────────────────────────────────

fn parse_note(
    node: &Node,
    divisions: i32,
    position: &mut i32,
    voices: &mut BTreeMap<i32, Vec<Beat>>,
) {
    let mut duration = 0;
    let mut voice = 1;
    let mut rest = false;
    let mut chord = false;
    let mut grace = false;

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "duration" => duration = parse_i32(&child).unwrap_or(0).max(0),
            "voice" => voice = parse_i32(&child).unwrap_or(1),
            "rest" => rest = true,
            "chord" => chord = true,
            "grace" => grace = true,
            _ => {}
        }
    }

    // Grace notes take no time and get no beat of their own
    if grace {
        return;
    }

    let beats = voices.entry(voice).or_default();
    if chord {
        if let Some(last) = beats.last_mut() {
            last.notes += 1;
            return;
        }
    }

    let quarters = |d: i32| d as f64 / divisions as f64;
    beats.push(Beat {
        start: quarters(*position),
        duration: quarters(duration),
        rest,
        notes: if rest { 0 } else { 1 },
    });
    *position = position.saturating_add(duration);
}

// ─── Barline ─────────────────────────────────────────────────────────

fn parse_barline_ending(node: &Node) -> Option<EndingMark> {
    let ending = node
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "ending")?;
    let number = ending.attribute("number").unwrap_or("1");
    let closes = matches!(ending.attribute("type"), Some("stop") | Some("discontinue"));

    let mut mask = 0u8;
    for n in parse_ending_numbers(number) {
        if n >= 1 && (n as u32) <= MAX_ALTERNATE_ENDINGS {
            mask |= 1 << (n - 1);
        } else {
            log::warn!(
                "ending number {} is outside 1..={}, ignoring",
                n,
                MAX_ALTERNATE_ENDINGS
            );
        }
    }
    Some(EndingMark { mask, closes })
}

/// Parse ending number string like "1", "2", "1, 2", or "1-3" into a vec of ints.
/// Supports comma-separated values and dash-separated ranges (e.g. "1-3" → [1,2,3]).
/// Ranges are clipped to `1..=MAX_ALTERNATE_ENDINGS`.
fn parse_ending_numbers(s: &str) -> Vec<i32> {
    let max = MAX_ALTERNATE_ENDINGS as i32;
    let mut result = Vec::new();
    for part in s.split(|c: char| c == ',' || c == ' ') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        // Only treat as range if dash is not at start (negative number)
        if let Some(dash_pos) = part.find('-').filter(|&p| p > 0) {
            if let (Ok(start), Ok(end)) = (
                part[..dash_pos].parse::<i32>(),
                part[dash_pos + 1..].parse::<i32>(),
            ) {
                let (lo, hi) = (start.max(1), end.min(max));
                if start <= end && (lo != start || hi != end) {
                    log::warn!(
                        "ending range {}-{} exceeds 1..={}, keeping {}-{}",
                        start,
                        end,
                        max,
                        lo,
                        hi
                    );
                }
                result.extend(lo..=hi);
                continue;
            }
        }
        if let Ok(n) = part.parse::<i32>() {
            result.push(n);
        }
    }
    result
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn parse_i32(node: &Node) -> Option<i32> {
    node.text()?.trim().parse().ok()
}

fn child_i32(node: &Node, name: &str) -> Option<i32> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| parse_i32(&n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn score_xml(measures: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="4.0">
  <work><work-title>Volta Test</work-title></work>
  <part-list><score-part id="P1"><part-name>Flute</part-name></score-part></part-list>
  <part id="P1">{measures}</part>
</score-partwise>"#
        )
    }

    const QUARTER: &str = "<note><pitch><step>C</step><octave>5</octave></pitch><duration>1</duration><voice>1</voice></note>";

    #[test]
    fn parse_ending_numbers_lists_and_ranges() {
        assert_eq!(parse_ending_numbers("1"), vec![1]);
        assert_eq!(parse_ending_numbers("1, 2"), vec![1, 2]);
        assert_eq!(parse_ending_numbers("1-3"), vec![1, 2, 3]);
        assert_eq!(parse_ending_numbers("x"), Vec::<i32>::new());
    }

    #[test]
    fn huge_ending_range_is_clipped() {
        assert_eq!(parse_ending_numbers("1-2000000000"), (1..=8).collect::<Vec<i32>>());
        assert_eq!(parse_ending_numbers("-5-3"), Vec::<i32>::new());
        assert_eq!(parse_ending_numbers("0-2"), vec![1, 2]);

        let xml = score_xml(&format!(
            r#"<measure number="1"><barline location="left"><ending number="1-2000000000" type="start"/></barline>{q}</measure>"#,
            q = QUARTER
        ));
        let score = parse_musicxml(&xml).unwrap();
        assert_eq!(score.parts[0].measures[0].alternate_endings, 0xff);
    }

    #[test]
    fn huge_durations_saturate_instead_of_overflowing() {
        let xml = score_xml(
            r#"<measure number="1">
  <attributes><divisions>1</divisions></attributes>
  <note><rest/><duration>2000000000</duration><voice>1</voice></note>
  <note><rest/><duration>2000000000</duration><voice>1</voice></note>
  <forward><duration>2000000000</duration></forward>
  <note><rest/><duration>2000000000</duration><voice>1</voice></note>
  <backup><duration>-5</duration></backup>
</measure>"#,
        );
        let score = parse_musicxml(&xml).unwrap();
        let beats = &score.parts[0].measures[0].voices[0].beats;
        assert_eq!(beats.len(), 3);
        assert_eq!(beats[1].start, 2_000_000_000.0);
        assert_eq!(beats[2].start, i32::MAX as f64);
    }

    #[test]
    fn ending_spans_from_start_to_stop() {
        let xml = score_xml(&format!(
            r#"<measure number="1"><attributes><divisions>1</divisions></attributes>{q}</measure>
<measure number="2"><barline location="left"><ending number="1" type="start"/></barline>{q}</measure>
<measure number="3">{q}<barline location="right"><ending number="1" type="stop"/></barline></measure>
<measure number="4"><barline location="left"><ending number="2, 3" type="start"/></barline>{q}<barline location="right"><ending number="2, 3" type="discontinue"/></barline></measure>
<measure number="5">{q}</measure>"#,
            q = QUARTER
        ));
        let score = parse_musicxml(&xml).unwrap();
        let masks: Vec<u8> = score.parts[0]
            .measures
            .iter()
            .map(|m| m.alternate_endings)
            .collect();
        assert_eq!(masks, vec![0b000, 0b001, 0b001, 0b110, 0b000]);
        assert_eq!(score.parts[0].measures[3].alternate_ending_numbers(), vec![2, 3]);
    }

    #[test]
    fn out_of_range_ending_numbers_are_ignored() {
        let xml = score_xml(&format!(
            r#"<measure number="1"><barline location="left"><ending number="0, 8, 9" type="start"/></barline>{q}<barline><ending number="8" type="stop"/></barline></measure>"#,
            q = QUARTER
        ));
        let score = parse_musicxml(&xml).unwrap();
        assert_eq!(score.parts[0].measures[0].alternate_endings, 0b1000_0000);
    }

    #[test]
    fn voices_and_chords_become_beats() {
        let xml = score_xml(
            r#"<measure number="1">
  <attributes><divisions>2</divisions></attributes>
  <note><pitch><step>C</step><octave>5</octave></pitch><duration>2</duration><voice>1</voice></note>
  <note><chord/><pitch><step>E</step><octave>5</octave></pitch><duration>2</duration><voice>1</voice></note>
  <note><grace/><pitch><step>D</step><octave>5</octave></pitch><voice>1</voice></note>
  <note><rest/><duration>2</duration><voice>1</voice></note>
  <backup><duration>4</duration></backup>
  <note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration><voice>2</voice></note>
</measure>"#,
        );
        let score = parse_musicxml(&xml).unwrap();
        let measure = &score.parts[0].measures[0];
        assert_eq!(measure.voices.len(), 2);

        let v1 = &measure.voices[0];
        assert_eq!(v1.number, 1);
        assert_eq!(v1.beats.len(), 2);
        assert_eq!(v1.beats[0].notes, 2);
        assert_eq!(v1.beats[0].duration, 1.0);
        assert!(v1.beats[1].rest);
        assert_eq!(v1.beats[1].start, 1.0);

        let v2 = &measure.voices[1];
        assert_eq!(v2.beats.len(), 1);
        assert_eq!(v2.beats[0].start, 0.0);
        assert_eq!(v2.beats[0].duration, 2.0);
        assert_eq!(measure.content_length(), 2.0);
    }

    #[test]
    fn rejects_timewise_scores() {
        let err = parse_musicxml("<score-timewise/>").unwrap_err();
        assert!(matches!(err, ScoreError::UnsupportedRoot(ref r) if r == "score-timewise"));
    }
}
