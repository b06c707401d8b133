//! End-to-end layout tests: scenarios and layout properties.

use super::*;
use crate::bit::{Bit, BitKind, PhysicalLine, Tablature, ENTRY_MARKER, PASS_MARKER};
use crate::render::RenderedLine;
use pretty_assertions::assert_eq;

fn guitar() -> Fingerings {
    [("C", "x32010"), ("G", "320003"), ("Am", "x02210"), ("F", "133211")]
        .into_iter()
        .collect()
}

fn text_lines(lines: &[PhysicalLine]) -> Vec<String> {
    lines
        .iter()
        .map(|line| RenderedLine::from_bits(line).to_text())
        .collect()
}

fn is_marker(bit: &Bit) -> bool {
    matches!(&bit.kind, BitKind::Text { text, .. } if text == ENTRY_MARKER || text == PASS_MARKER)
}

fn packed(line: Vec<Bit>) -> Vec<PhysicalLine> {
    let fingerings = guitar();
    pack(
        line.into_iter()
            .map(|bit| expand_fingering(bit, &fingerings))
            .collect(),
    )
}

#[test]
fn test_scenario_a_no_collision() {
    let lines = expand_line(vec![Bit::lyric(0, "Hello"), Bit::chord(10, "G")], &guitar());
    assert_eq!(text_lines(&lines), vec!["Hello     G(320003)"]);
    assert!(lines[0].iter().all(|bit| !is_marker(bit)));
}

#[test]
fn test_scenario_b_chords_collide() {
    let lines = expand_line(vec![Bit::chord(0, "C"), Bit::chord(2, "G")], &guitar());
    assert_eq!(text_lines(&lines), vec!["C(x32010)", "v G(320003)"]);
}

#[test]
fn test_scenario_c_empty_line() {
    let lines = expand_line(vec![], &guitar());
    assert_eq!(lines.len(), 1);
    assert_eq!(text_lines(&lines), vec![""]);
}

#[test]
fn test_scenario_d_unknown_chord() {
    let lines = expand_line(vec![Bit::chord(0, "Ebaug")], &guitar());
    assert_eq!(text_lines(&lines), vec!["Ebaug(UNKNOWN)"]);
}

#[test]
fn test_inline_chord_lifts_above_lyrics() {
    let lines = expand_line(
        vec![Bit::lyric(0, "Hello"), Bit::chord(6, "C"), Bit::lyric(8, "world")],
        &guitar(),
    );
    assert_eq!(text_lines(&lines), vec!["      C(x32010)", "Hello v world"]);
}

#[test]
fn test_expand_all_keeps_line_order() {
    let tab = Tablature::new(vec![
        vec![Bit::chord(0, "Am"), Bit::lyric(1, "here")],
        vec![],
        vec![Bit::lyric(0, "there")],
    ]);
    let lines = expand_all(tab, &guitar());
    assert_eq!(text_lines(&lines), vec!["Am(x02210)", "vhere", "", "there"]);
}

#[test]
fn test_zero_width_bit_shares_column_in_either_order() {
    for line in [
        vec![Bit::lyric(3, "abc"), Bit::lyric(3, "")],
        vec![Bit::lyric(3, ""), Bit::lyric(3, "abc")],
        vec![Bit::lyric(4, ""), Bit::lyric(3, "abc")],
    ] {
        let lines = expand_line(line, &guitar());
        assert_eq!(text_lines(&lines), vec!["   abc"]);
        assert!(lines[0].iter().all(|bit| !is_marker(bit)));
    }
}

#[test]
fn test_zero_width_bit_does_not_block_chord() {
    let lines = expand_line(vec![Bit::lyric(2, ""), Bit::chord(2, "G")], &guitar());
    assert_eq!(text_lines(&lines), vec!["  G(320003)"]);
}

#[test]
fn test_output_contains_only_leaves() {
    let lines = expand_line(
        vec![Bit::chord(0, "F"), Bit::chord(3, "C"), Bit::lyric(1, "oh")],
        &guitar(),
    );
    for line in &lines {
        assert!(line.iter().all(|bit| !bit.is_combo()));
    }
}

fn crowded_lines() -> Vec<Vec<Bit>> {
    vec![
        vec![
            Bit::lyric(0, "When I find myself"),
            Bit::chord(5, "C"),
            Bit::chord(12, "G"),
            Bit::lyric(20, "in times"),
        ],
        vec![Bit::chord(0, "Am"), Bit::chord(3, "F"), Bit::chord(6, "C"), Bit::chord(9, "G")],
        vec![
            Bit::lyric(0, "aaaa"),
            Bit::lyric(2, "bbbb"),
            Bit::lyric(4, "cc"),
            Bit::chord(30, "Am"),
        ],
    ]
}

#[test]
fn test_packed_lines_are_disjoint() {
    for line in crowded_lines() {
        for physical in packed(line) {
            for (i, a) in physical.iter().enumerate() {
                for b in &physical[i + 1..] {
                    assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }
}

#[test]
fn test_packing_preserves_positions() {
    let fingerings = guitar();
    for line in crowded_lines() {
        let mut expected: Vec<(usize, String)> = line
            .iter()
            .cloned()
            .map(|bit| expand_fingering(bit, &fingerings))
            .map(|bit| (bit.position, bit.content().into_owned()))
            .collect();
        expected.sort();

        let mut actual: Vec<(usize, String)> = packed(line)
            .iter()
            .flatten()
            .filter(|bit| !is_marker(bit))
            .map(|bit| (bit.position, bit.content().into_owned()))
            .collect();
        actual.sort();

        assert_eq!(actual, expected);
    }
}

#[test]
fn test_markers_under_every_displaced_bit() {
    for line in crowded_lines() {
        let lines = packed(line);
        let count = lines.len();
        for (row, physical) in lines.iter().enumerate() {
            // Accumulator index: 0 is the anchor (bottom) line.
            let level = count - 1 - row;
            for bit in physical.iter().filter(|bit| !is_marker(bit)) {
                for below in 0..level {
                    let markers: Vec<&Bit> = lines[count - 1 - below]
                        .iter()
                        .filter(|b| is_marker(b) && b.position == bit.position)
                        .collect();
                    assert_eq!(markers.len(), 1, "marker for {:?} on level {}", bit, below);
                    let expected = if below == 0 { ENTRY_MARKER } else { PASS_MARKER };
                    assert_eq!(markers[0].content(), expected);
                }
            }
        }
    }
}

#[test]
fn test_line_count_matches_overlap_depth() {
    // No overlap.
    assert_eq!(packed(vec![Bit::lyric(0, "ab"), Bit::lyric(2, "cd")]).len(), 1);
    // Two overlapping pairs that do not chain.
    assert_eq!(
        packed(vec![
            Bit::lyric(0, "abc"),
            Bit::lyric(1, "d"),
            Bit::lyric(10, "efg"),
            Bit::lyric(11, "h"),
        ])
        .len(),
        2
    );
    // Three bits all covering column 2.
    assert_eq!(
        packed(vec![
            Bit::lyric(0, "aaaaaa"),
            Bit::lyric(1, "bbbb"),
            Bit::lyric(2, "cc"),
        ])
        .len(),
        3
    );
}

#[test]
fn test_layout_is_deterministic() {
    let line = vec![Bit::lyric(4, "x"), Bit::chord(4, "G"), Bit::lyric(4, "y")];
    let first = text_lines(&expand_line(line.clone(), &guitar()));
    let second = text_lines(&expand_line(line, &guitar()));
    assert_eq!(first, second);
    assert_eq!(first, vec!["    y", "    G(320003)", "    x"]);
}

#[test]
fn test_lines_can_be_laid_out_in_parallel() {
    let fingerings = guitar();
    let sequential: Vec<Vec<String>> = crowded_lines()
        .into_iter()
        .map(|line| text_lines(&expand_line(line, &fingerings)))
        .collect();

    let parallel: Vec<Vec<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = crowded_lines()
            .into_iter()
            .map(|line| {
                let fingerings = &fingerings;
                scope.spawn(move || text_lines(&expand_line(line, fingerings)))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(parallel, sequential);
}
