//! # Line Rendering
//!
//! Final step of the layout: a padded, flattened physical line becomes a
//! [`RenderedLine`], a list of styled text segments in column order. From there
//! it can be printed as plain text, as HTML-style markup for the song page, or
//! serialized to JSON.
//!
//! ## Markup
//! ```text
//! <span class="line">
//!   <span class="lyric">Hello</span>␣␣␣␣␣
//!   <span class="chord" data-chord-index="0">G</span>
//!   <span class="fingering" data-fingering-index="0" data-fingering-chord="G">(320003)</span>
//! </span>
//! ```
//! (shown wrapped; the real output is a single line). Padding is emitted as
//! bare text.

use quick_xml::escape::escape;
use serde::Serialize;

use crate::bit::{Bit, BitKind, PhysicalLine, Style, Tablature};
use crate::layout::{expand_all, Fingerings};

/// One styled run of text within a rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    /// For chords and fingerings: the chord number they belong to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chord_index: Option<usize>,
    /// For fingerings: the chord they belong to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chord: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedLine {
    pub segments: Vec<Segment>,
}

impl RenderedLine {
    /// Build a rendered line from bits, in ascending position order.
    ///
    /// The bits are expected to be padded and flattened already; a stray combo
    /// is rendered through its children.
    pub fn from_bits(bits: &[Bit]) -> Self {
        let mut ordered: Vec<&Bit> = bits.iter().collect();
        ordered.sort_by_key(|bit| bit.position);

        let mut segments = Vec::with_capacity(ordered.len());
        for bit in ordered {
            push_segments(bit, &mut segments);
        }
        RenderedLine { segments }
    }

    pub fn to_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::from(r#"<span class="line">"#);
        for segment in &self.segments {
            let text = escape(&segment.text);
            let Some(style) = segment.style else {
                out.push_str(&text);
                continue;
            };

            out.push_str(&format!(r#"<span class="{}""#, style.class()));
            match (style, segment.chord_index) {
                (Style::Chord, Some(index)) => {
                    out.push_str(&format!(r#" data-chord-index="{}""#, index));
                }
                (Style::Fingering, Some(index)) => {
                    out.push_str(&format!(r#" data-fingering-index="{}""#, index));
                }
                _ => {}
            }
            if let Some(chord) = &segment.chord {
                out.push_str(&format!(r#" data-fingering-chord="{}""#, escape(chord)));
            }
            out.push('>');
            out.push_str(&text);
            out.push_str("</span>");
        }
        out.push_str("</span>");
        out
    }
}

fn push_segments(bit: &Bit, segments: &mut Vec<Segment>) {
    let segment = match &bit.kind {
        BitKind::Text { text, style } => Segment {
            text: text.clone(),
            style: *style,
            chord_index: None,
            chord: None,
        },
        BitKind::Chord { name, index } => Segment {
            text: name.clone(),
            style: Some(Style::Chord),
            chord_index: *index,
            chord: None,
        },
        BitKind::Fingering { chord, index, .. } => Segment {
            text: bit.content().into_owned(),
            style: Some(Style::Fingering),
            chord_index: *index,
            chord: Some(chord.clone()),
        },
        BitKind::Combo { bits } => {
            for child in bits {
                push_segments(child, segments);
            }
            return;
        }
    };
    segments.push(segment);
}

pub fn render_line(line: &PhysicalLine) -> RenderedLine {
    RenderedLine::from_bits(line)
}

/// Lay out and render a whole tablature, one entry per output line, top to bottom.
pub fn render_tablature(tablature: Tablature, fingerings: &Fingerings) -> Vec<RenderedLine> {
    expand_all(tablature, fingerings)
        .iter()
        .map(render_line)
        .collect()
}
