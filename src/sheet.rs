//! # Chord Sheet Parser
//!
//! Reads a plain-text chord sheet into a [`Song`]: optional YAML frontmatter
//! plus one logical tablature line per source line.
//!
//! ## Format
//! ```text
//! ---
//! title: Let It Be
//! artist: The Beatles
//! instrument: guitar
//! fingerings:
//!   C: x32010
//!   G: "320003"
//! ---
//! When I find myself in C times of G trouble
//! ```
//!
//! Words that are chord names (see [`crate::chord`]) become chord bits at
//! their column; everything else on the line is lyric text. Consecutive lyric
//! words are kept together as a single bit, including the spaces between
//! them. The frontmatter block may appear anywhere in the file; the first
//! pair of `---` lines wins.
//!
//! Chords are numbered in reading order across the whole sheet so a UI can
//! match each chord with its fingering.

use serde::Deserialize;
use tracing::trace;

use crate::bit::{Bit, LogicalLine, Tablature};
use crate::chord::Chord;
use crate::error::TabError;
use crate::layout::Fingerings;

pub const DEFAULT_INSTRUMENT: &str = "guitar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub instrument: String,
    pub fingerings: Fingerings,
}

impl Default for SongMetadata {
    fn default() -> Self {
        Self {
            title: None,
            artist: None,
            instrument: DEFAULT_INSTRUMENT.to_string(),
            fingerings: Fingerings::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMetadata {
    title: Option<String>,
    artist: Option<String>,
    instrument: Option<String>,
    #[serde(default)]
    fingerings: Fingerings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub metadata: SongMetadata,
    pub tablature: Tablature,
}

/// Parse a chord sheet.
///
/// # Errors
/// Returns [`TabError::Metadata`] if the frontmatter is not valid YAML or has
/// unknown fields. The sheet body itself always parses.
pub fn parse(source: &str) -> Result<Song, TabError> {
    let (metadata_content, body) = split_frontmatter(source);

    let metadata = match metadata_content {
        Some(content) => parse_metadata(&content)?,
        None => SongMetadata::default(),
    };

    let mut chord_index = 0;
    let lines = body
        .into_iter()
        .map(|line| parse_line(line, &mut chord_index))
        .collect();

    Ok(Song {
        metadata,
        tablature: Tablature::new(lines),
    })
}

fn parse_metadata(content: &str) -> Result<SongMetadata, TabError> {
    if content.trim().is_empty() {
        return Ok(SongMetadata::default());
    }
    let raw: RawMetadata =
        serde_yaml::from_str(content).map_err(|e| TabError::Metadata(e.to_string()))?;
    Ok(SongMetadata {
        title: raw.title,
        artist: raw.artist,
        instrument: raw
            .instrument
            .unwrap_or_else(|| DEFAULT_INSTRUMENT.to_string()),
        fingerings: raw.fingerings,
    })
}

/// Split a sheet into its frontmatter (the lines between the first two `---`
/// fences) and its body lines. Body lines borrow from `source`.
pub(crate) fn split_frontmatter(source: &str) -> (Option<String>, Vec<&str>) {
    let lines: Vec<&str> = source.lines().collect();
    let mut fences = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == "---")
        .map(|(i, _)| i);

    match (fences.next(), fences.next()) {
        (Some(open), Some(close)) => {
            let body = lines[..open]
                .iter()
                .chain(&lines[close + 1..])
                .copied()
                .collect();
            (Some(lines[open + 1..close].join("\n")), body)
        }
        _ => (None, lines),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Whitespace,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    /// Column of the first character, counted in characters.
    column: usize,
}

/// Split a line into alternating runs of whitespace and non-whitespace.
fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut start = 0;
    let mut start_column = 0;
    let mut current: Option<TokenKind> = None;

    for (column, (offset, c)) in line.char_indices().enumerate() {
        let kind = if c.is_whitespace() {
            TokenKind::Whitespace
        } else {
            TokenKind::Word
        };
        if current != Some(kind) {
            if let Some(previous) = current {
                tokens.push(Token {
                    kind: previous,
                    text: &line[start..offset],
                    column: start_column,
                });
            }
            current = Some(kind);
            start = offset;
            start_column = column;
        }
    }
    if let Some(kind) = current {
        tokens.push(Token {
            kind,
            text: &line[start..],
            column: start_column,
        });
    }
    tokens
}

/// Lyric words collected until the next chord or the end of the line.
#[derive(Default)]
struct LyricRun {
    column: usize,
    text: String,
    /// Whitespace seen since the last word; only kept if another word follows.
    pending_space: String,
}

impl LyricRun {
    fn push_word(&mut self, word: &str, column: usize) {
        if self.text.is_empty() {
            self.column = column;
        } else {
            self.text.push_str(&self.pending_space);
        }
        self.pending_space.clear();
        self.text.push_str(word);
    }

    fn push_space(&mut self, space: &str) {
        if !self.text.is_empty() {
            self.pending_space.push_str(space);
        }
    }

    fn flush_into(&mut self, line: &mut LogicalLine) {
        if !self.text.is_empty() {
            line.push(Bit::lyric(self.column, std::mem::take(&mut self.text)));
        }
        self.pending_space.clear();
    }
}

fn parse_line(source: &str, chord_index: &mut usize) -> LogicalLine {
    let mut line = LogicalLine::new();
    let mut lyric = LyricRun::default();

    for token in tokenize(source) {
        match token.kind {
            TokenKind::Whitespace => lyric.push_space(token.text),
            TokenKind::Word => {
                if let Some(chord) = Chord::parse(token.text) {
                    trace!(chord = %chord, column = token.column, "found chord");
                    lyric.flush_into(&mut line);
                    line.push(Bit::indexed_chord(token.column, token.text, *chord_index));
                    *chord_index += 1;
                } else {
                    lyric.push_word(token.text, token.column);
                }
            }
        }
    }
    lyric.flush_into(&mut line);

    line
}
