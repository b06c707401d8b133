//! Chord name recognition
//!
//! Decides whether a word in a chord sheet is a chord (`G`, `C#m7`, `D/F#`)
//! or lyric text. Recognized chords have the shape `<root><variant>[/<bass>]`.
//!
//! # Examples
//! ```
//! use chordtab::chord::{Chord, Key, Variant};
//!
//! let chord = Chord::parse("C#7/G#").unwrap();
//! assert_eq!(chord, Chord::new(Key::Db, Variant::Seventh, Key::Ab));
//! assert_eq!(chord.text(), "Db7/Ab");
//!
//! assert_eq!(Chord::parse("Hello"), None);
//! ```

use std::fmt;

/// The twelve pitch classes, spelled with flats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    Gb,
    G,
    Ab,
    A,
    Bb,
    B,
}

pub const ALL_KEYS: [Key; 12] = [
    Key::C,
    Key::Db,
    Key::D,
    Key::Eb,
    Key::E,
    Key::F,
    Key::Gb,
    Key::G,
    Key::Ab,
    Key::A,
    Key::Bb,
    Key::B,
];

impl Key {
    /// Accepts both sharp and flat spellings (`C#` and `Db`).
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "C" => Key::C,
            "C#" | "Db" => Key::Db,
            "D" => Key::D,
            "D#" | "Eb" => Key::Eb,
            "E" => Key::E,
            "F" => Key::F,
            "F#" | "Gb" => Key::Gb,
            "G" => Key::G,
            "G#" | "Ab" => Key::Ab,
            "A" => Key::A,
            "A#" | "Bb" => Key::Bb,
            "B" => Key::B,
            _ => return None,
        };
        Some(key)
    }

    pub const fn text(self) -> &'static str {
        match self {
            Key::C => "C",
            Key::Db => "Db",
            Key::D => "D",
            Key::Eb => "Eb",
            Key::E => "E",
            Key::F => "F",
            Key::Gb => "Gb",
            Key::G => "G",
            Key::Ab => "Ab",
            Key::A => "A",
            Key::Bb => "Bb",
            Key::B => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Major,
    Minor,
    Seventh,
    MinorSeventh,
    MinorSixth,
    SuspendedSecond,
    AddNinth,
    Diminished,
    Augmented,
}

pub const ALL_VARIANTS: [Variant; 9] = [
    Variant::Major,
    Variant::Minor,
    Variant::Seventh,
    Variant::MinorSeventh,
    Variant::MinorSixth,
    Variant::SuspendedSecond,
    Variant::AddNinth,
    Variant::Diminished,
    Variant::Augmented,
];

impl Variant {
    pub fn from_suffix(suffix: &str) -> Option<Variant> {
        ALL_VARIANTS.iter().copied().find(|v| v.text() == suffix)
    }

    pub const fn text(self) -> &'static str {
        match self {
            Variant::Major => "",
            Variant::Minor => "m",
            Variant::Seventh => "7",
            Variant::MinorSeventh => "m7",
            Variant::MinorSixth => "m6",
            Variant::SuspendedSecond => "sus2",
            Variant::AddNinth => "add9",
            Variant::Diminished => "dim",
            Variant::Augmented => "aug",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub root: Key,
    pub variant: Variant,
    /// Lowest note; equal to `root` unless written as a slash chord.
    pub bass: Key,
}

impl Chord {
    pub fn new(root: Key, variant: Variant, bass: Key) -> Self {
        Chord {
            root,
            variant,
            bass,
        }
    }

    pub fn simple(root: Key, variant: Variant) -> Self {
        Chord::new(root, variant, root)
    }

    /// Parse a whole word as a chord. Returns `None` for anything else.
    pub fn parse(source: &str) -> Option<Chord> {
        let (head, bass) = match source.split_once('/') {
            Some((head, bass)) => (head, Some(Key::from_name(bass)?)),
            None => (source, None),
        };
        let (root, suffix) = split_root(head)?;
        let variant = Variant::from_suffix(suffix)?;
        Some(Chord {
            root,
            variant,
            bass: bass.unwrap_or(root),
        })
    }

    /// Canonical spelling, with flats.
    pub fn text(&self) -> String {
        if self.root == self.bass {
            format!("{}{}", self.root.text(), self.variant.text())
        } else {
            format!(
                "{}{}/{}",
                self.root.text(),
                self.variant.text(),
                self.bass.text()
            )
        }
    }
}

/// Split the root note off the front of a chord name, preferring two-letter
/// spellings (`Bb` before `B`).
fn split_root(head: &str) -> Option<(Key, &str)> {
    if let Some(key) = head.get(..2).and_then(Key::from_name) {
        return Some((key, &head[2..]));
    }
    let key = head.get(..1).and_then(Key::from_name)?;
    Some((key, &head[1..]))
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
