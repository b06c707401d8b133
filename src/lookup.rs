//! # Fingering Lookup
//!
//! The layout engine only needs one display fingering per chord, taken from a
//! [`Fingerings`] map. Finding *candidate* fingerings for a chord on a given
//! instrument is the job of an outside collaborator, modeled here by the
//! [`FingeringLookup`] trait.
//!
//! ## Pieces
//! - [`FingeringLookup`] - `fetch(instrument, chord) -> candidates`
//! - [`MemoryLookup`] - table-backed lookup, loadable from YAML, with a
//!   built-in guitar table
//! - [`CachedLookup`] - memoizes successful fetches per (instrument, chord)
//! - [`ChordSelector`] - state behind a "pick a fingering" control: caches
//!   per chord, ignores results for a chord that is no longer selected, and
//!   cycles through candidates
//! - [`suggest_fingerings`] - fills chords missing from a map with the first
//!   candidate the lookup knows
//!
//! ## Selecting while a fetch is in flight
//! ```rust
//! use chordtab::lookup::{ChordSelector, FingeringLookup, MemoryLookup, Outcome};
//!
//! let lookup = MemoryLookup::with_guitar();
//! let mut selector = ChordSelector::new("guitar");
//!
//! let pending_c = selector.begin("C", "x32010").expect("not cached yet");
//! // The user picks another chord before the C lookup returns.
//! let pending_g = selector.begin("G", "320003").expect("not cached yet");
//!
//! let outcome = selector.complete(pending_c, lookup.fetch("guitar", "C"));
//! assert_eq!(outcome, Outcome::Stale);
//!
//! let outcome = selector.complete(pending_g, lookup.fetch("guitar", "G"));
//! assert_eq!(outcome, Outcome::Selected);
//! assert_eq!(selector.current(), Some("320003"));
//! ```

use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::bit::Tablature;
use crate::error::{LookupError, TabError};
use crate::layout::Fingerings;

pub trait FingeringLookup {
    /// Candidate fingerings for `chord` on `instrument`, best first.
    fn fetch(&self, instrument: &str, chord: &str) -> Result<Vec<String>, LookupError>;
}

/// Instrument name → chord name → candidate fingerings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MemoryLookup {
    instruments: HashMap<String, HashMap<String, Vec<String>>>,
}

const GUITAR_TABLE: &[(&str, &[&str])] = &[
    ("A", &["x02220", "577655"]),
    ("Am", &["x02210", "577555"]),
    ("A7", &["x02020", "575655"]),
    ("B", &["x24442", "799877"]),
    ("Bm", &["x24432", "799777"]),
    ("Bb", &["x13331", "688766"]),
    ("C", &["x32010", "x35553"]),
    ("C7", &["x32310"]),
    ("D", &["xx0232", "x57775"]),
    ("Dm", &["xx0231", "x57765"]),
    ("D7", &["xx0212"]),
    ("E", &["022100", "x79997"]),
    ("Em", &["022000", "x79987"]),
    ("E7", &["020100"]),
    ("F", &["133211", "xx3211"]),
    ("G", &["320003", "320033", "355433"]),
    ("G7", &["320001"]),
];

impl MemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Common open and barre shapes for a standard-tuned guitar.
    pub fn with_guitar() -> Self {
        let mut lookup = Self::new();
        for (chord, shapes) in GUITAR_TABLE {
            lookup.insert("guitar", chord, shapes.iter().map(|s| s.to_string()).collect());
        }
        lookup
    }

    /// Load a table of the form `instrument: { chord: [fingering, ...] }`.
    pub fn from_yaml(source: &str) -> Result<Self, TabError> {
        serde_yaml::from_str(source).map_err(|e| TabError::Document(e.to_string()))
    }

    pub fn insert(&mut self, instrument: &str, chord: &str, fingerings: Vec<String>) {
        self.instruments
            .entry(instrument.to_string())
            .or_default()
            .insert(chord.to_string(), fingerings);
    }

    /// Tables from `other` are added; chords it lists replace existing entries.
    pub fn merge(&mut self, other: MemoryLookup) {
        for (instrument, chords) in other.instruments {
            self.instruments.entry(instrument).or_default().extend(chords);
        }
    }

    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.instruments.keys().map(String::as_str)
    }
}

impl FingeringLookup for MemoryLookup {
    fn fetch(&self, instrument: &str, chord: &str) -> Result<Vec<String>, LookupError> {
        let table = self
            .instruments
            .get(instrument)
            .ok_or_else(|| LookupError::UnknownInstrument(instrument.to_string()))?;
        Ok(table.get(chord).cloned().unwrap_or_default())
    }
}

/// Remembers successful fetches. Failures are not cached so they can be retried.
#[derive(Debug)]
pub struct CachedLookup<L> {
    inner: L,
    cache: HashMap<(String, String), Vec<String>>,
}

impl<L: FingeringLookup> CachedLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    pub fn cached(&self, instrument: &str, chord: &str) -> Option<&[String]> {
        self.cache
            .get(&(instrument.to_string(), chord.to_string()))
            .map(Vec::as_slice)
    }

    pub fn fetch(&mut self, instrument: &str, chord: &str) -> Result<Vec<String>, LookupError> {
        let key = (instrument.to_string(), chord.to_string());
        if let Some(found) = self.cache.get(&key) {
            debug!(instrument, chord, "fingering cache hit");
            return Ok(found.clone());
        }
        let found = self.inner.fetch(instrument, chord)?;
        self.cache.insert(key, found.clone());
        Ok(found)
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

/// Fill in chords of `tablature` that `fingerings` does not cover, using the
/// first candidate from `lookup`. Chords the lookup cannot help with are left
/// alone (the layout shows its placeholder for them). Lookup failures are
/// returned, not raised.
pub fn suggest_fingerings<L: FingeringLookup>(
    tablature: &Tablature,
    instrument: &str,
    lookup: &mut CachedLookup<L>,
    fingerings: &mut Fingerings,
) -> Vec<LookupError> {
    let missing: BTreeSet<&str> = tablature
        .lines
        .iter()
        .flatten()
        .filter_map(|bit| bit.chord_name())
        .filter(|name| fingerings.get(name).is_none())
        .collect();

    let mut failures = Vec::new();
    for chord in missing {
        match lookup.fetch(instrument, chord) {
            Ok(candidates) => match candidates.into_iter().next() {
                Some(first) => fingerings.insert(chord, first),
                None => debug!(instrument, chord, "lookup has no fingering for chord"),
            },
            Err(err) => {
                warn!(error = %err, "fingering lookup failed");
                failures.push(err);
            }
        }
    }
    failures
}

/// A fetch started by [`ChordSelector::begin`] that has not completed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Pending {
    pub chord: String,
    current_fingering: String,
}

/// Result of [`ChordSelector::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Candidates are loaded and the chord's current fingering is selected.
    Selected,
    /// Another chord was selected meanwhile; the result was cached but not shown.
    Stale,
    /// The lookup failed; the chord keeps its current fingering.
    Failed(LookupError),
}

/// A new fingering picked for a chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingeringUpdate {
    pub chord: String,
    pub fingering: String,
}

impl FingeringUpdate {
    pub fn apply(&self, fingerings: &mut Fingerings) {
        fingerings.insert(self.chord.clone(), self.fingering.clone());
    }
}

/// State behind a control that lets the user pick a fingering for one chord
/// at a time.
#[derive(Debug)]
pub struct ChordSelector {
    instrument: String,
    current_chord: Option<String>,
    candidates: Vec<String>,
    selected: usize,
    loading: bool,
    cache: HashMap<String, Vec<String>>,
}

impl ChordSelector {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            current_chord: None,
            candidates: Vec::new(),
            selected: 0,
            loading: false,
            cache: HashMap::new(),
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn current_chord(&self) -> Option<&str> {
        self.current_chord.as_deref()
    }

    /// The selected fingering, once candidates are loaded.
    pub fn current(&self) -> Option<&str> {
        if self.loading {
            return None;
        }
        self.candidates.get(self.selected).map(String::as_str)
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Select `chord`, currently shown with `current_fingering`.
    ///
    /// Returns `None` when the candidates were cached and the selection is
    /// already resolved. Otherwise the caller fetches candidates for
    /// [`Pending::chord`] and hands them to [`complete`](Self::complete).
    pub fn begin(&mut self, chord: &str, current_fingering: &str) -> Option<Pending> {
        self.current_chord = Some(chord.to_string());
        if let Some(cached) = self.cache.get(chord).cloned() {
            debug!(chord, "fingerings cached");
            self.resolve(cached, current_fingering);
            return None;
        }
        self.loading = true;
        self.candidates.clear();
        self.selected = 0;
        Some(Pending {
            chord: chord.to_string(),
            current_fingering: current_fingering.to_string(),
        })
    }

    pub fn complete(
        &mut self,
        pending: Pending,
        result: Result<Vec<String>, LookupError>,
    ) -> Outcome {
        let is_current = self.current_chord.as_deref() == Some(pending.chord.as_str());
        match result {
            Ok(found) => {
                self.cache.insert(pending.chord.clone(), found.clone());
                if !is_current {
                    debug!(chord = %pending.chord, "discarding fingerings for deselected chord");
                    return Outcome::Stale;
                }
                self.resolve(found, &pending.current_fingering);
                Outcome::Selected
            }
            Err(err) => {
                if !is_current {
                    debug!(
                        chord = %pending.chord,
                        error = %err,
                        "lookup failed for deselected chord"
                    );
                    return Outcome::Stale;
                }
                warn!(error = %err, "could not load fingerings");
                self.resolve(Vec::new(), &pending.current_fingering);
                Outcome::Failed(err)
            }
        }
    }

    /// Begin, fetch, and complete in one go.
    pub fn load<L: FingeringLookup>(
        &mut self,
        lookup: &L,
        chord: &str,
        current_fingering: &str,
    ) -> Outcome {
        match self.begin(chord, current_fingering) {
            None => Outcome::Selected,
            Some(pending) => {
                let result = lookup.fetch(&self.instrument, &pending.chord);
                self.complete(pending, result)
            }
        }
    }

    /// Move the selection by `delta`, wrapping around, and report the new
    /// fingering for the current chord.
    pub fn step(&mut self, delta: isize) -> Option<FingeringUpdate> {
        if self.loading || self.candidates.is_empty() {
            return None;
        }
        let chord = self.current_chord.clone()?;
        let len = self.candidates.len();
        let offset = delta.rem_euclid(len as isize) as usize;
        self.selected = (self.selected + offset) % len;
        Some(FingeringUpdate {
            chord,
            fingering: self.candidates[self.selected].clone(),
        })
    }

    fn resolve(&mut self, mut candidates: Vec<String>, current_fingering: &str) {
        let selected = match candidates.iter().position(|c| c == current_fingering) {
            Some(index) => index,
            None => {
                candidates.insert(0, current_fingering.to_string());
                0
            }
        };
        self.candidates = candidates;
        self.selected = selected;
        self.loading = false;
    }
}
