//! # Error Types
//!
//! This module defines the error types for chordtab.
//!
//! The layout engine itself never fails: missing fingerings fall back to a
//! placeholder and malformed bits are dropped with a warning. Errors only come
//! from the edges: reading a song's frontmatter, deserializing a structured
//! tablature document, touching the filesystem, or asking the fingering
//! lookup collaborator for candidates.
//!
//! ## Error Types
//! - `Metadata` - Invalid YAML frontmatter in a chord sheet
//! - `Document` - A structured tablature document that failed to deserialize
//! - `Io` - File access from the CLI
//! - [`LookupError`] - Failures reported by a fingering lookup
//!
//! ## Usage
//! ```rust
//! use chordtab::{sheet, TabError};
//!
//! let source = "---\ntitle: [unclosed\n---\nC G";
//! match sheet::parse(source) {
//!     Ok(song) => println!("{} lines", song.tablature.lines.len()),
//!     Err(TabError::Metadata(message)) => eprintln!("Bad frontmatter: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    /// Invalid frontmatter in a chord sheet.
    ///
    /// # Example
    /// ```
    /// # use chordtab::TabError;
    /// let err = TabError::Metadata("unknown field `tempo`".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: unknown field `tempo`");
    /// ```
    #[error("Invalid metadata: {0}")]
    Metadata(String),

    /// A structured tablature document (YAML or JSON) could not be read.
    ///
    /// # Example
    /// ```
    /// # use chordtab::TabError;
    /// let err = TabError::Document("missing field `lines`".to_string());
    /// assert_eq!(err.to_string(), "Invalid tablature document: missing field `lines`");
    /// ```
    #[error("Invalid tablature document: {0}")]
    Document(String),

    /// Reading or writing a file failed.
    #[error("Could not access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by a fingering lookup.
///
/// These are kept apart from [`TabError`] because callers treat them as a
/// recoverable outcome: the layout carries on with the fingering it already has.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The lookup has no table for this instrument.
    ///
    /// # Example
    /// ```
    /// # use chordtab::LookupError;
    /// let err = LookupError::UnknownInstrument("banjo".to_string());
    /// assert_eq!(err.to_string(), "Unknown instrument: banjo");
    /// ```
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    /// The lookup could not be completed (service down, bad response, ...).
    #[error("Fingering lookup for {chord} on {instrument} failed: {reason}")]
    Unavailable {
        instrument: String,
        chord: String,
        reason: String,
    },
}
