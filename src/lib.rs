pub mod bit;
pub mod chord;
pub mod error;
pub mod input;
pub mod layout;
pub mod logging;
pub mod lookup;
pub mod render;
pub mod sheet;

pub use bit::{Bit, BitKind, LogicalLine, PhysicalLine, Style, Tablature};
pub use error::*;
pub use input::TablatureDocument;
pub use layout::{expand_all, Fingerings};
pub use render::{render_tablature, RenderedLine, Segment};
pub use sheet::{Song, SongMetadata};

/// Lay out a song with its own fingerings, overridden by `overrides`.
pub fn render_song(song: Song, overrides: &Fingerings) -> Vec<RenderedLine> {
    let mut fingerings = song.metadata.fingerings;
    fingerings.merge(overrides.clone());
    render_tablature(song.tablature, &fingerings)
}

/// Parse and lay out a chord sheet.
/// This is the main entry point for the library.
pub fn render_sheet(source: &str, overrides: &Fingerings) -> Result<Vec<RenderedLine>, TabError> {
    let song = sheet::parse(source)?;
    Ok(render_song(song, overrides))
}
