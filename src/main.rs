use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use chordtab::lookup::{suggest_fingerings, CachedLookup, FingeringLookup, MemoryLookup};
use chordtab::{render_song, sheet, Fingerings, RenderedLine, Song, TabError, TablatureDocument};

/// Lay out chord sheets with fingering annotations.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless CHORDTAB_LOG or RUST_LOG say otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lay out a chord sheet (.txt, .sheet) or tablature document (.yaml, .yml, .json)
    Render {
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// YAML map of chord name to fingering, merged over the song's own
        #[arg(long)]
        fingerings: Option<PathBuf>,

        /// Fill chords without a fingering from the fingering table
        #[arg(long)]
        suggest: bool,

        /// Extra fingering table (`instrument: { chord: [fingering, ...] }`)
        #[arg(long)]
        table: Option<PathBuf>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List candidate fingerings for a chord
    Fingerings {
        chord: String,

        #[arg(short, long, default_value = sheet::DEFAULT_INSTRUMENT)]
        instrument: String,

        /// Extra fingering table (`instrument: { chord: [fingering, ...] }`)
        #[arg(long)]
        table: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Markup,
    Json,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = chordtab::logging::init(cli.verbose) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let result = match cli.command {
        Command::Render {
            input,
            format,
            fingerings,
            suggest,
            table,
            output,
        } => render(&input, format, fingerings.as_deref(), suggest, table.as_deref())
            .and_then(|rendered| write_output(output.as_deref(), &rendered)),
        Command::Fingerings {
            chord,
            instrument,
            table,
        } => list_fingerings(&chord, &instrument, table.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn render(
    input: &Path,
    format: Format,
    fingerings_path: Option<&Path>,
    suggest: bool,
    table: Option<&Path>,
) -> Result<String, Box<dyn std::error::Error>> {
    let song = read_song(input)?;
    debug!(
        lines = song.tablature.lines.len(),
        chords = song.tablature.chord_count(),
        "read song"
    );

    let mut overrides = match fingerings_path {
        Some(path) => serde_yaml::from_str::<Fingerings>(&read_file(path)?)
            .map_err(|e| TabError::Document(e.to_string()))?,
        None => Fingerings::new(),
    };

    if suggest {
        let mut known = song.metadata.fingerings.clone();
        known.merge(overrides.clone());
        let mut lookup = CachedLookup::new(load_table(table)?);
        let failures = suggest_fingerings(
            &song.tablature,
            &song.metadata.instrument,
            &mut lookup,
            &mut known,
        );
        if !failures.is_empty() {
            info!(count = failures.len(), "some fingerings could not be suggested");
        }
        overrides = known;
    }

    let lines = render_song(song, &overrides);
    Ok(format_lines(&lines, format)?)
}

fn format_lines(lines: &[RenderedLine], format: Format) -> Result<String, serde_json::Error> {
    let out = match format {
        Format::Text => lines
            .iter()
            .map(RenderedLine::to_text)
            .collect::<Vec<_>>()
            .join("\n"),
        Format::Markup => lines
            .iter()
            .map(RenderedLine::to_markup)
            .collect::<Vec<_>>()
            .join("\n"),
        Format::Json => serde_json::to_string_pretty(lines)?,
    };
    Ok(out)
}

fn read_song(path: &Path) -> Result<Song, TabError> {
    let source = read_file(path)?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match extension {
        "json" => Ok(TablatureDocument::from_json(&source)?.into_song()),
        "yaml" | "yml" => Ok(TablatureDocument::from_yaml(&source)?.into_song()),
        _ => sheet::parse(&source),
    }
}

fn load_table(path: Option<&Path>) -> Result<MemoryLookup, TabError> {
    let mut lookup = MemoryLookup::with_guitar();
    if let Some(path) = path {
        lookup.merge(MemoryLookup::from_yaml(&read_file(path)?)?);
    }
    Ok(lookup)
}

fn list_fingerings(
    chord: &str,
    instrument: &str,
    table: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let lookup = load_table(table)?;
    let candidates = lookup.fetch(instrument, chord)?;
    if candidates.is_empty() {
        eprintln!("No fingerings for {} on {}", chord, instrument);
    }
    for fingering in candidates {
        println!("{}", fingering);
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, TabError> {
    fs::read_to_string(path).map_err(|source| TabError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: Option<&Path>, rendered: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            fs::write(path, format!("{}\n", rendered)).map_err(|source| TabError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            eprintln!("Wrote tablature to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
