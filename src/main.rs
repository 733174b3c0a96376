//! fret-chord - name the chord formed by a guitar fingering
//!
//! Reads a fingering (lowest string first), a tuning and a notation scheme,
//! then prints the recognized chord with the notes that produced it.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fret_chord::{
    chord_matches, Analysis, ChordIdentification, Fingering, Fretboard, Notation, Tuning,
    BUILTIN_TUNINGS,
};

/// Command-line arguments for fret-chord
#[derive(Parser, Debug)]
#[command(name = "fret-chord")]
#[command(about = "Identify the chord formed by fretted notes in any tuning")]
#[command(version)]
struct Args {
    /// Frets from the lowest string up, e.g. `x32010` or `x 10 12 12 11 10`
    #[arg(required_unless_present = "list_tunings")]
    fingering: Option<Fingering>,

    /// Built-in tuning name or six notes from the lowest string, e.g. "D A D G B E"
    #[arg(short, long, default_value = "e-standard", env = "FRET_CHORD_TUNING")]
    tuning: Tuning,

    /// Note naming scheme: latin or anglo
    #[arg(short, long, default_value = "anglo", env = "FRET_CHORD_NOTATION")]
    notation: Notation,

    /// Also list every other reading of the notes
    #[arg(long)]
    all: bool,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,

    /// Print the built-in tunings and exit
    #[arg(long)]
    list_tunings: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fret_chord=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if args.list_tunings {
        for (name, tuning) in BUILTIN_TUNINGS {
            println!("{name:<12} {}", tuning_names(&tuning, args.notation));
        }
        return Ok(());
    }

    let fingering = args
        .fingering
        .context("a fingering is required")?;
    debug!(tuning = %args.tuning, fingering = %fingering, "analyzing");

    let board = Fretboard::new(args.tuning);
    let analysis = board
        .analyze(&fingering)
        .with_context(|| format!("cannot analyze `{fingering}`"))?;

    if args.json {
        let report = JsonReport {
            analysis,
            alternatives: if args.all {
                chord_matches(&analysis.notes)
                    .iter()
                    .map(|c| c.label(args.notation))
                    .collect()
            } else {
                Vec::new()
            },
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode analysis")?
        );
        return Ok(());
    }

    print_report(&board, &fingering, &analysis, args.notation, args.all);
    Ok(())
}

#[derive(serde::Serialize)]
struct JsonReport {
    #[serde(flatten)]
    analysis: Analysis,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    alternatives: Vec<String>,
}

fn tuning_names(tuning: &Tuning, notation: Notation) -> String {
    tuning
        .strings()
        .iter()
        .map(|pc| pc.name(notation))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_report(
    board: &Fretboard,
    fingering: &Fingering,
    analysis: &Analysis,
    notation: Notation,
    all: bool,
) {
    let id = &analysis.identification;
    match (id.label(notation), id) {
        (Some(label), ChordIdentification::SingleNote { .. }) => {
            println!("{label} (single note)");
        }
        (Some(label), ChordIdentification::PowerChord { .. }) => {
            println!("{label} (power chord)");
        }
        (Some(label), ChordIdentification::Matched(chord)) => {
            println!("{label} ({})", chord.quality);
        }
        _ => println!("no chord recognized"),
    }

    println!("notes:   {}", analysis.notes.names(notation));

    let strings: Vec<&str> = board
        .string_notes(fingering)
        .iter()
        .map(|pc| pc.map_or("x", |pc| pc.name(notation)))
        .collect();
    println!("strings: {}", strings.join(" "));

    if all {
        let readings = chord_matches(&analysis.notes);
        if readings.len() > 1 {
            let others: Vec<String> = readings[1..]
                .iter()
                .map(|c| c.label(notation))
                .collect();
            println!("also:    {}", others.join(", "));
        }
    }
}
