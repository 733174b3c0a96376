//! # fret_chord
//!
//! Name the chord under your fingers: resolve fretted notes on a six-string
//! instrument in any tuning to pitch classes, then match them against a fixed
//! catalog of chord patterns.
//!
//! ## Example
//! ```rust
//! use fret_chord::{Fretboard, Notation, Tuning};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Pick a tuning (lowest string first)
//!     let board = Fretboard::new(Tuning::E_STANDARD);
//!
//!     // 2) Parse a fingering: muted low E, then frets 3 2 0 1 0
//!     let fingering = "x32010".parse()?;
//!
//!     // 3) Resolve and identify
//!     let analysis = board.analyze(&fingering)?;
//!     assert_eq!(
//!         analysis.identification.label(Notation::Anglo).as_deref(),
//!         Some("C")
//!     );
//!     println!(
//!         "{} ({})",
//!         analysis.identification.label(Notation::Latin).unwrap_or_default(),
//!         analysis.notes.names(Notation::Latin)
//!     );
//!
//!     Ok(())
//! }
//! # run().unwrap();
//! ```
//!
//! The two core functions are also usable on their own:
//! ```rust
//! use fret_chord::{identify_chord, resolve_pitch_class, ChordIdentification, PitchClass};
//!
//! let b = resolve_pitch_class(PitchClass::A, 2);
//! let notes = [PitchClass::E, b].into_iter().collect();
//! assert_eq!(
//!     identify_chord(&notes),
//!     Ok(ChordIdentification::PowerChord { root: PitchClass::E })
//! );
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// High‐level chord recognition API.
pub use chord_recognizer::{
    chord_matches, identify_chord, Chord, ChordError, ChordIdentification, ChordKind,
    ChordRecognizer,
};

/// Tunings, fingerings and analysis.
pub use fretboard::{
    Analysis, AnalysisError, Fingering, Fretboard, FretboardError, ParseTuningError, PlayedNote,
    Tuning, BUILTIN_TUNINGS, MAX_FRET, STRINGS,
};

/// Pitch classes and naming.
pub use pitch::{
    resolve_pitch_class, Notation, ParseNotationError, ParseNoteError, PitchClass, PitchClassSet,
    SEMITONES,
};

/// Pitch class module.
pub mod pitch;

/// Chord recognition module.
pub mod chord_recognizer;

/// Fretboard input module.
pub mod fretboard;
