//! Fretboard
//!
//! Tunings, fingerings and the validation that keeps out-of-range frets away
//! from the pitch resolver. Strings are always ordered from the lowest-pitched
//! (index 0) to the highest, for tunings and fingerings alike.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::chord_recognizer::{identify_chord, ChordError, ChordIdentification};
use crate::pitch::{resolve_pitch_class, ParseNoteError, PitchClass, PitchClassSet};

/// Number of strings on the instrument.
pub const STRINGS: usize = 6;

/// Highest playable fret.
pub const MAX_FRET: u8 = 24;

const fn pcs(values: [u8; STRINGS]) -> [PitchClass; STRINGS] {
    let mut out = [PitchClass::C; STRINGS];
    let mut i = 0;
    while i < STRINGS {
        out[i] = PitchClass::new(values[i]);
        i += 1;
    }
    out
}

/// Built-in tunings by name, lowest string first.
pub const BUILTIN_TUNINGS: [(&str, Tuning); 6] = [
    ("e-standard", Tuning::E_STANDARD),
    ("drop-d", Tuning(pcs([2, 9, 2, 7, 11, 4]))),
    ("d-standard", Tuning(pcs([2, 7, 0, 5, 9, 2]))),
    ("drop-c", Tuning(pcs([0, 7, 0, 5, 9, 2]))),
    ("drop-b", Tuning(pcs([11, 6, 11, 4, 8, 1]))),
    ("drop-a", Tuning(pcs([9, 4, 9, 2, 6, 11]))),
];

/// Errors raised while validating or parsing fretboard input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FretboardError {
    /// A fret number above [`MAX_FRET`].
    #[error("string {index}: fret {fret} is out of range 0..={max}")]
    FretOutOfRange {
        /// Zero-based string index, lowest string first.
        index: usize,
        /// The rejected fret.
        fret: u8,
        /// The highest allowed fret.
        max: u8,
    },

    /// Text that is neither a fret number nor a mute marker.
    #[error("string {index}: invalid fret `{input}`")]
    InvalidFret {
        /// Zero-based string index, lowest string first.
        index: usize,
        /// The offending text.
        input: String,
    },

    /// The wrong number of strings was given.
    #[error("expected {expected} strings, got {got}")]
    WrongStringCount {
        /// Always [`STRINGS`].
        expected: usize,
        /// Number of strings supplied.
        got: usize,
    },
}

/// Open-string pitch classes, lowest string first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tuning([PitchClass; STRINGS]);

impl Tuning {
    /// Standard tuning: E A D G B E.
    pub const E_STANDARD: Tuning = Tuning(pcs([4, 9, 2, 7, 11, 4]));

    /// Create a tuning from open-string pitch classes, lowest string first.
    pub const fn new(strings: [PitchClass; STRINGS]) -> Self {
        Tuning(strings)
    }

    /// Open-string pitch classes.
    pub const fn strings(&self) -> &[PitchClass; STRINGS] {
        &self.0
    }

    /// Look up a built-in tuning, ignoring case.
    pub fn builtin(name: &str) -> Option<Tuning> {
        BUILTIN_TUNINGS
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
            .map(|&(_, tuning)| tuning)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning::E_STANDARD
    }
}

impl Display for Tuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&names.join(" "))
    }
}

/// Errors when parsing a tuning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTuningError {
    /// Neither a built-in name nor six notes.
    #[error("expected a built-in tuning name or {expected} notes, got {got} notes")]
    StringCount {
        /// Always [`STRINGS`].
        expected: usize,
        /// Number of notes found.
        got: usize,
    },

    /// One of the notes did not parse.
    #[error(transparent)]
    Note(#[from] ParseNoteError),
}

impl FromStr for Tuning {
    type Err = ParseTuningError;

    /// Accepts a built-in name (`drop-d`) or six notes (`D A D G B E`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(tuning) = Tuning::builtin(s) {
            return Ok(tuning);
        }
        let notes = split_tokens(s)
            .map(str::parse::<PitchClass>)
            .collect::<Result<Vec<_>, _>>()?;
        let got = notes.len();
        let strings: [PitchClass; STRINGS] = notes.try_into().map_err(|_| {
            ParseTuningError::StringCount {
                expected: STRINGS,
                got,
            }
        })?;
        Ok(Tuning(strings))
    }
}

/// What a single string does.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum PlayedNote {
    /// Not played. Distinct from an open string, which is `Fret(0)`.
    #[default]
    Muted,
    /// Stopped at the given fret; 0 is the open string.
    Fret(u8),
}

impl PlayedNote {
    /// Parse the text for string `index`: empty or `x` mutes, digits give a fret.
    pub fn parse(index: usize, input: &str) -> Result<PlayedNote, FretboardError> {
        let raw = input.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("x") {
            return Ok(PlayedNote::Muted);
        }
        let fret: u8 = raw.parse().map_err(|_| FretboardError::InvalidFret {
            index,
            input: raw.to_string(),
        })?;
        PlayedNote::Fret(fret).validate(index)
    }

    fn validate(self, index: usize) -> Result<PlayedNote, FretboardError> {
        match self {
            PlayedNote::Fret(fret) if fret > MAX_FRET => Err(FretboardError::FretOutOfRange {
                index,
                fret,
                max: MAX_FRET,
            }),
            note => Ok(note),
        }
    }
}

impl Display for PlayedNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayedNote::Muted => f.write_str("x"),
            PlayedNote::Fret(n) => write!(f, "{n}"),
        }
    }
}

/// One played note per string, lowest string first.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fingering([PlayedNote; STRINGS]);

impl Fingering {
    /// Create a fingering, lowest string first.
    pub const fn new(notes: [PlayedNote; STRINGS]) -> Self {
        Fingering(notes)
    }

    /// Per-string notes.
    pub const fn notes(&self) -> &[PlayedNote; STRINGS] {
        &self.0
    }
}

impl FromStr for Fingering {
    type Err = FretboardError;

    /// `x32010` (one character per string) or `x 3 2 0 1 0` / `x,10,12,12,11,x`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let separated = trimmed.contains(|c: char| c.is_whitespace() || c == ',');
        let tokens: Vec<&str> = if separated {
            split_tokens(trimmed).collect()
        } else {
            trimmed
                .char_indices()
                .map(|(i, c)| &trimmed[i..i + c.len_utf8()])
                .collect()
        };

        if tokens.len() != STRINGS {
            return Err(FretboardError::WrongStringCount {
                expected: STRINGS,
                got: tokens.len(),
            });
        }

        let mut notes = [PlayedNote::Muted; STRINGS];
        for (index, (slot, token)) in notes.iter_mut().zip(tokens).enumerate() {
            *slot = PlayedNote::parse(index, token)?;
        }
        Ok(Fingering(notes))
    }
}

impl Display for Fingering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compact = self
            .0
            .iter()
            .all(|n| !matches!(n, PlayedNote::Fret(fret) if *fret > 9));
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        if compact {
            f.write_str(&parts.concat())
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

fn split_tokens(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
}

/// Everything learned from one fingering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Distinct sounding pitch classes, ascending.
    pub notes: PitchClassSet,
    /// The recognized chord.
    pub identification: ChordIdentification,
}

/// Errors from [`Fretboard::analyze`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The fingering failed validation.
    #[error(transparent)]
    Fretboard(#[from] FretboardError),

    /// No string was played.
    #[error(transparent)]
    Chord(#[from] ChordError),
}

/// A tuned instrument that turns fingerings into pitch classes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Fretboard {
    tuning: Tuning,
}

impl Fretboard {
    /// Create a fretboard with the given tuning.
    pub const fn new(tuning: Tuning) -> Self {
        Fretboard { tuning }
    }

    /// The tuning in use.
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Check every fret against [`MAX_FRET`].
    pub fn validate(&self, fingering: &Fingering) -> Result<(), FretboardError> {
        for (index, note) in fingering.0.iter().enumerate() {
            note.validate(index)?;
        }
        Ok(())
    }

    /// The pitch class sounded by each string. Muted and out-of-range strings give `None`.
    pub fn string_notes(&self, fingering: &Fingering) -> [Option<PitchClass>; STRINGS] {
        let mut out = [None; STRINGS];
        for (slot, (&open, &note)) in out.iter_mut().zip(self.tuning.0.iter().zip(&fingering.0)) {
            *slot = match note {
                PlayedNote::Fret(fret) if fret <= MAX_FRET => Some(resolve_pitch_class(open, fret)),
                _ => None,
            };
        }
        out
    }

    /// Distinct pitch classes sounded by a validated fingering.
    pub fn sounding_notes(&self, fingering: &Fingering) -> Result<PitchClassSet, FretboardError> {
        self.validate(fingering)?;
        let mut notes = PitchClassSet::new();
        for (index, (&open, &note)) in self.tuning.0.iter().zip(&fingering.0).enumerate() {
            if let PlayedNote::Fret(fret) = note {
                let pc = resolve_pitch_class(open, fret);
                trace!(index, fret, pitch = %pc, "string resolved");
                notes.insert(pc);
            }
        }
        Ok(notes)
    }

    /// Resolve a fingering and identify its chord.
    ///
    /// Fails with [`ChordError::NothingToAnalyze`] when every string is muted.
    pub fn analyze(&self, fingering: &Fingering) -> Result<Analysis, AnalysisError> {
        let notes = self.sounding_notes(fingering)?;
        let identification = identify_chord(&notes)?;
        Ok(Analysis {
            notes,
            identification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PlayedNote::{Fret, Muted};

    #[test]
    fn parses_compact_and_separated_fingerings() {
        let compact: Fingering = "x32010".parse().unwrap();
        assert_eq!(
            compact,
            Fingering::new([Muted, Fret(3), Fret(2), Fret(0), Fret(1), Fret(0)])
        );
        assert_eq!("X 3 2 0 1 0".parse::<Fingering>().unwrap(), compact);

        let barre: Fingering = "x,12,14,14,13,12".parse().unwrap();
        assert_eq!(barre.notes()[1], Fret(12));
        assert_eq!(barre.to_string(), "x 12 14 14 13 12");
        assert_eq!(compact.to_string(), "x32010");
    }

    #[test]
    fn rejects_bad_fingerings() {
        assert_eq!(
            "x3201".parse::<Fingering>(),
            Err(FretboardError::WrongStringCount { expected: 6, got: 5 })
        );
        assert_eq!(
            "x 3 2 0 1 25".parse::<Fingering>(),
            Err(FretboardError::FretOutOfRange {
                index: 5,
                fret: 25,
                max: MAX_FRET
            })
        );
        assert_eq!(
            "x 3 -1 0 1 0".parse::<Fingering>(),
            Err(FretboardError::InvalidFret {
                index: 2,
                input: "-1".to_string()
            })
        );
    }

    #[test]
    fn open_string_is_not_muted() {
        let board = Fretboard::default();
        let fingering = Fingering::new([Fret(0), Muted, Muted, Muted, Muted, Muted]);
        let notes = board.sounding_notes(&fingering).unwrap();
        assert_eq!(notes.iter().collect::<Vec<_>>(), vec![PitchClass::E]);
    }

    #[test]
    fn hand_built_out_of_range_fret_is_rejected() {
        let board = Fretboard::default();
        let fingering = Fingering::new([Muted, Fret(30), Muted, Muted, Muted, Muted]);
        assert!(matches!(
            board.sounding_notes(&fingering),
            Err(FretboardError::FretOutOfRange { index: 1, fret: 30, .. })
        ));
        assert_eq!(board.string_notes(&fingering), [None; STRINGS]);
    }

    #[test]
    fn tunings_parse_by_name_or_notes() {
        assert_eq!("Drop-D".parse::<Tuning>().unwrap(), Tuning::builtin("drop-d").unwrap());
        let open_g: Tuning = "D G D G B D".parse().unwrap();
        assert_eq!(open_g.to_string(), "D G D G B D");
        assert_eq!(
            "E A D G".parse::<Tuning>(),
            Err(ParseTuningError::StringCount { expected: 6, got: 4 })
        );
        assert!(matches!(
            "E A D G B Q".parse::<Tuning>(),
            Err(ParseTuningError::Note(_))
        ));
    }

    #[test]
    fn builtin_tunings_keep_low_to_high_order() {
        assert_eq!(Tuning::E_STANDARD.to_string(), "E A D G B E");
        assert_eq!(Tuning::builtin("drop-a").unwrap().to_string(), "A E A D F# B");
        assert_eq!(Tuning::builtin("d-standard").unwrap().to_string(), "D G C F A D");
    }
}
