//! Chord Recognizer
//!
//! Names the chord formed by a set of sounding pitch classes by matching it
//! against a fixed catalog of interval patterns.
//!
//! Every present pitch class is tried as the root. A pattern matches a root when
//! all of its intervals are present above that root; extra notes are tolerated.
//! The largest matching pattern wins, and ties go to whichever match is met
//! first, walking roots upwards and the catalog in declaration order.

use std::fmt::Display;

use lazy_static::lazy_static;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, trace};

use crate::pitch::{Notation, PitchClass, PitchClassSet, SEMITONES};

/// Number of cataloged chord patterns
const NUM_CHORD_KINDS: usize = 30;

/// Total number of transposed profiles (root × pattern)
const NUM_PROFILES: usize = SEMITONES as usize * NUM_CHORD_KINDS;

const PERFECT_FIFTH: u8 = 7;

/// (quality, id, suffix, intervals) in declaration order.
///
/// Order matters: among patterns of equal size the earlier entry wins.
#[rustfmt::skip]
const CHORD_SPECS: [(ChordKind, &str, &str, &[u8]); NUM_CHORD_KINDS] = [
    (ChordKind::Major,                  "major", "",        &[0, 4, 7]),
    (ChordKind::Minor,                  "minor", "m",       &[0, 3, 7]),
    (ChordKind::PowerFifth,             "power", "5",       &[0, 7]),
    (ChordKind::Diminished,             "dim",   "dim",     &[0, 3, 6]),
    (ChordKind::Augmented,              "aug",   "aug",     &[0, 4, 8]),
    (ChordKind::SuspendedSecond,        "sus2",  "sus2",    &[0, 2, 7]),
    (ChordKind::SuspendedFourth,        "sus4",  "sus4",    &[0, 5, 7]),
    (ChordKind::MajorSeventh,           "maj7",  "maj7",    &[0, 4, 7, 11]),
    (ChordKind::MinorSeventh,           "m7",    "m7",      &[0, 3, 7, 10]),
    (ChordKind::DominantSeventh,        "dom7",  "7",       &[0, 4, 7, 10]),
    (ChordKind::HalfDiminishedSeventh,  "m7b5",  "m7b5",    &[0, 3, 6, 10]),
    (ChordKind::DiminishedSeventh,      "dim7",  "dim7",    &[0, 3, 6, 9]),
    (ChordKind::MinorMajorSeventh,      "mmaj7", "m(maj7)", &[0, 3, 7, 11]),
    (ChordKind::MajorSixth,             "maj6",  "6",       &[0, 4, 7, 9]),
    (ChordKind::MinorSixth,             "m6",    "m6",      &[0, 3, 7, 9]),
    (ChordKind::DominantNinth,          "dom9",  "9",       &[0, 4, 7, 10, 2]),
    (ChordKind::MajorNinth,             "maj9",  "maj9",    &[0, 4, 7, 11, 2]),
    (ChordKind::MinorNinth,             "m9",    "m9",      &[0, 3, 7, 10, 2]),
    (ChordKind::DominantEleventh,       "dom11", "11",      &[0, 4, 7, 10, 2, 5]),
    (ChordKind::MinorEleventh,          "m11",   "m11",     &[0, 3, 7, 10, 2, 5]),
    (ChordKind::DominantThirteenth,     "dom13", "13",      &[0, 4, 7, 10, 2, 5, 9]),
    (ChordKind::MajorThirteenth,        "maj13", "maj13",   &[0, 4, 7, 11, 2, 9]),
    (ChordKind::MinorThirteenth,        "m13",   "m13",     &[0, 3, 7, 10, 2, 5, 9]),
    (ChordKind::SixNine,                "6add9", "6/9",     &[0, 4, 7, 9, 2]),
    (ChordKind::SeventhSuspendedFourth, "7sus4", "7sus4",   &[0, 5, 7, 10]),
    (ChordKind::SeventhFlatFive,        "7b5",   "7b5",     &[0, 4, 6, 10]),
    (ChordKind::SeventhFlatNine,        "7b9",   "7b9",     &[0, 4, 7, 10, 1]),
    (ChordKind::NinthSuspendedFourth,   "9sus4", "9sus4",   &[0, 5, 7, 10, 2]),
    (ChordKind::AddNine,                "add9",  "add9",    &[0, 4, 7, 2]),
    (ChordKind::AugmentedNinth,         "aug9",  "aug9",    &[0, 4, 8, 10, 2]),
];

/// Chord qualities known to the recognizer, in catalog order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChordKind {
    /// Major triad (e.g., C-E-G)
    Major,
    /// Minor triad (e.g., C-Eb-G)
    Minor,
    /// Power chord (e.g., C-G); only produced for two-note input
    PowerFifth,
    /// Diminished triad (e.g., C-Eb-Gb)
    Diminished,
    /// Augmented triad (e.g., C-E-G#)
    Augmented,
    /// Suspended second (e.g., C-D-G)
    SuspendedSecond,
    /// Suspended fourth (e.g., C-F-G)
    SuspendedFourth,
    /// Major seventh (e.g., C-E-G-B)
    MajorSeventh,
    /// Minor seventh (e.g., C-Eb-G-Bb)
    MinorSeventh,
    /// Dominant seventh (e.g., C-E-G-Bb)
    DominantSeventh,
    /// Half-diminished seventh (e.g., C-Eb-Gb-Bb)
    HalfDiminishedSeventh,
    /// Diminished seventh (e.g., C-Eb-Gb-A)
    DiminishedSeventh,
    /// Minor-major seventh (e.g., C-Eb-G-B)
    MinorMajorSeventh,
    /// Major sixth (e.g., C-E-G-A)
    MajorSixth,
    /// Minor sixth (e.g., C-Eb-G-A)
    MinorSixth,
    /// Dominant ninth (e.g., C-E-G-Bb-D)
    DominantNinth,
    /// Major ninth (e.g., C-E-G-B-D)
    MajorNinth,
    /// Minor ninth (e.g., C-Eb-G-Bb-D)
    MinorNinth,
    /// Dominant eleventh
    DominantEleventh,
    /// Minor eleventh
    MinorEleventh,
    /// Dominant thirteenth
    DominantThirteenth,
    /// Major thirteenth
    MajorThirteenth,
    /// Minor thirteenth
    MinorThirteenth,
    /// Six-nine (e.g., C-E-G-A-D)
    SixNine,
    /// Seventh with suspended fourth (e.g., C-F-G-Bb)
    SeventhSuspendedFourth,
    /// Seventh with flat five (e.g., C-E-Gb-Bb)
    SeventhFlatFive,
    /// Seventh with flat nine (e.g., C-E-G-Bb-Db)
    SeventhFlatNine,
    /// Ninth with suspended fourth (e.g., C-F-G-Bb-D)
    NinthSuspendedFourth,
    /// Added ninth (e.g., C-E-G-D)
    AddNine,
    /// Augmented ninth (e.g., C-E-G#-Bb-D)
    AugmentedNinth,
}

impl ChordKind {
    /// Every kind in catalog order.
    pub const ALL: [ChordKind; NUM_CHORD_KINDS] = [
        ChordKind::Major,
        ChordKind::Minor,
        ChordKind::PowerFifth,
        ChordKind::Diminished,
        ChordKind::Augmented,
        ChordKind::SuspendedSecond,
        ChordKind::SuspendedFourth,
        ChordKind::MajorSeventh,
        ChordKind::MinorSeventh,
        ChordKind::DominantSeventh,
        ChordKind::HalfDiminishedSeventh,
        ChordKind::DiminishedSeventh,
        ChordKind::MinorMajorSeventh,
        ChordKind::MajorSixth,
        ChordKind::MinorSixth,
        ChordKind::DominantNinth,
        ChordKind::MajorNinth,
        ChordKind::MinorNinth,
        ChordKind::DominantEleventh,
        ChordKind::MinorEleventh,
        ChordKind::DominantThirteenth,
        ChordKind::MajorThirteenth,
        ChordKind::MinorThirteenth,
        ChordKind::SixNine,
        ChordKind::SeventhSuspendedFourth,
        ChordKind::SeventhFlatFive,
        ChordKind::SeventhFlatNine,
        ChordKind::NinthSuspendedFourth,
        ChordKind::AddNine,
        ChordKind::AugmentedNinth,
    ];

    const fn spec(self) -> (ChordKind, &'static str, &'static str, &'static [u8]) {
        CHORD_SPECS[self as usize]
    }

    /// Stable identifier, e.g. `"dom7"`.
    pub const fn id(self) -> &'static str {
        self.spec().1
    }

    /// Suffix appended to the root name, e.g. `"m7"` in `Am7`.
    pub const fn suffix(self) -> &'static str {
        self.spec().2
    }

    /// Semitone intervals above the root, root (0) first.
    pub const fn intervals(self) -> &'static [u8] {
        self.spec().3
    }

    /// Number of intervals the pattern requires.
    pub const fn size(self) -> usize {
        self.intervals().len()
    }

    /// Look a kind up by its [`id`](Self::id).
    pub fn from_id(id: &str) -> Option<ChordKind> {
        CHORD_SPECS
            .iter()
            .find(|(_, spec_id, _, _)| *spec_id == id)
            .map(|(kind, _, _, _)| *kind)
    }

    /// Pattern as a pitch-class set rooted on `root`.
    pub fn voicing(self, root: PitchClass) -> PitchClassSet {
        self.intervals()
            .iter()
            .map(|&off| root.transpose(off))
            .collect()
    }
}

impl Display for ChordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Serialize for ChordKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// A chord root paired with a cataloged quality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Chord {
    /// The harmonic root.
    pub root: PitchClass,
    /// The matched pattern.
    pub quality: ChordKind,
}

impl Chord {
    /// Chord symbol such as `C#m7` or `Do#m7`.
    pub fn label(&self, notation: Notation) -> String {
        format!("{}{}", self.root.name(notation), self.quality.suffix())
    }
}

/// Outcome of chord recognition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChordIdentification {
    /// One distinct pitch class.
    SingleNote {
        /// The sounding pitch class.
        root: PitchClass,
    },
    /// Root and perfect fifth, nothing else.
    PowerChord {
        /// The lower end of the fifth.
        root: PitchClass,
    },
    /// Three or more pitch classes matching a cataloged pattern.
    Matched(Chord),
    /// Notes were present but no name fits them.
    NoMatch,
}

impl ChordIdentification {
    /// `"single"`, `"power"`, `"match"` or `"none"`.
    pub const fn kind_str(&self) -> &'static str {
        match self {
            ChordIdentification::SingleNote { .. } => "single",
            ChordIdentification::PowerChord { .. } => "power",
            ChordIdentification::Matched(_) => "match",
            ChordIdentification::NoMatch => "none",
        }
    }

    /// The identified root, if any.
    pub const fn root(&self) -> Option<PitchClass> {
        match self {
            ChordIdentification::SingleNote { root }
            | ChordIdentification::PowerChord { root } => Some(*root),
            ChordIdentification::Matched(chord) => Some(chord.root),
            ChordIdentification::NoMatch => None,
        }
    }

    /// The pattern behind the result. Power chords report [`ChordKind::PowerFifth`].
    pub const fn quality(&self) -> Option<ChordKind> {
        match self {
            ChordIdentification::PowerChord { .. } => Some(ChordKind::PowerFifth),
            ChordIdentification::Matched(chord) => Some(chord.quality),
            _ => None,
        }
    }

    /// Display name: `E`, `E5`, `Em7`; `None` when nothing matched.
    pub fn label(&self, notation: Notation) -> Option<String> {
        match self {
            ChordIdentification::SingleNote { root } => Some(root.name(notation).to_string()),
            ChordIdentification::PowerChord { root } => Some(
                Chord {
                    root: *root,
                    quality: ChordKind::PowerFifth,
                }
                .label(notation),
            ),
            ChordIdentification::Matched(chord) => Some(chord.label(notation)),
            ChordIdentification::NoMatch => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentificationRecord {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<PitchClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern_id: Option<&'static str>,
}

impl Serialize for ChordIdentification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        IdentificationRecord {
            kind: self.kind_str(),
            root: self.root(),
            pattern_id: self.quality().map(ChordKind::id),
        }
        .serialize(serializer)
    }
}

/// Errors when recognizing chords
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordError {
    /// The input held no pitch classes at all.
    #[error("nothing to analyze: no sounding notes")]
    NothingToAnalyze,
}

/// Chord recognizer with every pattern pre-transposed to all twelve roots.
pub struct ChordRecognizer {
    /// Pattern masks indexed by `kind * SEMITONES + root`
    profiles: [u16; NUM_PROFILES],
}

impl ChordRecognizer {
    /// Create a recognizer over the built-in catalog.
    pub fn new() -> Self {
        let mut profiles = [0u16; NUM_PROFILES];

        for (kind_idx, &(_kind, _, _, intervals)) in CHORD_SPECS.iter().enumerate() {
            for root in 0..SEMITONES {
                let base = kind_idx * SEMITONES as usize + root as usize;
                for &off in intervals {
                    let note = (root + off) % SEMITONES;
                    profiles[base] |= 1 << note;
                }
            }
        }

        ChordRecognizer { profiles }
    }

    /// Identify the chord formed by `notes`.
    ///
    /// Returns `Err(ChordError::NothingToAnalyze)` for an empty set.
    pub fn identify(&self, notes: &PitchClassSet) -> Result<ChordIdentification, ChordError> {
        let result = match notes.len() {
            0 => return Err(ChordError::NothingToAnalyze),
            1 => match notes.iter().next() {
                Some(root) => ChordIdentification::SingleNote { root },
                None => return Err(ChordError::NothingToAnalyze),
            },
            2 => identify_dyad(notes),
            _ => match self.search().run(notes, |_| {}) {
                Some(chord) => ChordIdentification::Matched(chord),
                None => ChordIdentification::NoMatch,
            },
        };
        debug!(notes = %notes, result = result.kind_str(), root = ?result.root(), "identified");
        Ok(result)
    }

    /// Every (root, pattern) reading of three or more notes, best first.
    ///
    /// Ordered by descending pattern size, then by the order the search meets
    /// them, so the first entry is the chord [`identify`](Self::identify) picks.
    /// Empty for fewer than three distinct notes.
    pub fn matches(&self, notes: &PitchClassSet) -> Vec<Chord> {
        if notes.len() < 3 {
            return Vec::new();
        }
        let mut found = Vec::new();
        self.search().run(notes, |chord| found.push(chord));
        // stable, so encounter order survives within a size
        found.sort_by_key(|chord| std::cmp::Reverse(chord.quality.size()));
        found
    }

    fn search(&self) -> Search<'_> {
        Search {
            profiles: &self.profiles,
        }
    }
}

impl Default for ChordRecognizer {
    fn default() -> Self {
        ChordRecognizer::new()
    }
}

/// Root-and-pattern scan over precomputed profiles.
struct Search<'a> {
    profiles: &'a [u16; NUM_PROFILES],
}

impl Search<'_> {
    /// Returns the best match, reporting every match to `on_match` as it is met.
    fn run(&self, notes: &PitchClassSet, mut on_match: impl FnMut(Chord)) -> Option<Chord> {
        let bits = notes.bits();
        let mut best: Option<Chord> = None;

        for root in notes.iter() {
            for (kind_idx, &(kind, _, _, intervals)) in CHORD_SPECS.iter().enumerate() {
                // fifths are named only through the two-note path
                if kind == ChordKind::PowerFifth {
                    continue;
                }
                let mask = self.profiles[kind_idx * SEMITONES as usize + root.value() as usize];
                if bits & mask != mask {
                    continue;
                }

                let chord = Chord {
                    root,
                    quality: kind,
                };
                trace!(root = %root, kind = %kind, "pattern fits");
                on_match(chord);

                let better = match best {
                    Some(b) => intervals.len() > b.quality.size(),
                    None => true,
                };
                if better {
                    best = Some(chord);
                }
            }
        }
        best
    }
}

fn identify_dyad(notes: &PitchClassSet) -> ChordIdentification {
    let mut it = notes.iter();
    let (Some(a), Some(b)) = (it.next(), it.next()) else {
        return ChordIdentification::NoMatch;
    };
    if a.interval_to(b) == PERFECT_FIFTH {
        ChordIdentification::PowerChord { root: a }
    } else if b.interval_to(a) == PERFECT_FIFTH {
        ChordIdentification::PowerChord { root: b }
    } else {
        ChordIdentification::NoMatch
    }
}

lazy_static! {
    static ref RECOGNIZER: ChordRecognizer = ChordRecognizer::new();
}

/// Identify the chord formed by `notes` using a shared recognizer.
///
/// See [`ChordRecognizer::identify`].
pub fn identify_chord(notes: &PitchClassSet) -> Result<ChordIdentification, ChordError> {
    RECOGNIZER.identify(notes)
}

/// Every reading of `notes`, best first, using a shared recognizer.
pub fn chord_matches(notes: &PitchClassSet) -> Vec<Chord> {
    RECOGNIZER.matches(notes)
}
