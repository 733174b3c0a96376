//! Pitch Classes
//!
//! Octave-independent pitches, the fret-to-pitch mapping used by every string,
//! and note naming under an explicit notation scheme.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Number of pitch classes in an octave.
pub const SEMITONES: u8 = 12;

const ANGLO_NAMES: [&str; SEMITONES as usize] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const LATIN_NAMES: [&str; SEMITONES as usize] = [
    "Do", "Do#", "Re", "Re#", "Mi", "Fa", "Fa#", "Sol", "Sol#", "La", "La#", "Si",
];

/// Checked before single letters so that `do` is not read as D.
const LATIN_SYLLABLES: [(&str, u8); 7] = [
    ("sol", 7),
    ("do", 0),
    ("re", 2),
    ("mi", 4),
    ("fa", 5),
    ("la", 9),
    ("si", 11),
];

const LETTERS: [(char, u8); 7] = [
    ('c', 0),
    ('d', 2),
    ('e', 4),
    ('f', 5),
    ('g', 7),
    ('a', 9),
    ('b', 11),
];

/// One of the twelve equal-tempered pitches, independent of octave.
///
/// The wrapped value is always reduced modulo 12.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PitchClass(u8);

impl PitchClass {
    /// C
    pub const C: PitchClass = PitchClass(0);
    /// C sharp / D flat
    pub const C_SHARP: PitchClass = PitchClass(1);
    /// D
    pub const D: PitchClass = PitchClass(2);
    /// D sharp / E flat
    pub const D_SHARP: PitchClass = PitchClass(3);
    /// E
    pub const E: PitchClass = PitchClass(4);
    /// F
    pub const F: PitchClass = PitchClass(5);
    /// F sharp / G flat
    pub const F_SHARP: PitchClass = PitchClass(6);
    /// G
    pub const G: PitchClass = PitchClass(7);
    /// G sharp / A flat
    pub const G_SHARP: PitchClass = PitchClass(8);
    /// A
    pub const A: PitchClass = PitchClass(9);
    /// A sharp / B flat
    pub const A_SHARP: PitchClass = PitchClass(10);
    /// B
    pub const B: PitchClass = PitchClass(11);

    /// Create a pitch class, reducing `value` modulo 12.
    pub const fn new(value: u8) -> Self {
        PitchClass(value % SEMITONES)
    }

    /// The pitch class as an integer in `0..12`.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Move up by `semitones`, wrapping around the octave.
    pub const fn transpose(self, semitones: u8) -> Self {
        PitchClass((self.0 + semitones % SEMITONES) % SEMITONES)
    }

    /// Upward interval from `self` to `other`, in `0..12`.
    pub const fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 + SEMITONES - self.0) % SEMITONES
    }

    /// Human-readable name under the given notation.
    pub fn name(self, notation: Notation) -> &'static str {
        match notation {
            Notation::Anglo => ANGLO_NAMES[self.0 as usize],
            Notation::Latin => LATIN_NAMES[self.0 as usize],
        }
    }

    /// All twelve pitch classes in ascending order.
    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..SEMITONES).map(PitchClass)
    }
}

impl Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(Notation::Anglo))
    }
}

/// Error returned when a note name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNoteError {
    /// The input was empty.
    #[error("empty note name")]
    Empty,

    /// The input was not a known letter, syllable or number.
    #[error("unrecognized note name `{0}`")]
    Unrecognized(String),
}

impl FromStr for PitchClass {
    type Err = ParseNoteError;

    /// Parse `C#`, `Db`, `sol#`, `Sib` or a plain integer (reduced mod 12).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseNoteError::Empty);
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let n: u32 = trimmed
                .parse()
                .map_err(|_| ParseNoteError::Unrecognized(trimmed.to_string()))?;
            return Ok(PitchClass::new((n % SEMITONES as u32) as u8));
        }

        let lower = trimmed.to_ascii_lowercase();
        let (base, rest) = split_base(&lower)
            .ok_or_else(|| ParseNoteError::Unrecognized(trimmed.to_string()))?;

        let mut offset: i32 = 0;
        for c in rest.chars() {
            match c {
                '#' | '♯' => offset += 1,
                'b' | '♭' => offset -= 1,
                _ => return Err(ParseNoteError::Unrecognized(trimmed.to_string())),
            }
        }
        let value = (base as i32 + offset).rem_euclid(SEMITONES as i32);
        Ok(PitchClass(value as u8))
    }
}

fn split_base(lower: &str) -> Option<(u8, &str)> {
    for (syllable, pc) in LATIN_SYLLABLES {
        if let Some(rest) = lower.strip_prefix(syllable) {
            return Some((pc, rest));
        }
    }
    let first = lower.chars().next()?;
    LETTERS
        .iter()
        .find(|(letter, _)| *letter == first)
        .map(|&(_, pc)| (pc, &lower[first.len_utf8()..]))
}

/// Resolve the sounding pitch class of a string tuned to `open` stopped at `fret`.
///
/// Total on its domain: range checks on `fret` belong to the caller.
pub const fn resolve_pitch_class(open: PitchClass, fret: u8) -> PitchClass {
    open.transpose(fret)
}

/// Note naming scheme.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Notation {
    /// Solfège syllables (Do, Re, Mi...)
    Latin,
    /// Letter names (C, D, E...)
    #[default]
    Anglo,
}

impl Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Latin => f.write_str("latin"),
            Notation::Anglo => f.write_str("anglo"),
        }
    }
}

/// Error returned when a notation scheme name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown notation `{0}`, expected `latin` or `anglo`")]
pub struct ParseNotationError(String);

impl FromStr for Notation {
    type Err = ParseNotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin" | "solfege" => Ok(Notation::Latin),
            "anglo" | "english" => Ok(Notation::Anglo),
            _ => Err(ParseNotationError(s.to_string())),
        }
    }
}

/// A set of pitch classes with duplicates collapsed, iterated in ascending order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PitchClassSet(u16);

impl PitchClassSet {
    const FULL: u16 = (1 << SEMITONES) - 1;

    /// The empty set.
    pub const fn new() -> Self {
        PitchClassSet(0)
    }

    /// Build a set from a 12-bit mask where bit `i` stands for pitch class `i`.
    ///
    /// Bits above the eleventh are ignored.
    pub const fn from_bits(bits: u16) -> Self {
        PitchClassSet(bits & Self::FULL)
    }

    /// The 12-bit mask backing this set.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Add a pitch class. Returns `false` if it was already present.
    pub fn insert(&mut self, pc: PitchClass) -> bool {
        let bit = 1 << pc.0;
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    /// Whether `pc` is in the set.
    pub const fn contains(self, pc: PitchClass) -> bool {
        self.0 & (1 << pc.0) != 0
    }

    /// Whether every member of `other` is also in `self`.
    pub const fn is_superset(self, other: PitchClassSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of distinct pitch classes.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ascending order.
    pub fn iter(self) -> Iter {
        Iter { bits: self.0 }
    }

    /// Member names joined with ` - `, e.g. `C - E - G`.
    pub fn names(self, notation: Notation) -> String {
        self.iter()
            .map(|pc| pc.name(notation))
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

impl FromIterator<PitchClass> for PitchClassSet {
    fn from_iter<I: IntoIterator<Item = PitchClass>>(iter: I) -> Self {
        let mut set = PitchClassSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<PitchClass> for PitchClassSet {
    fn extend<I: IntoIterator<Item = PitchClass>>(&mut self, iter: I) {
        for pc in iter {
            self.insert(pc);
        }
    }
}

impl IntoIterator for PitchClassSet {
    type Item = PitchClass;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

impl Display for PitchClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names(Notation::Anglo))
    }
}

impl Serialize for PitchClassSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Ascending iterator over a [`PitchClassSet`].
#[derive(Debug, Clone)]
pub struct Iter {
    bits: u16,
}

impl Iterator for Iter {
    type Item = PitchClass;

    fn next(&mut self) -> Option<PitchClass> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(PitchClass(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Iter {}
