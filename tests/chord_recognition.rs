//! Integration tests for pitch resolution and chord recognition.

use fret_chord::{
    chord_matches, identify_chord, resolve_pitch_class, AnalysisError, Chord, ChordError,
    ChordIdentification, ChordKind, ChordRecognizer, Fingering, Fretboard, FretboardError,
    Notation, PitchClass, PitchClassSet, Tuning,
};
use lazy_static::lazy_static;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

fn set(pcs: &[u8]) -> PitchClassSet {
    pcs.iter().copied().map(PitchClass::new).collect()
}

fn matched(root: PitchClass, quality: ChordKind) -> ChordIdentification {
    ChordIdentification::Matched(Chord { root, quality })
}

/// Holds a fingering, the tuning it is played in and the expected chord label
#[derive(Debug, Clone)]
struct FingeringCase {
    tuning: &'static str,
    fingering: &'static str,
    label: Option<&'static str>,
}

lazy_static! {
    static ref PITCH_CASES: Vec<(Vec<u8>, ChordIdentification)> = vec![
        (vec![4], ChordIdentification::SingleNote { root: PitchClass::E }),
        (vec![4, 11], ChordIdentification::PowerChord { root: PitchClass::E }),
        (vec![0, 4, 7], matched(PitchClass::C, ChordKind::Major)),
        (vec![0, 3, 6, 9], matched(PitchClass::C, ChordKind::DiminishedSeventh)),
        (vec![0, 4, 7, 10, 2], matched(PitchClass::C, ChordKind::DominantNinth)),
        (vec![1, 2, 6], ChordIdentification::NoMatch),
        (vec![0, 1], ChordIdentification::NoMatch),
        (vec![9, 0, 4, 7], matched(PitchClass::C, ChordKind::MajorSixth)),
        // all seven naturals: Dm13 outscores Cmaj13
        (vec![2, 5, 9, 0, 4, 7, 11], matched(PitchClass::D, ChordKind::MinorThirteenth)),
        (vec![0, 2, 4, 7, 9, 11], matched(PitchClass::C, ChordKind::MajorThirteenth)),
    ];

    static ref FINGERING_CASES: Vec<FingeringCase> = vec![
        FingeringCase { tuning: "e-standard", fingering: "x32010", label: Some("C") },
        FingeringCase { tuning: "e-standard", fingering: "022000", label: Some("Em") },
        FingeringCase { tuning: "e-standard", fingering: "022100", label: Some("E") },
        FingeringCase { tuning: "e-standard", fingering: "x02020", label: Some("A7") },
        FingeringCase { tuning: "e-standard", fingering: "x02210", label: Some("Am") },
        FingeringCase { tuning: "e-standard", fingering: "xx0232", label: Some("D") },
        FingeringCase { tuning: "e-standard", fingering: "x 12 14 14 13 12", label: Some("Am") },
        FingeringCase { tuning: "e-standard", fingering: "0xxxxx", label: Some("E") },
        FingeringCase { tuning: "e-standard", fingering: "02xxxx", label: Some("E5") },
        FingeringCase { tuning: "drop-d", fingering: "000xxx", label: Some("D5") },
        FingeringCase { tuning: "D G D G B D", fingering: "000000", label: Some("G") },
        FingeringCase { tuning: "e-standard", fingering: "x01xxx", label: None },
    ];
}

#[test]
fn resolves_modulo_twelve() {
    for open in PitchClass::all() {
        for fret in 0..=24u8 {
            let pc = resolve_pitch_class(open, fret);
            assert!(pc.value() < 12);
            assert_eq!(pc, resolve_pitch_class(open, fret + 12));
            assert_eq!(open.interval_to(pc), fret % 12);
        }
    }
}

#[test]
fn pitch_class_sets_identify_as_expected() {
    for (pcs, expected) in PITCH_CASES.iter() {
        let actual = identify_chord(&set(pcs)).unwrap();
        assert_eq!(actual, *expected, "input {pcs:?}");
    }
}

#[test]
fn fingerings_identify_as_expected() {
    for case in FINGERING_CASES.iter() {
        let tuning: Tuning = case.tuning.parse().unwrap();
        let fingering: Fingering = case.fingering.parse().unwrap();
        let analysis = Fretboard::new(tuning).analyze(&fingering).unwrap();
        assert_eq!(
            analysis.identification.label(Notation::Anglo).as_deref(),
            case.label,
            "{case:?}"
        );
    }
}

#[test]
fn muted_fingering_is_nothing_to_analyze() {
    let fingering: Fingering = "xxxxxx".parse().unwrap();
    assert_eq!(
        Fretboard::default().analyze(&fingering),
        Err(AnalysisError::Chord(ChordError::NothingToAnalyze))
    );
}

#[test]
fn out_of_range_fret_never_reaches_the_recognizer() {
    assert!(matches!(
        "x 3 2 0 1 25".parse::<Fingering>(),
        Err(FretboardError::FretOutOfRange { fret: 25, .. })
    ));
}

#[test]
fn latin_labels() {
    let fingering: Fingering = "x02210".parse().unwrap();
    let analysis = Fretboard::default().analyze(&fingering).unwrap();
    assert_eq!(analysis.identification.label(Notation::Latin).as_deref(), Some("Lam"));
    assert_eq!(analysis.notes.names(Notation::Latin), "Do - Mi - La");
}

#[test]
fn analysis_serializes_to_json() {
    let fingering: Fingering = "x32010".parse().unwrap();
    let analysis = Fretboard::default().analyze(&fingering).unwrap();
    assert_eq!(
        serde_json::to_string(&analysis).unwrap(),
        r#"{"notes":[0,4,7],"identification":{"kind":"match","root":0,"patternId":"major"}}"#
    );
}

/// Straightforward scan over the public catalog, used as an oracle.
fn reference_identify(notes: PitchClassSet) -> ChordIdentification {
    let pcs: Vec<PitchClass> = notes.iter().collect();
    match pcs.as_slice() {
        [root] => return ChordIdentification::SingleNote { root: *root },
        [a, b] => {
            return if a.interval_to(*b) == 7 {
                ChordIdentification::PowerChord { root: *a }
            } else if b.interval_to(*a) == 7 {
                ChordIdentification::PowerChord { root: *b }
            } else {
                ChordIdentification::NoMatch
            };
        }
        _ => {}
    }

    let mut best: Option<Chord> = None;
    for &root in &pcs {
        for kind in ChordKind::ALL {
            if kind == ChordKind::PowerFifth {
                continue;
            }
            let fits = kind
                .intervals()
                .iter()
                .all(|&i| notes.contains(root.transpose(i)));
            if fits && best.map_or(true, |b| kind.size() > b.quality.size()) {
                best = Some(Chord { root, quality: kind });
            }
        }
    }
    best.map_or(ChordIdentification::NoMatch, ChordIdentification::Matched)
}

#[test]
fn every_pitch_class_set_is_deterministic_and_matches_the_oracle() {
    let recognizer = ChordRecognizer::new();

    let failures: Vec<String> = (1u16..1 << 12)
        .into_par_iter()
        .filter_map(|bits| {
            let notes = PitchClassSet::from_bits(bits);
            let first = recognizer.identify(&notes).unwrap();
            let second = identify_chord(&notes).unwrap();
            let expected = reference_identify(notes);

            let readings = recognizer.matches(&notes);
            let best_reading_agrees = match first {
                ChordIdentification::Matched(chord) => readings.first() == Some(&chord),
                _ => notes.len() < 3 || readings.is_empty(),
            };

            if first != second || first != expected || !best_reading_agrees {
                Some(format!(
                    "notes {notes}: got {first:?} / {second:?}, expected {expected:?}"
                ))
            } else {
                None
            }
        })
        .collect();

    assert!(
        failures.is_empty(),
        "{} sets disagreed:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

#[test]
fn every_pattern_recognizes_itself_on_every_root() {
    for kind in ChordKind::ALL {
        for root in PitchClass::all() {
            let notes = kind.voicing(root);
            let result = identify_chord(&notes).unwrap();

            if kind == ChordKind::PowerFifth {
                assert_eq!(result, ChordIdentification::PowerChord { root });
                continue;
            }

            let quality = result
                .quality()
                .unwrap_or_else(|| panic!("{kind} on {root} was not recognized"));
            assert!(
                quality.size() >= kind.size(),
                "{kind} on {root} lost to smaller {quality}"
            );
            assert!(
                chord_matches(&notes).contains(&Chord { root, quality: kind }),
                "{kind} on {root} missing from readings"
            );
        }
    }
}
