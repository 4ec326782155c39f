//! # Constraint Solver
//!
//! Systematic search for fingerings of one chord, used alongside the pattern library.
//!
//! ## Search Space
//! Each string may be muted or fretted at 0..=`solver_max_fret`, but only at frets
//! whose pitch belongs to the chord, so wrong notes never enter the search.
//! Branches are cut as soon as they mute more than one string or stretch the
//! fretted positions wider than `solver_max_span`. Shapes whose lowest fretted
//! position is above `fret_ceiling` are discarded, as in transposition.
//!
//! ## Acceptance
//! A complete fingering is kept when it sounds the root and every chord tone,
//! except that a perfect fifth may be left out of chords with more tones than
//! the instrument has strings, and the harmonic validator accepts it.
//! Fingers and a barre are then assigned; shapes that need a fifth finger are dropped.
//!
//! ## Ranking
//! Difficulty first, then average fret, then fret pattern. Only the best
//! `solver_candidates` are returned.

use log::debug;

use crate::config::GeneratorConfig;
use crate::difficulty;
use crate::fingering::{Fingering, Frets};
use crate::note::{PitchClass, PitchClassSet};
use crate::quality::ChordQuality;
use crate::tuning::{Tuning, STRING_COUNT};
use crate::validator::HarmonicValidator;

/// At most this many strings may be muted in a solver voicing.
const MAX_MUTED: usize = 1;

/// Search fingerings for `root` + `quality`.
///
/// # Example
/// ```
/// use cavaco::{solver, GeneratorConfig, PitchClass, QualityCatalog};
///
/// let config = GeneratorConfig::default();
/// let catalog = QualityCatalog::standard();
/// let found = solver::solve(PitchClass::C, catalog.get("M").unwrap(), &config.validator(), &config);
/// assert!(!found.is_empty());
/// assert!(found.len() <= config.solver_candidates);
/// ```
pub fn solve(
    root: PitchClass,
    quality: &ChordQuality,
    validator: &HarmonicValidator,
    config: &GeneratorConfig,
) -> Vec<Fingering> {
    let chord = quality.pitch_classes(root);
    let required = required_tones(root, quality, chord);
    let domains = string_domains(&validator.tuning, chord, config.solver_max_fret);

    let mut found = Vec::new();
    let mut frets: Frets = [None; STRING_COUNT];
    search(0, &mut frets, &domains, config.solver_max_span, &mut |candidate: &Frets| {
        let sounded = validator.tuning.notes_from_fingering(candidate);
        if !required.is_subset(&sounded) {
            return;
        }
        let shape = Fingering::new(*candidate);
        if shape.min_fret().is_some_and(|min| min > config.fret_ceiling) {
            return;
        }
        if !validator.check(root, quality, candidate).valid {
            return;
        }
        if let Some(fingering) = shape.with_auto_fingers() {
            found.push(fingering);
        }
    });

    let total = found.len();
    found.sort_by(|a, b| {
        difficulty::score(a)
            .cmp(&difficulty::score(b))
            .then(a.average_fret().total_cmp(&b.average_fret()))
            .then(a.frets.cmp(&b.frets))
    });
    found.truncate(config.solver_candidates);
    for fingering in &mut found {
        fingering.start_fret = fingering.diagram_start(config.high_position_threshold);
    }
    debug!(
        "solver: {}{} {} voicings, kept {}",
        root,
        quality.suffix,
        total,
        found.len()
    );
    found
}

/// Tones a solver voicing must contain.
fn required_tones(root: PitchClass, quality: &ChordQuality, chord: PitchClassSet) -> PitchClassSet {
    let mut required = chord;
    if chord.len() > STRING_COUNT && quality.has_perfect_fifth() {
        let fifth: PitchClassSet = std::iter::once(root.transposed(7)).collect();
        required = required.difference(&fifth);
    }
    required
}

/// Per string: muted, then every fret up to `max_fret` that sounds a chord tone.
fn string_domains(tuning: &Tuning, chord: PitchClassSet, max_fret: u8) -> Vec<Vec<Option<u8>>> {
    (0..STRING_COUNT)
        .map(|string| {
            std::iter::once(None)
                .chain(
                    (0..=max_fret)
                        .filter(|fret| {
                            tuning
                                .note_at_fret(string, Some(*fret))
                                .is_some_and(|pc| chord.contains(pc))
                        })
                        .map(Some),
                )
                .collect()
        })
        .collect()
}

fn search(
    string: usize,
    frets: &mut Frets,
    domains: &[Vec<Option<u8>>],
    max_span: u8,
    visit: &mut dyn FnMut(&Frets),
) {
    if string == STRING_COUNT {
        visit(frets);
        return;
    }
    for fret in &domains[string] {
        frets[string] = *fret;
        if within_limits(&frets[..=string], max_span) {
            search(string + 1, frets, domains, max_span, visit);
        }
    }
    frets[string] = None;
}

fn within_limits(partial: &[Option<u8>], max_span: u8) -> bool {
    let muted = partial.iter().filter(|f| f.is_none()).count();
    if muted > MAX_MUTED {
        return false;
    }
    let fretted = partial.iter().flatten().filter(|f| **f > 0);
    match (fretted.clone().min(), fretted.max()) {
        (Some(lo), Some(hi)) => hi - lo <= max_span,
        _ => true,
    }
}
