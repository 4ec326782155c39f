//! # Chord Identifier
//!
//! Names the chord a fret pattern plays, three ways:
//! - [`identify_exact`]: database entries with a variation whose frets are identical
//! - [`identify_nearest`]: entries ranked by their closest variation under [`distance`]
//! - [`identify_by_notes`]: entries the harmonic validator accepts the pattern for,
//!   whether or not the pattern is one of the stored variations

use serde::Serialize;

use crate::database::{ChordDatabase, ChordEntry};
use crate::fingering::{distance, Frets};
use crate::validator::{HarmonicValidator, ValidationResult};

/// An entry and how far its closest variation is from the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiedChord<'a> {
    pub entry: &'a ChordEntry,
    pub distance: u32,
    /// Index into `entry.variations` of the closest variation.
    pub variation: usize,
}

/// An entry whose chord tones the query satisfies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteMatch<'a> {
    pub entry: &'a ChordEntry,
    pub validation: ValidationResult,
}

/// Entries with a variation equal to `frets`, in database order.
///
/// # Example
/// ```
/// use cavaco::{identify, ChordDatabase, GeneratorConfig, PatternLibrary, QualityCatalog};
///
/// let db = ChordDatabase::build(&QualityCatalog::standard(), &PatternLibrary::standard(), &GeneratorConfig::default());
/// let found = identify::identify_exact(&db, &[Some(2), Some(0), Some(1), Some(2)]);
/// assert_eq!(found[0].key, "C");
/// ```
pub fn identify_exact<'a>(db: &'a ChordDatabase, frets: &Frets) -> Vec<&'a ChordEntry> {
    db.iter()
        .filter(|entry| entry.variations.iter().any(|v| v.frets == *frets))
        .collect()
}

/// The `limit` entries whose closest variation is nearest to `frets`.
/// Ties keep database order.
pub fn identify_nearest<'a>(db: &'a ChordDatabase, frets: &Frets, limit: usize) -> Vec<IdentifiedChord<'a>> {
    let mut ranked: Vec<IdentifiedChord<'a>> = db
        .iter()
        .filter_map(|entry| {
            entry
                .variations
                .iter()
                .enumerate()
                .map(|(i, v)| (distance(&v.frets, frets), i))
                .min()
                .map(|(distance, variation)| IdentifiedChord {
                    entry,
                    distance,
                    variation,
                })
        })
        .collect();
    ranked.sort_by_key(|m| m.distance);
    ranked.truncate(limit);
    ranked
}

/// Entries for which `frets` is a valid voicing. Complete voicings with the root
/// come first, then by coverage, then database order.
pub fn identify_by_notes<'a>(db: &'a ChordDatabase, frets: &Frets, validator: &HarmonicValidator) -> Vec<NoteMatch<'a>> {
    let mut matches: Vec<NoteMatch<'a>> = db
        .iter()
        .filter_map(|entry| {
            let validation = validator.check_pitch_classes(entry.root, entry.notes, frets);
            validation.valid.then_some(NoteMatch { entry, validation })
        })
        .collect();
    matches.sort_by(|a, b| {
        let rank = |m: &NoteMatch| (m.validation.is_complete() && m.validation.has_root, m.validation.has_root);
        rank(b)
            .cmp(&rank(a))
            .then(b.validation.coverage.total_cmp(&a.validation.coverage))
    });
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::library::PatternLibrary;
    use crate::quality::QualityCatalog;

    fn db() -> ChordDatabase {
        ChordDatabase::build(&QualityCatalog::standard(), &PatternLibrary::standard(), &GeneratorConfig::default())
    }

    #[test]
    fn test_exact_match() {
        let db = db();
        let found = identify_exact(&db, &[Some(2), Some(0), Some(1), Some(2)]);
        assert!(found.iter().any(|e| e.key == "C"));
        assert!(identify_exact(&db, &[Some(11), Some(0), Some(11), Some(0)]).is_empty());
    }

    #[test]
    fn test_nearest_ranks_exact_first() {
        let db = db();
        let found = identify_nearest(&db, &[Some(2), Some(0), Some(1), Some(2)], 5);
        assert_eq!(found.len(), 5);
        assert_eq!(found[0].distance, 0);
        assert!(found.windows(2).all(|w| w[0].distance <= w[1].distance));
        let first = &found[0];
        assert_eq!(first.entry.variations[first.variation].frets, [Some(2), Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_nearest_with_typo() {
        let db = db();
        // C major with the top string one fret too high
        let found = identify_nearest(&db, &[Some(2), Some(0), Some(1), Some(3)], 3);
        assert_eq!(found[0].distance, 1);
    }

    #[test]
    fn test_by_notes_prefers_complete_rooted() {
        let db = db();
        let validator = db.config().validator();
        // open strings: D G B D
        let found = identify_by_notes(&db, &[Some(0); 4], &validator);
        assert_eq!(found[0].entry.key, "G");
        assert!(found.iter().any(|m| m.entry.key == "G7"));
        assert!(found.iter().all(|m| m.validation.valid));
    }
}
