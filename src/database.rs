//! # Chord Database Builder
//!
//! Builds the full (root × quality) chord database in one explicit call and serves
//! lookups from it afterwards.
//!
//! ## Pipeline (per root, per quality)
//! 1. Transpose every library pattern of the quality to the root
//! 2. Add constraint-solver voicings when the solver is enabled
//! 3. Deduplicate by fret pattern (first-seen annotations win)
//! 4. Stable sort by average played fret, lowest first
//! 5. Keep at most `max_variations`
//! 6. Score the primary variation
//!
//! A pair with no surviving fingering gets no entry at all. Lookups for it return
//! `None`, which callers treat as "not found".
//!
//! ## Related Modules
//! - `transpose` - moves library patterns between roots
//! - `solver` - systematic voicing search
//! - `store` - swaps whole databases after an import

use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;

use crate::config::GeneratorConfig;
use crate::difficulty;
use crate::error::ChordError;
use crate::fingering::Fingering;
use crate::import::ChordTable;
use crate::library::{PatternLibrary, RejectedPattern, SourcePattern};
use crate::note::{PitchClass, PitchClassSet};
use crate::quality::{QualityCatalog, MAJOR};
use crate::solver;
use crate::transpose::transpose;

/// One chord with its ranked fingerings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordEntry {
    /// URL-safe identifier: "c-major", "cs-m7", "as-7sus4".
    pub id: String,
    /// Display name: root + suffix ("C", "C#m7").
    pub key: String,
    pub root: PitchClass,
    /// Quality symbol in the catalog.
    pub quality: String,
    pub suffix: String,
    pub notes: PitchClassSet,
    pub intervals: Vec<&'static str>,
    /// Never empty; the first entry is the primary variation.
    pub variations: Vec<Fingering>,
    /// Difficulty of the primary variation, 1..=5.
    pub difficulty: u8,
}

impl ChordEntry {
    pub fn primary(&self) -> &Fingering {
        &self.variations[0]
    }
}

/// Immutable result of a build.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordDatabase {
    entries: Vec<ChordEntry>,
    by_key: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
    catalog: QualityCatalog,
    library: PatternLibrary,
    rejected: Vec<RejectedPattern>,
    config: GeneratorConfig,
}

impl ChordDatabase {
    /// Run the whole pipeline.
    ///
    /// Library patterns naming a quality the catalog lacks are built with a
    /// major-triad stand-in for that quality. Patterns that fail harmonic
    /// validation are dropped and kept in [`ChordDatabase::rejected_patterns`].
    ///
    /// # Example
    /// ```
    /// use cavaco::{ChordDatabase, GeneratorConfig, PatternLibrary, QualityCatalog};
    ///
    /// let db = ChordDatabase::build(&QualityCatalog::standard(), &PatternLibrary::standard(), &GeneratorConfig::default());
    /// let c = db.get("C").unwrap();
    /// assert_eq!(c.notes.to_string(), "{C, E, G}");
    /// assert!(db.get("Cxyz").is_none());
    /// ```
    pub fn build(catalog: &QualityCatalog, library: &PatternLibrary, config: &GeneratorConfig) -> Self {
        let validator = config.validator();

        let mut catalog = catalog.clone();
        for pattern in library.iter() {
            if catalog.get(&pattern.quality).is_none() {
                catalog.insert(catalog.resolve_or_major(&pattern.quality));
            }
        }
        let canonical = PatternLibrary::new(
            library
                .iter()
                .map(|p| {
                    let symbol = catalog.get(&p.quality).map_or(p.quality.as_str(), |q| q.symbol.as_str());
                    SourcePattern::new(symbol, p.anchor, p.fingering.clone())
                })
                .collect(),
        );
        let (library, rejected) = canonical.verified(&catalog, &validator);

        let mut entries = Vec::new();
        for root in PitchClass::all() {
            for quality in catalog.iter() {
                let mut candidates: Vec<Fingering> = library
                    .for_quality(&quality.symbol)
                    .filter_map(|pattern| transpose(pattern, quality, root, &validator, config))
                    .collect();
                if config.solver_enabled {
                    candidates.extend(solver::solve(root, quality, &validator, config));
                }

                let mut variations: Vec<Fingering> = Vec::with_capacity(candidates.len());
                for candidate in candidates {
                    if !variations.iter().any(|v| v.frets == candidate.frets) {
                        variations.push(candidate);
                    }
                }
                variations.sort_by(|a, b| a.average_fret().total_cmp(&b.average_fret()));
                variations.truncate(config.max_variations);

                let key = format!("{}{}", root.name(), quality.suffix);
                let Some(primary) = variations.first() else {
                    debug!("no playable fingering for {}", key);
                    continue;
                };
                let difficulty = difficulty::score(primary);
                debug!("{}: {} variations, difficulty {}", key, variations.len(), difficulty);
                entries.push(ChordEntry {
                    id: chord_id(root, &quality.symbol),
                    key,
                    root,
                    quality: quality.symbol.clone(),
                    suffix: quality.suffix.clone(),
                    notes: quality.pitch_classes(root),
                    intervals: quality.interval_labels(),
                    variations,
                    difficulty,
                });
            }
        }

        info!(
            "built {} chords ({} variations) for {} from {} patterns, {} rejected",
            entries.len(),
            entries.iter().map(|e| e.variations.len()).sum::<usize>(),
            config.tuning,
            library.len(),
            rejected.len()
        );
        Self::index(entries, catalog, library, rejected, config.clone())
    }

    fn index(
        entries: Vec<ChordEntry>,
        catalog: QualityCatalog,
        library: PatternLibrary,
        rejected: Vec<RejectedPattern>,
        config: GeneratorConfig,
    ) -> Self {
        let mut by_key = HashMap::with_capacity(entries.len());
        let mut by_id = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            by_key.entry(entry.key.clone()).or_insert(i);
            by_id.entry(entry.id.clone()).or_insert(i);
        }
        Self {
            entries,
            by_key,
            by_id,
            catalog,
            library,
            rejected,
            config,
        }
    }

    /// Lookup by display key ("C#m7").
    pub fn get(&self, key: &str) -> Option<&ChordEntry> {
        self.by_key.get(key).map(|i| &self.entries[*i])
    }

    pub fn get_by_id(&self, id: &str) -> Option<&ChordEntry> {
        self.by_id.get(id).map(|i| &self.entries[*i])
    }

    /// Lookup by root and quality symbol or alias.
    pub fn find(&self, root: PitchClass, quality: &str) -> Option<&ChordEntry> {
        let quality = self.catalog.get(quality)?;
        self.get(&format!("{}{}", root.name(), quality.suffix))
    }

    /// Parse a chord symbol in any spelling ("Dbm7", "C#-7") and look it up.
    /// A symbol that does not parse is an error; a chord without fingerings is `None`.
    pub fn lookup_symbol(&self, symbol: &str) -> Result<Option<&ChordEntry>, ChordError> {
        let (root, quality) = self.catalog.parse_chord_symbol(symbol)?;
        Ok(self.find(root, &quality.symbol))
    }

    /// Entries in build order: roots from C, qualities in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ChordEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ChordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The catalog the database was built with, including stand-ins for unknown qualities.
    pub fn catalog(&self) -> &QualityCatalog {
        &self.catalog
    }

    /// Verified source patterns behind the database.
    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn rejected_patterns(&self) -> &[RejectedPattern] {
        &self.rejected
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Export every entry in the custom-import JSON shape.
    pub fn to_json(&self) -> Result<String, ChordError> {
        Ok(serde_json::to_string_pretty(&ChordTable::from_database(self))?)
    }
}

/// "c-major", "cs-m7", "f-m7b5".
pub fn chord_id(root: PitchClass, symbol: &str) -> String {
    let root = root.name().to_lowercase().replace('#', "s");
    let symbol = if symbol == MAJOR {
        "major".to_string()
    } else {
        symbol.replace('#', "s")
    };
    format!("{}-{}", root, symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::note_index;

    fn standard() -> ChordDatabase {
        ChordDatabase::build(&QualityCatalog::standard(), &PatternLibrary::standard(), &GeneratorConfig::default())
    }

    #[test]
    fn test_keys_and_ids() {
        let db = standard();
        let entry = db.get("C#m7").unwrap();
        assert_eq!(entry.id, "cs-m7");
        assert_eq!(entry.root.name(), "C#");
        assert_eq!(entry.quality, "m7");
        assert_eq!(db.get_by_id("cs-m7"), Some(entry));
        assert_eq!(db.get("C").unwrap().id, "c-major");
        assert_eq!(chord_id(PitchClass::C, "7#9"), "c-7s9");
    }

    #[test]
    fn test_every_variation_is_valid() {
        let db = standard();
        let validator = db.config().validator();
        let catalog = db.catalog();
        for entry in db.iter() {
            assert!(!entry.variations.is_empty());
            assert!(entry.variations.len() <= 5);
            let quality = catalog.get(&entry.quality).unwrap();
            for variation in &entry.variations {
                assert!(validator.check(entry.root, quality, &variation.frets).valid, "{} {}", entry.key, variation);
            }
        }
    }

    #[test]
    fn test_variations_sorted_and_unique() {
        let db = standard();
        for entry in db.iter() {
            for pair in entry.variations.windows(2) {
                assert!(pair[0].average_fret() <= pair[1].average_fret(), "{}", entry.key);
            }
            for (i, a) in entry.variations.iter().enumerate() {
                for b in &entry.variations[i + 1..] {
                    assert_ne!(a.frets, b.frets, "{}", entry.key);
                }
            }
            assert_eq!(entry.difficulty, difficulty::score(entry.primary()));
        }
    }

    #[test]
    fn test_lookups() {
        let db = standard();
        let via_find = db.find(note_index("Db").unwrap(), "min7").unwrap();
        assert_eq!(via_find.key, "C#m7");
        assert_eq!(db.lookup_symbol("Dbm7").unwrap(), Some(via_find));
        assert!(db.lookup_symbol("Hm7").is_err());
        assert_eq!(db.find(PitchClass::C, "nonsense"), None);
        assert_eq!(db.get_by_id("nope"), None);
    }

    #[test]
    fn test_no_entry_without_fingerings() {
        let config = GeneratorConfig {
            solver_enabled: false,
            ..GeneratorConfig::default()
        };
        // one pattern, C major only
        let library = PatternLibrary::new(vec![SourcePattern::new(
            "M",
            PitchClass::C,
            Fingering::new([Some(2), Some(0), Some(1), Some(2)]),
        )]);
        let db = ChordDatabase::build(&QualityCatalog::standard(), &library, &config);
        assert!(db.get("C").is_some());
        assert!(db.get("Cm").is_none());
        assert!(db.iter().all(|e| e.quality == "M"));
        // C → B is +11, lowest fret 11 survives the ceiling
        assert!(db.get("B").is_some());
    }

    #[test]
    fn test_unknown_pattern_quality_falls_back_to_major() {
        let config = GeneratorConfig {
            solver_enabled: false,
            ..GeneratorConfig::default()
        };
        let library = PatternLibrary::new(vec![SourcePattern::new(
            "weird",
            PitchClass::G,
            Fingering::new([Some(0); 4]),
        )]);
        let db = ChordDatabase::build(&QualityCatalog::standard(), &library, &config);
        let entry = db.get("Gweird").unwrap();
        assert_eq!(entry.notes, db.catalog().expected_pitch_classes(PitchClass::G, "M").unwrap());
        assert!(db.rejected_patterns().is_empty());
    }

    #[test]
    fn test_rejected_patterns_are_reported() {
        let library = PatternLibrary::standard().merged(vec![SourcePattern::new(
            "M",
            PitchClass::C,
            Fingering::new([Some(0), Some(0), Some(0), Some(0)]),
        )]);
        let db = ChordDatabase::build(&QualityCatalog::standard(), &library, &GeneratorConfig::default());
        assert_eq!(db.rejected_patterns().len(), 1);
        assert!(db.get("C").unwrap().variations.iter().all(|v| v.frets != [Some(0); 4]));
    }

    #[test]
    fn test_fret_ceiling_applies_to_every_derived_variation() {
        let config = GeneratorConfig::from_yaml("fret-ceiling: 3").unwrap();
        let db = ChordDatabase::build(&QualityCatalog::standard(), &PatternLibrary::standard(), &config);
        assert!(!db.is_empty());
        for entry in db.iter() {
            for variation in &entry.variations {
                // patterns at their own root come back as authored
                let authored = db.library().iter().any(|p| {
                    p.anchor == entry.root && p.quality == entry.quality && p.fingering.frets == variation.frets
                });
                assert!(
                    authored || variation.min_fret().map_or(true, |min| min <= 3),
                    "{} {}",
                    entry.key,
                    variation
                );
            }
        }
    }

    #[test]
    fn test_max_variations_respected() {
        let config = GeneratorConfig {
            max_variations: 2,
            ..GeneratorConfig::default()
        };
        let db = ChordDatabase::build(&QualityCatalog::standard(), &PatternLibrary::standard(), &config);
        assert!(db.iter().all(|e| e.variations.len() <= 2));
    }
}
