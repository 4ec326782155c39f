//! # Chord Quality Catalog
//!
//! Quality symbol → ordered interval list, plus chord-symbol parsing.
//!
//! ## Supported Qualities
//! | Symbol  | Suffix  | Intervals            |
//! |---------|---------|----------------------|
//! | `M`     | (none)  | 1 3 5                |
//! | `m`     | `m`     | 1 b3 5               |
//! | `7`     | `7`     | 1 3 5 b7             |
//! | `m7`    | `m7`    | 1 b3 5 b7            |
//! | `maj7`  | `maj7`  | 1 3 5 7              |
//! | `6`     | `6`     | 1 3 5 6              |
//! | `m6`    | `m6`    | 1 b3 5 6             |
//! | `dim`   | `dim`   | 1 b3 b5              |
//! | `dim7`  | `dim7`  | 1 b3 b5 bb7          |
//! | `m7b5`  | `m7b5`  | 1 b3 b5 b7           |
//! | `aug`   | `aug`   | 1 3 #5               |
//! | `sus4`  | `sus4`  | 1 4 5                |
//! | `sus2`  | `sus2`  | 1 2 5                |
//! | `7sus4` | `7sus4` | 1 4 5 b7             |
//! | `9`     | `9`     | 1 3 5 b7 9           |
//! | `add9`  | `add9`  | 1 3 5 9              |
//! | `maj9`  | `maj9`  | 1 3 5 7 9            |
//! | `m9`    | `m9`    | 1 b3 5 b7 9          |
//! | `5`     | `5`     | 1 5                  |
//!
//! Aliases (`maj`, `min`, `-`, `°`, `+`, `ø`, ...) resolve to the same entries.
//!
//! ## Unknown Qualities
//! [`QualityCatalog::expected_pitch_classes`] fails with `UnknownQuality`.
//! Code paths that must not crash on imported data use
//! [`QualityCatalog::resolve_or_major`], which logs and falls back to a major triad.

use log::warn;
use serde::Serialize;

use crate::error::ChordError;
use crate::interval::Interval;
use crate::note::{parse_note_prefix, PitchClass, PitchClassSet};

/// Symbol used for the plain major triad.
pub const MAJOR: &str = "M";

/// (symbol, display suffix, name, aliases, interval labels)
const STANDARD_QUALITIES: [(&str, &str, &str, &[&str], &[&str]); 19] = [
    ("M", "", "major", &["", "maj", "major"], &["1", "3", "5"]),
    ("m", "m", "minor", &["min", "minor", "-"], &["1", "b3", "5"]),
    ("7", "7", "dominant seventh", &["dom7"], &["1", "3", "5", "b7"]),
    ("m7", "m7", "minor seventh", &["min7", "-7"], &["1", "b3", "5", "b7"]),
    ("maj7", "maj7", "major seventh", &["M7", "7M", "Δ7", "Δ"], &["1", "3", "5", "7"]),
    ("6", "6", "sixth", &["M6", "maj6"], &["1", "3", "5", "6"]),
    ("m6", "m6", "minor sixth", &["min6", "-6"], &["1", "b3", "5", "6"]),
    ("dim", "dim", "diminished", &["°", "o"], &["1", "b3", "b5"]),
    ("dim7", "dim7", "diminished seventh", &["°7", "o7"], &["1", "b3", "b5", "bb7"]),
    ("m7b5", "m7b5", "half-diminished", &["ø", "ø7", "min7b5", "-7b5"], &["1", "b3", "b5", "b7"]),
    ("aug", "aug", "augmented", &["+", "#5"], &["1", "3", "#5"]),
    ("sus4", "sus4", "suspended fourth", &["sus"], &["1", "4", "5"]),
    ("sus2", "sus2", "suspended second", &[], &["1", "2", "5"]),
    ("7sus4", "7sus4", "dominant seventh suspended fourth", &["7sus"], &["1", "4", "5", "b7"]),
    ("9", "9", "dominant ninth", &["dom9"], &["1", "3", "5", "b7", "9"]),
    ("add9", "add9", "added ninth", &["add2"], &["1", "3", "5", "9"]),
    ("maj9", "maj9", "major ninth", &["M9", "Δ9"], &["1", "3", "5", "7", "9"]),
    ("m9", "m9", "minor ninth", &["min9", "-9"], &["1", "b3", "5", "b7", "9"]),
    ("5", "5", "power chord", &[], &["1", "5"]),
];

/// A chord type: the intervals stacked on a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordQuality {
    pub symbol: String,
    /// Appended to the root to form the chord name ("" for major, "m7", ...).
    pub suffix: String,
    pub name: String,
    #[serde(skip)]
    pub aliases: Vec<String>,
    pub intervals: Vec<Interval>,
}

impl ChordQuality {
    /// Build a quality from interval labels.
    pub fn new(symbol: &str, suffix: &str, name: &str, labels: &[&str]) -> Result<Self, ChordError> {
        let intervals = labels
            .iter()
            .map(|label| Interval::from_label(label))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            symbol: symbol.to_string(),
            suffix: suffix.to_string(),
            name: name.to_string(),
            aliases: Vec::new(),
            intervals,
        })
    }

    /// A major-triad stand-in for a symbol the catalog does not know.
    pub fn major_shaped(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            suffix: symbol.to_string(),
            name: format!("{} (major shape)", symbol),
            aliases: Vec::new(),
            intervals: ["1", "3", "5"]
                .iter()
                .filter_map(|label| Interval::from_label(label).ok())
                .collect(),
        }
    }

    /// The pitch classes this quality requires above `root`.
    pub fn pitch_classes(&self, root: PitchClass) -> PitchClassSet {
        self.intervals.iter().map(|interval| interval.above(root)).collect()
    }

    /// True when `alias` names this quality.
    pub fn answers_to(&self, alias: &str) -> bool {
        self.symbol == alias || self.suffix == alias || self.aliases.iter().any(|a| a == alias)
    }

    /// True when the chord contains a perfect fifth.
    pub fn has_perfect_fifth(&self) -> bool {
        self.intervals.iter().any(|i| i.semitones == 7)
    }

    pub fn interval_labels(&self) -> Vec<&'static str> {
        self.intervals.iter().map(|i| i.label).collect()
    }
}

/// The ordered set of qualities a database is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityCatalog {
    qualities: Vec<ChordQuality>,
}

impl Default for QualityCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl QualityCatalog {
    /// The built-in table.
    pub fn standard() -> Self {
        let qualities = STANDARD_QUALITIES
            .iter()
            .map(|(symbol, suffix, name, aliases, labels)| {
                let intervals = labels
                    .iter()
                    .filter_map(|label| Interval::from_label(label).ok())
                    .collect();
                ChordQuality {
                    symbol: symbol.to_string(),
                    suffix: suffix.to_string(),
                    name: name.to_string(),
                    aliases: aliases.iter().map(|a| a.to_string()).collect(),
                    intervals,
                }
            })
            .collect();
        Self { qualities }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChordQuality> {
        self.qualities.iter()
    }

    pub fn len(&self) -> usize {
        self.qualities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qualities.is_empty()
    }

    /// Look up by symbol, suffix or alias.
    pub fn get(&self, symbol: &str) -> Option<&ChordQuality> {
        self.qualities
            .iter()
            .find(|q| q.symbol == symbol)
            .or_else(|| self.qualities.iter().find(|q| q.answers_to(symbol)))
    }

    /// Look up, failing with `UnknownQuality`.
    pub fn require(&self, symbol: &str) -> Result<&ChordQuality, ChordError> {
        self.get(symbol)
            .ok_or_else(|| ChordError::UnknownQuality(symbol.to_string()))
    }

    /// Look up, or stand in a major-triad shape under the given symbol.
    pub fn resolve_or_major(&self, symbol: &str) -> ChordQuality {
        match self.get(symbol) {
            Some(quality) => quality.clone(),
            None => {
                warn!("unknown chord quality '{}', treating it as a major triad", symbol);
                ChordQuality::major_shaped(symbol)
            }
        }
    }

    /// Add a quality, replacing any entry with the same symbol.
    pub fn insert(&mut self, quality: ChordQuality) {
        match self.qualities.iter_mut().find(|q| q.symbol == quality.symbol) {
            Some(existing) => *existing = quality,
            None => self.qualities.push(quality),
        }
    }

    /// Required pitch classes of `root` + `quality`.
    pub fn expected_pitch_classes(&self, root: PitchClass, quality: &str) -> Result<PitchClassSet, ChordError> {
        Ok(self.require(quality)?.pitch_classes(root))
    }

    /// Split a chord symbol such as "C#m7", "Bb" or "F#dim" into root and quality.
    ///
    /// # Example
    /// ```
    /// use cavaco::{PitchClass, QualityCatalog};
    ///
    /// let catalog = QualityCatalog::standard();
    /// let (root, quality) = catalog.parse_chord_symbol("Bbm7").unwrap();
    /// assert_eq!(root, PitchClass::new(10));
    /// assert_eq!(quality.symbol, "m7");
    /// ```
    pub fn parse_chord_symbol(&self, symbol: &str) -> Result<(PitchClass, &ChordQuality), ChordError> {
        let trimmed = symbol.trim();
        let invalid = || ChordError::InvalidChordSymbol(symbol.to_string());
        let first = trimmed.chars().next().ok_or_else(invalid)?;
        if !first.is_ascii_uppercase() {
            return Err(invalid());
        }
        let (root, len, _) = parse_note_prefix(trimmed).ok_or_else(invalid)?;
        let rest = &trimmed[len..];
        let quality = self.get(rest).ok_or_else(|| ChordError::UnknownQuality(rest.to_string()))?;
        Ok((root, quality))
    }
}
