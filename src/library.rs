//! # Fingering Pattern Library
//!
//! Hand-authored source patterns for the D-G-B-D cavaquinho, each anchored at the root
//! it was written for. The transposition engine moves them to every other root.
//!
//! Nothing here is trusted: [`PatternLibrary::verified`] runs every entry through the
//! harmonic validator and reports the ones that fail instead of using them.
//!
//! Voicings not listed here come from the constraint solver.

use log::warn;
use std::fmt;

use crate::fingering::{Barre, Fingering};
use crate::note::{note_index, PitchClass};
use crate::quality::QualityCatalog;
use crate::validator::HarmonicValidator;

/// (quality, anchor root, frets low→high with -1 = muted, fingers with 0 = none,
/// optional barre as (from string, to string, fret))
type PatternRow = (&'static str, &'static str, [i8; 4], [u8; 4], Option<(usize, usize, u8)>);

const STANDARD_PATTERNS: [PatternRow; 46] = [
    // major
    ("M", "G", [0, 0, 0, 0], [0, 0, 0, 0], None),
    ("M", "D", [0, 2, 3, 4], [0, 1, 2, 3], None),
    ("M", "C", [2, 0, 1, 2], [2, 0, 1, 3], None),
    ("M", "E", [2, 1, 0, 2], [2, 1, 0, 3], None),
    ("M", "F", [3, 2, 1, 3], [3, 2, 1, 4], None),
    // minor
    ("m", "G", [5, 3, 3, 5], [3, 1, 1, 4], Some((1, 2, 3))),
    ("m", "D", [0, 2, 3, 3], [0, 1, 2, 3], None),
    ("m", "A", [2, 2, 1, 2], [2, 3, 1, 4], None),
    ("m", "E", [2, 0, 0, 2], [1, 0, 0, 2], None),
    ("m", "C", [1, 0, 1, 1], [1, 0, 2, 3], None),
    // dominant seventh
    ("7", "G", [3, 0, 0, 0], [1, 0, 0, 0], None),
    ("7", "D", [0, 2, 1, 4], [0, 2, 1, 4], None),
    ("7", "C", [2, 3, 1, 2], [2, 4, 1, 3], None),
    ("7", "A", [5, 2, 2, 2], [4, 1, 1, 1], Some((1, 3, 2))),
    ("7", "E", [2, 1, 0, 0], [2, 1, 0, 0], None),
    // major seventh
    ("maj7", "G", [4, 0, 0, 0], [1, 0, 0, 0], None),
    ("maj7", "D", [0, 2, 2, 4], [0, 1, 2, 4], None),
    // minor seventh
    ("m7", "A", [5, 2, 1, 2], [4, 2, 1, 3], None),
    ("m7", "D", [0, 2, 1, 3], [0, 2, 1, 3], None),
    ("m7", "E", [2, 0, 0, 0], [1, 0, 0, 0], None),
    ("m7", "G", [3, 3, 3, 5], [1, 1, 1, 3], Some((0, 2, 3))),
    // sixth
    ("6", "G", [2, 0, 0, 0], [1, 0, 0, 0], None),
    ("6", "C", [2, 2, 1, 5], [2, 3, 1, 4], None),
    ("6", "D", [0, 2, 0, 4], [0, 1, 0, 3], None),
    // minor sixth
    ("m6", "A", [2, 2, 1, 4], [2, 3, 1, 4], None),
    ("m6", "D", [0, 2, 0, 3], [0, 1, 0, 2], None),
    // diminished
    ("dim", "B", [0, 4, 0, 3], [0, 2, 0, 1], None),
    ("dim", "C", [4, 5, 4, 4], [1, 2, 1, 1], Some((0, 3, 4))),
    ("dim7", "B", [0, 1, 0, 3], [0, 1, 0, 3], None),
    // half-diminished
    ("m7b5", "B", [0, 2, 0, 3], [0, 1, 0, 2], None),
    ("m7b5", "F#", [4, 2, 1, 2], [4, 2, 1, 3], None),
    // augmented
    ("aug", "G", [1, 0, 0, 1], [1, 0, 0, 2], None),
    ("aug", "C", [2, 1, 1, 2], [3, 1, 2, 4], None),
    // suspended
    ("sus4", "D", [0, 2, 3, 5], [0, 1, 2, 4], None),
    ("sus4", "G", [0, 0, 1, 0], [0, 0, 1, 0], None),
    ("sus4", "A", [2, 2, 3, 2], [1, 1, 2, 1], Some((0, 3, 2))),
    ("sus2", "D", [0, 2, 3, 2], [0, 1, 3, 2], None),
    ("sus2", "G", [5, 2, 3, 0], [4, 1, 2, 0], None),
    ("sus2", "A", [2, 2, 0, 2], [1, 2, 0, 3], None),
    ("7sus4", "G", [3, 0, 1, 0], [3, 0, 1, 0], None),
    // ninths
    ("9", "G", [3, 2, 0, 0], [2, 1, 0, 0], None),
    ("9", "D", [0, 2, 1, 2], [0, 2, 1, 3], None),
    ("9", "C", [2, 3, 1, 0], [2, 3, 1, 0], None),
    ("add9", "C", [2, 0, 1, 0], [2, 0, 1, 0], None),
    ("add9", "D", [4, 2, 3, 2], [3, 1, 2, 1], Some((1, 3, 2))),
    // power chord
    ("5", "G", [0, 0, 3, 0], [0, 0, 1, 0], None),
];

/// A fingering written for one specific root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePattern {
    /// Quality symbol as it appears in the catalog.
    pub quality: String,
    pub anchor: PitchClass,
    pub fingering: Fingering,
}

impl SourcePattern {
    pub fn new(quality: &str, anchor: PitchClass, fingering: Fingering) -> Self {
        Self {
            quality: quality.to_string(),
            anchor,
            fingering,
        }
    }

    fn from_row(row: &PatternRow) -> Option<Self> {
        let (quality, anchor, frets, fingers, barre) = row;
        let anchor = note_index(anchor).ok()?;
        let frets = frets.map(|f| u8::try_from(f).ok());
        let fingers = fingers.map(|f| if f == 0 { None } else { Some(f) });
        let mut fingering = Fingering::new(frets).with_fingers(fingers);
        if let Some((from_string, to_string, fret)) = barre {
            fingering = fingering.with_barre(Barre {
                from_string: *from_string,
                to_string: *to_string,
                fret: *fret,
            });
        }
        Some(Self::new(quality, anchor, fingering))
    }
}

impl fmt::Display for SourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} [{}]", self.anchor, self.quality, self.fingering)
    }
}

/// A pattern that failed re-validation, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedPattern {
    pub pattern: SourcePattern,
    pub reason: String,
}

/// Source patterns grouped by quality, in authoring order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternLibrary {
    patterns: Vec<SourcePattern>,
}

impl PatternLibrary {
    pub fn new(patterns: Vec<SourcePattern>) -> Self {
        Self { patterns }
    }

    /// The built-in cavaquinho table, not yet verified.
    pub fn standard() -> Self {
        Self::new(STANDARD_PATTERNS.iter().filter_map(SourcePattern::from_row).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourcePattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns of one quality, in authoring order.
    pub fn for_quality<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a SourcePattern> + 'a {
        self.patterns.iter().filter(move |p| p.quality == symbol)
    }

    /// Re-validate every pattern at its anchor root. Returns the surviving library and
    /// the rejected entries; each rejection is also logged.
    pub fn verified(self, catalog: &QualityCatalog, validator: &HarmonicValidator) -> (Self, Vec<RejectedPattern>) {
        let mut kept = Vec::with_capacity(self.patterns.len());
        let mut rejected = Vec::new();
        for pattern in self.patterns {
            match rejection_reason(&pattern, catalog, validator) {
                None => kept.push(pattern),
                Some(reason) => {
                    warn!("dropping source pattern {}: {}", pattern, reason);
                    rejected.push(RejectedPattern { pattern, reason });
                }
            }
        }
        (Self::new(kept), rejected)
    }

    /// Override by (quality, anchor root): every key present in `incoming` replaces all
    /// existing patterns with that key. Incoming patterns for one key go first among
    /// that quality's patterns, in their given order.
    #[must_use]
    pub fn merged(&self, incoming: Vec<SourcePattern>) -> Self {
        let overridden = |p: &SourcePattern| {
            incoming
                .iter()
                .any(|n| n.quality == p.quality && n.anchor == p.anchor)
        };
        let mut patterns: Vec<SourcePattern> = Vec::with_capacity(self.patterns.len() + incoming.len());
        patterns.extend(incoming.iter().cloned());
        patterns.extend(self.patterns.iter().filter(|p| !overridden(p)).cloned());
        Self::new(patterns)
    }
}

fn rejection_reason(pattern: &SourcePattern, catalog: &QualityCatalog, validator: &HarmonicValidator) -> Option<String> {
    let Some(quality) = catalog.get(&pattern.quality) else {
        return Some(format!("unknown quality '{}'", pattern.quality));
    };
    if let Some(barre) = pattern.fingering.barre {
        if !barre.fits(&pattern.fingering.frets) {
            return Some(format!(
                "barre at fret {} over strings {}..={} is above a fretted string",
                barre.fret, barre.from_string, barre.to_string
            ));
        }
    }
    let result = validator.check(pattern.anchor, quality, &pattern.fingering.frets);
    if result.valid {
        return None;
    }
    if !result.wrong_notes.is_empty() {
        let wrong: Vec<&str> = result.wrong_notes.iter().map(|pc| pc.name()).collect();
        Some(format!("sounds notes outside the chord: {}", wrong.join(", ")))
    } else {
        Some(format!("covers only {:.0}% of the chord tones", result.coverage * 100.0))
    }
}
