//! # Harmonic Validator
//!
//! Judges whether a fingering is an acceptable realization of a chord.
//!
//! ## Algorithm
//! 1. `sounded` = pitch classes produced by the fingering under the tuning
//! 2. `expected` = pitch classes required by root + quality
//! 3. `wrong_notes` = `sounded` − `expected`
//! 4. `coverage` = |`expected` ∩ `sounded`| / |`expected`|
//! 5. `has_root` = root ∈ `sounded`
//!
//! ## Acceptance Policy
//! A fingering is valid iff it sounds no wrong notes and `coverage >= min_coverage`
//! (0.5 by default). The root is tracked but not required: a four-string instrument
//! cannot always sound every tone, and rootless voicings with the characteristic
//! tones are accepted.
//!
//! The validator holds no mutable state. Library curation, transposition, the solver
//! and the database tests all go through it.

use serde::Serialize;

use crate::error::ChordError;
use crate::fingering::Frets;
use crate::note::{note_index, PitchClass, PitchClassSet};
use crate::quality::{ChordQuality, QualityCatalog};
use crate::tuning::Tuning;

/// Default minimum fraction of chord tones a fingering must sound.
pub const DEFAULT_MIN_COVERAGE: f64 = 0.5;

/// Tunable acceptance rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptancePolicy {
    pub min_coverage: f64,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }
}

/// Outcome of validating one fingering against one chord.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub has_root: bool,
    /// Fraction of required pitch classes that sound, 0.0..=1.0.
    pub coverage: f64,
    /// Sounded pitch classes outside the chord.
    pub wrong_notes: Vec<PitchClass>,
    /// Required pitch classes that do not sound.
    pub missing_notes: Vec<PitchClass>,
}

impl ValidationResult {
    /// Every chord tone sounds.
    pub fn is_complete(&self) -> bool {
        self.missing_notes.is_empty()
    }
}

/// Pure harmonic check bound to a tuning and a policy.
#[derive(Debug, Clone)]
pub struct HarmonicValidator {
    pub tuning: Tuning,
    pub policy: AcceptancePolicy,
}

impl Default for HarmonicValidator {
    fn default() -> Self {
        Self::new(Tuning::cavaquinho(), AcceptancePolicy::default())
    }
}

impl HarmonicValidator {
    pub fn new(tuning: Tuning, policy: AcceptancePolicy) -> Self {
        Self { tuning, policy }
    }

    /// Validate against an explicit set of expected pitch classes.
    pub fn check_pitch_classes(&self, root: PitchClass, expected: PitchClassSet, frets: &Frets) -> ValidationResult {
        let sounded = self.tuning.notes_from_fingering(frets);
        let wrong = sounded.difference(&expected);
        let present = expected.intersection(&sounded);
        let coverage = if expected.is_empty() {
            0.0
        } else {
            present.len() as f64 / expected.len() as f64
        };
        ValidationResult {
            valid: wrong.is_empty() && coverage >= self.policy.min_coverage,
            has_root: sounded.contains(root),
            coverage,
            wrong_notes: wrong.to_vec(),
            missing_notes: expected.difference(&sounded).to_vec(),
        }
    }

    /// Validate a fingering as `root` + `quality`.
    pub fn check(&self, root: PitchClass, quality: &ChordQuality, frets: &Frets) -> ValidationResult {
        self.check_pitch_classes(root, quality.pitch_classes(root), frets)
    }

    /// String-level entry point: resolves the root spelling and quality symbol first.
    ///
    /// # Example
    /// ```
    /// use cavaco::{HarmonicValidator, QualityCatalog};
    ///
    /// let validator = HarmonicValidator::default();
    /// let catalog = QualityCatalog::standard();
    /// let result = validator
    ///     .validate(&catalog, "C", "M", &[Some(2), Some(0), Some(1), Some(2)])
    ///     .unwrap();
    /// assert!(result.valid);
    /// assert_eq!(result.coverage, 1.0);
    /// ```
    pub fn validate(
        &self,
        catalog: &QualityCatalog,
        root: &str,
        quality: &str,
        frets: &Frets,
    ) -> Result<ValidationResult, ChordError> {
        let root = note_index(root)?;
        let quality = catalog.require(quality)?;
        Ok(self.check(root, quality, frets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(root: &str, quality: &str, frets: Frets) -> ValidationResult {
        HarmonicValidator::default()
            .validate(&QualityCatalog::standard(), root, quality, &frets)
            .unwrap()
    }

    #[test]
    fn test_default_threshold_is_one_half() {
        assert_eq!(DEFAULT_MIN_COVERAGE, 0.5);
        assert_eq!(AcceptancePolicy::default().min_coverage, 0.5);
    }

    #[test]
    fn test_complete_c_major() {
        let result = validate("C", "M", [Some(2), Some(0), Some(1), Some(2)]);
        assert!(result.valid);
        assert!(result.has_root);
        assert_eq!(result.coverage, 1.0);
        assert!(result.wrong_notes.is_empty());
        assert!(result.is_complete());
    }

    #[test]
    fn test_wrong_note_rejects() {
        // open strings: D G B D, a G major chord
        let result = validate("C", "M", [Some(0), Some(0), Some(0), Some(0)]);
        assert!(!result.valid);
        assert_eq!(result.wrong_notes, vec![PitchClass::D, PitchClass::B]);
    }

    #[test]
    fn test_rootless_voicing_accepted() {
        // F A B D: G9 without G
        let result = validate("G", "9", [Some(3), Some(2), Some(0), Some(0)]);
        assert!(result.valid);
        assert!(!result.has_root);
        assert_eq!(result.coverage, 0.8);
        assert_eq!(result.missing_notes, vec![PitchClass::G]);
    }

    #[test]
    fn test_coverage_boundary_is_inclusive() {
        // G B D against G7 {G, B, D, F}: 3/4
        let open = validate("G", "7", [Some(0), Some(0), Some(0), Some(0)]);
        assert!(open.valid);
        assert_eq!(open.coverage, 0.75);

        // B and high D only: {B, D} against G7 → 2/4
        let half = validate("G", "7", [None, None, Some(0), Some(0)]);
        assert_eq!(half.coverage, 0.5);
        assert!(half.valid);

        // single note D against G7 → 0.25
        let quarter = validate("G", "7", [None, None, None, Some(0)]);
        assert_eq!(quarter.coverage, 0.25);
        assert!(!quarter.valid);
    }

    #[test]
    fn test_stricter_policy() {
        let validator = HarmonicValidator::new(Tuning::cavaquinho(), AcceptancePolicy { min_coverage: 1.0 });
        let catalog = QualityCatalog::standard();
        let result = validator
            .validate(&catalog, "G", "7", &[Some(0), Some(0), Some(0), Some(0)])
            .unwrap();
        assert!(!result.valid);
        let full = validator
            .validate(&catalog, "G", "7", &[Some(3), Some(0), Some(0), Some(0)])
            .unwrap();
        assert!(full.valid);
    }

    #[test]
    fn test_all_muted_is_invalid() {
        let result = validate("C", "M", [None; 4]);
        assert!(!result.valid);
        assert_eq!(result.coverage, 0.0);
        assert!(!result.has_root);
    }

    #[test]
    fn test_string_errors() {
        let validator = HarmonicValidator::default();
        let catalog = QualityCatalog::standard();
        assert!(matches!(
            validator.validate(&catalog, "X", "M", &[Some(0); 4]),
            Err(ChordError::InvalidNote(_))
        ));
        assert!(matches!(
            validator.validate(&catalog, "C", "nope", &[Some(0); 4]),
            Err(ChordError::UnknownQuality(_))
        ));
    }
}
