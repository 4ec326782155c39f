//! # Generator Configuration
//!
//! Tunables for the database build, loadable from YAML.
//!
//! ## Format
//! ```yaml
//! tuning: D G B D
//! fret-ceiling: 12
//! max-variations: 5
//! high-position-threshold: 4
//! min-coverage: 0.5
//! solver: true
//! solver-max-fret: 10
//! solver-max-span: 3
//! solver-candidates: 8
//! ```
//! Every key is optional; missing keys keep their defaults.

use serde::Deserialize;

use crate::error::ChordError;
use crate::tuning::Tuning;
use crate::validator::{AcceptancePolicy, HarmonicValidator, DEFAULT_MIN_COVERAGE};

/// Highest fret a fingering may start at and still be kept.
pub const DEFAULT_FRET_CEILING: u8 = 12;
/// Variations kept per chord.
pub const DEFAULT_MAX_VARIATIONS: usize = 5;
/// Shapes whose lowest fretted position exceeds this get a raised diagram start.
pub const DEFAULT_HIGH_POSITION_THRESHOLD: u8 = 4;

/// Highest fret on a standard cavaquinho neck.
const MAX_NECK_FRET: u8 = 24;

/// Build-time settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub tuning: Tuning,
    pub fret_ceiling: u8,
    pub max_variations: usize,
    pub high_position_threshold: u8,
    pub min_coverage: f64,
    pub solver_enabled: bool,
    /// Highest fret the solver considers on any string.
    pub solver_max_fret: u8,
    /// Widest stretch between fretted positions the solver accepts.
    pub solver_max_span: u8,
    /// Solver results kept per chord before merging with transposed patterns.
    pub solver_candidates: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tuning: Tuning::cavaquinho(),
            fret_ceiling: DEFAULT_FRET_CEILING,
            max_variations: DEFAULT_MAX_VARIATIONS,
            high_position_threshold: DEFAULT_HIGH_POSITION_THRESHOLD,
            min_coverage: DEFAULT_MIN_COVERAGE,
            solver_enabled: true,
            solver_max_fret: 10,
            solver_max_span: 3,
            solver_candidates: 8,
        }
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub tuning: Option<String>,
    pub fret_ceiling: Option<u8>,
    pub max_variations: Option<usize>,
    pub high_position_threshold: Option<u8>,
    pub min_coverage: Option<f64>,
    pub solver: Option<bool>,
    pub solver_max_fret: Option<u8>,
    pub solver_max_span: Option<u8>,
    pub solver_candidates: Option<usize>,
}

impl GeneratorConfig {
    /// Parse a YAML document. An empty document yields the defaults.
    ///
    /// # Example
    /// ```
    /// use cavaco::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::from_yaml("max-variations: 3\nsolver: false").unwrap();
    /// assert_eq!(config.max_variations, 3);
    /// assert!(!config.solver_enabled);
    /// assert_eq!(config.fret_ceiling, 12);
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, ChordError> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ChordError::Config(e.to_string()))?
        };
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ChordError> {
        let defaults = Self::default();

        let tuning = match &raw.tuning {
            Some(t) => Tuning::parse(t)?,
            None => defaults.tuning,
        };

        let config = Self {
            tuning,
            fret_ceiling: raw.fret_ceiling.unwrap_or(defaults.fret_ceiling),
            max_variations: raw.max_variations.unwrap_or(defaults.max_variations),
            high_position_threshold: raw
                .high_position_threshold
                .unwrap_or(defaults.high_position_threshold),
            min_coverage: raw.min_coverage.unwrap_or(defaults.min_coverage),
            solver_enabled: raw.solver.unwrap_or(defaults.solver_enabled),
            solver_max_fret: raw.solver_max_fret.unwrap_or(defaults.solver_max_fret),
            solver_max_span: raw.solver_max_span.unwrap_or(defaults.solver_max_span),
            solver_candidates: raw.solver_candidates.unwrap_or(defaults.solver_candidates),
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ChordError> {
        if self.fret_ceiling == 0 || self.fret_ceiling > MAX_NECK_FRET {
            return Err(ChordError::Config(format!(
                "fret-ceiling must be in 1..={}, got {}",
                MAX_NECK_FRET, self.fret_ceiling
            )));
        }
        if self.max_variations == 0 {
            return Err(ChordError::Config("max-variations must be at least 1".to_string()));
        }
        if !(self.min_coverage > 0.0 && self.min_coverage <= 1.0) {
            return Err(ChordError::Config(format!(
                "min-coverage must be in (0, 1], got {}",
                self.min_coverage
            )));
        }
        if self.solver_max_fret > MAX_NECK_FRET {
            return Err(ChordError::Config(format!(
                "solver-max-fret must be at most {}, got {}",
                MAX_NECK_FRET, self.solver_max_fret
            )));
        }
        if self.solver_max_span > 6 {
            return Err(ChordError::Config(format!(
                "solver-max-span must be at most 6, got {}",
                self.solver_max_span
            )));
        }
        Ok(())
    }

    /// The validator this configuration implies.
    pub fn validator(&self) -> HarmonicValidator {
        HarmonicValidator::new(
            self.tuning.clone(),
            AcceptancePolicy {
                min_coverage: self.min_coverage,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.fret_ceiling, 12);
        assert_eq!(config.max_variations, 5);
        assert_eq!(config.high_position_threshold, 4);
        assert_eq!(config.min_coverage, 0.5);
        assert_eq!(config.tuning, Tuning::cavaquinho());
        assert!(config.solver_enabled);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(GeneratorConfig::from_yaml("").unwrap(), GeneratorConfig::default());
        assert_eq!(GeneratorConfig::from_yaml("  \n").unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn test_overrides() {
        let yaml = "tuning: D G B E\nfret-ceiling: 9\nmin-coverage: 0.75\nsolver-candidates: 2\n";
        let config = GeneratorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.tuning.to_string(), "D-G-B-E");
        assert_eq!(config.fret_ceiling, 9);
        assert_eq!(config.min_coverage, 0.75);
        assert_eq!(config.solver_candidates, 2);
        assert_eq!(config.max_variations, 5);
        assert_eq!(config.validator().policy.min_coverage, 0.75);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(GeneratorConfig::from_yaml("max-variations: 0"), Err(ChordError::Config(_))));
        assert!(matches!(GeneratorConfig::from_yaml("min-coverage: 1.5"), Err(ChordError::Config(_))));
        assert!(matches!(GeneratorConfig::from_yaml("min-coverage: 0"), Err(ChordError::Config(_))));
        assert!(matches!(GeneratorConfig::from_yaml("fret-ceiling: 30"), Err(ChordError::Config(_))));
        assert!(matches!(GeneratorConfig::from_yaml("solver-max-span: 9"), Err(ChordError::Config(_))));
        assert!(matches!(GeneratorConfig::from_yaml("tuning: D G"), Err(ChordError::InvalidTuning(_))));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        assert!(matches!(GeneratorConfig::from_yaml("fret-ceiling: [1, 2"), Err(ChordError::Config(_))));
        assert!(matches!(GeneratorConfig::from_yaml("fret-ceiling: high"), Err(ChordError::Config(_))));
        assert!(matches!(GeneratorConfig::from_yaml("fret-cieling: 9"), Err(ChordError::Config(_))));
    }
}
