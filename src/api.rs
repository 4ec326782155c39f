//! # Public API
//!
//! One-call entry points for a composition root (the CLI, a UI shell, a test).
//!
//! ## Functions
//!
//! - [`build_database()`] - standard catalog and library under a configuration
//! - [`open_store()`] - configuration text + optional import text → ready [`ChordStore`]
//! - [`validate_fingering()`] - string-level harmonic check with default settings
//! - [`describe()`] - human-readable summary of an entry
//!
//! ## Typical Usage
//!
//! ```rust
//! use cavaco::api;
//!
//! let store = api::open_store(Some("max-variations: 3"), None)?;
//! let db = store.database();
//! let g7 = db.lookup_symbol("G7")?.expect("G7 is playable");
//! assert!(g7.variations.len() <= 3);
//! # Ok::<(), cavaco::ChordError>(())
//! ```

use crate::config::GeneratorConfig;
use crate::database::{ChordDatabase, ChordEntry};
use crate::error::ChordError;
use crate::fingering::Frets;
use crate::library::PatternLibrary;
use crate::quality::QualityCatalog;
use crate::store::ChordStore;
use crate::validator::{HarmonicValidator, ValidationResult};

/// Build the database from the built-in catalog and pattern library.
///
/// # Example
/// ```rust
/// use cavaco::{api, GeneratorConfig};
///
/// let db = api::build_database(&GeneratorConfig::default());
/// assert!(db.get("Am").is_some());
/// ```
pub fn build_database(config: &GeneratorConfig) -> ChordDatabase {
    ChordDatabase::build(&QualityCatalog::standard(), &PatternLibrary::standard(), config)
}

/// Parse optional YAML configuration, build, then apply an optional JSON import.
///
/// # Errors
/// Returns [`ChordError::Config`] / [`ChordError::InvalidTuning`] for bad
/// configuration and the import errors of [`ChordStore::import_json`].
pub fn open_store(config_yaml: Option<&str>, import_json: Option<&str>) -> Result<ChordStore, ChordError> {
    let config = match config_yaml {
        Some(yaml) => GeneratorConfig::from_yaml(yaml)?,
        None => GeneratorConfig::default(),
    };
    let mut store = ChordStore::with_config(config);
    if let Some(json) = import_json {
        store.import_json(json)?;
    }
    Ok(store)
}

/// Check a fingering against a chord named by root spelling and quality symbol.
///
/// # Example
/// ```rust
/// use cavaco::api;
///
/// let result = api::validate_fingering("G", "7", &[Some(3), Some(0), Some(0), Some(0)])?;
/// assert!(result.valid);
/// assert_eq!(result.coverage, 1.0);
/// # Ok::<(), cavaco::ChordError>(())
/// ```
pub fn validate_fingering(root: &str, quality: &str, frets: &Frets) -> Result<ValidationResult, ChordError> {
    HarmonicValidator::default().validate(&QualityCatalog::standard(), root, quality, frets)
}

/// Multi-line text: name, notes, intervals and each variation with its position.
pub fn describe(entry: &ChordEntry) -> String {
    let mut out = format!(
        "{} ({})\n  notes: {}\n  intervals: {}\n  difficulty: {}\n",
        entry.key,
        entry.id,
        entry.notes,
        entry.intervals.join(" "),
        entry.difficulty
    );
    for (i, variation) in entry.variations.iter().enumerate() {
        let barre = match variation.barre {
            Some(b) => format!(", barre {}-{} at fret {}", b.from_string, b.to_string, b.fret),
            None => String::new(),
        };
        out.push_str(&format!("  {}. {}  [{}{}]\n", i + 1, variation, variation.position(), barre));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_store_with_import() {
        let json = r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[5,5,5,5],"fingers":[1,1,1,1]}]}]}"#;
        let store = open_store(Some("solver: false"), Some(json)).unwrap();
        let db = store.database();
        assert!(db.get("C").unwrap().variations.iter().any(|v| v.frets == [Some(5); 4]));
        assert!(!store.config().solver_enabled);
    }

    #[test]
    fn test_open_store_errors() {
        assert!(matches!(open_store(Some("max-variations: 0"), None), Err(ChordError::Config(_))));
        assert!(matches!(open_store(None, Some("{}")), Err(ChordError::Json(_))));
    }

    #[test]
    fn test_describe() {
        let db = build_database(&GeneratorConfig::default());
        let text = describe(db.get("C").unwrap());
        assert!(text.starts_with("C (c-major)\n"));
        assert!(text.contains("notes: {C, E, G}"));
        assert!(text.contains("2 0 1 2"));
    }
}
