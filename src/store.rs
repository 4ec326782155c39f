//! # Chord Store
//!
//! Owns the current database behind an `Arc` together with the inputs it was built
//! from. Imports build a complete new database first and then replace the `Arc`
//! in a single assignment, so readers see either the old database or the new one.
//! A failed import leaves everything as it was.

use log::info;
use std::sync::Arc;

use crate::config::GeneratorConfig;
use crate::database::ChordDatabase;
use crate::error::ChordError;
use crate::import::{prepare_import, ChordTable, ImportReport};
use crate::library::PatternLibrary;
use crate::quality::QualityCatalog;

#[derive(Debug, Clone)]
pub struct ChordStore {
    catalog: QualityCatalog,
    library: PatternLibrary,
    config: GeneratorConfig,
    current: Arc<ChordDatabase>,
}

impl ChordStore {
    /// Build the initial database.
    pub fn new(catalog: QualityCatalog, library: PatternLibrary, config: GeneratorConfig) -> Self {
        let current = Arc::new(ChordDatabase::build(&catalog, &library, &config));
        Self {
            catalog,
            library,
            config,
            current,
        }
    }

    /// Standard catalog and pattern library under `config`.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self::new(QualityCatalog::standard(), PatternLibrary::standard(), config)
    }

    /// Snapshot of the current database. Stays valid after later imports.
    pub fn database(&self) -> Arc<ChordDatabase> {
        Arc::clone(&self.current)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Merge a JSON chord table and rebuild.
    ///
    /// Imported positions replace library patterns with the same quality and root.
    /// Structural errors reject the whole table and leave the store untouched.
    ///
    /// # Example
    /// ```
    /// use cavaco::{ChordStore, GeneratorConfig};
    ///
    /// let mut store = ChordStore::with_config(GeneratorConfig::default());
    /// let before = store.database();
    /// assert!(store.import_json(r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[2,0,1],"fingers":[0,0,0]}]}]}"#).is_err());
    /// assert_eq!(*store.database(), *before);
    /// ```
    pub fn import_json(&mut self, json: &str) -> Result<ImportReport, ChordError> {
        let table = ChordTable::parse(json)?;
        self.import_table(&table)
    }

    /// Merge an already-parsed table. The table is re-checked first.
    pub fn import_table(&mut self, table: &ChordTable) -> Result<ImportReport, ChordError> {
        table.check()?;
        let mut catalog = self.catalog.clone();
        let (patterns, report) = prepare_import(table, &mut catalog, &self.config.validator())?;
        let library = self.library.merged(patterns);
        let database = ChordDatabase::build(&catalog, &library, &self.config);

        self.catalog = catalog;
        self.library = library;
        self.current = Arc::new(database);
        info!(
            "import: {} positions accepted, {} dropped, {} new qualities",
            report.accepted,
            report.dropped.len(),
            report.new_qualities.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingering::Fingering;
    use crate::note::PitchClass;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            solver_enabled: false,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_import_overrides_pattern() {
        let mut store = ChordStore::with_config(small_config());
        let before = store.database();
        let json = r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[5,5,5,5],"fingers":[1,1,1,1],
            "barre":{"fromString":0,"toString":3,"fret":5}}]}]}"#;
        let report = store.import_json(json).unwrap();
        assert_eq!(report.accepted, 1);

        let after = store.database();
        let c = after.get("C").unwrap();
        assert!(c.variations.iter().any(|v| v.frets == [Some(5); 4]));
        assert!(!c.variations.iter().any(|v| v.frets == [Some(2), Some(0), Some(1), Some(2)]));
        // the old snapshot is untouched
        assert!(before.get("C").unwrap().variations.iter().any(|v| v.frets == [Some(2), Some(0), Some(1), Some(2)]));
        assert!(after.library().iter().any(|p| p.anchor == PitchClass::C && p.fingering.frets == [Some(5); 4]));
    }

    #[test]
    fn test_failed_import_changes_nothing() {
        let mut store = ChordStore::with_config(small_config());
        let before = store.database();
        let json = r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[5,5,5],"fingers":[1,1,1,1]}]}]}"#;
        assert!(matches!(store.import_json(json), Err(ChordError::Import { .. })));
        assert!(Arc::ptr_eq(&before, &store.database()));
    }

    #[test]
    fn test_unknown_suffix_creates_chords() {
        let mut store = ChordStore::with_config(small_config());
        let json = r#"{"chords":[{"root":"G","suffix":"open","positions":[{"frets":[0,0,0,0],"fingers":[0,0,0,0]}]}]}"#;
        let report = store.import_json(json).unwrap();
        assert_eq!(report.new_qualities, vec!["open".to_string()]);
        let db = store.database();
        assert_eq!(db.get("Gopen").unwrap().primary(), &Fingering::new([Some(0); 4]));
        assert!(db.get("Aopen").is_some());
    }
}
