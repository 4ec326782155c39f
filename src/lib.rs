pub mod api;
pub mod config;
pub mod database;
pub mod difficulty;
pub mod error;
pub mod fingering;
pub mod harmonic_field;
pub mod identify;
pub mod import;
pub mod interval;
pub mod library;
pub mod note;
pub mod quality;
pub mod solver;
pub mod store;
pub mod transpose;
pub mod tuning;
pub mod validator;

pub use config::GeneratorConfig;
pub use database::{ChordDatabase, ChordEntry};
pub use error::*;
pub use fingering::{distance, Barre, Fingering, Fingers, Frets, Position};
pub use harmonic_field::{harmonic_field, Extension, FieldDegree, HarmonicField, KeyMode};
pub use identify::{identify_by_notes, identify_exact, identify_nearest, IdentifiedChord};
pub use import::{ChordTable, ImportReport};
pub use interval::Interval;
pub use library::{PatternLibrary, SourcePattern};
pub use note::{enharmonic, note_index, transpose_note, PitchClass, PitchClassSet};
pub use quality::{ChordQuality, QualityCatalog};
pub use store::ChordStore;
pub use transpose::transpose;
pub use tuning::Tuning;
pub use validator::{AcceptancePolicy, HarmonicValidator, ValidationResult};

/// Build the chord database with the built-in tables and default settings.
pub fn build() -> ChordDatabase {
    api::build_database(&GeneratorConfig::default())
}
