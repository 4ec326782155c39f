//! # Error Types
//!
//! This module defines all error types for the cavaco chord engine.
//!
//! Only input that cannot be interpreted at all is an error. A transposition that
//! produces no playable fingering, a chord with zero variations, or a lookup that
//! finds nothing are normal outcomes and are modelled with `Option`/empty lists.
//!
//! ## Error Types
//! - `InvalidNote` - a note spelling that is not a letter A-G plus at most one accidental
//! - `UnknownQuality` - a chord-quality symbol missing from the catalog
//! - `InvalidInterval` - an interval label outside the interval table ("b4")
//! - `InvalidChordSymbol` - a full chord symbol ("C#m7") that cannot be split into root + quality
//! - `Import` - a structurally malformed custom chord table (rejected as a whole)
//! - `Config` - invalid generator configuration
//! - `InvalidTuning` - a tuning string that does not name exactly four notes
//! - `Json` - the import text is not JSON of the expected shape
//!
//! ## Usage
//! ```rust
//! use cavaco::{note_index, ChordError};
//!
//! match note_index("H") {
//!     Ok(pc) => println!("pitch class {}", pc),
//!     Err(ChordError::InvalidNote(name)) => eprintln!("not a note: {}", name),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChordError {
    /// Unrecognized note spelling.
    ///
    /// # Example
    /// ```
    /// # use cavaco::ChordError;
    /// let err = ChordError::InvalidNote("H#".to_string());
    /// assert_eq!(err.to_string(), "Invalid note name: 'H#'");
    /// ```
    #[error("Invalid note name: '{0}'")]
    InvalidNote(String),

    /// Chord-quality symbol not present in the catalog.
    ///
    /// Database builds never surface this: they fall back to a major-triad shape.
    #[error("Unknown chord quality: '{0}'")]
    UnknownQuality(String),

    #[error("Invalid interval label: '{0}'")]
    InvalidInterval(String),

    #[error("Invalid chord symbol: '{0}'")]
    InvalidChordSymbol(String),

    /// Malformed custom chord table.
    ///
    /// `path` locates the offending value inside the document.
    ///
    /// # Example
    /// ```
    /// # use cavaco::ChordError;
    /// let err = ChordError::Import {
    ///     path: "chords[0].positions[1].frets".to_string(),
    ///     message: "expected 4 values, found 3".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid chord import at chords[0].positions[1].frets: expected 4 values, found 3"
    /// );
    /// ```
    #[error("Invalid chord import at {path}: {message}")]
    Import { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Invalid chord import JSON: {0}")]
    Json(#[from] serde_json::Error),
}
