//! # Harmonic Field
//!
//! The seven diatonic chords of a major or natural-minor key, as triads or seventh
//! chords, and their lookup in a built database.
//!
//! | Mode  | Triads                    | Sevenths                                  |
//! |-------|---------------------------|-------------------------------------------|
//! | major | I ii iii IV V vi vii°     | Imaj7 ii7 iii7 IVmaj7 V7 vi7 viiø7        |
//! | minor | i ii° III iv v VI VII     | i7 iiø7 IIImaj7 iv7 v7 VImaj7 VII7        |

use serde::Serialize;

use crate::database::{ChordDatabase, ChordEntry};
use crate::error::ChordError;
use crate::note::{note_index, PitchClass};
use crate::quality::QualityCatalog;

const MAJOR_SCALE: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_SCALE: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];

/// (numeral, quality symbol) per degree
const MAJOR_TRIADS: [(&str, &str); 7] = [
    ("I", "M"),
    ("ii", "m"),
    ("iii", "m"),
    ("IV", "M"),
    ("V", "M"),
    ("vi", "m"),
    ("vii°", "dim"),
];
const MAJOR_SEVENTHS: [(&str, &str); 7] = [
    ("Imaj7", "maj7"),
    ("ii7", "m7"),
    ("iii7", "m7"),
    ("IVmaj7", "maj7"),
    ("V7", "7"),
    ("vi7", "m7"),
    ("viiø7", "m7b5"),
];
const MINOR_TRIADS: [(&str, &str); 7] = [
    ("i", "m"),
    ("ii°", "dim"),
    ("III", "M"),
    ("iv", "m"),
    ("v", "m"),
    ("VI", "M"),
    ("VII", "M"),
];
const MINOR_SEVENTHS: [(&str, &str); 7] = [
    ("i7", "m7"),
    ("iiø7", "m7b5"),
    ("IIImaj7", "maj7"),
    ("iv7", "m7"),
    ("v7", "m7"),
    ("VImaj7", "maj7"),
    ("VII7", "7"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    Triads,
    Sevenths,
}

/// One scale degree and the chord built on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDegree {
    /// 1..=7
    pub degree: u8,
    pub numeral: &'static str,
    pub root: PitchClass,
    pub quality: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonicField {
    pub key: PitchClass,
    pub mode: KeyMode,
    pub extension: Extension,
    pub degrees: Vec<FieldDegree>,
}

impl FieldDegree {
    /// Display name with the catalog suffix ("C", "Dm", "Bdim").
    pub fn chord_name(&self, catalog: &QualityCatalog) -> String {
        let suffix = catalog.get(self.quality).map_or(self.quality, |q| q.suffix.as_str());
        format!("{}{}", self.root.name(), suffix)
    }
}

impl HarmonicField {
    pub fn new(key: PitchClass, mode: KeyMode, extension: Extension) -> Self {
        let (scale, chords) = match (mode, extension) {
            (KeyMode::Major, Extension::Triads) => (MAJOR_SCALE, MAJOR_TRIADS),
            (KeyMode::Major, Extension::Sevenths) => (MAJOR_SCALE, MAJOR_SEVENTHS),
            (KeyMode::Minor, Extension::Triads) => (MINOR_SCALE, MINOR_TRIADS),
            (KeyMode::Minor, Extension::Sevenths) => (MINOR_SCALE, MINOR_SEVENTHS),
        };
        let degrees = scale
            .iter()
            .zip(chords)
            .enumerate()
            .map(|(i, (offset, (numeral, quality)))| FieldDegree {
                degree: i as u8 + 1,
                numeral,
                root: key.transposed(*offset as i32),
                quality,
            })
            .collect();
        Self {
            key,
            mode,
            extension,
            degrees,
        }
    }

    /// Pair each degree with its database entry; `None` where the database has none.
    pub fn resolve<'a>(&self, db: &'a ChordDatabase) -> Vec<(&FieldDegree, Option<&'a ChordEntry>)> {
        self.degrees
            .iter()
            .map(|degree| (degree, db.find(degree.root, degree.quality)))
            .collect()
    }
}

/// Field of a key given by name.
///
/// # Example
/// ```
/// use cavaco::harmonic_field::{harmonic_field, Extension, KeyMode};
///
/// let field = harmonic_field("A", KeyMode::Minor, Extension::Triads).unwrap();
/// let roots: Vec<&str> = field.degrees.iter().map(|d| d.root.name()).collect();
/// assert_eq!(roots, ["A", "B", "C", "D", "E", "F", "G"]);
/// ```
pub fn harmonic_field(key: &str, mode: KeyMode, extension: Extension) -> Result<HarmonicField, ChordError> {
    Ok(HarmonicField::new(note_index(key)?, mode, extension))
}
