//! Scale-degree interval labels.
//!
//! Every interval is stored as unreduced semitones from the root: "9" is 14 and "2" is 2,
//! even though both sound as the same pitch class. Reduction mod 12 happens only when
//! a pitch-class set is computed.

use serde::Serialize;
use std::fmt;

use crate::error::ChordError;
use crate::note::PitchClass;

/// Label → semitones. Shared by the catalog and the validator.
static INTERVAL_TABLE: [(&str, u8); 23] = [
    ("1", 0),
    ("b2", 1),
    ("2", 2),
    ("#2", 3),
    ("b3", 3),
    ("3", 4),
    ("4", 5),
    ("#4", 6),
    ("b5", 6),
    ("5", 7),
    ("#5", 8),
    ("b6", 8),
    ("6", 9),
    ("bb7", 9),
    ("b7", 10),
    ("7", 11),
    ("8", 12),
    ("b9", 13),
    ("9", 14),
    ("#9", 15),
    ("11", 17),
    ("#11", 18),
    ("13", 21),
];

/// A chord tone relative to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub label: &'static str,
    pub semitones: u8,
}

impl Interval {
    /// Look up a label such as "b3" or "9".
    pub fn from_label(label: &str) -> Result<Self, ChordError> {
        INTERVAL_TABLE
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(name, semitones)| Interval {
                label: *name,
                semitones: *semitones,
            })
            .ok_or_else(|| ChordError::InvalidInterval(label.to_string()))
    }

    /// Semitone offset reduced into one octave.
    pub fn pitch_class_offset(&self) -> u8 {
        self.semitones % 12
    }

    /// True for 9ths, 11ths and 13ths (and the octave).
    pub fn is_extension(&self) -> bool {
        self.semitones >= 12
    }

    /// The pitch class this interval lands on above `root`.
    pub fn above(&self, root: PitchClass) -> PitchClass {
        root.transposed(self.semitones as i32)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
