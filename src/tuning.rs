//! # Tuning Model
//!
//! Open-string pitches and the (string, fret) → pitch-class mapping.
//!
//! String order is low to high everywhere in the crate: for the standard
//! cavaquinho tuning index 0 is the low D, 1 is G, 2 is B and 3 is the high D.

use serde::Serialize;
use std::fmt;

use crate::error::ChordError;
use crate::fingering::Frets;
use crate::note::{note_index, PitchClass, PitchClassSet};

/// Number of strings on the instrument.
pub const STRING_COUNT: usize = 4;

/// Open pitch class of each string, low to high.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tuning {
    pub open: [PitchClass; STRING_COUNT],
}

impl Default for Tuning {
    fn default() -> Self {
        Self::cavaquinho()
    }
}

impl Tuning {
    /// D-G-B-D.
    pub fn cavaquinho() -> Self {
        Self {
            open: [PitchClass::D, PitchClass::G, PitchClass::B, PitchClass::D],
        }
    }

    /// Parse four note names separated by whitespace or dashes ("D G B E", "D-G-B-D").
    pub fn parse(s: &str) -> Result<Self, ChordError> {
        let names: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|part| !part.is_empty())
            .collect();
        if names.len() != STRING_COUNT {
            return Err(ChordError::InvalidTuning(format!(
                "expected {} notes, found {} in '{}'",
                STRING_COUNT,
                names.len(),
                s
            )));
        }
        let mut open = [PitchClass::C; STRING_COUNT];
        for (slot, name) in open.iter_mut().zip(names) {
            *slot = note_index(name)?;
        }
        Ok(Self { open })
    }

    /// Sounded pitch class, or `None` for a muted string.
    pub fn note_at_fret(&self, string: usize, fret: Option<u8>) -> Option<PitchClass> {
        let fret = fret?;
        let open = self.open.get(string)?;
        Some(open.transposed(fret as i32))
    }

    /// Distinct pitch classes sounded by a fingering. Muted strings contribute nothing.
    pub fn notes_from_fingering(&self, frets: &Frets) -> PitchClassSet {
        frets
            .iter()
            .enumerate()
            .filter_map(|(string, fret)| self.note_at_fret(string, *fret))
            .collect()
    }
}

impl fmt::Display for Tuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.open.iter().map(|pc| pc.name()).collect();
        write!(f, "{}", names.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_strings() {
        let tuning = Tuning::cavaquinho();
        assert_eq!(tuning.note_at_fret(0, Some(0)), Some(PitchClass::D));
        assert_eq!(tuning.note_at_fret(1, Some(0)), Some(PitchClass::G));
        assert_eq!(tuning.note_at_fret(2, Some(0)), Some(PitchClass::B));
        assert_eq!(tuning.note_at_fret(3, Some(0)), Some(PitchClass::D));
    }

    #[test]
    fn test_fretted_and_muted() {
        let tuning = Tuning::cavaquinho();
        // B string, first fret: C
        assert_eq!(tuning.note_at_fret(2, Some(1)), Some(PitchClass::C));
        // low D, twelfth fret wraps to D
        assert_eq!(tuning.note_at_fret(0, Some(12)), Some(PitchClass::D));
        assert_eq!(tuning.note_at_fret(1, None), None);
        assert_eq!(tuning.note_at_fret(7, Some(0)), None);
    }

    #[test]
    fn test_notes_from_c_major_shape() {
        let tuning = Tuning::cavaquinho();
        let notes = tuning.notes_from_fingering(&[Some(2), Some(0), Some(1), Some(2)]);
        assert_eq!(notes.to_vec(), vec![PitchClass::C, PitchClass::E, PitchClass::G]);
    }

    #[test]
    fn test_all_muted_is_silent() {
        let tuning = Tuning::cavaquinho();
        assert!(tuning.notes_from_fingering(&[None; 4]).is_empty());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Tuning::parse("D-G-B-D").unwrap(), Tuning::cavaquinho());
        let ukulele = Tuning::parse("G C E A").unwrap();
        assert_eq!(ukulele.to_string(), "G-C-E-A");
        assert!(Tuning::parse("D G B").is_err());
        assert!(Tuning::parse("D G B X").is_err());
    }
}
