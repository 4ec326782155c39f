//! # Pitch/Note Model
//!
//! Chromatic note arithmetic on the 12 pitch classes.
//!
//! ## Representation
//! - [`PitchClass`] is a semitone index 0..=11 with C = 0. Every arithmetic path goes
//!   through `rem_euclid(12)`, so negative offsets normalize into range.
//! - [`PitchClassSet`] is a 12-bit mask, bit `n` set when pitch class `n` is present.
//!
//! ## Spelling
//! Parsing accepts a letter A-G (either case) followed by at most one accidental:
//! `#` or `♯` for sharp, `b` or `♭` for flat. `Cb`, `B#`, `E#` and `Fb` resolve
//! through the same arithmetic as every other spelling.
//!
//! Output uses sharps by default (`C#`, `D#`, ...) and flats on request.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::ChordError;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// One of the 12 pitch classes, C = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);
    pub const D: PitchClass = PitchClass(2);
    pub const E: PitchClass = PitchClass(4);
    pub const F: PitchClass = PitchClass(5);
    pub const G: PitchClass = PitchClass(7);
    pub const A: PitchClass = PitchClass(9);
    pub const B: PitchClass = PitchClass(11);

    /// Build a pitch class from any integer, reducing mod 12.
    pub fn new(semitone: i32) -> Self {
        PitchClass(semitone.rem_euclid(12) as u8)
    }

    /// All 12 pitch classes in chromatic order starting at C.
    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..12).map(PitchClass)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Sharp spelling ("C#").
    pub fn name(self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }

    /// Flat spelling ("Db").
    pub fn flat_name(self) -> &'static str {
        FLAT_NAMES[self.0 as usize]
    }

    /// True for the five pitch classes with two common spellings.
    pub fn is_accidental(self) -> bool {
        matches!(self.0, 1 | 3 | 6 | 8 | 10)
    }

    #[must_use]
    pub fn transposed(self, semitones: i32) -> Self {
        PitchClass::new(self.0 as i32 + semitones)
    }

    /// Upward distance from `self` to `other`, in 0..=11.
    pub fn semitones_to(self, other: PitchClass) -> u8 {
        (other.0 as i32 - self.0 as i32).rem_euclid(12) as u8
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for PitchClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Parse a note spelling at the start of `s`.
/// Returns the pitch class, the number of bytes consumed (so chord-symbol parsing can
/// continue after the root) and the accidental used.
pub(crate) fn parse_note_prefix(s: &str) -> Option<(PitchClass, usize, Accidental)> {
    let mut chars = s.chars();
    let letter = chars.next()?;
    let base: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let (offset, accidental, len) = match chars.next() {
        Some('#') | Some('♯') => (1, Accidental::Sharp, 1 + chars_len(s, 1)),
        Some('b') | Some('♭') => (-1, Accidental::Flat, 1 + chars_len(s, 1)),
        _ => (0, Accidental::Natural, 1),
    };
    Some((PitchClass::new(base + offset), len, accidental))
}

/// Byte length of the `n`-th char of `s` (`♯`/`♭` are multi-byte).
fn chars_len(s: &str, n: usize) -> usize {
    s.chars().nth(n).map(char::len_utf8).unwrap_or(0)
}

/// Accidental used in a spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// Resolve a note spelling to its pitch class.
///
/// # Example
/// ```
/// use cavaco::note_index;
///
/// assert_eq!(note_index("C").unwrap().index(), 0);
/// assert_eq!(note_index("Db").unwrap(), note_index("C#").unwrap());
/// assert!(note_index("H").is_err());
/// ```
pub fn note_index(name: &str) -> Result<PitchClass, ChordError> {
    let trimmed = name.trim();
    match parse_note_prefix(trimmed) {
        Some((pc, len, _)) if len == trimmed.len() => Ok(pc),
        _ => Err(ChordError::InvalidNote(name.to_string())),
    }
}

/// `(index + semitones) mod 12`, normalized into 0..=11.
pub fn transpose_note(index: PitchClass, semitones: i32) -> PitchClass {
    index.transposed(semitones)
}

/// Alternate spelling for the five ambiguous pitch classes.
///
/// A sharp spelling returns the flat one and vice versa. Naturals (and spellings such
/// as "Cb" that land on a natural) have no alternate and return `None`.
pub fn enharmonic(name: &str) -> Result<Option<&'static str>, ChordError> {
    let trimmed = name.trim();
    let (pc, _, accidental) = parse_note_prefix(trimmed)
        .filter(|(_, len, _)| *len == trimmed.len())
        .ok_or_else(|| ChordError::InvalidNote(name.to_string()))?;
    if !pc.is_accidental() {
        return Ok(None);
    }
    Ok(Some(match accidental {
        Accidental::Flat => pc.name(),
        _ => pc.flat_name(),
    }))
}

// -------------------------------------------------------------------------------------------------

/// A set of pitch classes stored as a 12-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PitchClassSet(u16);

impl PitchClassSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, pc: PitchClass) {
        self.0 |= 1 << pc.index();
    }

    pub fn contains(&self, pc: PitchClass) -> bool {
        self.0 & (1 << pc.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn intersection(&self, other: &PitchClassSet) -> PitchClassSet {
        PitchClassSet(self.0 & other.0)
    }

    /// Members of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &PitchClassSet) -> PitchClassSet {
        PitchClassSet(self.0 & !other.0)
    }

    pub fn is_subset(&self, other: &PitchClassSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Members in ascending order from C.
    pub fn iter(&self) -> impl Iterator<Item = PitchClass> + '_ {
        PitchClass::all().filter(move |pc| self.contains(*pc))
    }

    pub fn to_vec(&self) -> Vec<PitchClass> {
        self.iter().collect()
    }
}

impl FromIterator<PitchClass> for PitchClassSet {
    fn from_iter<I: IntoIterator<Item = PitchClass>>(iter: I) -> Self {
        let mut set = PitchClassSet::new();
        for pc in iter {
            set.insert(pc);
        }
        set
    }
}

impl fmt::Display for PitchClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(PitchClass::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

impl Serialize for PitchClassSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
