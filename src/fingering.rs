//! # Fingering Model
//!
//! A fingering is one fret value per string (low to high) plus optional finger numbers,
//! an optional barre and the fret a diagram starts at.
//!
//! ## Representation
//! - `Option<u8>` per string: `None` is a muted string, `Some(0)` an open string.
//! - Fingers are `Option<u8>` in 1..=4 (index..pinky); `None` means no finger.
//! - JSON uses `-1` for a muted fret and `0` for "no finger", matching the import table.
//!
//! ## Equality
//! Two fingerings are "the same chord shape" when their fret arrays are equal
//! (mute-for-mute, fret-for-fret). Finger and barre annotations do not take part.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::tuning::STRING_COUNT;

/// Per-string frets, low string first. `None` = muted.
pub type Frets = [Option<u8>; STRING_COUNT];

/// Per-string finger numbers, low string first. `None` = no finger.
pub type Fingers = [Option<u8>; STRING_COUNT];

/// Penalty per string in [`distance`] when exactly one side is muted.
pub const MUTE_MISMATCH_PENALTY: u32 = 5;

/// One finger across several strings at the same fret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Barre {
    pub from_string: usize,
    pub to_string: usize,
    pub fret: u8,
}

impl Barre {
    /// True when the barre fret is at or below every fretted string it spans.
    pub fn fits(&self, frets: &Frets) -> bool {
        if self.fret == 0 || self.from_string > self.to_string || self.to_string >= STRING_COUNT {
            return false;
        }
        frets[self.from_string..=self.to_string]
            .iter()
            .all(|fret| fret.map_or(true, |f| f >= self.fret))
    }
}

/// Where the hand sits, derived from the diagram starting fret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Open,
    Fret(u8),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Open => write!(f, "open position"),
            Position::Fret(n) => {
                let suffix = match (n % 10, n % 100) {
                    (_, 11..=13) => "th",
                    (1, _) => "st",
                    (2, _) => "nd",
                    (3, _) => "rd",
                    _ => "th",
                };
                write!(f, "{}{} position", n, suffix)
            }
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A concrete way to form a chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingering {
    #[serde(serialize_with = "serialize_frets")]
    pub frets: Frets,
    #[serde(serialize_with = "serialize_fingers")]
    pub fingers: Fingers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barre: Option<Barre>,
    pub start_fret: u8,
}

impl Fingering {
    /// Fret pattern without annotations, diagram starting at the nut.
    pub fn new(frets: Frets) -> Self {
        Self {
            frets,
            fingers: [None; STRING_COUNT],
            barre: None,
            start_fret: 1,
        }
    }

    #[must_use]
    pub fn with_fingers(mut self, fingers: Fingers) -> Self {
        self.fingers = fingers;
        self
    }

    #[must_use]
    pub fn with_barre(mut self, barre: Barre) -> Self {
        self.barre = Some(barre);
        self
    }

    /// Frets greater than zero.
    pub fn fretted(&self) -> impl Iterator<Item = u8> + '_ {
        self.frets.iter().filter_map(|f| f.filter(|f| *f > 0))
    }

    pub fn min_fret(&self) -> Option<u8> {
        self.fretted().min()
    }

    pub fn max_fret(&self) -> Option<u8> {
        self.fretted().max()
    }

    /// Distance between the lowest and highest fretted positions.
    pub fn span(&self) -> u8 {
        match (self.min_fret(), self.max_fret()) {
            (Some(lo), Some(hi)) => hi - lo,
            _ => 0,
        }
    }

    pub fn fretted_count(&self) -> usize {
        self.fretted().count()
    }

    pub fn open_count(&self) -> usize {
        self.frets.iter().filter(|f| **f == Some(0)).count()
    }

    pub fn muted_count(&self) -> usize {
        self.frets.iter().filter(|f| f.is_none()).count()
    }

    /// Mean fret over played strings; open strings count as 0. All muted → 0.
    pub fn average_fret(&self) -> f64 {
        let played: Vec<u8> = self.frets.iter().flatten().copied().collect();
        if played.is_empty() {
            return 0.0;
        }
        played.iter().map(|f| *f as f64).sum::<f64>() / played.len() as f64
    }

    /// Mean of the fretted (non-open) positions only. No fretted strings → 0.
    pub fn average_fretted(&self) -> f64 {
        let count = self.fretted_count();
        if count == 0 {
            return 0.0;
        }
        self.fretted().map(|f| f as f64).sum::<f64>() / count as f64
    }

    /// Number of fingers pressing strings: a barre counts once.
    pub fn finger_count(&self) -> usize {
        match self.barre {
            Some(barre) => {
                let under_barre = (barre.from_string..=barre.to_string.min(STRING_COUNT - 1))
                    .filter(|s| barre.fret > 0 && self.frets[*s] == Some(barre.fret))
                    .count();
                self.fretted_count().saturating_sub(under_barre) + 1
            }
            None => self.fretted_count(),
        }
    }

    /// Diagram starting fret: 1 unless the shape sits above `high_threshold`,
    /// in which case the diagram starts one fret below the lowest fretted position.
    pub fn diagram_start(&self, high_threshold: u8) -> u8 {
        match self.min_fret() {
            Some(min) if min > high_threshold => min - 1,
            _ => 1,
        }
    }

    pub fn position(&self) -> Position {
        if self.start_fret <= 1 {
            Position::Open
        } else {
            Position::Fret(self.start_fret)
        }
    }

    /// Assign finger numbers and a barre from the fret pattern alone.
    ///
    /// The lowest fretted position becomes an index-finger barre when three strings
    /// share it, or when two share it and all four strings are fretted. Remaining
    /// fretted strings get the next fingers in fret order, low string first on ties.
    /// Returns `None` when the shape needs more than four fingers.
    #[must_use]
    pub fn with_auto_fingers(mut self) -> Option<Self> {
        self.fingers = [None; STRING_COUNT];
        self.barre = None;
        let Some(min) = self.min_fret() else {
            return Some(self);
        };

        let at_min: Vec<usize> = (0..STRING_COUNT)
            .filter(|s| self.frets[*s] == Some(min))
            .collect();
        let wants_barre =
            at_min.len() >= 3 || (at_min.len() >= 2 && self.fretted_count() == STRING_COUNT);
        if wants_barre {
            let barre = Barre {
                from_string: at_min[0],
                to_string: at_min[at_min.len() - 1],
                fret: min,
            };
            if barre.fits(&self.frets) {
                for s in &at_min {
                    self.fingers[*s] = Some(1);
                }
                self.barre = Some(barre);
            }
        }

        let mut remaining: Vec<(u8, usize)> = (0..STRING_COUNT)
            .filter(|s| self.fingers[*s].is_none())
            .filter_map(|s| self.frets[s].filter(|f| *f > 0).map(|f| (f, s)))
            .collect();
        remaining.sort();
        let mut next_finger = if self.barre.is_some() { 2 } else { 1 };
        for (_, s) in remaining {
            if next_finger > 4 {
                return None;
            }
            self.fingers[s] = Some(next_finger);
            next_finger += 1;
        }
        Some(self)
    }
}

impl fmt::Display for Fingering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_frets(&self.frets))
    }
}

/// "2 0 1 2", "x 0 0 3".
pub fn format_frets(frets: &Frets) -> String {
    frets
        .iter()
        .map(|fret| match fret {
            Some(f) => f.to_string(),
            None => "x".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse "2 0 1 2" / "x 0 0 3" / "-1 0 0 3".
pub fn parse_frets(s: &str) -> Option<Frets> {
    let parts: Vec<&str> = s.split(|c: char| c.is_whitespace() || c == ',').filter(|p| !p.is_empty()).collect();
    if parts.len() != STRING_COUNT {
        return None;
    }
    let mut frets = [None; STRING_COUNT];
    for (slot, part) in frets.iter_mut().zip(parts) {
        *slot = match part {
            "x" | "X" | "-1" => None,
            other => Some(other.parse::<u8>().ok()?),
        };
    }
    Some(frets)
}

/// Chord distance: per string 0 if both muted, [`MUTE_MISMATCH_PENALTY`] if exactly one
/// is muted, otherwise the absolute fret difference.
pub fn distance(a: &Frets, b: &Frets) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| match (x, y) {
            (None, None) => 0,
            (None, Some(_)) | (Some(_), None) => MUTE_MISMATCH_PENALTY,
            (Some(x), Some(y)) => (*x as i32 - *y as i32).unsigned_abs(),
        })
        .sum()
}

fn serialize_frets<S: Serializer>(frets: &Frets, serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(STRING_COUNT))?;
    for fret in frets {
        seq.serialize_element(&fret.map_or(-1, |f| f as i32))?;
    }
    seq.end()
}

fn serialize_fingers<S: Serializer>(fingers: &Fingers, serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(STRING_COUNT))?;
    for finger in fingers {
        seq.serialize_element(&finger.unwrap_or(0))?;
    }
    seq.end()
}
