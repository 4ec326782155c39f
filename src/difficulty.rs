//! # Difficulty Scorer
//!
//! Structural 1-5 playability score. Higher positions, wide stretches, barres and
//! more fingers make a shape harder; muted strings add a little, open strings
//! take a little away.

use crate::fingering::Fingering;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

const BASE: f64 = 1.0;
const PER_FRET: f64 = 0.2;
const PER_SPAN_FRET: f64 = 0.5;
const BARRE: f64 = 1.0;
const PER_FINGER: f64 = 0.2;
const PER_MUTED: f64 = 0.3;
const PER_OPEN: f64 = 0.2;

/// Unclamped weighted sum behind [`score`].
pub fn raw_score(fingering: &Fingering) -> f64 {
    let barre = if fingering.barre.is_some() { BARRE } else { 0.0 };
    BASE + fingering.average_fretted() * PER_FRET
        + fingering.span() as f64 * PER_SPAN_FRET
        + barre
        + fingering.finger_count() as f64 * PER_FINGER
        + fingering.muted_count() as f64 * PER_MUTED
        - fingering.open_count() as f64 * PER_OPEN
}

/// Difficulty in 1..=5.
///
/// # Example
/// ```
/// use cavaco::{difficulty, Fingering};
///
/// assert_eq!(difficulty::score(&Fingering::new([Some(0); 4])), 1);
/// assert_eq!(difficulty::score(&Fingering::new([Some(2), Some(0), Some(1), Some(2)])), 2);
/// ```
pub fn score(fingering: &Fingering) -> u8 {
    let clamped = raw_score(fingering).clamp(MIN_DIFFICULTY as f64, MAX_DIFFICULTY as f64);
    clamped.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingering::Barre;

    #[test]
    fn test_edge_cases_in_range() {
        assert_eq!(score(&Fingering::new([Some(0); 4])), 1);
        assert_eq!(score(&Fingering::new([None; 4])), 2);
    }

    #[test]
    fn test_every_shape_in_range() {
        let values: Vec<Option<u8>> = std::iter::once(None).chain((0..=15).map(Some)).collect();
        for a in &values {
            for b in &values {
                for c in &values {
                    for d in &values {
                        let fingering = Fingering::new([*a, *b, *c, *d]);
                        let s = score(&fingering);
                        assert!((MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&s));
                        if let Some(with_barre) = fingering.with_auto_fingers() {
                            let s = score(&with_barre);
                            assert!((MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&s));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_reference_shapes() {
        // C: 2 0 1 2
        assert_eq!(score(&Fingering::new([Some(2), Some(0), Some(1), Some(2)])), 2);
        // D: 0 2 3 4
        assert_eq!(score(&Fingering::new([Some(0), Some(2), Some(3), Some(4)])), 3);
        // G7: 3 0 0 0
        assert_eq!(score(&Fingering::new([Some(3), Some(0), Some(0), Some(0)])), 1);
        // Gm with barre: 5 3 3 5
        let gm = Fingering::new([Some(5), Some(3), Some(3), Some(5)])
            .with_barre(Barre { from_string: 1, to_string: 2, fret: 3 });
        assert_eq!(score(&gm), 4);
    }

    #[test]
    fn test_monotonic_in_position() {
        let low = Fingering::new([Some(2), Some(2), Some(2), Some(2)]);
        let high = Fingering::new([Some(9), Some(9), Some(9), Some(9)]);
        assert!(raw_score(&high) > raw_score(&low));
        let narrow = Fingering::new([Some(2), Some(2), Some(3), Some(2)]);
        let wide = Fingering::new([Some(2), Some(2), Some(5), Some(2)]);
        assert!(raw_score(&wide) > raw_score(&narrow));
    }
}
