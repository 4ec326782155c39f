//! # Transposition Engine
//!
//! Moves a [`SourcePattern`] from its anchor root to another root by shifting every
//! fretted string up the neck.
//!
//! ## Steps
//! 1. Offset = upward semitones from anchor to target (0..=11)
//! 2. Offset 0: the pattern is returned as-is if it validates
//! 3. Shift every played string by the offset; muted strings stay muted
//! 4. Barre re-detection for strings that were open and are now fretted; the index
//!    finger goes to the new lowest fret and fingers already placed move up one
//! 5. Re-validate against the target chord
//! 6. Drop shapes whose lowest fretted position is above the fret ceiling
//! 7. Diagram start fret and position label
//!
//! The input pattern is never modified.

use crate::config::GeneratorConfig;
use crate::fingering::{Barre, Fingering, Fingers};
use crate::library::SourcePattern;
use crate::note::PitchClass;
use crate::quality::ChordQuality;
use crate::tuning::STRING_COUNT;
use crate::validator::HarmonicValidator;

/// Transpose `pattern` to `target`, or `None` when the result is not a playable,
/// harmonically valid `target` + `quality` chord.
///
/// # Example
/// ```
/// use cavaco::{transpose, Fingering, GeneratorConfig, PitchClass, QualityCatalog, SourcePattern};
///
/// let config = GeneratorConfig::default();
/// let catalog = QualityCatalog::standard();
/// // C minor: 1 0 1 1
/// let pattern = SourcePattern::new("m", PitchClass::C, Fingering::new([Some(1), Some(0), Some(1), Some(1)]));
/// let g_minor = transpose(&pattern, catalog.get("m").unwrap(), PitchClass::G, &config.validator(), &config).unwrap();
/// assert_eq!(g_minor.frets, [Some(8), Some(7), Some(8), Some(8)]);
/// assert_eq!(g_minor.position().to_string(), "6th position");
/// ```
pub fn transpose(
    pattern: &SourcePattern,
    quality: &ChordQuality,
    target: PitchClass,
    validator: &HarmonicValidator,
    config: &GeneratorConfig,
) -> Option<Fingering> {
    let semitones = pattern.anchor.semitones_to(target);
    let source = &pattern.fingering;

    if semitones == 0 {
        if !validator.check(target, quality, &source.frets).valid {
            return None;
        }
        let mut fingering = source.clone();
        fingering.start_fret = fingering.diagram_start(config.high_position_threshold);
        return Some(fingering);
    }

    let mut shifted = shift(source, semitones)?;

    if !validator.check(target, quality, &shifted.frets).valid {
        return None;
    }
    if shifted.min_fret().is_some_and(|min| min > config.fret_ceiling) {
        return None;
    }
    shifted.start_fret = shifted.diagram_start(config.high_position_threshold);
    Some(shifted)
}

/// Shift frets and carry finger and barre annotations along.
/// `None` when a fret runs past `u8` or the shape needs more than four fingers.
fn shift(source: &Fingering, semitones: u8) -> Option<Fingering> {
    let mut frets = source.frets;
    for fret in frets.iter_mut().flatten() {
        *fret = fret.checked_add(semitones)?;
    }

    let opened: Vec<usize> = (0..STRING_COUNT)
        .filter(|s| source.frets[*s] == Some(0))
        .collect();

    let mut fingering = Fingering::new(frets).with_fingers(source.fingers);
    fingering.barre = match source.barre {
        Some(barre) => Some(Barre {
            fret: barre.fret.checked_add(semitones)?,
            ..barre
        }),
        None => None,
    };

    match opened.as_slice() {
        [] => {}
        [string] => {
            if fingering.fingers[*string].is_none() {
                if source.fingers.contains(&Some(1)) {
                    match index_on(source.fingers, &opened) {
                        Some(fingers) => fingering.fingers = fingers,
                        None => return Fingering::new(frets).with_auto_fingers(),
                    }
                } else {
                    fingering.fingers[*string] = Some(1);
                }
            }
        }
        [first, .., last] => {
            let Some(fingers) = index_on(source.fingers, &opened) else {
                return Fingering::new(frets).with_auto_fingers();
            };
            fingering.fingers = fingers;
            fingering.barre = Some(Barre {
                from_string: *first,
                to_string: *last,
                fret: semitones,
            });
        }
    }
    Some(fingering)
}

/// Index finger on `strings`, every finger already placed moved up one.
/// `None` when that would need a fifth finger.
fn index_on(fingers: Fingers, strings: &[usize]) -> Option<Fingers> {
    let mut moved = fingers.map(|finger| finger.map(|f| f + 1));
    for string in strings {
        moved[*string] = Some(1);
    }
    if moved.iter().flatten().any(|f| *f > 4) {
        return None;
    }
    Some(moved)
}
