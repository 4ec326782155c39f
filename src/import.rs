//! # Custom Chord Import
//!
//! Typed reading and validation of user-supplied chord tables, and the export of a
//! built database in the same shape.
//!
//! ## Format
//! ```json
//! { "chords": [ { "root": "C", "suffix": "m7",
//!     "positions": [ { "frets": [-1, 3, 3, 3], "fingers": [0, 1, 1, 1],
//!                      "barre": { "fromString": 1, "toString": 3, "fret": 3 } } ] } ] }
//! ```
//! Frets use `-1` for a muted string, fingers use `0` for "no finger". String
//! order is low to high.
//!
//! ## Validation
//! Two stages with different outcomes:
//! - **Structural** ([`ChordTable::parse`]): JSON shape, array lengths, value ranges,
//!   root spellings, barre bounds. Any failure rejects the whole table.
//! - **Harmonic** ([`prepare_import`]): each position is checked against its chord.
//!   Failing positions are dropped and listed in the [`ImportReport`]; the rest are kept.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::database::ChordDatabase;
use crate::error::ChordError;
use crate::fingering::{Barre, Fingering, Frets, Fingers};
use crate::library::SourcePattern;
use crate::note::note_index;
use crate::quality::QualityCatalog;
use crate::tuning::STRING_COUNT;
use crate::validator::HarmonicValidator;

const MAX_IMPORT_FRET: i64 = 24;
const MAX_FINGER: i64 = 4;

/// Top-level import/export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordTable {
    pub chords: Vec<ChordRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordRecord {
    pub root: String,
    pub suffix: String,
    pub positions: Vec<PositionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub frets: Vec<i64>,
    pub fingers: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barre: Option<BarreRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarreRecord {
    pub from_string: i64,
    pub to_string: i64,
    pub fret: i64,
}

impl ChordTable {
    /// Deserialize and structurally validate a JSON chord table.
    ///
    /// # Example
    /// ```
    /// use cavaco::{ChordError, ChordTable};
    ///
    /// let ok = ChordTable::parse(r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[2,0,1,2],"fingers":[2,0,1,3]}]}]}"#);
    /// assert!(ok.is_ok());
    ///
    /// let short = ChordTable::parse(r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[2,0,1],"fingers":[2,0,1,3]}]}]}"#);
    /// assert!(matches!(short, Err(ChordError::Import { .. })));
    /// ```
    pub fn parse(json: &str) -> Result<Self, ChordError> {
        let table: ChordTable = serde_json::from_str(json)?;
        table.check()?;
        Ok(table)
    }

    /// Structural checks that the type system does not express.
    pub fn check(&self) -> Result<(), ChordError> {
        if self.chords.is_empty() {
            return Err(import_error("chords", "expected at least one chord"));
        }
        for (c, chord) in self.chords.iter().enumerate() {
            let at = format!("chords[{}]", c);
            note_index(&chord.root)
                .map_err(|_| import_error(format!("{}.root", at), format!("unknown note '{}'", chord.root)))?;
            if chord.positions.is_empty() {
                return Err(import_error(format!("{}.positions", at), "expected at least one position"));
            }
            for (p, position) in chord.positions.iter().enumerate() {
                check_position(&format!("{}.positions[{}]", at, p), position)?;
            }
        }
        Ok(())
    }

    /// Export a database: one record per entry, one position per variation.
    pub fn from_database(db: &ChordDatabase) -> Self {
        let chords = db
            .iter()
            .map(|entry| ChordRecord {
                root: entry.root.name().to_string(),
                suffix: entry.suffix.clone(),
                positions: entry.variations.iter().map(PositionRecord::from).collect(),
            })
            .collect();
        Self { chords }
    }
}

fn check_position(at: &str, position: &PositionRecord) -> Result<(), ChordError> {
    check_len(&format!("{}.frets", at), &position.frets)?;
    check_len(&format!("{}.fingers", at), &position.fingers)?;
    for (s, fret) in position.frets.iter().enumerate() {
        if !(-1..=MAX_IMPORT_FRET).contains(fret) {
            return Err(import_error(
                format!("{}.frets[{}]", at, s),
                format!("fret {} outside -1..={}", fret, MAX_IMPORT_FRET),
            ));
        }
    }
    for (s, finger) in position.fingers.iter().enumerate() {
        if !(0..=MAX_FINGER).contains(finger) {
            return Err(import_error(
                format!("{}.fingers[{}]", at, s),
                format!("finger {} outside 0..={}", finger, MAX_FINGER),
            ));
        }
    }
    if let Some(barre) = position.barre {
        let at = format!("{}.barre", at);
        let last = STRING_COUNT as i64 - 1;
        if !(0..=last).contains(&barre.from_string) || !(0..=last).contains(&barre.to_string) {
            return Err(import_error(at, format!("strings must be in 0..={}", last)));
        }
        if barre.from_string > barre.to_string {
            return Err(import_error(at, "fromString is after toString"));
        }
        if !(1..=MAX_IMPORT_FRET).contains(&barre.fret) {
            return Err(import_error(at, format!("fret {} outside 1..={}", barre.fret, MAX_IMPORT_FRET)));
        }
        let fingering = position.to_fingering();
        if fingering.barre.is_some_and(|b| !b.fits(&fingering.frets)) {
            return Err(import_error(at, "barre is above a fretted string it spans"));
        }
    }
    Ok(())
}

fn check_len(at: &str, values: &[i64]) -> Result<(), ChordError> {
    if values.len() != STRING_COUNT {
        return Err(import_error(
            at,
            format!("expected {} values, found {}", STRING_COUNT, values.len()),
        ));
    }
    Ok(())
}

fn import_error(path: impl Into<String>, message: impl Into<String>) -> ChordError {
    ChordError::Import {
        path: path.into(),
        message: message.into(),
    }
}

impl PositionRecord {
    /// Convert a structurally checked position. Out-of-range values read as muted / no finger.
    pub fn to_fingering(&self) -> Fingering {
        let mut frets: Frets = [None; STRING_COUNT];
        for (slot, fret) in frets.iter_mut().zip(&self.frets) {
            *slot = u8::try_from(*fret).ok();
        }
        let mut fingers: Fingers = [None; STRING_COUNT];
        for (slot, finger) in fingers.iter_mut().zip(&self.fingers) {
            *slot = u8::try_from(*finger).ok().filter(|f| *f > 0);
        }
        let mut fingering = Fingering::new(frets).with_fingers(fingers);
        if let Some(barre) = self.barre {
            if let (Ok(from_string), Ok(to_string), Ok(fret)) = (
                usize::try_from(barre.from_string),
                usize::try_from(barre.to_string),
                u8::try_from(barre.fret),
            ) {
                fingering = fingering.with_barre(Barre {
                    from_string,
                    to_string,
                    fret,
                });
            }
        }
        fingering
    }
}

impl From<&Fingering> for PositionRecord {
    fn from(fingering: &Fingering) -> Self {
        Self {
            frets: fingering.frets.iter().map(|f| f.map_or(-1, i64::from)).collect(),
            fingers: fingering.fingers.iter().map(|f| f.map_or(0, i64::from)).collect(),
            barre: fingering.barre.map(|b| BarreRecord {
                from_string: b.from_string as i64,
                to_string: b.to_string as i64,
                fret: i64::from(b.fret),
            }),
        }
    }
}

/// A position that parsed but is not a valid realization of its chord.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedPosition {
    pub path: String,
    pub chord: String,
    pub reason: String,
}

/// What an import changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub chords: usize,
    pub accepted: usize,
    pub dropped: Vec<DroppedPosition>,
    /// Suffixes the catalog did not know, added with major-triad intervals.
    pub new_qualities: Vec<String>,
}

/// Turn a checked table into source patterns.
///
/// Unknown suffixes are added to `catalog` as major-triad qualities. Positions the
/// validator rejects are left out and reported.
pub fn prepare_import(
    table: &ChordTable,
    catalog: &mut QualityCatalog,
    validator: &HarmonicValidator,
) -> Result<(Vec<SourcePattern>, ImportReport), ChordError> {
    let mut report = ImportReport {
        chords: table.chords.len(),
        ..ImportReport::default()
    };
    let mut patterns = Vec::new();

    for (c, chord) in table.chords.iter().enumerate() {
        let root = note_index(&chord.root)?;
        if catalog.get(&chord.suffix).is_none() {
            catalog.insert(catalog.resolve_or_major(&chord.suffix));
            report.new_qualities.push(chord.suffix.clone());
        }
        let quality = catalog.require(&chord.suffix)?;
        let name = format!("{}{}", root.name(), quality.suffix);

        for (p, position) in chord.positions.iter().enumerate() {
            let fingering = position.to_fingering();
            let result = validator.check(root, quality, &fingering.frets);
            if result.valid {
                patterns.push(SourcePattern::new(&quality.symbol, root, fingering));
                continue;
            }
            let reason = if result.wrong_notes.is_empty() {
                format!("covers only {:.0}% of the chord tones", result.coverage * 100.0)
            } else {
                let wrong: Vec<&str> = result.wrong_notes.iter().map(|pc| pc.name()).collect();
                format!("sounds notes outside the chord: {}", wrong.join(", "))
            };
            let path = format!("chords[{}].positions[{}]", c, p);
            warn!("import: dropping {} ({}): {}", path, name, reason);
            report.dropped.push(DroppedPosition {
                path,
                chord: name.clone(),
                reason,
            });
        }
    }
    report.accepted = patterns.len();
    Ok((patterns, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PitchClass;

    const C_MAJOR: &str = r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[2,0,1,2],"fingers":[2,0,1,3]}]}]}"#;

    fn import_path(json: &str) -> String {
        match ChordTable::parse(json) {
            Err(ChordError::Import { path, .. }) => path,
            other => panic!("expected an import error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_valid_table() {
        let table = ChordTable::parse(C_MAJOR).unwrap();
        assert_eq!(table.chords.len(), 1);
        let fingering = table.chords[0].positions[0].to_fingering();
        assert_eq!(fingering.frets, [Some(2), Some(0), Some(1), Some(2)]);
        assert_eq!(fingering.fingers, [Some(2), None, Some(1), Some(3)]);
    }

    #[test]
    fn test_short_fret_array_is_rejected() {
        let json = r#"{"chords":[{"root":"C","suffix":"","positions":[
            {"frets":[2,0,1,2],"fingers":[2,0,1,3]},
            {"frets":[2,0,1],"fingers":[2,0,1,3]}]}]}"#;
        assert_eq!(import_path(json), "chords[0].positions[1].frets");
    }

    #[test]
    fn test_range_errors() {
        let fret = r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[2,0,1,30],"fingers":[0,0,0,0]}]}]}"#;
        assert_eq!(import_path(fret), "chords[0].positions[0].frets[3]");
        let finger = r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[2,0,1,2],"fingers":[5,0,0,0]}]}]}"#;
        assert_eq!(import_path(finger), "chords[0].positions[0].fingers[0]");
        let muted_below = r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":[-2,0,1,2],"fingers":[0,0,0,0]}]}]}"#;
        assert_eq!(import_path(muted_below), "chords[0].positions[0].frets[0]");
    }

    #[test]
    fn test_root_and_emptiness() {
        assert_eq!(import_path(r#"{"chords":[]}"#), "chords");
        let root = r#"{"chords":[{"root":"H","suffix":"","positions":[{"frets":[2,0,1,2],"fingers":[0,0,0,0]}]}]}"#;
        assert_eq!(import_path(root), "chords[0].root");
        let empty = r#"{"chords":[{"root":"C","suffix":"","positions":[]}]}"#;
        assert_eq!(import_path(empty), "chords[0].positions");
    }

    #[test]
    fn test_barre_errors() {
        let reversed = r#"{"chords":[{"root":"A","suffix":"","positions":[{"frets":[2,2,2,2],"fingers":[1,1,1,1],
            "barre":{"fromString":3,"toString":0,"fret":2}}]}]}"#;
        assert_eq!(import_path(reversed), "chords[0].positions[0].barre");
        let above = r#"{"chords":[{"root":"A","suffix":"","positions":[{"frets":[2,2,2,2],"fingers":[1,1,1,1],
            "barre":{"fromString":0,"toString":3,"fret":3}}]}]}"#;
        assert_eq!(import_path(above), "chords[0].positions[0].barre");
        let ok = r#"{"chords":[{"root":"A","suffix":"","positions":[{"frets":[2,2,2,2],"fingers":[1,1,1,1],
            "barre":{"fromString":0,"toString":3,"fret":2}}]}]}"#;
        let table = ChordTable::parse(ok).unwrap();
        assert_eq!(
            table.chords[0].positions[0].to_fingering().barre,
            Some(Barre { from_string: 0, to_string: 3, fret: 2 })
        );
    }

    #[test]
    fn test_shape_errors_are_json_errors() {
        assert!(matches!(ChordTable::parse("not json"), Err(ChordError::Json(_))));
        let missing = r#"{"chords":[{"root":"C","positions":[{"frets":[2,0,1,2],"fingers":[0,0,0,0]}]}]}"#;
        assert!(matches!(ChordTable::parse(missing), Err(ChordError::Json(_))));
        let text = r#"{"chords":[{"root":"C","suffix":"","positions":[{"frets":["2",0,1,2],"fingers":[0,0,0,0]}]}]}"#;
        assert!(matches!(ChordTable::parse(text), Err(ChordError::Json(_))));
    }

    #[test]
    fn test_prepare_drops_harmonic_failures() {
        let json = r#"{"chords":[{"root":"C","suffix":"","positions":[
            {"frets":[2,0,1,2],"fingers":[2,0,1,3]},
            {"frets":[0,0,0,0],"fingers":[0,0,0,0]}]}]}"#;
        let table = ChordTable::parse(json).unwrap();
        let mut catalog = QualityCatalog::standard();
        let (patterns, report) = prepare_import(&table, &mut catalog, &HarmonicValidator::default()).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].quality, "M");
        assert_eq!(patterns[0].anchor, PitchClass::C);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].path, "chords[0].positions[1]");
        assert_eq!(report.dropped[0].chord, "C");
    }

    #[test]
    fn test_prepare_adds_unknown_suffix_as_major() {
        let json = r#"{"chords":[{"root":"G","suffix":"lydian","positions":[{"frets":[0,0,0,0],"fingers":[0,0,0,0]}]}]}"#;
        let table = ChordTable::parse(json).unwrap();
        let mut catalog = QualityCatalog::standard();
        let (patterns, report) = prepare_import(&table, &mut catalog, &HarmonicValidator::default()).unwrap();
        assert_eq!(report.new_qualities, vec!["lydian".to_string()]);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].quality, "lydian");
        assert!(catalog.get("lydian").is_some());
    }

    #[test]
    fn test_position_record_from_fingering() {
        let fingering = Fingering::new([None, Some(3), Some(3), Some(3)])
            .with_fingers([None, Some(1), Some(1), Some(1)])
            .with_barre(Barre { from_string: 1, to_string: 3, fret: 3 });
        let record = PositionRecord::from(&fingering);
        assert_eq!(record.frets, vec![-1, 3, 3, 3]);
        assert_eq!(record.fingers, vec![0, 1, 1, 1]);
        assert_eq!(record.to_fingering(), fingering);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["barre"]["fromString"], 1);
    }
}
