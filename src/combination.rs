//! Combination values produced by the search.
//!
//! The serialized shape is shared with stored calculations:
//!
//! ```json
//! {
//!   "combinations": [ { "type": "600", "quantity": 1, "usedLength": 560 } ],
//!   "totalUsedLength": 620,
//!   "remainingLength": 0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, SegmentType};
use crate::error::{LightcalcError, Result};

/// One row of a combination: how many units of one segment type are used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationLine {
    /// Label of the segment type.
    #[serde(rename = "type")]
    pub segment_type: String,
    /// Number of units, always positive in a finalized combination.
    pub quantity: u32,
    /// `quantity * actual_length` of the segment type.
    pub used_length: i64,
}

impl CombinationLine {
    /// Build a line for `quantity` units of `segment`.
    pub fn new(segment: &SegmentType, quantity: u32) -> Self {
        CombinationLine {
            segment_type: segment.label.clone(),
            quantity,
            used_length: i64::from(quantity) * segment.actual_length,
        }
    }
}

/// A candidate solution for a target length.
///
/// The total used length is derived from the lines on every call and is
/// never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CombinationRepr", into = "CombinationRepr")]
pub struct Combination {
    lines: Vec<CombinationLine>,
    remaining_length: i64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CombinationRepr {
    combinations: Vec<CombinationLine>,
    total_used_length: i64,
    remaining_length: i64,
}

impl TryFrom<CombinationRepr> for Combination {
    type Error = LightcalcError;

    fn try_from(repr: CombinationRepr) -> Result<Self> {
        if let Some(line) = repr.combinations.iter().find(|line| line.quantity == 0) {
            return Err(LightcalcError::invalid_input(format!(
                "line '{}' has zero quantity",
                line.segment_type
            )));
        }
        let total = checked_total(&repr.combinations)?;
        if total != repr.total_used_length {
            return Err(LightcalcError::invalid_input(format!(
                "totalUsedLength {} does not match lines ({})",
                repr.total_used_length, total
            )));
        }
        if repr.remaining_length < 0 {
            return Err(LightcalcError::invalid_input(format!(
                "remainingLength {} is negative",
                repr.remaining_length
            )));
        }
        if total.checked_add(repr.remaining_length).is_none() {
            return Err(LightcalcError::invalid_input(format!(
                "totalUsedLength {total} plus remainingLength {} overflows",
                repr.remaining_length
            )));
        }
        Ok(Combination {
            lines: repr.combinations,
            remaining_length: repr.remaining_length,
        })
    }
}

/// Sum of the lines' used lengths, failing instead of wrapping.
fn checked_total(lines: &[CombinationLine]) -> Result<i64> {
    if let Some(line) = lines.iter().find(|line| line.used_length <= 0) {
        return Err(LightcalcError::invalid_input(format!(
            "line '{}' has non-positive used length {}",
            line.segment_type, line.used_length
        )));
    }
    lines
        .iter()
        .try_fold(0i64, |total, line| total.checked_add(line.used_length))
        .ok_or_else(|| LightcalcError::invalid_input("used lengths overflow"))
}

impl From<Combination> for CombinationRepr {
    fn from(combination: Combination) -> Self {
        CombinationRepr {
            total_used_length: combination.total_used_length(),
            remaining_length: combination.remaining_length,
            combinations: combination.lines,
        }
    }
}

impl Combination {
    /// Finalize a combination for `target`.
    ///
    /// Zero-quantity lines are dropped. Fails if the lines exceed the target.
    pub fn new(target: i64, lines: Vec<CombinationLine>) -> Result<Self> {
        let lines: Vec<CombinationLine> =
            lines.into_iter().filter(|line| line.quantity > 0).collect();
        let total = checked_total(&lines)?;
        let remaining_length = target
            .checked_sub(total)
            .ok_or_else(|| LightcalcError::invalid_input("used lengths overflow"))?;
        if remaining_length < 0 {
            return Err(LightcalcError::invalid_input(format!(
                "combination uses {total}mm which exceeds target {target}mm"
            )));
        }
        Ok(Combination {
            lines,
            remaining_length,
        })
    }

    /// Lines in catalog order, accessory last.
    pub fn lines(&self) -> &[CombinationLine] {
        &self.lines
    }

    /// Sum of the lines' used lengths. Both constructors check that this
    /// and [`Combination::target`] fit in an `i64`.
    pub fn total_used_length(&self) -> i64 {
        self.lines.iter().map(|line| line.used_length).sum()
    }

    /// Target minus total used length.
    pub fn remaining_length(&self) -> i64 {
        self.remaining_length
    }

    /// The target this combination was computed for.
    pub fn target(&self) -> i64 {
        self.total_used_length() + self.remaining_length
    }

    /// Total number of units, accessory included.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// The accessory line, if this combination uses one.
    pub fn accessory_line(&self, catalog: &Catalog) -> Option<&CombinationLine> {
        self.lines
            .iter()
            .find(|line| catalog.is_accessory(&line.segment_type))
    }

    /// Check every line against `catalog`.
    ///
    /// Labels must be known and each used length must equal quantity times
    /// the segment's actual length. The accessory may appear once, as a
    /// single unit.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        for line in &self.lines {
            let segment = catalog.find(&line.segment_type).ok_or_else(|| {
                LightcalcError::catalog(format!("unknown segment '{}'", line.segment_type))
            })?;
            let expected = i64::from(line.quantity).checked_mul(segment.actual_length);
            if expected != Some(line.used_length) {
                return Err(LightcalcError::invalid_input(format!(
                    "line '{}' uses {}mm but {} units are {}mm each",
                    line.segment_type, line.used_length, line.quantity, segment.actual_length
                )));
            }
        }
        let accessories: Vec<_> = self
            .lines
            .iter()
            .filter(|line| catalog.is_accessory(&line.segment_type))
            .collect();
        if accessories.len() > 1 || accessories.iter().any(|line| line.quantity != 1) {
            return Err(LightcalcError::invalid_input(
                "the accessory may only be used once",
            ));
        }
        Ok(())
    }

    /// Expand lines into one row per installed unit.
    pub fn unit_rows(&self, catalog: &Catalog) -> Result<Vec<UnitRow>> {
        self.validate(catalog)?;
        let mut rows = Vec::with_capacity(self.unit_count() as usize);
        for line in &self.lines {
            let segment = catalog.find(&line.segment_type).ok_or_else(|| {
                LightcalcError::catalog(format!("unknown segment '{}'", line.segment_type))
            })?;
            let is_accessory = catalog.is_accessory(&segment.label);
            for _ in 0..line.quantity {
                rows.push(UnitRow {
                    label: segment.label.clone(),
                    nominal_length: segment.nominal_length,
                    actual_length: segment.actual_length,
                    used_length: segment.actual_length,
                    is_accessory,
                });
            }
        }
        Ok(rows)
    }
}

/// A single installed unit, as shown in a result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRow {
    pub label: String,
    pub nominal_length: i64,
    pub actual_length: i64,
    pub used_length: i64,
    pub is_accessory: bool,
}

impl UnitRow {
    /// `"<nominal> (<actual>)"`, or `"<label> (<actual>)"` for the accessory.
    pub fn display_label(&self) -> String {
        if self.is_accessory {
            format!("{} ({})", self.label, self.actual_length)
        } else {
            format!("{} ({})", self.nominal_length, self.actual_length)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::POWER_CORD_LABEL;

    fn line(catalog: &Catalog, label: &str, quantity: u32) -> CombinationLine {
        CombinationLine::new(catalog.find(label).unwrap(), quantity)
    }

    #[test]
    fn test_new_drops_zero_lines() {
        let catalog = Catalog::reference();
        let combination = Combination::new(
            2000,
            vec![
                line(catalog, "1200", 1),
                line(catalog, "900", 0),
                line(catalog, "600", 1),
            ],
        )
        .unwrap();

        assert_eq!(combination.lines().len(), 2);
        assert_eq!(combination.total_used_length(), 1720);
        assert_eq!(combination.remaining_length(), 280);
        assert_eq!(combination.target(), 2000);
    }

    #[test]
    fn test_new_rejects_overflow() {
        let catalog = Catalog::reference();
        let err = Combination::new(1000, vec![line(catalog, "1200", 1)]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_serialized_shape() {
        let catalog = Catalog::reference();
        let combination = Combination::new(
            620,
            vec![line(catalog, "600", 1), line(catalog, POWER_CORD_LABEL, 1)],
        )
        .unwrap();

        let value = serde_json::to_value(&combination).unwrap();
        assert_eq!(value["totalUsedLength"], 620);
        assert_eq!(value["remainingLength"], 0);
        assert_eq!(value["combinations"][0]["type"], "600");
        assert_eq!(value["combinations"][0]["quantity"], 1);
        assert_eq!(value["combinations"][0]["usedLength"], 560);
        assert_eq!(value["combinations"][1]["type"], POWER_CORD_LABEL);

        let restored: Combination = serde_json::from_value(value).unwrap();
        assert_eq!(restored, combination);
    }

    #[test]
    fn test_deserialize_rejects_desync() {
        let json = r#"{
            "combinations": [ { "type": "600", "quantity": 1, "usedLength": 560 } ],
            "totalUsedLength": 600,
            "remainingLength": 0
        }"#;
        assert!(serde_json::from_str::<Combination>(json).is_err());

        let json = r#"{
            "combinations": [ { "type": "600", "quantity": 0, "usedLength": 0 } ],
            "totalUsedLength": 0,
            "remainingLength": 10
        }"#;
        assert!(serde_json::from_str::<Combination>(json).is_err());

        let json = r#"{
            "combinations": [],
            "totalUsedLength": 0,
            "remainingLength": -1
        }"#;
        assert!(serde_json::from_str::<Combination>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_overflowing_totals() {
        let json = format!(
            r#"{{
                "combinations": [
                    {{ "type": "1200", "quantity": 1, "usedLength": {} }},
                    {{ "type": "600", "quantity": 1, "usedLength": 1 }}
                ],
                "totalUsedLength": 0,
                "remainingLength": 0
            }}"#,
            i64::MAX
        );
        let err = serde_json::from_str::<Combination>(&json).unwrap_err();
        assert!(err.to_string().contains("overflow"));

        let json = format!(
            r#"{{
                "combinations": [ {{ "type": "600", "quantity": 1, "usedLength": 560 }} ],
                "totalUsedLength": 560,
                "remainingLength": {}
            }}"#,
            i64::MAX
        );
        assert!(serde_json::from_str::<Combination>(&json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_negative_used_length() {
        let json = r#"{
            "combinations": [ { "type": "600", "quantity": 1, "usedLength": -500 } ],
            "totalUsedLength": -500,
            "remainingLength": 1000
        }"#;
        assert!(serde_json::from_str::<Combination>(json).is_err());
    }

    #[test]
    fn test_validate_against_catalog() {
        let catalog = Catalog::reference();
        let valid = Combination::new(
            620,
            vec![line(catalog, "600", 1), line(catalog, POWER_CORD_LABEL, 1)],
        )
        .unwrap();
        assert!(valid.validate(catalog).is_ok());

        // Deserializes, but 600 is 560mm installed.
        let json = r#"{
            "combinations": [ { "type": "600", "quantity": 1, "usedLength": 600 } ],
            "totalUsedLength": 600,
            "remainingLength": 0
        }"#;
        let mismatched: Combination = serde_json::from_str(json).unwrap();
        assert!(mismatched.validate(catalog).unwrap_err().is_invalid_input());
        assert!(mismatched.unit_rows(catalog).is_err());

        let json = r#"{
            "combinations": [ { "type": "T5 cord", "quantity": 2, "usedLength": 120 } ],
            "totalUsedLength": 120,
            "remainingLength": 0
        }"#;
        let two_cords: Combination = serde_json::from_str(json).unwrap();
        assert!(two_cords.validate(catalog).is_err());
    }

    #[test]
    fn test_unit_rows() {
        let catalog = Catalog::reference();
        let combination = Combination::new(
            2000,
            vec![line(catalog, "400", 3), line(catalog, POWER_CORD_LABEL, 1)],
        )
        .unwrap();

        let rows = combination.unit_rows(catalog).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.len() as u64, combination.unit_count());
        assert!(rows[..3].iter().all(|row| row.used_length == 390));
        assert_eq!(rows[0].display_label(), "400 (390)");
        assert!(rows[3].is_accessory);
        assert_eq!(rows[3].display_label(), "T5 cord (60)");

        let total: i64 = rows.iter().map(|row| row.used_length).sum();
        assert_eq!(total, combination.total_used_length());
    }

    #[test]
    fn test_unit_rows_unknown_label() {
        let json = r#"{
            "combinations": [ { "type": "700", "quantity": 1, "usedLength": 680 } ],
            "totalUsedLength": 680,
            "remainingLength": 20
        }"#;
        let combination: Combination = serde_json::from_str(json).unwrap();
        let err = combination.unit_rows(Catalog::reference()).unwrap_err();
        assert!(matches!(err, LightcalcError::Catalog(_)));
    }

    #[test]
    fn test_accessory_line() {
        let catalog = Catalog::reference();
        let with_cord =
            Combination::new(100, vec![line(catalog, POWER_CORD_LABEL, 1)]).unwrap();
        assert_eq!(with_cord.accessory_line(catalog).unwrap().quantity, 1);

        let without = Combination::new(300, vec![line(catalog, "300", 1)]).unwrap();
        assert!(without.accessory_line(catalog).is_none());
    }
}
