//! A saved calculation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::combination::Combination;
use crate::error::{LightcalcError, Result};
use crate::input::{InputMode, LengthInput};
use crate::search::SearchResults;

/// A calculation as persisted by a [`CalculationStore`](super::CalculationStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub total_length: i64,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default = "default_input_mode")]
    pub input_mode: InputMode,
    pub include_power_cord: bool,
    pub combinations: Vec<Combination>,
    pub created_at: DateTime<Utc>,
}

fn default_input_mode() -> InputMode {
    InputMode::Total
}

impl CalculationRecord {
    /// Build a new record for the results of a search.
    ///
    /// Without a name the input's default name is used. Results with no
    /// combination are not worth saving and are rejected.
    pub fn new(input: LengthInput, results: SearchResults, name: Option<&str>) -> Result<Self> {
        let total_length = input.target()?;
        if total_length != results.target {
            return Err(LightcalcError::invalid_input(format!(
                "results are for {}mm but input is {}mm",
                results.target, total_length
            )));
        }
        if results.combinations.is_empty() {
            return Err(LightcalcError::invalid_input(
                "there are no combinations to save",
            ));
        }

        let name = match name {
            Some(name) => normalize_name(name)?,
            None => input.default_name()?,
        };

        Ok(CalculationRecord {
            id: Uuid::new_v4().to_string(),
            name: Some(name),
            total_length,
            width: input.width(),
            height: input.height(),
            input_mode: input.mode(),
            include_power_cord: results.include_accessory,
            combinations: results.combinations,
            created_at: Utc::now(),
        })
    }

    /// The stored name, or a name derived from the dimensions.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!(
                "{}x{}mm ({}mm)",
                self.width.unwrap_or(0),
                self.height.unwrap_or(0),
                self.total_length
            ),
        }
    }

    /// Check the stored combinations against `catalog`.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        for combination in &self.combinations {
            combination.validate(catalog)?;
            if combination.target() != self.total_length {
                return Err(LightcalcError::invalid_input(format!(
                    "combination covers {}mm but the record is for {}mm",
                    combination.target(),
                    self.total_length
                )));
            }
        }
        Ok(())
    }

    /// The input this record was computed from.
    pub fn input(&self) -> LengthInput {
        match (self.input_mode, self.width, self.height) {
            (InputMode::Separate, Some(width), Some(height)) => {
                LengthInput::perimeter(width, height)
            }
            _ => LengthInput::total(self.total_length),
        }
    }
}

/// Trim a user-supplied name, rejecting blank ones.
pub fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LightcalcError::invalid_input("name must not be blank"));
    }
    Ok(trimmed.to_string())
}
