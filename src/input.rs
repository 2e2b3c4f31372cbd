//! Length input: either a total length or a width/height rectangle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LightcalcError, Result};

/// How the target length was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// A single total length.
    Total,
    /// Width and height of a rectangle; the target is its perimeter.
    Separate,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Total => write!(f, "total"),
            InputMode::Separate => write!(f, "separate"),
        }
    }
}

/// A target length as entered by the user, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthInput {
    Total { length: i64 },
    Perimeter { width: i64, height: i64 },
}

impl LengthInput {
    pub fn total(length: i64) -> Self {
        LengthInput::Total { length }
    }

    pub fn perimeter(width: i64, height: i64) -> Self {
        LengthInput::Perimeter { width, height }
    }

    pub fn mode(&self) -> InputMode {
        match self {
            LengthInput::Total { .. } => InputMode::Total,
            LengthInput::Perimeter { .. } => InputMode::Separate,
        }
    }

    /// The length to search for.
    ///
    /// A total length is passed through unchanged so the engine can reject it.
    /// A rectangle needs both sides positive.
    pub fn target(&self) -> Result<i64> {
        match *self {
            LengthInput::Total { length } => Ok(length),
            LengthInput::Perimeter { width, height } => {
                if width <= 0 || height <= 0 {
                    return Err(LightcalcError::invalid_input(format!(
                        "width and height must be positive, got {width}x{height}"
                    )));
                }
                width
                    .checked_add(height)
                    .and_then(|sum| sum.checked_mul(2))
                    .ok_or_else(|| {
                        LightcalcError::invalid_input(format!(
                            "perimeter of {width}x{height} overflows"
                        ))
                    })
            }
        }
    }

    pub fn width(&self) -> Option<i64> {
        match *self {
            LengthInput::Perimeter { width, .. } => Some(width),
            LengthInput::Total { .. } => None,
        }
    }

    pub fn height(&self) -> Option<i64> {
        match *self {
            LengthInput::Perimeter { height, .. } => Some(height),
            LengthInput::Total { .. } => None,
        }
    }

    /// Name suggested when saving a calculation.
    pub fn default_name(&self) -> Result<String> {
        let total = self.target()?;
        Ok(match *self {
            LengthInput::Perimeter { width, height } => {
                format!("{width}×{height}mm ({total}mm)")
            }
            LengthInput::Total { .. } => format!("{total}mm"),
        })
    }
}
