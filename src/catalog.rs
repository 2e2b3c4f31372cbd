//! Segment catalog.
//!
//! A [`Catalog`] is an ordered list of regular segment types plus one
//! designated accessory (the power cord). Catalog order matters: the search
//! walks regular segments in declaration order, which also decides how ties
//! between equally good combinations are ranked.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{LightcalcError, Result};

/// Label of the accessory in the reference catalog.
pub const POWER_CORD_LABEL: &str = "T5 cord";

static REFERENCE_CATALOG: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    segments: vec![
        SegmentType::new("1200", 1200, 1160),
        SegmentType::new("900", 900, 860),
        SegmentType::new("600", 600, 560),
        SegmentType::new("400", 400, 390),
        SegmentType::new("300", 300, 300),
    ],
    accessory: SegmentType::new(POWER_CORD_LABEL, 60, 60),
});

/// One entry of the catalog.
///
/// `actual_length` is the space the segment occupies once installed and is
/// what all budget arithmetic uses. `nominal_length` is only for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentType {
    /// Display identifier.
    pub label: String,
    /// Length printed on the segment, in millimeters.
    pub nominal_length: i64,
    /// Installed length, in millimeters.
    pub actual_length: i64,
}

impl SegmentType {
    /// Create a new segment type.
    pub fn new<S: Into<String>>(label: S, nominal_length: i64, actual_length: i64) -> Self {
        SegmentType {
            label: label.into(),
            nominal_length,
            actual_length,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(LightcalcError::catalog("segment label must not be empty"));
        }
        if self.actual_length <= 0 {
            return Err(LightcalcError::catalog(format!(
                "segment '{}' has non-positive actual length {}",
                self.label, self.actual_length
            )));
        }
        if self.actual_length > self.nominal_length {
            return Err(LightcalcError::catalog(format!(
                "segment '{}' has actual length {} greater than nominal length {}",
                self.label, self.actual_length, self.nominal_length
            )));
        }
        Ok(())
    }
}

/// An ordered, validated set of segment types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    segments: Vec<SegmentType>,
    accessory: SegmentType,
}

#[derive(Deserialize)]
struct CatalogRepr {
    segments: Vec<SegmentType>,
    accessory: SegmentType,
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = CatalogRepr::deserialize(deserializer)?;
        Catalog::new(repr.segments, repr.accessory).map_err(serde::de::Error::custom)
    }
}

impl Catalog {
    /// Create a catalog, validating every entry.
    pub fn new(segments: Vec<SegmentType>, accessory: SegmentType) -> Result<Self> {
        if segments.is_empty() {
            return Err(LightcalcError::catalog(
                "catalog needs at least one regular segment",
            ));
        }

        let mut seen = AHashSet::with_capacity(segments.len() + 1);
        for segment in segments.iter().chain(std::iter::once(&accessory)) {
            segment.validate()?;
            if !seen.insert(segment.label.as_str()) {
                return Err(LightcalcError::catalog(format!(
                    "duplicate segment label '{}'",
                    segment.label
                )));
            }
        }

        Ok(Catalog {
            segments,
            accessory,
        })
    }

    /// The built-in T5 catalog: 1200, 900, 600, 400 and 300 plus a 60mm cord.
    pub fn reference() -> &'static Catalog {
        &REFERENCE_CATALOG
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and validate a catalog from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Regular segments in search order.
    pub fn segments(&self) -> &[SegmentType] {
        &self.segments
    }

    /// The accessory entry.
    pub fn accessory(&self) -> &SegmentType {
        &self.accessory
    }

    /// Look up a regular segment or the accessory by label.
    pub fn find(&self, label: &str) -> Option<&SegmentType> {
        if self.accessory.label == label {
            return Some(&self.accessory);
        }
        self.segments.iter().find(|segment| segment.label == label)
    }

    /// Whether `label` names the accessory.
    pub fn is_accessory(&self, label: &str) -> bool {
        self.accessory.label == label
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::reference().clone()
    }
}
