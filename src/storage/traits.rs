//! Storage abstraction trait and helpers.

use crate::error::Result;
use crate::storage::record::CalculationRecord;

/// A trait for backends that persist calculation records by id.
pub trait CalculationStore: Send + Sync + std::fmt::Debug {
    /// Persist a record and return its id.
    fn save(&self, record: CalculationRecord) -> Result<String>;

    /// Load a record by id.
    fn get(&self, id: &str) -> Result<CalculationRecord>;

    /// List up to `limit` records, newest first.
    fn list_recent(&self, limit: usize) -> Result<Vec<CalculationRecord>>;

    /// Delete a record.
    fn delete(&self, id: &str) -> Result<()>;

    /// Change the display name of a record and return the updated record.
    fn rename(&self, id: &str, name: &str) -> Result<CalculationRecord>;
}

/// Newest first; ids break ties so listings are stable.
pub(crate) fn sort_newest_first(records: &mut [CalculationRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Build a link that reopens a saved calculation.
///
/// The id is appended as a `share` query parameter.
pub fn share_url(base: &str, id: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}share={id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_url() {
        assert_eq!(
            share_url("https://example.com/calc", "abc"),
            "https://example.com/calc?share=abc"
        );
        assert_eq!(
            share_url("https://example.com/calc?lang=ko", "abc"),
            "https://example.com/calc?lang=ko&share=abc"
        );
    }
}
