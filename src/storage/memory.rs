//! In-memory calculation store for testing and short-lived sessions.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::{LightcalcError, Result};
use crate::storage::record::{CalculationRecord, normalize_name};
use crate::storage::traits::{CalculationStore, sort_newest_first};

/// A calculation store backed by a hash map.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCalculationStore {
    records: Arc<RwLock<AHashMap<String, CalculationRecord>>>,
}

impl MemoryCalculationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.records.write().clear();
    }
}

impl CalculationStore for MemoryCalculationStore {
    fn save(&self, record: CalculationRecord) -> Result<String> {
        let id = record.id.clone();
        let mut records = self.records.write();
        if records.contains_key(&id) {
            return Err(LightcalcError::storage(format!(
                "calculation {id} already exists"
            )));
        }
        records.insert(id.clone(), record);
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<CalculationRecord> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| LightcalcError::not_found(format!("calculation {id}")))
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<CalculationRecord>> {
        let mut records: Vec<CalculationRecord> = self.records.read().values().cloned().collect();
        sort_newest_first(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.records
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| LightcalcError::not_found(format!("calculation {id}")))
    }

    fn rename(&self, id: &str, name: &str) -> Result<CalculationRecord> {
        let name = normalize_name(name)?;
        let mut records = self.records.write();
        let record = records
            .get_mut(id)
            .ok_or_else(|| LightcalcError::not_found(format!("calculation {id}")))?;
        record.name = Some(name);
        Ok(record.clone())
    }
}
