//! File-based calculation store: one JSON document per record.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{LightcalcError, Result};
use crate::storage::record::{CalculationRecord, normalize_name};
use crate::storage::traits::{CalculationStore, sort_newest_first};

const RECORD_EXTENSION: &str = "json";

/// A calculation store that keeps `<id>.json` files in a directory.
#[derive(Debug)]
pub struct FileCalculationStore {
    /// The root directory for storage.
    directory: PathBuf,
    /// Serializes writers within this process.
    write_lock: Mutex<()>,
}

impl FileCalculationStore {
    /// Open a store in `directory`, creating it if needed.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            fs::create_dir_all(&directory)
                .map_err(|e| LightcalcError::storage(format!("Failed to create directory: {e}")))?;
        }

        if !directory.is_dir() {
            return Err(LightcalcError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileCalculationStore {
            directory,
            write_lock: Mutex::new(()),
        })
    }

    /// The directory records are kept in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the record file for `id`. Ids must be UUIDs.
    fn record_path(&self, id: &str) -> Result<PathBuf> {
        let uuid = Uuid::parse_str(id)
            .map_err(|_| LightcalcError::not_found(format!("calculation {id}")))?;
        Ok(self
            .directory
            .join(format!("{}.{RECORD_EXTENSION}", uuid.hyphenated())))
    }

    fn read_record(&self, id: &str, path: &Path) -> Result<CalculationRecord> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                LightcalcError::not_found(format!("calculation {id}"))
            } else {
                LightcalcError::Io(e)
            }
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Write through a temp file so readers never see a partial record.
    fn write_record(&self, path: &Path, record: &CalculationRecord) -> Result<()> {
        let temp_path = path.with_extension("json.tmp");
        let written = Self::write_temp(&temp_path, record)
            .and_then(|()| fs::rename(&temp_path, path).map_err(LightcalcError::from));
        if written.is_err() {
            match fs::remove_file(&temp_path) {
                Err(e) if e.kind() != ErrorKind::NotFound => {
                    warn!("failed to remove {}: {e}", temp_path.display())
                }
                _ => {}
            }
        }
        written
    }

    fn write_temp(temp_path: &Path, record: &CalculationRecord) -> Result<()> {
        let file = File::create(temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

impl CalculationStore for FileCalculationStore {
    fn save(&self, record: CalculationRecord) -> Result<String> {
        let path = self.record_path(&record.id)?;
        let _guard = self.write_lock.lock();
        if path.exists() {
            return Err(LightcalcError::storage(format!(
                "calculation {} already exists",
                record.id
            )));
        }
        self.write_record(&path, &record)?;
        debug!("saved calculation {} to {}", record.id, path.display());
        Ok(record.id)
    }

    fn get(&self, id: &str) -> Result<CalculationRecord> {
        let path = self.record_path(id)?;
        self.read_record(id, &path)
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<CalculationRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match self.read_record(id, &path) {
                Ok(record) => records.push(record),
                Err(e) => warn!("skipping unreadable record {}: {e}", path.display()),
            }
        }
        sort_newest_first(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let path = self.record_path(id)?;
        let _guard = self.write_lock.lock();
        fs::remove_file(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                LightcalcError::not_found(format!("calculation {id}"))
            } else {
                LightcalcError::Io(e)
            }
        })
    }

    fn rename(&self, id: &str, name: &str) -> Result<CalculationRecord> {
        let name = normalize_name(name)?;
        let path = self.record_path(id)?;
        let _guard = self.write_lock.lock();
        let mut record = self.read_record(id, &path)?;
        record.name = Some(name);
        self.write_record(&path, &record)?;
        Ok(record)
    }
}
