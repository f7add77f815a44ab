//! Persistence of the clinic record, kept outside the pure engine.

use crate::core::ClinicRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage collaborator owned by the application: loaded at session start,
/// saved after every edit.
pub trait ClinicStore: Send + Sync {
    fn load(&self) -> Result<Option<ClinicRecord>>;
    fn save(&self, clinic: &ClinicRecord) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    saved_at: DateTime<Utc>,
    clinic: ClinicRecord,
}

/// Whether a JSON document is a saved snapshot rather than a bare clinic record.
pub fn is_snapshot(value: &serde_json::Value) -> bool {
    value.get("clinic").is_some() && value.get("savedAt").is_some()
}

/// The clinic record inside a document, unwrapping a saved snapshot.
pub fn clinic_document(mut value: serde_json::Value) -> serde_json::Value {
    if is_snapshot(&value) {
        if let Some(clinic) = value.get_mut("clinic") {
            return clinic.take();
        }
    }
    value
}

/// Clinic record kept as pretty-printed JSON on disk.
///
/// Plain clinic documents without the snapshot envelope are read too, so a
/// hand-written file can be loaded directly.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClinicStore for JsonFileStore {
    fn load(&self) -> Result<Option<ClinicRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        let clinic = if is_snapshot(&value) {
            let snapshot: Snapshot = serde_json::from_value(value)?;
            log::debug!("Loaded clinic saved at {}", snapshot.saved_at);
            snapshot.clinic
        } else {
            serde_json::from_value(value)?
        };
        Ok(Some(clinic))
    }

    fn save(&self, clinic: &ClinicRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let snapshot = Snapshot {
            saved_at: Utc::now(),
            clinic: clinic.clone(),
        };
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        log::info!("Saved clinic to {}", self.path.display());
        Ok(())
    }
}

/// In-process store for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    clinic: Mutex<Option<ClinicRecord>>,
}

impl ClinicStore for MemoryStore {
    fn load(&self) -> Result<Option<ClinicRecord>> {
        Ok(self
            .clinic
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, clinic: &ClinicRecord) -> Result<()> {
        *self
            .clinic
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(clinic.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clinic-pricing-{}-{}.json", std::process::id(), name))
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::default();
        assert!(store.load().unwrap().is_none());

        let mut clinic = ClinicRecord::template();
        clinic.goals.pro_labore = dec!(9000);
        store.save(&clinic).unwrap();
        assert_eq!(store.load().unwrap().unwrap().goals.pro_labore, dec!(9000));
    }

    #[test]
    fn file_store_missing_file_is_none() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_saves_snapshot() {
        let path = temp_path("snapshot");
        let store = JsonFileStore::new(&path);
        let mut clinic = ClinicRecord::template();
        clinic.goals.profit_margin = dec!(55);
        store.save(&clinic).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("savedAt").is_some());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.goals.profit_margin, dec!(55));
        assert_eq!(loaded.tax_config, clinic.tax_config);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn file_store_reads_plain_document() {
        let path = temp_path("plain");
        fs::write(
            &path,
            r#"{ "profile": { "daysPerWeek": 5, "hoursPerDay": 8 },
                 "goals": { "proLabore": 1000, "profitMargin": 30 } }"#,
        )
        .unwrap();
        let loaded = JsonFileStore::new(&path).load().unwrap().unwrap();
        assert_eq!(loaded.goals.profit_margin, dec!(30));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn snapshot_detection_needs_both_keys() {
        let snapshot = serde_json::json!({ "savedAt": "2024-01-01T00:00:00Z", "clinic": { "a": 1 } });
        assert!(is_snapshot(&snapshot));
        assert_eq!(clinic_document(snapshot), serde_json::json!({ "a": 1 }));

        let plain = serde_json::json!({ "savedAt": "2024-01-01T00:00:00Z", "profile": {} });
        assert!(!is_snapshot(&plain));
        assert_eq!(clinic_document(plain.clone()), plain);
    }
}
