//! Tabular export of geocode results and the in-memory blob store

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;
use vrpsetup_domain::gateway::ExportStore;
use vrpsetup_domain::model::record::value_to_text;
use vrpsetup_domain::model::{ExportArtifact, Record};
use vrpsetup_types::{Error, Result};

/// Serialize records to CSV text.
///
/// Columns appear in the order they are first seen across the records;
/// records lacking a column get a blank cell.
pub fn records_to_csv(records: &[Record]) -> Result<String> {
    let mut columns: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        for column in record.columns() {
            if seen.insert(column) {
                columns.push(column);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    if !columns.is_empty() {
        writer
            .write_record(&columns)
            .map_err(|e| Error::Export(e.to_string()))?;
    }
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|c| record.get(c).map(value_to_text).unwrap_or_default())
            .collect();
        writer
            .write_record(&row)
            .map_err(|e| Error::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

/// Session-scoped blob store handing out `blob:<uuid>` references
#[derive(Debug, Default)]
pub struct MemoryExportStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryExportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of references not yet revoked
    pub fn live_count(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.blobs
            .lock()
            .map_err(|_| Error::Export("export store lock poisoned".to_string()))
    }
}

impl ExportStore for MemoryExportStore {
    fn publish(&self, bytes: Vec<u8>, media_type: &str) -> Result<ExportArtifact> {
        let url = format!("blob:{}", Uuid::new_v4());
        let artifact = ExportArtifact {
            url: url.clone(),
            byte_len: bytes.len(),
            media_type: media_type.to_string(),
            created_at: Utc::now(),
        };
        self.lock()?.insert(url, bytes);
        tracing::debug!(url = %artifact.url, bytes = artifact.byte_len, "Published export");
        Ok(artifact)
    }

    fn fetch(&self, artifact: &ExportArtifact) -> Result<Vec<u8>> {
        self.lock()?
            .get(&artifact.url)
            .cloned()
            .ok_or_else(|| Error::Export(format!("{} has been revoked", artifact.url)))
    }

    fn revoke(&self, artifact: &ExportArtifact) -> Result<()> {
        match self.lock()?.remove(&artifact.url) {
            Some(_) => {
                tracing::debug!(url = %artifact.url, "Revoked export");
                Ok(())
            }
            None => Err(Error::Export(format!("{} has been revoked", artifact.url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vrpsetup_domain::model::export::CSV_MEDIA_TYPE;

    #[test]
    fn test_records_to_csv_union_of_columns() {
        let mut first = Record::new();
        first.insert("zipcode", json!("10001"));
        first.insert("latitude", json!(40.75));
        first.insert("longitude", json!(-73.99));
        let mut second = Record::new();
        second.insert("zipcode", json!("94105"));
        second.insert("latitude", json!(37.79));
        second.insert("longitude", json!(-122.4));
        second.insert("city", json!("San Francisco"));

        let csv = records_to_csv(&[first, second]).unwrap();
        assert_eq!(
            csv,
            "zipcode,latitude,longitude,city\n\
             10001,40.75,-73.99,\n\
             94105,37.79,-122.4,San Francisco\n"
        );
    }

    #[test]
    fn test_records_to_csv_empty() {
        assert_eq!(records_to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_store_lifecycle() {
        let store = MemoryExportStore::new();
        let artifact = store.publish(b"zip\n10001\n".to_vec(), CSV_MEDIA_TYPE).unwrap();
        assert!(artifact.url.starts_with("blob:"));
        assert_eq!(artifact.byte_len, 10);
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.fetch(&artifact).unwrap(), b"zip\n10001\n".to_vec());

        store.revoke(&artifact).unwrap();
        assert_eq!(store.live_count(), 0);
        assert!(store.fetch(&artifact).is_err());
        assert!(store.revoke(&artifact).is_err());
    }
}
