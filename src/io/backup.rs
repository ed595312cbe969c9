use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::io::notebook_io::{FOLDERS_KEY, PAGES_KEY};
use crate::io::store::{KeyValueStore, StoreError};
use crate::model::folder::Folder;
use crate::model::page::Page;

/// Error type for backup and restore
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("backup is not valid JSON: {0}")]
    ParseError(#[source] serde_json::Error),
    #[error("invalid backup file: missing timestamp")]
    MissingTimestamp,
    #[error("invalid backup file: {key} is malformed: {source}")]
    InvalidEntry {
        key: String,
        source: serde_json::Error,
    },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Keys carried in a backup document, in the order they are restored
pub const BACKUP_KEYS: [&str; 2] = [FOLDERS_KEY, PAGES_KEY];

/// What a restore wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub timestamp: String,
    pub restored: Vec<String>,
}

/// Bundle the notebook keys into one JSON document with a `timestamp`.
/// A missing or unparsable key is exported as an empty array.
pub fn export_backup<S: KeyValueStore>(store: &S) -> Result<String, BackupError> {
    let mut doc = Map::new();
    doc.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    for key in BACKUP_KEYS {
        let value = match store.get(key)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key, error = %e, "exporting unreadable key as empty");
                Value::Array(Vec::new())
            }),
            None => Value::Array(Vec::new()),
        };
        doc.insert(key.to_string(), value);
    }
    serde_json::to_string_pretty(&Value::Object(doc))
        .map_err(|e| BackupError::Store(StoreError::SerializeError(e)))
}

/// Restore a backup document. Each key present in the document replaces the
/// stored value; absent keys are left alone. Every present key is validated
/// before anything is written, so a bad document changes nothing.
///
/// Callers must reload any in-memory notebook afterwards.
pub fn import_backup<S: KeyValueStore>(
    store: &mut S,
    document: &str,
) -> Result<RestoreSummary, BackupError> {
    let doc: Value = serde_json::from_str(document).map_err(BackupError::ParseError)?;
    let timestamp = match doc.get("timestamp") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(BackupError::MissingTimestamp),
    };

    let mut pending = Vec::new();
    for key in BACKUP_KEYS {
        let Some(value) = doc.get(key).filter(|v| !v.is_null()) else {
            continue;
        };
        validate_entry(key, value)?;
        pending.push((key, value.to_string()));
    }

    let mut summary = RestoreSummary {
        timestamp,
        restored: Vec::new(),
    };
    for (key, content) in pending {
        store.set(key, &content)?;
        summary.restored.push(key.to_string());
    }
    info!(timestamp = %summary.timestamp, keys = ?summary.restored, "backup restored");
    Ok(summary)
}

fn validate_entry(key: &str, value: &Value) -> Result<(), BackupError> {
    let invalid = |source| BackupError::InvalidEntry {
        key: key.to_string(),
        source,
    };
    if key == FOLDERS_KEY {
        serde_json::from_value::<Vec<Folder>>(value.clone()).map_err(invalid)?;
    } else if key == PAGES_KEY {
        serde_json::from_value::<Vec<Page>>(value.clone()).map_err(invalid)?;
    }
    Ok(())
}
