//! Budget registry document storage
//!
//! The registry persists as one JSON object keyed by budget name. Loading is
//! entry-tolerant: a corrupt entry is skipped and reported, never aborting
//! the rest. Saves and deletes are read-modify-write against the on-disk
//! document so a budget never persists itself independently of the file.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::FindashResult;
use crate::models::Budget;

use super::file_io::{read_json_or_default, write_json_atomic};

/// Raw on-disk form of the registry: name -> arbitrary JSON entry
///
/// Kept as `Value`s during read-modify-write so an entry this build cannot
/// deserialize is preserved rather than dropped on the next save.
type RawDocument = BTreeMap<String, serde_json::Value>;

/// One registry entry that failed to load
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    /// Document key of the entry
    pub key: String,
    /// Deserialization failure message
    pub reason: String,
}

/// Outcome of loading a registry document
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of budgets loaded successfully
    pub loaded: usize,
    /// Entries that were skipped, with reasons
    pub skipped: Vec<SkippedEntry>,
}

impl LoadReport {
    /// True when every entry in the document loaded
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Load the registry document at `path`
///
/// An absent or unreadable file yields an empty registry (the bootstrap state
/// for a first run). Individual entries that fail to deserialize are warned
/// and recorded in the report.
pub fn load_document<P: AsRef<Path>>(path: P) -> (HashMap<String, Budget>, LoadReport) {
    let raw: RawDocument = read_json_or_default(path);

    let mut budgets = HashMap::new();
    let mut report = LoadReport::default();

    for (key, value) in raw {
        match serde_json::from_value::<Budget>(value) {
            Ok(budget) => {
                budgets.insert(budget.name.clone(), budget);
                report.loaded += 1;
            }
            Err(e) => {
                log::warn!("Skipping budget entry '{}': {}", key, e);
                report.skipped.push(SkippedEntry {
                    key,
                    reason: e.to_string(),
                });
            }
        }
    }

    (budgets, report)
}

/// Write one budget into the document at `path`, overwriting its key
///
/// Read-modify-write: the existing document (or empty if absent/corrupt) is
/// loaded, the one key replaced, and the whole document written atomically.
pub fn save_entry<P: AsRef<Path>>(path: P, budget: &Budget) -> FindashResult<()> {
    let mut raw: RawDocument = read_json_or_default(&path);
    raw.insert(budget.name.clone(), serde_json::to_value(budget)?);
    write_json_atomic(path, &raw)
}

/// Remove one budget from the document at `path`
///
/// Removing a key that does not exist is a no-op; the file is not rewritten.
/// Returns whether the key was present.
pub fn remove_entry<P: AsRef<Path>>(path: P, name: &str) -> FindashResult<bool> {
    let mut raw: RawDocument = read_json_or_default(&path);
    if raw.remove(name).is_none() {
        return Ok(false);
    }
    write_json_atomic(path, &raw)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn sample_budget(name: &str, limit: f64) -> Budget {
        Budget::new(
            name,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            limit,
        )
    }

    #[test]
    fn test_load_absent_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let (budgets, report) = load_document(temp_dir.path().join("budgets.json"));
        assert!(budgets.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        fs::write(&path, "{{{not json").unwrap();

        let (budgets, report) = load_document(&path);
        assert!(budgets.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        let mut b = sample_budget("groceries", 500.0);
        b.tx_ids = vec!["tx1".into(), "tx2".into()];
        save_entry(&path, &b).unwrap();

        let (budgets, report) = load_document(&path);
        assert_eq!(report.loaded, 1);
        let loaded = &budgets["groceries"];
        assert_eq!(loaded.limit, 500.0);
        assert_eq!(loaded.tx_ids, vec!["tx1", "tx2"]);
        assert!(loaded.transactions.is_empty());
    }

    #[test]
    fn test_save_overwrites_same_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        save_entry(&path, &sample_budget("ov", 10.0)).unwrap();
        save_entry(&path, &sample_budget("ov", 99.0)).unwrap();

        let (budgets, _) = load_document(&path);
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets["ov"].limit, 99.0);
    }

    #[test]
    fn test_save_keeps_other_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        save_entry(&path, &sample_budget("a", 1.0)).unwrap();
        save_entry(&path, &sample_budget("b", 2.0)).unwrap();

        let (budgets, _) = load_document(&path);
        assert_eq!(budgets.len(), 2);
    }

    #[test]
    fn test_corrupt_entry_skipped_and_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        save_entry(&path, &sample_budget("good", 50.0)).unwrap();

        // Hand-inject an entry with a malformed start_date.
        let mut raw: RawDocument = read_json_or_default(&path);
        raw.insert(
            "broken".into(),
            serde_json::json!({"name": "broken", "start_date": "not-a-date"}),
        );
        write_json_atomic(&path, &raw).unwrap();

        let (budgets, report) = load_document(&path);
        assert_eq!(budgets.len(), 1);
        assert!(budgets.contains_key("good"));
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].key, "broken");
    }

    #[test]
    fn test_remove_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        save_entry(&path, &sample_budget("gone", 5.0)).unwrap();
        assert!(remove_entry(&path, "gone").unwrap());

        let (budgets, _) = load_document(&path);
        assert!(budgets.is_empty());
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");

        save_entry(&path, &sample_budget("keep", 5.0)).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert!(!remove_entry(&path, "never-existed").unwrap());

        // File content unchanged, not even rewritten.
        let after = fs::read_to_string(&path).unwrap();
        assert_eq!(before, after);
    }
}
