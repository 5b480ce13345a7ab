//! Storage layer for findash
//!
//! JSON file storage with atomic writes and tolerant, per-entry loading.

pub mod budgets;
pub mod categories;
pub mod file_io;

pub use budgets::{load_document, remove_entry, save_entry, LoadReport, SkippedEntry};
pub use categories::{CategoryStore, StoreScope, UNCATEGORIZED};
pub use file_io::{read_json, read_json_or_default, write_json_atomic};
