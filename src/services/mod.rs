//! Service layer for findash
//!
//! Business logic on top of the models and storage: the budget registry and
//! canonical-table ingest.

pub mod ingest;
pub mod registry;

pub use ingest::{read_canonical, read_canonical_csv, IngestReport, SkippedRow};
pub use registry::BudgetRegistry;
