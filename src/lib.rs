//! findash - Budget matching and aggregation core for a personal finance
//! dashboard
//!
//! The upstream import step supplies a canonical table of normalized
//! transactions; this crate decides which transactions belong to which budget
//! and summarizes spending against each budget's limit. Rendering, upload
//! widgets, and bank-format parsing live elsewhere.
//!
//! # Architecture
//!
//! - `config`: path management for the on-disk stores
//! - `error`: custom error types
//! - `models`: transactions, budget lines (matching rules), and budgets
//! - `storage`: JSON file storage with atomic writes
//! - `services`: the budget registry and canonical-table ingest
//!
//! # Example
//!
//! ```rust,ignore
//! use findash::config::FindashPaths;
//! use findash::services::{read_canonical_csv, BudgetRegistry};
//!
//! let paths = FindashPaths::new()?;
//! let mut registry = BudgetRegistry::new();
//! registry.load_all(paths.budgets_file());
//!
//! let (table, _report) = read_canonical_csv("statement.csv")?;
//! registry.reassign_all(&table);
//! let summary = registry.get("groceries")?.summary();
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FindashError, FindashResult};
pub use models::{Budget, BudgetLine, BudgetSummary, Transaction};
pub use services::BudgetRegistry;
