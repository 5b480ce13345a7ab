//! Core data models for findash
//!
//! The budgeting domain: canonical transactions, budget lines (matching
//! rules), and budgets.

pub mod budget;
pub mod budget_line;
pub mod transaction;

pub use budget::{Budget, BudgetSummary};
pub use budget_line::BudgetLine;
pub use transaction::{normalize_tags, parse_tag_string, Transaction};
