//! Budget registry
//!
//! Keyed collection of budgets plus the bulk re-classification entry point.
//! The registry owns persistence: budgets are saved and deleted only through
//! its registry file.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{FindashError, FindashResult};
use crate::models::{Budget, Transaction};
use crate::storage::budgets::{load_document, remove_entry, save_entry, LoadReport};

/// In-memory collection of budgets keyed by name
#[derive(Debug, Default)]
pub struct BudgetRegistry {
    budgets: HashMap<String, Budget>,
}

impl BudgetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a budget by name
    pub fn get(&self, name: &str) -> FindashResult<&Budget> {
        self.budgets
            .get(name)
            .ok_or_else(|| FindashError::budget_not_found(name))
    }

    /// Look up a budget by name, mutably
    pub fn get_mut(&mut self, name: &str) -> FindashResult<&mut Budget> {
        self.budgets
            .get_mut(name)
            .ok_or_else(|| FindashError::budget_not_found(name))
    }

    /// Store a budget by name, overwriting any existing entry (no merge)
    pub fn upsert(&mut self, budget: Budget) {
        self.budgets.insert(budget.name.clone(), budget);
    }

    /// Remove a budget from the in-memory map
    pub fn remove(&mut self, name: &str) -> FindashResult<Budget> {
        self.budgets
            .remove(name)
            .ok_or_else(|| FindashError::budget_not_found(name))
    }

    /// Budget names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.budgets.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.budgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }

    /// Iterate over all budgets, unordered
    pub fn iter(&self) -> impl Iterator<Item = &Budget> {
        self.budgets.values()
    }

    /// Replace the in-memory map with the document at `path`
    ///
    /// An absent file bootstraps an empty registry. Corrupt entries are
    /// skipped individually; the report says what loaded and what did not.
    pub fn load_all<P: AsRef<Path>>(&mut self, path: P) -> LoadReport {
        let (budgets, report) = load_document(path);
        self.budgets = budgets;
        report
    }

    /// Persist one budget into the registry file, then register it in memory
    ///
    /// Validation runs before any file I/O is attempted.
    pub fn save_one<P: AsRef<Path>>(&mut self, budget: Budget, path: P) -> FindashResult<()> {
        budget.validate()?;
        save_entry(path, &budget)?;
        self.upsert(budget);
        Ok(())
    }

    /// Delete a budget from the registry file and the in-memory map
    ///
    /// A key missing on disk is a no-op, not an error. Returns whether the
    /// on-disk entry existed.
    pub fn delete<P: AsRef<Path>>(&mut self, name: &str, path: P) -> FindashResult<bool> {
        let existed = remove_entry(path, name)?;
        self.budgets.remove(name);
        Ok(existed)
    }

    /// Re-distribute a canonical transaction table across all budgets
    ///
    /// Every budget's view is cleared and rebuilt. Budgets that carry a
    /// persisted `tx_ids` list are rehydrated by selecting exactly those rows
    /// (fast path; the id list is authoritative and line matching does not
    /// re-run). Budgets with an empty list fall back to offering every row
    /// through `add_transaction` (slow path). Afterwards each budget's
    /// `tx_ids` is recomputed from its view, so the fast path is available on
    /// the next call. Calling this twice with the same table is idempotent.
    pub fn reassign_all(&mut self, table: &[Transaction]) {
        for budget in self.budgets.values_mut() {
            budget.transactions.clear();

            if budget.tx_ids.is_empty() {
                for txn in table {
                    budget.add_transaction(txn);
                }
            } else {
                let wanted: HashSet<&str> = budget.tx_ids.iter().map(|id| id.as_str()).collect();
                budget.transactions = table
                    .iter()
                    .filter(|t| wanted.contains(t.id.as_str()))
                    .cloned()
                    .collect();
            }

            budget.refresh_tx_ids();
        }
    }
}
