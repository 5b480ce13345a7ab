//! Category store
//!
//! Exact-lookup categorization: each scope maps a category name to the list
//! of statement details filed under it, with a derived reverse lookup from
//! detail to category. Expense and income categories live in separate files.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::error::FindashResult;

use super::file_io::{read_json_or_default, write_json_atomic};

/// Fallback category, always present in every scope
pub const UNCATEGORIZED: &str = "uncategorized";

/// Which category store a call targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreScope {
    /// Categories for debit/spending rows
    Expense,
    /// Categories for credit/income rows
    Income,
}

/// On-disk form of one scope: category -> details filed under it
type ScopeDocument = BTreeMap<String, Vec<String>>;

#[derive(Debug, Default)]
struct ScopeData {
    data: ScopeDocument,
    lookup: HashMap<String, String>,
}

impl ScopeData {
    fn rebuild_lookup(&mut self) {
        self.lookup.clear();
        for (category, details) in &self.data {
            for detail in details {
                self.lookup.insert(detail.clone(), category.clone());
            }
        }
    }
}

/// Keyed store of category -> details mappings for both scopes
#[derive(Debug)]
pub struct CategoryStore {
    expense_path: PathBuf,
    income_path: PathBuf,
    expense: ScopeData,
    income: ScopeData,
    dirty: bool,
    loaded: bool,
}

impl CategoryStore {
    /// Create a store backed by the two scope files
    pub fn new(expense_path: PathBuf, income_path: PathBuf) -> Self {
        Self {
            expense_path,
            income_path,
            expense: ScopeData::default(),
            income: ScopeData::default(),
            dirty: false,
            loaded: false,
        }
    }

    /// Load both scopes from disk
    ///
    /// Absent or unreadable files yield the default store (just the
    /// uncategorized bucket); the file is created on the first save. Loaded
    /// names and details are normalized.
    pub fn load_all(&mut self) -> FindashResult<()> {
        for scope in [StoreScope::Expense, StoreScope::Income] {
            let raw: ScopeDocument = read_json_or_default(self.path_for(scope));

            let mut data = ScopeDocument::new();
            for (category, details) in raw {
                let category = normalize(&category);
                let details = details.iter().map(|d| normalize(d)).collect();
                data.insert(category, details);
            }
            data.entry(UNCATEGORIZED.into()).or_default();

            let scope_data = self.scope_mut(scope);
            scope_data.data = data;
            scope_data.rebuild_lookup();
        }
        self.loaded = true;
        Ok(())
    }

    /// Write both scopes to disk if anything changed
    pub fn save_all(&mut self) -> FindashResult<()> {
        if !self.dirty {
            return Ok(());
        }
        write_json_atomic(&self.expense_path, &self.expense.data)?;
        write_json_atomic(&self.income_path, &self.income.data)?;
        self.dirty = false;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Add an empty category to a scope
    pub fn add_category(&mut self, scope: StoreScope, name: &str) {
        let name = normalize(name);
        if name.is_empty() {
            return;
        }
        let scope_data = self.scope_mut(scope);
        if !scope_data.data.contains_key(&name) {
            scope_data.data.insert(name, Vec::new());
            self.dirty = true;
        }
    }

    /// File a statement detail under a category, moving it if already filed
    pub fn set_category(&mut self, scope: StoreScope, detail: &str, category: &str) {
        let detail = normalize(detail);
        let category = normalize(category);
        if detail.is_empty() || category.is_empty() {
            return;
        }

        let scope_data = self.scope_mut(scope);

        if let Some(old) = scope_data.lookup.get(&detail).cloned() {
            if let Some(details) = scope_data.data.get_mut(&old) {
                details.retain(|d| *d != detail);
            }
        }

        let details = scope_data.data.entry(category.clone()).or_default();
        if !details.contains(&detail) {
            details.push(detail.clone());
        }
        scope_data.lookup.insert(detail, category);
        self.dirty = true;
    }

    /// Look up the category a detail is filed under
    pub fn lookup(&self, scope: StoreScope, detail: &str) -> Option<&str> {
        self.scope_ref(scope)
            .lookup
            .get(&normalize(detail))
            .map(|c| c.as_str())
    }

    /// Exact-lookup categorization with the uncategorized fallback
    pub fn categorize(&self, scope: StoreScope, detail: &str) -> String {
        self.lookup(scope, detail)
            .unwrap_or(UNCATEGORIZED)
            .to_string()
    }

    /// Category names for a scope, sorted
    pub fn options(&self, scope: StoreScope) -> Vec<String> {
        self.scope_ref(scope).data.keys().cloned().collect()
    }

    fn path_for(&self, scope: StoreScope) -> &PathBuf {
        match scope {
            StoreScope::Expense => &self.expense_path,
            StoreScope::Income => &self.income_path,
        }
    }

    fn scope_ref(&self, scope: StoreScope) -> &ScopeData {
        match scope {
            StoreScope::Expense => &self.expense,
            StoreScope::Income => &self.income,
        }
    }

    fn scope_mut(&mut self, scope: StoreScope) -> &mut ScopeData {
        match scope {
            StoreScope::Expense => &mut self.expense,
            StoreScope::Income => &mut self.income,
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
