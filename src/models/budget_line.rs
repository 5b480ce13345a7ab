//! Budget line model
//!
//! A single inclusion/exclusion rule over a transaction's category and tags.
//! A budget holds an ordered list of these; the first matching line claims the
//! transaction.

use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// A matching rule within a budget
///
/// Precedence, strictly in this order:
/// 1. a tag in `exclude_tags` rejects the transaction outright;
/// 2. a tag in `include_tags` accepts it even if the category differs;
/// 3. a non-empty `category` accepts iff it equals the transaction's
///    category (case-insensitive);
/// 4. a line with no filters at all matches everything (catch-all bucket).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    /// Category filter; empty means wildcard
    #[serde(default)]
    pub category: String,

    /// Tags that force-include a transaction under this line
    #[serde(default)]
    pub include_tags: Vec<String>,

    /// Tags that force-exclude a transaction; outranks everything else
    #[serde(default)]
    pub exclude_tags: Vec<String>,
}

impl BudgetLine {
    /// Create a line matching a single category
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// Create a line that includes transactions carrying any of the tags
    pub fn for_tags(include_tags: &[&str]) -> Self {
        Self {
            include_tags: include_tags.iter().map(|t| t.to_lowercase()).collect(),
            ..Self::default()
        }
    }

    /// Create a line that excludes transactions carrying any of the tags
    pub fn excluding_tags(exclude_tags: &[&str]) -> Self {
        Self {
            exclude_tags: exclude_tags.iter().map(|t| t.to_lowercase()).collect(),
            ..Self::default()
        }
    }

    /// Decide whether this line claims the transaction
    ///
    /// Pure function of the line and the transaction; no side effects.
    pub fn matches(&self, txn: &Transaction) -> bool {
        // Exclusion is absolute.
        if !self.exclude_tags.is_empty() && self.any_tag_matches(txn, &self.exclude_tags) {
            return false;
        }

        // Tag inclusion overrides the category filter.
        if !self.include_tags.is_empty() && self.any_tag_matches(txn, &self.include_tags) {
            return true;
        }

        if !self.category.is_empty() {
            return self.category.eq_ignore_ascii_case(txn.category.trim());
        }

        // No category and no tag matched: wildcard iff the line has no
        // include filter to satisfy.
        self.include_tags.is_empty()
    }

    fn any_tag_matches(&self, txn: &Transaction, wanted: &[String]) -> bool {
        wanted.iter().any(|w| txn.has_tag(w))
    }
}
