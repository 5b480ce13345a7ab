//! Transaction model
//!
//! Canonical representation of one ledger entry as produced by the upstream
//! import step. The id is content-derived so the same transaction always maps
//! to the same id across re-imports of the same statement.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// One row of the canonical transaction table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identifier, a pure function of (date, amount, details)
    pub id: String,

    /// Transaction date (no time component)
    pub date: NaiveDate,

    /// Spend amount; treated as positive within a budget period
    pub amount: f64,

    /// Raw statement description
    #[serde(default)]
    pub details: String,

    /// Assigned category; empty means uncategorized
    #[serde(default)]
    pub category: String,

    /// Lowercase tags, no duplicates; order is irrelevant to matching
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Transaction {
    /// Create a transaction, deriving its id from the other fields
    pub fn new(date: NaiveDate, amount: f64, details: impl Into<String>) -> Self {
        let details = details.into();
        let id = Self::derive_id(date, amount, &details);
        Self {
            id,
            date,
            amount,
            details,
            category: String::new(),
            tags: Vec::new(),
        }
    }

    /// Create a transaction with a category and tags
    ///
    /// Tags are normalized (trimmed, lowercased, deduplicated) on the way in.
    pub fn with_category(
        date: NaiveDate,
        amount: f64,
        details: impl Into<String>,
        category: impl Into<String>,
        tags: &[&str],
    ) -> Self {
        let mut txn = Self::new(date, amount, details);
        txn.category = category.into();
        txn.tags = normalize_tags(tags.iter().map(|t| t.to_string()));
        txn
    }

    /// Derive the stable transaction id from its identifying fields
    ///
    /// Hex SHA-256 of `"{date}|{amount}|{details}"`. Re-importing the same
    /// statement row therefore yields the same id.
    pub fn derive_id(date: NaiveDate, amount: f64, details: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}|{}|{}", date, amount, details).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Check whether this transaction carries the given tag (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        self.tags.iter().any(|t| *t == tag)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2}",
            self.date.format("%Y-%m-%d"),
            self.details,
            self.amount
        )
    }
}

/// Normalize a collection of tags: trim, lowercase, drop empties and duplicates
///
/// First occurrence wins, so input order is preserved.
pub fn normalize_tags<I: IntoIterator<Item = String>>(tags: I) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Split a comma-joined tag string into normalized tags
///
/// The canonical table may carry tags as either a list or a single
/// `"food, takeout"` style string.
pub fn parse_tag_string(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(',').map(|t| t.to_string()))
}
