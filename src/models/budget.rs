//! Budget model
//!
//! A named, time-bounded spending limit. A budget owns an ordered list of
//! [`BudgetLine`]s (first match wins) and a derived view of the transactions
//! currently assigned to it. The view is never persisted: `tx_ids` is the
//! durable record, and the view is rebuilt from the canonical table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{FindashError, FindashResult};

use super::budget_line::BudgetLine;
use super::transaction::Transaction;

/// A spending budget over an inclusive date window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique key within a registry
    pub name: String,

    /// First day of the window (inclusive)
    pub start_date: NaiveDate,

    /// Last day of the window (inclusive)
    pub end_date: NaiveDate,

    /// Non-negative spending ceiling
    pub limit: f64,

    /// Ordered matching rules; the first matching line claims a transaction
    #[serde(default)]
    pub budget_lines: Vec<BudgetLine>,

    /// Ids of the transactions belonging to this budget
    ///
    /// This is what gets persisted; it lets the registry reselect rows by id
    /// without re-running date/line matching.
    #[serde(default)]
    pub tx_ids: Vec<String>,

    /// Derived view over the canonical table; rebuilt on every reassignment
    #[serde(skip)]
    pub transactions: Vec<Transaction>,
}

/// Aggregated spending against a budget's limit
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub limit: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub is_exceeded: bool,
    pub per_category_spent: BTreeMap<String, f64>,
    pub per_tag_spent: BTreeMap<String, f64>,
}

impl Budget {
    /// Create a new budget with no lines and no transactions
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        limit: f64,
    ) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            limit,
            budget_lines: Vec::new(),
            tx_ids: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// Append a matching rule
    ///
    /// Duplicate lines are allowed; they only waste matching time.
    pub fn add_line(&mut self, line: BudgetLine) {
        self.budget_lines.push(line);
    }

    /// Offer a transaction to this budget
    ///
    /// The transaction is taken only if its date falls inside the window and
    /// some line matches it. A transaction that matches no line is silently
    /// dropped for this budget. Callers must clear `transactions` before
    /// re-offering the same id.
    pub fn add_transaction(&mut self, txn: &Transaction) {
        if txn.date < self.start_date || txn.date > self.end_date {
            return;
        }
        if self.assign_line(txn).is_some() {
            self.transactions.push(txn.clone());
        }
    }

    /// Return the first line (in list order) that matches the transaction
    ///
    /// First match wins; ties between lines are broken by order, never by
    /// specificity.
    pub fn assign_line(&self, txn: &Transaction) -> Option<&BudgetLine> {
        self.budget_lines.iter().find(|line| line.matches(txn))
    }

    /// Sum of amounts over all assigned transactions
    pub fn total_spent(&self) -> f64 {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Spending grouped by the matching line's category
    ///
    /// Each assigned transaction is re-resolved to its line, and its amount is
    /// accumulated under that line's category. Several raw categories can
    /// therefore roll up into one bucket.
    pub fn per_category_spent(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for txn in &self.transactions {
            if let Some(line) = self.assign_line(txn) {
                *totals.entry(line.category.clone()).or_insert(0.0) += txn.amount;
            }
        }
        totals
    }

    /// Spending grouped by transaction tag
    ///
    /// A transaction contributes its full amount to every one of its tags,
    /// so the bucket totals can sum to more than `total_spent`.
    pub fn per_tag_spent(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for txn in &self.transactions {
            for tag in &txn.tags {
                *totals.entry(tag.clone()).or_insert(0.0) += txn.amount;
            }
        }
        totals
    }

    /// Full aggregate view of this budget
    pub fn summary(&self) -> BudgetSummary {
        let total_spent = self.total_spent();
        BudgetSummary {
            limit: self.limit,
            total_spent,
            remaining: self.limit - total_spent,
            is_exceeded: total_spent > self.limit,
            per_category_spent: self.per_category_spent(),
            per_tag_spent: self.per_tag_spent(),
        }
    }

    /// Number of transactions belonging to this budget
    ///
    /// Counts the persisted id list, which stays authoritative even before
    /// the transactions view has been rehydrated.
    pub fn get_num_transactions(&self) -> usize {
        self.tx_ids.len()
    }

    /// Replace `tx_ids` with the ids of the current transactions view
    pub fn refresh_tx_ids(&mut self) {
        self.tx_ids = self.transactions.iter().map(|t| t.id.clone()).collect();
    }

    /// Validate the budget before persisting it
    pub fn validate(&self) -> FindashResult<()> {
        if self.name.trim().is_empty() {
            return Err(FindashError::Validation(
                "Budget name cannot be empty".into(),
            ));
        }
        if self.limit < 0.0 {
            return Err(FindashError::Validation(format!(
                "Budget limit cannot be negative: {}",
                self.limit
            )));
        }
        if self.start_date > self.end_date {
            return Err(FindashError::Validation(format!(
                "Budget start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} to {}, limit {:.2})",
            self.name, self.start_date, self.end_date, self.limit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn year_budget(name: &str, limit: f64) -> Budget {
        Budget::new(name, date(2025, 1, 1), date(2025, 12, 31), limit)
    }

    fn txn(d: NaiveDate, amount: f64, category: &str, tags: &[&str]) -> Transaction {
        Transaction::with_category(d, amount, format!("{}-{}", category, amount), category, tags)
    }

    #[test]
    fn test_add_transaction_and_totals() {
        let mut b = year_budget("test", 100.0);
        b.add_line(BudgetLine::for_category("groceries"));

        b.add_transaction(&txn(date(2025, 10, 1), 42.5, "Groceries", &["food"]));

        assert_eq!(b.total_spent(), 42.5);
        assert_eq!(b.per_category_spent().get("groceries"), Some(&42.5));
        assert_eq!(b.per_tag_spent().get("food"), Some(&42.5));
    }

    #[test]
    fn test_out_of_window_transaction_dropped() {
        let mut b = Budget::new("jan", date(2025, 1, 1), date(2025, 1, 31), 100.0);
        b.add_line(BudgetLine::default());

        b.add_transaction(&txn(date(2025, 2, 1), 10.0, "x", &[]));
        assert!(b.transactions.is_empty());

        // Window bounds are inclusive on both ends.
        b.add_transaction(&txn(date(2025, 1, 1), 5.0, "x", &[]));
        b.add_transaction(&txn(date(2025, 1, 31), 7.0, "x", &[]));
        assert_eq!(b.transactions.len(), 2);
    }

    #[test]
    fn test_no_matching_line_silently_dropped() {
        let mut b = year_budget("groceries", 100.0);
        b.add_line(BudgetLine::for_category("groceries"));

        b.add_transaction(&txn(date(2025, 5, 1), 5.0, "transport", &[]));
        assert!(b.transactions.is_empty());
        assert_eq!(b.total_spent(), 0.0);
    }

    #[test]
    fn test_assign_line_no_lines() {
        let b = year_budget("empty", 10.0);
        assert!(b.assign_line(&txn(date(2025, 5, 1), 5.0, "other", &["x"])).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let mut b = year_budget("order", 100.0);
        b.add_line(BudgetLine::for_category("dining"));
        b.add_line(BudgetLine::default());

        // Both lines match; line order decides, not specificity.
        let line = b.assign_line(&txn(date(2025, 5, 1), 5.0, "dining", &[])).unwrap();
        assert_eq!(line.category, "dining");

        // Only the catch-all matches this one.
        let line = b.assign_line(&txn(date(2025, 5, 1), 5.0, "other", &[])).unwrap();
        assert!(line.category.is_empty());
    }

    #[test]
    fn test_per_category_groups_by_line_category() {
        let mut b = year_budget("food", 200.0);
        b.add_line(BudgetLine {
            category: "food".into(),
            include_tags: vec!["food".into()],
            exclude_tags: vec![],
        });

        // Raw categories differ, but both land in the line's "food" bucket.
        b.add_transaction(&txn(date(2025, 3, 1), 15.0, "Groceries", &["food"]));
        b.add_transaction(&txn(date(2025, 3, 2), 25.0, "Restaurants", &["food"]));

        let per_cat = b.per_category_spent();
        assert_eq!(per_cat.len(), 1);
        assert_eq!(per_cat.get("food"), Some(&40.0));
    }

    #[test]
    fn test_per_tag_spent_does_not_split() {
        let mut b = year_budget("tags", 100.0);
        b.add_line(BudgetLine::default());

        b.add_transaction(&txn(date(2025, 4, 1), 30.0, "dining", &["food", "takeout"]));

        let per_tag = b.per_tag_spent();
        assert_eq!(per_tag.get("food"), Some(&30.0));
        assert_eq!(per_tag.get("takeout"), Some(&30.0));
        // Tag buckets each get the full amount, so their sum may exceed
        // total_spent.
        assert!(per_tag.values().sum::<f64>() > b.total_spent());
    }

    #[test]
    fn test_summary() {
        let mut b = year_budget("s", 50.0);
        b.add_line(BudgetLine::default());
        b.add_transaction(&txn(date(2025, 6, 1), 60.0, "x", &[]));

        let summary = b.summary();
        assert_eq!(summary.limit, 50.0);
        assert_eq!(summary.total_spent, 60.0);
        assert_eq!(summary.remaining, -10.0);
        assert!(summary.is_exceeded);
    }

    #[test]
    fn test_get_num_transactions_counts_tx_ids() {
        let mut b = year_budget("n", 10.0);
        b.tx_ids = vec!["a".into(), "b".into(), "c".into()];
        // Authoritative even though the view is empty.
        assert!(b.transactions.is_empty());
        assert_eq!(b.get_num_transactions(), 3);
    }

    #[test]
    fn test_refresh_tx_ids() {
        let mut b = year_budget("r", 100.0);
        b.add_line(BudgetLine::default());
        let t = txn(date(2025, 7, 1), 10.0, "x", &[]);
        b.add_transaction(&t);

        b.refresh_tx_ids();
        assert_eq!(b.tx_ids, vec![t.id]);
    }

    #[test]
    fn test_serde_roundtrip_skips_transactions() {
        let mut b = year_budget("round", 250.0);
        b.add_line(BudgetLine::for_category("entertainment"));
        b.tx_ids = vec!["tx1".into(), "tx2".into()];
        b.add_transaction(&txn(date(2025, 8, 1), 12.0, "entertainment", &[]));

        let json = serde_json::to_string(&b).unwrap();
        let back: Budget = serde_json::from_str(&json).unwrap();

        assert_eq!(back.name, "round");
        assert_eq!(back.limit, 250.0);
        assert_eq!(back.start_date, b.start_date);
        assert_eq!(back.end_date, b.end_date);
        assert_eq!(back.budget_lines, b.budget_lines);
        assert_eq!(back.tx_ids, vec!["tx1", "tx2"]);
        // The materialized view is rebuilt by reassignment, never persisted.
        assert!(back.transactions.is_empty());
    }

    #[test]
    fn test_validate() {
        let b = year_budget("ok", 10.0);
        assert!(b.validate().is_ok());

        let unnamed = year_budget("  ", 10.0);
        assert!(unnamed.validate().unwrap_err().is_validation());

        let negative = year_budget("neg", -1.0);
        assert!(negative.validate().unwrap_err().is_validation());

        let inverted = Budget::new("inv", date(2025, 12, 31), date(2025, 1, 1), 10.0);
        assert!(inverted.validate().unwrap_err().is_validation());
    }
}
