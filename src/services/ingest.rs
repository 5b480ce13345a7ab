//! Canonical transaction table ingest
//!
//! Reads an already-normalized transaction table (the upstream import step's
//! output) into typed [`Transaction`]s. This is not a bank-format parser:
//! the expected columns are fixed (`Date`, `Amount`, `Details`, `Category`,
//! `tags`, optional `tx_id`). Rows that cannot be read are skipped and
//! reported, never fatal.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::{FindashError, FindashResult};
use crate::models::{parse_tag_string, Transaction};

/// One canonical-table row that could not be ingested
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source file (header is line 1)
    pub line: u64,
    /// Why the row was dropped
    pub reason: String,
}

/// Outcome of reading a canonical table
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Number of rows ingested successfully
    pub rows_read: usize,
    /// Rows dropped, with reasons
    pub skipped: Vec<SkippedRow>,
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    amount: usize,
    details: Option<usize>,
    category: Option<usize>,
    tags: Option<usize>,
    tx_id: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> FindashResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let date = find("Date").ok_or_else(|| {
            FindashError::Ingest("Canonical table is missing a 'Date' column".into())
        })?;
        let amount = find("Amount").ok_or_else(|| {
            FindashError::Ingest("Canonical table is missing an 'Amount' column".into())
        })?;

        Ok(Self {
            date,
            amount,
            details: find("Details"),
            category: find("Category"),
            tags: find("tags"),
            tx_id: find("tx_id"),
        })
    }
}

/// Read a canonical transaction table from a CSV file
pub fn read_canonical_csv<P: AsRef<Path>>(
    path: P,
) -> FindashResult<(Vec<Transaction>, IngestReport)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| FindashError::Ingest(format!("Failed to open {}: {}", path.display(), e)))?;
    read_canonical(file)
}

/// Read a canonical transaction table from any reader
pub fn read_canonical<R: Read>(reader: R) -> FindashResult<(Vec<Transaction>, IngestReport)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| FindashError::Ingest(format!("Failed to read header row: {}", e)))?
        .clone();
    let columns = Columns::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut report = IngestReport::default();

    for (index, record) in csv_reader.records().enumerate() {
        // Line 1 is the header.
        let line = index as u64 + 2;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                skip(&mut report, line, format!("Unreadable record: {}", e));
                continue;
            }
        };

        match parse_row(&columns, &record) {
            Ok(txn) => {
                rows.push(txn);
                report.rows_read += 1;
            }
            Err(reason) => skip(&mut report, line, reason),
        }
    }

    Ok((rows, report))
}

fn skip(report: &mut IngestReport, line: u64, reason: String) {
    log::warn!("Skipping canonical table line {}: {}", line, reason);
    report.skipped.push(SkippedRow { line, reason });
}

fn parse_row(columns: &Columns, record: &StringRecord) -> Result<Transaction, String> {
    let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

    let raw_date = record.get(columns.date).unwrap_or("").trim();
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|_| format!("Malformed date '{}'", raw_date))?;

    // Amounts may carry thousands separators.
    let raw_amount = record.get(columns.amount).unwrap_or("").trim();
    let amount: f64 = raw_amount
        .replace(',', "")
        .parse()
        .map_err(|_| format!("Malformed amount '{}'", raw_amount))?;

    let details = field(columns.details).to_string();
    let category = field(columns.category).to_string();
    let tags = parse_tag_string(field(columns.tags));

    let tx_id = field(columns.tx_id);
    let id = if tx_id.is_empty() {
        Transaction::derive_id(date, amount, &details)
    } else {
        tx_id.to_string()
    };

    Ok(Transaction {
        id,
        date,
        amount,
        details,
        category,
        tags,
    })
}
