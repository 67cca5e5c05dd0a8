//! CSV import parsing.
//!
//! Turns a bank-style CSV export into rows ready for
//! [`Engine::import_transactions`](crate::Engine::import_transactions).
//! Expected columns, matched by header name case-insensitively: `date`
//! (YYYY-MM-DD), `title`, `amount` and an optional `category`.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Category applied when the source file has none for a row.
pub const DEFAULT_IMPORT_CATEGORY: &str = "Credit Card";

/// One row of a parsed import file.
///
/// The amount keeps the source sign; the import operation stores
/// magnitudes only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedRow {
    pub date: NaiveDate,
    pub description: String,
    pub amount: MoneyCents,
    pub category: String,
}

struct ColumnMap {
    date: usize,
    title: usize,
    amount: usize,
    category: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> ResultEngine<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
        };
        let (Some(date), Some(title), Some(amount)) =
            (find("date"), find("title"), find("amount"))
        else {
            return Err(EngineError::InvalidArgument(
                "csv must have date, title and amount columns".to_string(),
            ));
        };
        Ok(Self {
            date,
            title,
            amount,
            category: find("category"),
        })
    }
}

/// Parses CSV text into import rows.
///
/// Rows that do not parse (bad date, bad amount, blank title) and rows
/// with a zero amount are skipped. Fails only when the header is
/// unusable or no valid row remains.
pub fn parse_rows(csv_text: &str) -> ResultEngine<Vec<ImportedRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| {
            EngineError::InvalidArgument("csv header row is not readable".to_string())
        })?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else {
            continue;
        };
        let Some(row) = parse_record(&record, &columns) else {
            continue;
        };
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(EngineError::InvalidArgument(
            "no valid rows in csv".to_string(),
        ));
    }
    Ok(rows)
}

fn parse_record(record: &StringRecord, columns: &ColumnMap) -> Option<ImportedRow> {
    let date: NaiveDate = record.get(columns.date)?.trim().parse().ok()?;
    let description = record.get(columns.title)?.trim();
    if description.is_empty() {
        return None;
    }
    let amount: MoneyCents = record.get(columns.amount)?.trim().parse().ok()?;
    if amount.is_zero() {
        return None;
    }
    let category = columns
        .category
        .and_then(|index| record.get(index))
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .unwrap_or(DEFAULT_IMPORT_CATEGORY);

    Some(ImportedRow {
        date,
        description: description.to_string(),
        amount,
        category: category.to_string(),
    })
}
