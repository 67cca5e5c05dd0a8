//! Dashboard aggregation.
//!
//! Pure derivations over a transaction slice; nothing here touches the
//! database. Callers fetch a filtered list first and hand it over.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::{MoneyCents, Transaction, TransactionKind};

/// Label for entries without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Chart colors, assigned to categories by first appearance.
const PALETTE: [&str; 7] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#AF19FF", "#FF4560", "#775DD0",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: MoneyCents,
    pub expense: MoneyCents,
    /// Income minus expense; negative when spending outruns income.
    pub balance: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: MoneyCents,
    pub color: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub income: MoneyCents,
    pub expense: MoneyCents,
    pub balance: MoneyCents,
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();
    for tx in transactions {
        match tx.kind {
            TransactionKind::Income => totals.income += tx.amount,
            TransactionKind::Expense => totals.expense += tx.amount,
        }
    }
    totals.balance = totals.income - totals.expense;
    totals
}

/// Per-category sums for one kind, largest first.
///
/// Colors are handed out in first-seen order before sorting, so a
/// category keeps its color when its rank changes between requests.
pub fn category_breakdown(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> Vec<CategoryTotal> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, MoneyCents> = HashMap::new();
    for tx in transactions.iter().filter(|tx| tx.kind == kind) {
        let label = tx.category.as_deref().unwrap_or(UNCATEGORIZED);
        if !sums.contains_key(label) {
            order.push(label.to_string());
        }
        *sums.entry(label.to_string()).or_default() += tx.amount;
    }

    let mut out: Vec<CategoryTotal> = order
        .into_iter()
        .enumerate()
        .map(|(index, category)| CategoryTotal {
            color: PALETTE[index % PALETTE.len()],
            total: sums[&category],
            category,
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

/// Per-day income, expense and balance, oldest day first.
pub fn daily_series(transactions: &[Transaction]) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, (MoneyCents, MoneyCents)> = BTreeMap::new();
    for tx in transactions {
        let entry = days.entry(tx.entry_date).or_default();
        match tx.kind {
            TransactionKind::Income => entry.0 += tx.amount,
            TransactionKind::Expense => entry.1 += tx.amount,
        }
    }
    days.into_iter()
        .map(|(date, (income, expense))| DailyPoint {
            date,
            income,
            expense,
            balance: income - expense,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn tx(kind: TransactionKind, cents: i64, category: Option<&str>, day: &str) -> Transaction {
        Transaction::new(
            "e1".to_string(),
            "entry".to_string(),
            MoneyCents::new(cents),
            kind,
            category.map(str::to_string),
            date(day),
            "u1".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn totals_over_mixed_kinds() {
        let txs = vec![
            tx(TransactionKind::Income, 500_00, None, "2024-01-01"),
            tx(TransactionKind::Expense, 120_00, Some("Food"), "2024-01-02"),
            tx(TransactionKind::Expense, 80_00, Some("Food"), "2024-01-02"),
        ];
        let totals = totals(&txs);
        assert_eq!(totals.income, MoneyCents::new(500_00));
        assert_eq!(totals.expense, MoneyCents::new(200_00));
        assert_eq!(totals.balance, MoneyCents::new(300_00));
    }

    #[test]
    fn empty_slice_is_all_zero() {
        assert_eq!(totals(&[]), Totals::default());
        assert!(category_breakdown(&[], TransactionKind::Expense).is_empty());
        assert!(daily_series(&[]).is_empty());
    }

    #[test]
    fn breakdown_sorts_but_keeps_first_seen_colors() {
        let txs = vec![
            tx(TransactionKind::Expense, 10_00, Some("Food"), "2024-01-01"),
            tx(TransactionKind::Expense, 500_00, Some("Rent"), "2024-01-01"),
            tx(TransactionKind::Expense, 30_00, None, "2024-01-02"),
            tx(TransactionKind::Expense, 5_00, Some("Food"), "2024-01-03"),
            tx(TransactionKind::Income, 900_00, Some("Salary"), "2024-01-01"),
        ];
        let breakdown = category_breakdown(&txs, TransactionKind::Expense);
        let summary: Vec<(&str, i64, &str)> = breakdown
            .iter()
            .map(|entry| (entry.category.as_str(), entry.total.cents(), entry.color))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Rent", 500_00, "#00C49F"),
                ("Uncategorized", 30_00, "#FFBB28"),
                ("Food", 15_00, "#0088FE"),
            ]
        );
    }

    #[test]
    fn daily_series_ascends_and_balances() {
        let txs = vec![
            tx(TransactionKind::Expense, 50_00, None, "2024-01-02"),
            tx(TransactionKind::Income, 200_00, None, "2024-01-01"),
            tx(TransactionKind::Expense, 30_00, None, "2024-01-01"),
        ];
        let series = daily_series(&txs);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date("2024-01-01"));
        assert_eq!(series[0].balance, MoneyCents::new(170_00));
        assert_eq!(series[1].date, date("2024-01-02"));
        assert_eq!(series[1].expense, MoneyCents::new(50_00));
        assert_eq!(series[1].balance, MoneyCents::new(-50_00));
    }
}
