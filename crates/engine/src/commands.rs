//! Command structs for engine operations.
//!
//! These types group parameters for ledger writes, keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;

use crate::{MoneyCents, TransactionKind};

/// Create a ledger entry.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub environment_id: String,
    pub description: String,
    pub amount: MoneyCents,
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub entry_date: NaiveDate,
    pub user_id: String,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        environment_id: impl Into<String>,
        user_id: impl Into<String>,
        description: impl Into<String>,
        amount: MoneyCents,
        kind: TransactionKind,
        entry_date: NaiveDate,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            description: description.into(),
            amount,
            kind,
            category: None,
            entry_date,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Update an existing ledger entry.
///
/// Unset fields are left untouched. A present but blank `category` clears
/// the stored category.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub transaction_id: String,
    pub user_id: String,

    pub description: Option<String>,
    pub amount: Option<MoneyCents>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub entry_date: Option<NaiveDate>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(transaction_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            user_id: user_id.into(),
            description: None,
            amount: None,
            kind: None,
            category: None,
            entry_date: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn entry_date(mut self, entry_date: NaiveDate) -> Self {
        self.entry_date = Some(entry_date);
        self
    }
}
