//! Ledger records.
//!
//! A `Transaction` is a single income or expense entry scoped to an
//! environment. The stored amount is always a non-negative magnitude; the
//! sign is carried by the kind.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub environment_id: String,
    pub description: String,
    pub amount: MoneyCents,
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub entry_date: NaiveDate,
    pub added_by: String,
    pub related_goal_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        environment_id: String,
        description: String,
        amount: MoneyCents,
        kind: TransactionKind,
        category: Option<String>,
        entry_date: NaiveDate,
        added_by: String,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            environment_id,
            description,
            amount,
            kind,
            category,
            entry_date,
            added_by,
            related_goal_id: None,
            created_at: Utc::now(),
        })
    }
}

/// A ledger entry enriched with the creator's display name for listings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    pub transaction: Transaction,
    pub added_by_name: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub environment_id: String,
    pub description: String,
    pub amount_minor: i64,
    pub kind: String,
    pub category: Option<String>,
    pub entry_date: Date,
    pub added_by: String,
    pub related_goal_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::environments::Entity",
        from = "Column::EnvironmentId",
        to = "super::environments::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Environments,
}

impl Related<super::environments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Environments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.clone()),
            environment_id: ActiveValue::Set(tx.environment_id.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            category: ActiveValue::Set(tx.category.clone()),
            entry_date: ActiveValue::Set(tx.entry_date),
            added_by: ActiveValue::Set(tx.added_by.clone()),
            related_goal_id: ActiveValue::Set(tx.related_goal_id.clone()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            environment_id: model.environment_id,
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            kind: TransactionKind::try_from(model.kind.as_str())?,
            category: model.category,
            entry_date: model.entry_date,
            added_by: model.added_by,
            related_goal_id: model.related_goal_id,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn new_keeps_magnitude_and_kind() {
        let tx = Transaction::new(
            "e1".to_string(),
            "Market".to_string(),
            MoneyCents::new(4590),
            TransactionKind::Expense,
            Some("Food".to_string()),
            date("2024-01-05"),
            "u1".to_string(),
        )
        .unwrap();
        assert_eq!(tx.amount.cents(), 4590);
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.related_goal_id, None);
    }

    #[test]
    #[should_panic(expected = "amount must be > 0")]
    fn fail_new_with_zero_amount() {
        Transaction::new(
            "e1".to_string(),
            "Market".to_string(),
            MoneyCents::ZERO,
            TransactionKind::Expense,
            None,
            date("2024-01-05"),
            "u1".to_string(),
        )
        .unwrap();
    }

    #[test]
    #[should_panic(expected = "invalid transaction kind")]
    fn fail_parse_unknown_kind() {
        TransactionKind::try_from("transfer").unwrap();
    }
}
