use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{
    CreateTransactionCmd, EngineError, ResultEngine, Transaction, TransactionKind,
    TransactionRecord, UpdateTransactionCmd, import::ImportedRow, transactions,
};

use super::{Engine, normalize_optional_text, with_tx};

pub const DEFAULT_PAGE_SIZE: u64 = 1000;
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Placeholder when a creator uid no longer resolves to a profile.
const UNKNOWN_USER: &str = "unknown user";

/// Filters for listing ledger entries.
///
/// Date bounds are inclusive calendar days. Page size defaults to
/// [`DEFAULT_PAGE_SIZE`] and is capped at [`MAX_PAGE_SIZE`].
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    /// If present, restricts results to a single kind.
    pub kind: Option<TransactionKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page_size: Option<u64>,
}

fn effective_page_size(filter: &TransactionListFilter) -> ResultEngine<u64> {
    match filter.page_size {
        Some(0) => Err(EngineError::InvalidArgument(
            "page size must be > 0".to_string(),
        )),
        Some(size) => Ok(size.min(MAX_PAGE_SIZE)),
        None => Ok(DEFAULT_PAGE_SIZE),
    }
}

impl Engine {
    /// Records a ledger entry in an environment the user belongs to.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<TransactionRecord> {
        let description = cmd.description.trim().to_string();
        if description.is_empty() {
            return Err(EngineError::InvalidArgument(
                "transaction description must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, &cmd.environment_id, &cmd.user_id)
                .await?;

            let transaction = Transaction::new(
                cmd.environment_id.clone(),
                description,
                cmd.amount,
                cmd.kind,
                normalize_optional_text(cmd.category.as_deref()),
                cmd.entry_date,
                cmd.user_id.clone(),
            )?;
            transactions::ActiveModel::from(&transaction)
                .insert(&db_tx)
                .await?;

            let added_by_name = self
                .find_profile(&db_tx, &cmd.user_id)
                .await?
                .map(|profile| profile.display_name)
                .unwrap_or_else(|| UNKNOWN_USER.to_string());
            Ok(TransactionRecord {
                transaction,
                added_by_name,
            })
        })
    }

    /// Lists an environment's ledger, newest entry date first with creation
    /// time as tie-break. Member-only. Creator names are resolved in one
    /// batch; a uid without a profile reads as "unknown user".
    pub async fn list_transactions(
        &self,
        environment_id: &str,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<TransactionRecord>> {
        let limit = effective_page_size(filter)?;
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, environment_id, user_id).await?;

            let mut query = transactions::Entity::find()
                .filter(transactions::Column::EnvironmentId.eq(environment_id.to_string()))
                .order_by_desc(transactions::Column::EntryDate)
                .order_by_desc(transactions::Column::CreatedAt)
                .limit(limit);
            if let Some(kind) = filter.kind {
                query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
            }
            if let Some(start) = filter.start_date {
                query = query.filter(transactions::Column::EntryDate.gte(start));
            }
            if let Some(end) = filter.end_date {
                query = query.filter(transactions::Column::EntryDate.lte(end));
            }

            let rows = query.all(&db_tx).await?;
            let mut uids: Vec<String> = rows.iter().map(|row| row.added_by.clone()).collect();
            uids.sort();
            uids.dedup();
            let names = self.display_names(&db_tx, &uids).await?;

            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                let transaction = Transaction::try_from(row)?;
                let added_by_name = names
                    .get(&transaction.added_by)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_USER.to_string());
                out.push(TransactionRecord {
                    transaction,
                    added_by_name,
                });
            }
            Ok(out)
        })
    }

    /// Applies the set fields of `cmd` to a stored entry. The acting user
    /// must be a member of the entry's environment, not of some environment
    /// named by the client.
    pub async fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<TransactionRecord> {
        if cmd.description.is_none()
            && cmd.amount.is_none()
            && cmd.kind.is_none()
            && cmd.category.is_none()
            && cmd.entry_date.is_none()
        {
            return Err(EngineError::InvalidArgument(
                "no transaction fields to update".to_string(),
            ));
        }
        if let Some(amount) = cmd.amount
            && !amount.is_positive()
        {
            return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
        }
        if let Some(description) = &cmd.description
            && description.trim().is_empty()
        {
            return Err(EngineError::InvalidArgument(
                "transaction description must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let stored = self
                .require_transaction(&db_tx, &cmd.transaction_id)
                .await?;
            self.require_member(&db_tx, &stored.environment_id, &cmd.user_id)
                .await?;

            let mut active = transactions::ActiveModel {
                id: ActiveValue::Set(stored.id.clone()),
                ..Default::default()
            };
            if let Some(description) = &cmd.description {
                active.description = ActiveValue::Set(description.trim().to_string());
            }
            if let Some(amount) = cmd.amount {
                active.amount_minor = ActiveValue::Set(amount.cents());
            }
            if let Some(kind) = cmd.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if let Some(category) = cmd.category.as_deref() {
                active.category = ActiveValue::Set(normalize_optional_text(Some(category)));
            }
            if let Some(entry_date) = cmd.entry_date {
                active.entry_date = ActiveValue::Set(entry_date);
            }
            let updated = active.update(&db_tx).await?;

            let transaction = Transaction::try_from(updated)?;
            let added_by_name = self
                .find_profile(&db_tx, &transaction.added_by)
                .await?
                .map(|profile| profile.display_name)
                .unwrap_or_else(|| UNKNOWN_USER.to_string());
            Ok(TransactionRecord {
                transaction,
                added_by_name,
            })
        })
    }

    /// Deletes a ledger entry. Member-only, same scoping as update.
    pub async fn delete_transaction(
        &self,
        transaction_id: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let stored = self.require_transaction(&db_tx, transaction_id).await?;
            self.require_member(&db_tx, &stored.environment_id, user_id)
                .await?;
            transactions::Entity::delete_by_id(stored.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Inserts a parsed import batch as expense entries, all or nothing.
    ///
    /// Every row lands as `expense` with the amount's magnitude; the source
    /// sign is discarded. Returns the number of entries written.
    pub async fn import_transactions(
        &self,
        environment_id: &str,
        user_id: &str,
        rows: &[ImportedRow],
    ) -> ResultEngine<usize> {
        if rows.is_empty() {
            return Err(EngineError::InvalidArgument(
                "no transactions to import".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, environment_id, user_id).await?;
            for row in rows {
                let transaction = Transaction::new(
                    environment_id.to_string(),
                    row.description.clone(),
                    row.amount.abs(),
                    TransactionKind::Expense,
                    Some(row.category.clone()),
                    row.date,
                    user_id.to_string(),
                )?;
                transactions::ActiveModel::from(&transaction)
                    .insert(&db_tx)
                    .await?;
            }
            Ok(rows.len())
        })
    }
}
