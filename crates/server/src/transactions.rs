//! Ledger API endpoints

use api_types::transaction::{
    BatchImport, BatchImported, TransactionKind as ApiKind, TransactionListQuery,
    TransactionListResponse, TransactionNew, TransactionUpdate, TransactionView, TypeFilter,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::{
    CreateTransactionCmd, MoneyCents, TransactionKind, TransactionRecord, UpdateTransactionCmd,
    UserIdentity, import,
};

fn map_kind(kind: TransactionKind) -> ApiKind {
    match kind {
        TransactionKind::Income => ApiKind::Income,
        TransactionKind::Expense => ApiKind::Expense,
    }
}

fn engine_kind(kind: ApiKind) -> TransactionKind {
    match kind {
        ApiKind::Income => TransactionKind::Income,
        ApiKind::Expense => TransactionKind::Expense,
    }
}

pub(crate) fn filter_kind(filter: TypeFilter) -> Option<TransactionKind> {
    match filter {
        TypeFilter::All => None,
        TypeFilter::Income => Some(TransactionKind::Income),
        TypeFilter::Expense => Some(TransactionKind::Expense),
    }
}

fn transaction_view(record: TransactionRecord) -> TransactionView {
    let tx = record.transaction;
    TransactionView {
        id: tx.id,
        ambiente_id: tx.environment_id,
        description: tx.description,
        amount: tx.amount.to_string(),
        kind: map_kind(tx.kind),
        category: tx.category,
        date: tx.entry_date,
        added_by: tx.added_by,
        added_by_name: record.added_by_name,
        related_goal_id: tx.related_goal_id,
        created_at: tx.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = engine::TransactionListFilter {
        kind: filter_kind(query.kind),
        start_date: query.start_date,
        end_date: query.end_date,
        page_size: query.page_size,
    };

    let records = state
        .engine
        .list_transactions(&query.ambiente_id, &user.uid, &filter)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: records.into_iter().map(transaction_view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let amount = payload.amount.parse::<MoneyCents>()?;
    let mut cmd = CreateTransactionCmd::new(
        payload.ambiente_id,
        user.uid,
        payload.description,
        amount,
        engine_kind(payload.kind),
        payload.date,
    );
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }

    let record = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(transaction_view(record))))
}

pub async fn update(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = UpdateTransactionCmd::new(id, user.uid);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(raw) = payload.amount {
        cmd = cmd.amount(raw.parse::<MoneyCents>()?);
    }
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(engine_kind(kind));
    }
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(date) = payload.date {
        cmd = cmd.entry_date(date);
    }

    let record = state.engine.update_transaction(cmd).await?;
    Ok(Json(transaction_view(record)))
}

pub async fn remove(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&id, &user.uid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn import_batch(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Json(payload): Json<BatchImport>,
) -> Result<(StatusCode, Json<BatchImported>), ServerError> {
    let rows = import::parse_rows(&payload.csv)?;
    let imported = state
        .engine
        .import_transactions(&payload.ambiente_id, &user.uid, &rows)
        .await?;

    Ok((StatusCode::CREATED, Json(BatchImported { imported })))
}
