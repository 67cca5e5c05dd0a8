//! Reporting API endpoints

use api_types::report::{CategoryTotalView, DailyPointView, ReportQuery, ReportView, TotalsView};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState, transactions::filter_kind};
use engine::{
    Transaction, TransactionKind, UserIdentity,
    reports::{self, CategoryTotal, DailyPoint},
};

fn category_view(total: CategoryTotal) -> CategoryTotalView {
    CategoryTotalView {
        category: total.category,
        total: total.total.to_string(),
        color: total.color.to_string(),
    }
}

fn daily_view(point: DailyPoint) -> DailyPointView {
    DailyPointView {
        date: point.date,
        income: point.income.to_string(),
        expense: point.expense.to_string(),
        balance: point.balance.to_string(),
    }
}

/// Aggregates the filtered ledger window into totals, per-category
/// breakdowns and a daily series.
pub async fn summary(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportView>, ServerError> {
    let filter = engine::TransactionListFilter {
        kind: filter_kind(query.kind),
        start_date: query.start_date,
        end_date: query.end_date,
        page_size: Some(engine::MAX_PAGE_SIZE),
    };

    let records = state
        .engine
        .list_transactions(&query.ambiente_id, &user.uid, &filter)
        .await?;
    let transactions: Vec<Transaction> = records
        .into_iter()
        .map(|record| record.transaction)
        .collect();

    let totals = reports::totals(&transactions);

    Ok(Json(ReportView {
        totals: TotalsView {
            income: totals.income.to_string(),
            expense: totals.expense.to_string(),
            balance: totals.balance.to_string(),
        },
        expense_by_category: reports::category_breakdown(&transactions, TransactionKind::Expense)
            .into_iter()
            .map(category_view)
            .collect(),
        income_by_category: reports::category_breakdown(&transactions, TransactionKind::Income)
            .into_iter()
            .map(category_view)
            .collect(),
        daily: reports::daily_series(&transactions)
            .into_iter()
            .map(daily_view)
            .collect(),
    }))
}
