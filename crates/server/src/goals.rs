//! Savings goal API endpoints

use api_types::goal::{GoalDeposit, GoalListResponse, GoalNew, GoalQuery, GoalView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::{Goal, MoneyCents, UserIdentity};

fn goal_view(goal: Goal) -> GoalView {
    GoalView {
        id: goal.id,
        ambiente_id: goal.environment_id,
        name: goal.name,
        target_amount: goal.target.to_string(),
        current_amount: goal.current.to_string(),
        owner_id: goal.owner_id,
        created_at: goal.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Query(query): Query<GoalQuery>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let goals = state
        .engine
        .list_goals(&query.ambiente_id, &user.uid)
        .await?;

    Ok(Json(GoalListResponse {
        goals: goals.into_iter().map(goal_view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let target = payload.target_amount.parse::<MoneyCents>()?;
    let goal = state
        .engine
        .create_goal(&payload.ambiente_id, &payload.name, target, &user.uid)
        .await?;

    Ok((StatusCode::CREATED, Json(goal_view(goal))))
}

pub async fn deposit(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<GoalDeposit>,
) -> Result<Json<GoalView>, ServerError> {
    let amount = payload.amount.parse::<MoneyCents>()?;
    let goal = state
        .engine
        .deposit_to_goal(&id, amount, &payload.ambiente_id, &user.uid)
        .await?;

    Ok(Json(goal_view(goal)))
}

pub async fn remove(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(&id, &user.uid).await?;
    Ok(StatusCode::NO_CONTENT)
}
