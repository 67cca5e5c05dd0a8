use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};

use crate::{
    EngineError, GOAL_DEPOSIT_CATEGORY, Goal, MoneyCents, ResultEngine, Transaction,
    TransactionKind, goals, transactions,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Lists an environment's goals, newest first. Member-only.
    pub async fn list_goals(
        &self,
        environment_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<Goal>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, environment_id, user_id).await?;
            let rows = goals::Entity::find()
                .filter(goals::Column::EnvironmentId.eq(environment_id.to_string()))
                .order_by_desc(goals::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(rows.into_iter().map(Goal::from).collect())
        })
    }

    /// Creates a savings goal in an environment the user belongs to.
    pub async fn create_goal(
        &self,
        environment_id: &str,
        name: &str,
        target: MoneyCents,
        user_id: &str,
    ) -> ResultEngine<Goal> {
        let name = normalize_required_name(name, "goal")?;
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, environment_id, user_id).await?;
            let goal = Goal::new(environment_id.to_string(), name, target, user_id)?;
            goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Adds funds to a goal and records the matching expense entry.
    ///
    /// The balance bump is a database-side increment, so two concurrent
    /// deposits never lose an update. The emitted transaction carries the
    /// goal id and the "Goals" category, dated today (UTC). Returns the
    /// updated goal.
    pub async fn deposit_to_goal(
        &self,
        goal_id: &str,
        amount: MoneyCents,
        environment_id: &str,
        user_id: &str,
    ) -> ResultEngine<Goal> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "deposit amount must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let stored = self.require_goal(&db_tx, goal_id).await?;
            self.require_member(&db_tx, &stored.environment_id, user_id)
                .await?;
            if stored.environment_id != environment_id {
                return Err(EngineError::InvalidArgument(
                    "goal does not belong to this environment".to_string(),
                ));
            }

            let backend = self.database.get_database_backend();
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "UPDATE goals SET current_minor = current_minor + ? WHERE id = ?;",
                    vec![amount.cents().into(), stored.id.clone().into()],
                ))
                .await?;

            let mut transaction = Transaction::new(
                stored.environment_id.clone(),
                format!("Goal deposit: {}", stored.name),
                amount,
                TransactionKind::Expense,
                Some(GOAL_DEPOSIT_CATEGORY.to_string()),
                Utc::now().date_naive(),
                user_id.to_string(),
            )?;
            transaction.related_goal_id = Some(stored.id.clone());
            transactions::ActiveModel::from(&transaction)
                .insert(&db_tx)
                .await?;

            let updated = self.require_goal(&db_tx, goal_id).await?;
            Ok(Goal::from(updated))
        })
    }

    /// Deletes a goal. Member-only; refused while the goal still holds
    /// funds, since there is no withdraw operation to drain it first.
    pub async fn delete_goal(&self, goal_id: &str, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let stored = self.require_goal(&db_tx, goal_id).await?;
            self.require_member(&db_tx, &stored.environment_id, user_id)
                .await?;
            if stored.current_minor > 0 {
                return Err(EngineError::Conflict("goal still has funds".to_string()));
            }
            goals::Entity::delete_by_id(stored.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
