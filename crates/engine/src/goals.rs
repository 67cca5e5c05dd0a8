//! Savings goals.
//!
//! A goal's balance only ever grows: deposits are the single mutation path
//! and each one also writes a linked ledger entry. There is no withdraw
//! operation, so a goal can be deleted only while its balance is zero.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Category given to the ledger entries that mirror goal deposits.
pub const GOAL_DEPOSIT_CATEGORY: &str = "Goals";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    pub id: String,
    pub environment_id: String,
    pub name: String,
    pub target: MoneyCents,
    pub current: MoneyCents,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        environment_id: String,
        name: String,
        target: MoneyCents,
        owner_id: &str,
    ) -> ResultEngine<Self> {
        if !target.is_positive() {
            return Err(EngineError::InvalidAmount(
                "target amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            environment_id,
            name,
            target,
            current: MoneyCents::ZERO,
            owner_id: owner_id.to_string(),
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub environment_id: String,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub owner_id: String,
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

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.clone()),
            environment_id: ActiveValue::Set(goal.environment_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            target_minor: ActiveValue::Set(goal.target.cents()),
            current_minor: ActiveValue::Set(goal.current.cents()),
            owner_id: ActiveValue::Set(goal.owner_id.clone()),
            created_at: ActiveValue::Set(goal.created_at),
        }
    }
}

impl From<Model> for Goal {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            environment_id: model.environment_id,
            name: model.name,
            target: MoneyCents::new(model.target_minor),
            current: MoneyCents::new(model.current_minor),
            owner_id: model.owner_id,
            created_at: model.created_at,
        }
    }
}
