//! The `Environment` is the shared namespace transactions and goals live in.
//! A user belongs to at most one environment at a time.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

/// Shared finance namespace with an explicit owner.
///
/// `owner_id` is the sole ownership authority; it always references a
/// current member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Environment {
    pub fn new(name: String, owner_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            owner_id: owner_id.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> EnvironmentSummary {
        EnvironmentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// The id/name pair handed back to clients that only need a reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentSummary {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "environments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::environment_members::Entity")]
    Members,
}

impl Related<super::environment_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Environment> for ActiveModel {
    fn from(env: &Environment) -> Self {
        Self {
            id: ActiveValue::Set(env.id.clone()),
            name: ActiveValue::Set(env.name.clone()),
            owner_id: ActiveValue::Set(env.owner_id.clone()),
            created_at: ActiveValue::Set(env.created_at),
        }
    }
}

impl From<Model> for Environment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            owner_id: model.owner_id,
            created_at: model.created_at,
        }
    }
}
