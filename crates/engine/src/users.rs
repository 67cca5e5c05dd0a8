//! User profiles.
//!
//! The primary key is the identity provider's UID. Everything else on the
//! profile is mutable; `environment_id` tracks the single environment the
//! user currently belongs to.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

/// Identity attested by the auth provider for the current request.
///
/// This is what the token verification yields; ops that may create a profile
/// on the fly (first login, invite acceptance) take it as input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserIdentity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Stored user profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub environment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Builds a fresh profile from a verified identity.
    pub fn from_identity(identity: &UserIdentity) -> Self {
        let display_name = identity
            .display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "New User".to_string());
        Self {
            uid: identity.uid.clone(),
            display_name,
            email: identity.email.clone(),
            photo_url: identity.photo_url.clone(),
            environment_id: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub environment_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Profile> for ActiveModel {
    fn from(profile: &Profile) -> Self {
        Self {
            uid: ActiveValue::Set(profile.uid.clone()),
            display_name: ActiveValue::Set(profile.display_name.clone()),
            email: ActiveValue::Set(profile.email.clone()),
            photo_url: ActiveValue::Set(profile.photo_url.clone()),
            environment_id: ActiveValue::Set(profile.environment_id.clone()),
            created_at: ActiveValue::Set(profile.created_at),
        }
    }
}

impl From<Model> for Profile {
    fn from(model: Model) -> Self {
        Self {
            uid: model.uid,
            display_name: model.display_name,
            email: model.email,
            photo_url: model.photo_url,
            environment_id: model.environment_id,
            created_at: model.created_at,
        }
    }
}
