//! Environment invites.
//!
//! An invite is addressed to an email, not a UID, so it can be sent before
//! the recipient ever signed in. The recipient email is stored lowercased
//! and matched case-insensitively. Status only ever moves
//! `pending -> accepted`; there is no reject or expire transition.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InviteStatus {
    Pending,
    Accepted,
}

impl InviteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

impl TryFrom<&str> for InviteStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            other => Err(EngineError::InvalidState(format!(
                "invalid invite status: {other}"
            ))),
        }
    }
}

/// A pending or accepted invitation into an environment.
///
/// Sender name and environment name are denormalized at send time so the
/// invite stays presentable even if the sender later renames things.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invite {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub recipient_email: String,
    pub environment_id: String,
    pub environment_name: String,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl Invite {
    pub fn new(
        sender_id: &str,
        sender_name: &str,
        recipient_email: &str,
        environment_id: &str,
        environment_name: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            recipient_email: recipient_email.trim().to_lowercase(),
            environment_id: environment_id.to_string(),
            environment_name: environment_name.to_string(),
            status: InviteStatus::Pending,
            created_at: Utc::now(),
            accepted_at: None,
        }
    }

    /// Whether this invite is addressed to the given email.
    pub fn addressed_to(&self, email: &str) -> bool {
        self.recipient_email == email.trim().to_lowercase()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub recipient_email: String,
    pub environment_id: String,
    pub environment_name: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub accepted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Invite> for ActiveModel {
    fn from(invite: &Invite) -> Self {
        Self {
            id: ActiveValue::Set(invite.id.clone()),
            sender_id: ActiveValue::Set(invite.sender_id.clone()),
            sender_name: ActiveValue::Set(invite.sender_name.clone()),
            recipient_email: ActiveValue::Set(invite.recipient_email.clone()),
            environment_id: ActiveValue::Set(invite.environment_id.clone()),
            environment_name: ActiveValue::Set(invite.environment_name.clone()),
            status: ActiveValue::Set(invite.status.as_str().to_string()),
            created_at: ActiveValue::Set(invite.created_at),
            accepted_at: ActiveValue::Set(invite.accepted_at),
        }
    }
}

impl TryFrom<Model> for Invite {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            sender_id: model.sender_id,
            sender_name: model.sender_name,
            recipient_email: model.recipient_email,
            environment_id: model.environment_id,
            environment_name: model.environment_name,
            status: InviteStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            accepted_at: model.accepted_at,
        })
    }
}
