use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Invite, InviteStatus, ResultEngine, UserIdentity,
    environments::EnvironmentSummary, invites,
};

use super::{Engine, normalize_email, with_tx};

/// Read-only answer to "what happens if I accept this invite?".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvitePreview {
    pub invite: Invite,
    pub current_environment: Option<EnvironmentSummary>,
    pub will_leave_current: bool,
}

/// Outcome of a successful acceptance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InviteAcceptance {
    pub environment: EnvironmentSummary,
    pub left_environment_id: Option<String>,
}

impl Engine {
    /// Send an invite to an email address. The sender must belong to an
    /// environment; sender name and environment name are denormalized into
    /// the invite at this point.
    pub async fn create_invite(
        &self,
        recipient_email: &str,
        sender_uid: &str,
    ) -> ResultEngine<Invite> {
        let recipient_email = normalize_email(recipient_email)?;
        with_tx!(self, |db_tx| {
            let sender = self.require_profile(&db_tx, sender_uid).await?;
            let environment_id = sender.environment_id.ok_or_else(|| {
                EngineError::InvalidArgument(
                    "sender does not belong to an environment".to_string(),
                )
            })?;
            let environment = self.require_environment(&db_tx, &environment_id).await?;

            let invite = Invite::new(
                sender_uid,
                &sender.display_name,
                &recipient_email,
                &environment.id,
                &environment.name,
            );
            invites::ActiveModel::from(&invite).insert(&db_tx).await?;
            Ok(invite)
        })
    }

    /// Pending invites addressed to the given email, newest first.
    pub async fn invites_for_email(&self, email: &str) -> ResultEngine<Vec<Invite>> {
        let email = normalize_email(email)?;
        with_tx!(self, |db_tx| {
            let rows = invites::Entity::find()
                .filter(invites::Column::RecipientEmail.eq(email))
                .filter(invites::Column::Status.eq(InviteStatus::Pending.as_str()))
                .order_by_desc(invites::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            rows.into_iter().map(Invite::try_from).collect()
        })
    }

    /// Dry run of acceptance: tells the recipient whether joining means
    /// leaving their current environment. Mutates nothing.
    pub async fn preview_invite(
        &self,
        invite_id: &str,
        identity: &UserIdentity,
    ) -> ResultEngine<InvitePreview> {
        with_tx!(self, |db_tx| {
            let invite = self
                .require_invite_for(&db_tx, invite_id, &identity.email)
                .await?;

            let current_environment = match self.find_profile(&db_tx, &identity.uid).await? {
                Some(profile) => match profile.environment_id {
                    Some(environment_id) => self
                        .find_environment(&db_tx, &environment_id)
                        .await?
                        .map(|model| EnvironmentSummary {
                            id: model.id,
                            name: model.name,
                        }),
                    None => None,
                },
                None => None,
            };

            let will_leave_current = current_environment
                .as_ref()
                .is_some_and(|current| current.id != invite.environment_id);

            Ok(InvitePreview {
                invite,
                current_environment,
                will_leave_current,
            })
        })
    }

    /// Accept an invite.
    ///
    /// Within one transaction: detach from the old environment when the
    /// invite targets a different one, union-add the membership, point the
    /// profile at the target, and mark the invite accepted. `accepted` is
    /// terminal; a second acceptance fails without touching anything.
    pub async fn accept_invite(
        &self,
        invite_id: &str,
        identity: &UserIdentity,
    ) -> ResultEngine<InviteAcceptance> {
        with_tx!(self, |db_tx| {
            let invite = self
                .require_invite_for(&db_tx, invite_id, &identity.email)
                .await?;
            let target = self
                .require_environment(&db_tx, &invite.environment_id)
                .await?;

            let previous = self
                .find_profile(&db_tx, &identity.uid)
                .await?
                .and_then(|profile| profile.environment_id)
                .filter(|environment_id| environment_id != &target.id);

            if let Some(environment_id) = &previous {
                self.detach_from_environment(&db_tx, environment_id, &identity.uid)
                    .await?;
            }
            self.attach_member(&db_tx, &target.id, &identity.uid).await?;
            self.upsert_profile_environment(&db_tx, identity, &target.id)
                .await?;

            let mut active = invites::ActiveModel {
                id: ActiveValue::Unchanged(invite.id.clone()),
                ..Default::default()
            };
            active.status = ActiveValue::Set(InviteStatus::Accepted.as_str().to_string());
            active.accepted_at = ActiveValue::Set(Some(Utc::now()));
            active.update(&db_tx).await?;

            Ok(InviteAcceptance {
                environment: EnvironmentSummary {
                    id: target.id,
                    name: target.name,
                },
                left_environment_id: previous,
            })
        })
    }

    /// Invite lookup scoped to the requester: an id that exists but is
    /// addressed to someone else reads as absent, and an already-accepted
    /// invite is rejected before any state is touched.
    async fn require_invite_for(
        &self,
        db_tx: &DatabaseTransaction,
        invite_id: &str,
        email: &str,
    ) -> ResultEngine<Invite> {
        let invite = invites::Entity::find_by_id(invite_id.to_string())
            .one(db_tx)
            .await?
            .map(Invite::try_from)
            .transpose()?
            .filter(|invite| invite.addressed_to(email))
            .ok_or_else(|| EngineError::KeyNotFound("invite not exists".to_string()))?;

        if invite.status == InviteStatus::Accepted {
            return Err(EngineError::InvalidState(
                "invite already accepted".to_string(),
            ));
        }
        Ok(invite)
    }
}
