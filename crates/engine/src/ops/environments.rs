use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, Statement, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Environment, Profile, ResultEngine, UserIdentity, environment_members,
    environments, environments::EnvironmentSummary, users,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Create an environment with the requester as sole member and owner.
    ///
    /// Fails with [`EngineError::Conflict`] when the user already belongs to
    /// an environment; there is no implicit migration on this path.
    pub async fn create_environment(
        &self,
        name: &str,
        identity: &UserIdentity,
    ) -> ResultEngine<EnvironmentSummary> {
        let name = normalize_required_name(name, "environment")?;
        with_tx!(self, |db_tx| {
            if let Some(profile) = self.find_profile(&db_tx, &identity.uid).await?
                && profile.environment_id.is_some()
            {
                return Err(EngineError::Conflict(
                    "user already belongs to an environment".to_string(),
                ));
            }

            let environment = Environment::new(name, &identity.uid);
            environments::ActiveModel::from(&environment)
                .insert(&db_tx)
                .await?;
            self.attach_member(&db_tx, &environment.id, &identity.uid)
                .await?;
            self.upsert_profile_environment(&db_tx, identity, &environment.id)
                .await?;

            Ok(environment.summary())
        })
    }

    /// Environment plus its member profiles in join order (member-only).
    pub async fn environment_detail(
        &self,
        environment_id: &str,
        user_id: &str,
    ) -> ResultEngine<(Environment, Vec<Profile>)> {
        with_tx!(self, |db_tx| {
            let model = self.require_member(&db_tx, environment_id, user_id).await?;
            let rows = self.member_rows(&db_tx, environment_id).await?;
            let uids: Vec<String> = rows.iter().map(|row| row.user_id.clone()).collect();

            let profiles = users::Entity::find()
                .filter(users::Column::Uid.is_in(uids.clone()))
                .all(&db_tx)
                .await?;
            let members = uids
                .iter()
                .filter_map(|uid| {
                    profiles
                        .iter()
                        .find(|profile| &profile.uid == uid)
                        .cloned()
                        .map(Profile::from)
                })
                .collect();

            Ok((Environment::from(model), members))
        })
    }

    /// Rename an environment (owner-only).
    pub async fn rename_environment(
        &self,
        environment_id: &str,
        name: &str,
        user_id: &str,
    ) -> ResultEngine<EnvironmentSummary> {
        let name = normalize_required_name(name, "environment")?;
        with_tx!(self, |db_tx| {
            let model = self.require_owner(&db_tx, environment_id, user_id).await?;
            let mut active: environments::ActiveModel = model.into();
            active.name = ActiveValue::Set(name);
            let updated = active.update(&db_tx).await?;
            Ok(EnvironmentSummary {
                id: updated.id,
                name: updated.name,
            })
        })
    }

    /// Remove a member (owner-only). The owner cannot remove themself;
    /// account deletion and invite migration are the ways out.
    pub async fn remove_member(
        &self,
        environment_id: &str,
        target_uid: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_owner(&db_tx, environment_id, user_id).await?;
            if target_uid == user_id {
                return Err(EngineError::InvalidArgument(
                    "owner cannot remove themself from the environment".to_string(),
                ));
            }
            if !self.is_member(&db_tx, environment_id, target_uid).await? {
                return Err(EngineError::KeyNotFound("member not exists".to_string()));
            }

            environment_members::Entity::delete_by_id((
                environment_id.to_string(),
                target_uid.to_string(),
            ))
            .exec(&db_tx)
            .await?;

            // Clear the pointer only when it still references this environment.
            if let Some(profile) = self.find_profile(&db_tx, target_uid).await?
                && profile.environment_id.as_deref() == Some(environment_id)
            {
                let mut active: users::ActiveModel = profile.into();
                active.environment_id = ActiveValue::Set(None);
                active.update(&db_tx).await?;
            }

            Ok(())
        })
    }

    /// Idempotent union-add of a member.
    pub(super) async fn attach_member(
        &self,
        db_tx: &DatabaseTransaction,
        environment_id: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        if self.is_member(db_tx, environment_id, user_id).await? {
            return Ok(());
        }
        let membership = environment_members::ActiveModel {
            environment_id: ActiveValue::Set(environment_id.to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
            joined_at: ActiveValue::Set(Utc::now()),
        };
        membership.insert(db_tx).await?;
        Ok(())
    }

    /// Detach a user from an environment they are leaving.
    ///
    /// This is the migration side effect of invite acceptance, kept as its
    /// own step so it can be tested in isolation. Rules:
    /// - the membership row is removed;
    /// - an environment left with zero members is deleted outright;
    /// - when the departing user owned it, ownership passes to the
    ///   earliest-joined remaining member.
    pub(super) async fn detach_from_environment(
        &self,
        db_tx: &DatabaseTransaction,
        environment_id: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        environment_members::Entity::delete_by_id((
            environment_id.to_string(),
            user_id.to_string(),
        ))
        .exec(db_tx)
        .await?;

        let Some(model) = self.find_environment(db_tx, environment_id).await? else {
            return Ok(());
        };

        let remaining = self.member_rows(db_tx, environment_id).await?;
        match remaining.first() {
            None => self.delete_environment_cascade(db_tx, environment_id).await,
            Some(next) if model.owner_id == user_id => {
                let mut active: environments::ActiveModel = model.into();
                active.owner_id = ActiveValue::Set(next.user_id.clone());
                active.update(db_tx).await?;
                Ok(())
            }
            Some(_) => Ok(()),
        }
    }

    /// Delete an environment together with its ledger, goals, and
    /// memberships, in one transaction.
    pub(super) async fn delete_environment_cascade(
        &self,
        db_tx: &DatabaseTransaction,
        environment_id: &str,
    ) -> ResultEngine<()> {
        // Not every relationship declares ON DELETE CASCADE, so delete
        // explicitly, children first.
        let backend = self.database.get_database_backend();
        for table in ["transactions", "goals", "environment_members"] {
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    format!("DELETE FROM {table} WHERE environment_id = ?;"),
                    vec![environment_id.into()],
                ))
                .await?;
        }
        db_tx
            .execute(Statement::from_sql_and_values(
                backend,
                "DELETE FROM environments WHERE id = ?;",
                vec![environment_id.into()],
            ))
            .await?;
        Ok(())
    }
}
