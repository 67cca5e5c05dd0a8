use std::collections::HashMap;

use sea_orm::{DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{EngineError, ResultEngine, environment_members, environments, goals, transactions, users};

use super::Engine;

/// Generates a `require_*` lookup that fails with [`EngineError::KeyNotFound`]
/// when the row is absent.
macro_rules! impl_require_by_id {
    ($require_fn:ident, $entity:path, $model:path, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: &str,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_by_id!(
        require_environment,
        environments::Entity,
        environments::Model,
        "environment not exists"
    );

    impl_require_by_id!(
        require_transaction,
        transactions::Entity,
        transactions::Model,
        "transaction not exists"
    );

    impl_require_by_id!(
        require_goal,
        goals::Entity,
        goals::Model,
        "goal not exists"
    );

    impl_require_by_id!(
        require_profile,
        users::Entity,
        users::Model,
        "user not exists"
    );

    pub(super) async fn find_environment(
        &self,
        db: &DatabaseTransaction,
        environment_id: &str,
    ) -> ResultEngine<Option<environments::Model>> {
        environments::Entity::find_by_id(environment_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn find_profile(
        &self,
        db: &DatabaseTransaction,
        uid: &str,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find_by_id(uid.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn is_member(
        &self,
        db: &DatabaseTransaction,
        environment_id: &str,
        user_id: &str,
    ) -> ResultEngine<bool> {
        environment_members::Entity::find_by_id((
            environment_id.to_string(),
            user_id.to_string(),
        ))
        .one(db)
        .await
        .map(|row| row.is_some())
        .map_err(Into::into)
    }

    /// Membership is the authorization boundary for everything inside an
    /// environment, reads included.
    pub(super) async fn require_member(
        &self,
        db: &DatabaseTransaction,
        environment_id: &str,
        user_id: &str,
    ) -> ResultEngine<environments::Model> {
        let model = self.require_environment(db, environment_id).await?;
        if !self.is_member(db, environment_id, user_id).await? {
            return Err(EngineError::Forbidden(
                "user is not a member of this environment".to_string(),
            ));
        }
        Ok(model)
    }

    pub(super) async fn require_owner(
        &self,
        db: &DatabaseTransaction,
        environment_id: &str,
        user_id: &str,
    ) -> ResultEngine<environments::Model> {
        let model = self.require_environment(db, environment_id).await?;
        if model.owner_id != user_id {
            return Err(EngineError::Forbidden(
                "only the environment owner may do this".to_string(),
            ));
        }
        Ok(model)
    }

    /// Membership rows of an environment in join order.
    pub(super) async fn member_rows(
        &self,
        db: &DatabaseTransaction,
        environment_id: &str,
    ) -> ResultEngine<Vec<environment_members::Model>> {
        environment_members::Entity::find()
            .filter(environment_members::Column::EnvironmentId.eq(environment_id.to_string()))
            .order_by_asc(environment_members::Column::JoinedAt)
            .order_by_asc(environment_members::Column::UserId)
            .all(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn member_count(
        &self,
        db: &DatabaseTransaction,
        environment_id: &str,
    ) -> ResultEngine<u64> {
        environment_members::Entity::find()
            .filter(environment_members::Column::EnvironmentId.eq(environment_id.to_string()))
            .count(db)
            .await
            .map_err(Into::into)
    }

    /// Batch display-name lookup for listing enrichment. Missing profiles are
    /// simply absent from the map, never an error.
    pub(super) async fn display_names(
        &self,
        db: &DatabaseTransaction,
        uids: &[String],
    ) -> ResultEngine<HashMap<String, String>> {
        if uids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = users::Entity::find()
            .filter(users::Column::Uid.is_in(uids.iter().cloned()))
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|model| (model.uid, model.display_name))
            .collect())
    }
}
