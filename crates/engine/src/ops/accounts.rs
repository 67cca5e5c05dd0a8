use sea_orm::{TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, environment_members, users};

use super::{Engine, with_tx};

impl Engine {
    /// Removes a user's stored data in one transaction.
    ///
    /// An owner must be the last member left; their environment goes with
    /// them. A plain member just drops their membership row. A missing
    /// profile is a no-op, so a retried deletion does not fail.
    pub async fn delete_account(&self, uid: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let Some(profile) = self.find_profile(&db_tx, uid).await? else {
                return Ok(());
            };

            if let Some(environment_id) = &profile.environment_id
                && let Some(environment) = self.find_environment(&db_tx, environment_id).await?
            {
                if environment.owner_id == uid {
                    if self.member_count(&db_tx, environment_id).await? > 1 {
                        return Err(EngineError::Conflict(
                            "remove other members first".to_string(),
                        ));
                    }
                    self.delete_environment_cascade(&db_tx, environment_id)
                        .await?;
                } else {
                    environment_members::Entity::delete_by_id((
                        environment_id.clone(),
                        uid.to_string(),
                    ))
                    .exec(&db_tx)
                    .await?;
                }
            }

            users::Entity::delete_by_id(uid.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
