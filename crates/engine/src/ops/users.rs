use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    EngineError, Profile, ResultEngine, UserIdentity, environments::EnvironmentSummary, users,
};

use super::{Engine, normalize_optional_text, with_tx};

/// Profile plus the environment reference the dashboard boots from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub profile: Profile,
    pub environment: Option<EnvironmentSummary>,
}

impl ProfileSnapshot {
    /// The client routes to environment setup when this is `true`.
    pub fn needs_setup(&self) -> bool {
        self.environment.is_none()
    }
}

impl Engine {
    /// Resolve the profile behind a verified identity, creating it on first
    /// sight and keeping the stored photo in sync with the provider.
    ///
    /// A profile whose `environment_id` points at an environment that no
    /// longer exists is healed here: the stale reference is cleared instead
    /// of surfacing an error to the dashboard.
    pub async fn sync_profile(&self, identity: &UserIdentity) -> ResultEngine<ProfileSnapshot> {
        with_tx!(self, |db_tx| {
            let mut profile = match self.find_profile(&db_tx, &identity.uid).await? {
                None => {
                    let profile = Profile::from_identity(identity);
                    users::ActiveModel::from(&profile).insert(&db_tx).await?;
                    profile
                }
                Some(model) => {
                    let mut profile = Profile::from(model);
                    if identity.photo_url.is_some() && identity.photo_url != profile.photo_url {
                        let update = users::ActiveModel {
                            uid: ActiveValue::Unchanged(profile.uid.clone()),
                            photo_url: ActiveValue::Set(identity.photo_url.clone()),
                            ..Default::default()
                        };
                        update.update(&db_tx).await?;
                        profile.photo_url = identity.photo_url.clone();
                    }
                    profile
                }
            };

            let environment = match profile.environment_id.clone() {
                None => None,
                Some(environment_id) => {
                    match self.find_environment(&db_tx, &environment_id).await? {
                        Some(model) => Some(EnvironmentSummary {
                            id: model.id,
                            name: model.name,
                        }),
                        None => {
                            let update = users::ActiveModel {
                                uid: ActiveValue::Unchanged(profile.uid.clone()),
                                environment_id: ActiveValue::Set(None),
                                ..Default::default()
                            };
                            update.update(&db_tx).await?;
                            profile.environment_id = None;
                            None
                        }
                    }
                }
            };

            Ok(ProfileSnapshot {
                profile,
                environment,
            })
        })
    }

    /// Update display name and/or photo URL. A blank photo URL clears the
    /// stored one; a blank display name is rejected.
    pub async fn update_profile(
        &self,
        uid: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> ResultEngine<ProfileSnapshot> {
        if display_name.is_none() && photo_url.is_none() {
            return Err(EngineError::InvalidArgument(
                "no profile fields to update".to_string(),
            ));
        }

        let display_name = display_name
            .map(|name| {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(EngineError::InvalidArgument(
                        "display name must not be empty".to_string(),
                    ));
                }
                Ok(trimmed.to_string())
            })
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_profile(&db_tx, uid).await?;
            let mut active: users::ActiveModel = model.into();
            if let Some(name) = display_name {
                active.display_name = ActiveValue::Set(name);
            }
            if let Some(url) = photo_url {
                active.photo_url = ActiveValue::Set(normalize_optional_text(Some(url)));
            }
            let updated = active.update(&db_tx).await?;
            let profile = Profile::from(updated);

            let environment = match profile.environment_id.clone() {
                None => None,
                Some(environment_id) => self
                    .find_environment(&db_tx, &environment_id)
                    .await?
                    .map(|model| EnvironmentSummary {
                        id: model.id,
                        name: model.name,
                    }),
            };

            Ok(ProfileSnapshot {
                profile,
                environment,
            })
        })
    }

    /// Create the profile row if it is missing, then point it at the given
    /// environment. Used by the flows that may run before the first `/me`.
    pub(super) async fn upsert_profile_environment(
        &self,
        db_tx: &DatabaseTransaction,
        identity: &UserIdentity,
        environment_id: &str,
    ) -> ResultEngine<()> {
        match self.find_profile(db_tx, &identity.uid).await? {
            Some(model) => {
                let mut active: users::ActiveModel = model.into();
                active.environment_id = ActiveValue::Set(Some(environment_id.to_string()));
                active.update(db_tx).await?;
            }
            None => {
                let mut profile = Profile::from_identity(identity);
                profile.environment_id = Some(environment_id.to_string());
                users::ActiveModel::from(&profile).insert(db_tx).await?;
            }
        }
        Ok(())
    }
}
