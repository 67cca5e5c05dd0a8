//! Profile API endpoints

use api_types::user::{ProfileUpdate, ProfileView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, environments::summary_view, server::ServerState};
use engine::{ProfileSnapshot, UserIdentity};

fn profile_view(snapshot: ProfileSnapshot) -> ProfileView {
    let needs_setup = snapshot.needs_setup();
    ProfileView {
        uid: snapshot.profile.uid,
        display_name: snapshot.profile.display_name,
        email: snapshot.profile.email,
        photo_url: snapshot.profile.photo_url,
        ambiente: snapshot.environment.map(summary_view),
        needs_setup,
    }
}

/// Resolves the caller's profile, creating it on first sight.
pub async fn me(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
) -> Result<Json<ProfileView>, ServerError> {
    let snapshot = state.engine.sync_profile(&user).await?;
    Ok(Json(profile_view(snapshot)))
}

pub async fn update_profile(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<ProfileView>, ServerError> {
    let snapshot = state
        .engine
        .update_profile(
            &user.uid,
            payload.display_name.as_deref(),
            payload.photo_url.as_deref(),
        )
        .await?;
    Ok(Json(profile_view(snapshot)))
}

pub async fn delete_account(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(&user.uid).await?;

    // The provider call comes last: if it fails the identity still exists
    // and the next `/me` simply starts a fresh profile.
    state.identity.delete_user(&user.uid).await?;

    Ok(StatusCode::NO_CONTENT)
}
