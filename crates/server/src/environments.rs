//! Environment API endpoints
//!
//! The public path segment keeps the "ambientes" naming the clients were
//! built against; everything behind it says "environment".

use api_types::environment::{
    AmbienteNew, AmbienteSummary, AmbienteUpdate, AmbienteView, MemberView, RemoveMember,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::{EnvironmentSummary, Profile, UserIdentity};

pub(crate) fn summary_view(summary: EnvironmentSummary) -> AmbienteSummary {
    AmbienteSummary {
        id: summary.id,
        name: summary.name,
    }
}

fn member_view(profile: Profile) -> MemberView {
    MemberView {
        uid: profile.uid,
        display_name: profile.display_name,
        email: profile.email,
        photo_url: profile.photo_url,
    }
}

pub async fn create(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Json(payload): Json<AmbienteNew>,
) -> Result<(StatusCode, Json<AmbienteSummary>), ServerError> {
    let summary = state.engine.create_environment(&payload.name, &user).await?;
    Ok((StatusCode::CREATED, Json(summary_view(summary))))
}

pub async fn detail(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AmbienteView>, ServerError> {
    let (environment, members) = state.engine.environment_detail(&id, &user.uid).await?;

    Ok(Json(AmbienteView {
        id: environment.id,
        name: environment.name,
        owner_id: environment.owner_id,
        members: members.into_iter().map(member_view).collect(),
        created_at: environment.created_at,
    }))
}

pub async fn rename(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AmbienteUpdate>,
) -> Result<Json<AmbienteSummary>, ServerError> {
    let summary = state
        .engine
        .rename_environment(&id, &payload.name, &user.uid)
        .await?;
    Ok(Json(summary_view(summary)))
}

pub async fn remove_member(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RemoveMember>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_member(&id, &payload.uid, &user.uid)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
