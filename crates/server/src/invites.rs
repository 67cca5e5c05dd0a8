//! Invitation API endpoints

use api_types::invite::{
    InviteAccepted, InviteListResponse, InviteNew, InvitePreviewView,
    InviteStatus as ApiStatus, InviteView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, environments::summary_view, server::ServerState};
use engine::{Invite, InviteStatus, UserIdentity};

fn map_status(status: InviteStatus) -> ApiStatus {
    match status {
        InviteStatus::Pending => ApiStatus::Pending,
        InviteStatus::Accepted => ApiStatus::Accepted,
    }
}

fn invite_view(invite: Invite) -> InviteView {
    InviteView {
        id: invite.id,
        sender_id: invite.sender_id,
        sender_name: invite.sender_name,
        recipient_email: invite.recipient_email,
        ambiente_id: invite.environment_id,
        ambiente_name: invite.environment_name,
        status: map_status(invite.status),
        created_at: invite.created_at,
        accepted_at: invite.accepted_at,
    }
}

pub async fn create(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Json(payload): Json<InviteNew>,
) -> Result<(StatusCode, Json<InviteView>), ServerError> {
    let invite = state.engine.create_invite(&payload.email, &user.uid).await?;
    Ok((StatusCode::CREATED, Json(invite_view(invite))))
}

/// Pending invites addressed to the caller's email.
pub async fn list_mine(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
) -> Result<Json<InviteListResponse>, ServerError> {
    let invites = state.engine.invites_for_email(&user.email).await?;
    Ok(Json(InviteListResponse {
        invites: invites.into_iter().map(invite_view).collect(),
    }))
}

pub async fn preview(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<InvitePreviewView>, ServerError> {
    let preview = state.engine.preview_invite(&id, &user).await?;

    Ok(Json(InvitePreviewView {
        invite: invite_view(preview.invite),
        current_ambiente: preview.current_environment.map(summary_view),
        will_leave_current: preview.will_leave_current,
    }))
}

pub async fn accept(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<InviteAccepted>, ServerError> {
    let acceptance = state.engine.accept_invite(&id, &user).await?;

    Ok(Json(InviteAccepted {
        ambiente: summary_view(acceptance.environment),
        left_ambiente_id: acceptance.left_environment_id,
    }))
}
