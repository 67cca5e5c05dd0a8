use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use auth::{AuthError, HttpIdentityProvider, IdentityProvider};
pub use server::{ServerState, app, run, run_with_listener, spawn_with_listener};

mod auth;
mod environments;
mod goals;
mod invites;
mod reports;
mod server;
mod transactions;
mod user;

pub mod types {
    pub mod user {
        pub use api_types::user::{ProfileUpdate, ProfileView};
    }

    pub mod environment {
        pub use api_types::environment::{
            AmbienteNew, AmbienteSummary, AmbienteUpdate, AmbienteView, MemberView, RemoveMember,
        };
    }

    pub mod transaction {
        pub use api_types::transaction::{
            BatchImport, BatchImported, TransactionKind, TransactionListQuery,
            TransactionListResponse, TransactionNew, TransactionUpdate, TransactionView,
            TypeFilter,
        };
    }

    pub mod goal {
        pub use api_types::goal::{GoalDeposit, GoalListResponse, GoalNew, GoalQuery, GoalView};
    }

    pub mod invite {
        pub use api_types::invite::{
            InviteAccepted, InviteListResponse, InviteNew, InvitePreviewView, InviteView,
        };
    }

    pub mod report {
        pub use api_types::report::{ReportQuery, ReportView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Identity(AuthError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Conflict(_)
        | EngineError::InvalidState(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Identity(err) => {
                tracing::error!("identity provider error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Identity(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_400() {
        let res = ServerError::from(EngineError::Conflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_invalid_state_maps_to_400() {
        let res = ServerError::from(EngineError::InvalidState("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "boom".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn identity_error_maps_to_500() {
        let res = ServerError::from(AuthError::Upstream("down".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
