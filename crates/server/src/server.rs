use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{auth::IdentityProvider, environments, goals, invites, reports, transactions, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub identity: Arc<dyn IdentityProvider>,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // A missing header and a rejected token look the same to the client.
    let Some(TypedHeader(header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = state
        .identity
        .verify(header.token())
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/api/user/me", get(user::me))
        .route("/api/user/profile", put(user::update_profile))
        .route("/api/user", delete(user::delete_account))
        .route("/api/ambientes", post(environments::create))
        .route(
            "/api/ambientes/{id}",
            get(environments::detail).put(environments::rename),
        )
        .route(
            "/api/ambientes/{id}/remove-member",
            post(environments::remove_member),
        )
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/api/transactions/batch", post(transactions::import_batch))
        .route(
            "/api/transactions/{id}",
            put(transactions::update).delete(transactions::remove),
        )
        .route("/api/goals", get(goals::list).post(goals::create))
        .route("/api/goals/{id}/deposit", post(goals::deposit))
        .route("/api/goals/{id}", delete(goals::remove))
        .route("/api/invites", post(invites::create))
        .route("/api/invites/me", get(invites::list_mine))
        .route("/api/invites/{id}/preview", get(invites::preview))
        .route("/api/invites/{id}/accept", post(invites::accept))
        .route("/api/reports", get(reports::summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, identity: Arc<dyn IdentityProvider>) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, identity, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    identity: Arc<dyn IdentityProvider>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        identity,
    };

    axum::serve(listener, app(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    identity: Arc<dyn IdentityProvider>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, identity, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
