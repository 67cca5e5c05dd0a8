use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, UserIdentity};
use migration::MigratorTrait;
use server::{AuthError, IdentityProvider, ServerState};

struct StubIdentity {
    tokens: HashMap<String, UserIdentity>,
    deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn verify(&self, token: &str) -> Result<UserIdentity, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }

    async fn delete_user(&self, uid: &str) -> Result<(), AuthError> {
        self.deleted.lock().unwrap().push(uid.to_string());
        Ok(())
    }
}

fn identity(uid: &str, email: &str) -> UserIdentity {
    UserIdentity {
        uid: uid.to_string(),
        email: email.to_string(),
        display_name: Some(format!("{uid} display")),
        photo_url: None,
    }
}

async fn test_app() -> (Router, Arc<StubIdentity>) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    let mut tokens = HashMap::new();
    tokens.insert("alice-token".to_string(), identity("alice", "alice@example.com"));
    tokens.insert("bob-token".to_string(), identity("bob", "bob@example.com"));
    tokens.insert(
        "mallory-token".to_string(),
        identity("mallory", "mallory@example.com"),
    );
    let stub = Arc::new(StubIdentity {
        tokens,
        deleted: Mutex::new(Vec::new()),
    });

    let state = ServerState {
        engine: Arc::new(engine),
        identity: stub.clone(),
    };
    (server::app(state), stub)
}

fn get(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn send_empty(method: Method, path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: Method, path: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_ambiente(app: &Router, token: &str, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            "/api/ambientes",
            token,
            &json!({ "name": name }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_a_valid_token_are_rejected() {
    let (app, _stub) = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/user/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/user/me", "wrong-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_bootstraps_a_profile() {
    let (app, _stub) = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/user/me", "alice-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["uid"], "alice");
    assert_eq!(body["displayName"], "alice display");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["needsSetup"], true);
    assert!(body["ambiente"].is_null());
}

#[tokio::test]
async fn environment_setup_flow() {
    let (app, _stub) = test_app().await;

    let ambiente_id = create_ambiente(&app, "alice-token", "Casa").await;

    let response = app
        .clone()
        .oneshot(get("/api/user/me", "alice-token"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["needsSetup"], false);
    assert_eq!(body["ambiente"]["name"], "Casa");

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            "/api/ambientes",
            "alice-token",
            &json!({ "name": "Outra" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Conflict: user already belongs to an environment");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/ambientes/{ambiente_id}"), "alice-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ownerId"], "alice");
    assert_eq!(body["members"].as_array().unwrap().len(), 1);
    assert_eq!(body["members"][0]["uid"], "alice");

    let response = app
        .clone()
        .oneshot(send_json(
            Method::PUT,
            &format!("/api/ambientes/{ambiente_id}"),
            "alice-token",
            &json!({ "name": "Lar" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Lar");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/ambientes/{ambiente_id}"), "mallory-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_update_over_http() {
    let (app, _stub) = test_app().await;
    create_ambiente(&app, "alice-token", "Casa").await;

    let response = app
        .clone()
        .oneshot(send_json(
            Method::PUT,
            "/api/user/profile",
            "alice-token",
            &json!({ "displayName": "Alice Prime", "photoUrl": "https://img.example/alice.png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["displayName"], "Alice Prime");
    assert_eq!(body["photoUrl"], "https://img.example/alice.png");
    assert_eq!(body["ambiente"]["name"], "Casa");

    let response = app
        .clone()
        .oneshot(send_json(
            Method::PUT,
            "/api/user/profile",
            "alice-token",
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn transaction_crud_over_http() {
    let (app, _stub) = test_app().await;
    let ambiente_id = create_ambiente(&app, "alice-token", "Casa").await;

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            "/api/transactions",
            "alice-token",
            &json!({
                "ambienteId": ambiente_id,
                "description": "Mercado",
                "amount": "45.90",
                "type": "expense",
                "category": "Food",
                "date": "2024-01-05",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["amount"], "45.90");
    assert_eq!(created["type"], "expense");
    assert_eq!(created["category"], "Food");
    assert_eq!(created["addedByName"], "alice display");
    let transaction_id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/transactions?ambienteId={ambiente_id}"),
            "alice-token",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/transactions?ambienteId={ambiente_id}&type=income"),
            "alice-token",
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(send_json(
            Method::PUT,
            &format!("/api/transactions/{transaction_id}"),
            "alice-token",
            &json!({ "amount": "50.00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["amount"], "50.00");
    assert_eq!(body["description"], "Mercado");

    let response = app
        .clone()
        .oneshot(send_empty(
            Method::DELETE,
            &format!("/api/transactions/{transaction_id}"),
            "alice-token",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/transactions?ambienteId={ambiente_id}"),
            "alice-token",
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            "/api/transactions",
            "alice-token",
            &json!({
                "ambienteId": ambiente_id,
                "description": "Mercado",
                "amount": "abc",
                "type": "expense",
                "date": "2024-01-05",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn batch_import_over_http() {
    let (app, _stub) = test_app().await;
    let ambiente_id = create_ambiente(&app, "alice-token", "Casa").await;

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            "/api/transactions/batch",
            "alice-token",
            &json!({
                "ambienteId": ambiente_id,
                "csv": "Date,Title,Amount\n2024-01-05,Market,-45.90\nbad,row,x\n",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["imported"], 1);

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/transactions?ambienteId={ambiente_id}"),
            "alice-token",
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let entries = body["transactions"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["description"], "Market");
    assert_eq!(entries[0]["amount"], "45.90");
    assert_eq!(entries[0]["type"], "expense");
    assert_eq!(entries[0]["category"], "Credit Card");
}

#[tokio::test]
async fn goal_lifecycle_over_http() {
    let (app, _stub) = test_app().await;
    let ambiente_id = create_ambiente(&app, "alice-token", "Casa").await;

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            "/api/goals",
            "alice-token",
            &json!({
                "ambienteId": ambiente_id,
                "name": "Viagem",
                "targetAmount": "5000.00",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Viagem");
    assert_eq!(created["targetAmount"], "5000.00");
    assert_eq!(created["currentAmount"], "0.00");
    let goal_id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            &format!("/api/goals/{goal_id}/deposit"),
            "alice-token",
            &json!({ "ambienteId": ambiente_id, "amount": "50.00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["currentAmount"], "50.00");

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/transactions?ambienteId={ambiente_id}"),
            "alice-token",
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let entries = body["transactions"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["description"], "Goal deposit: Viagem");
    assert_eq!(entries[0]["category"], "Goals");
    assert_eq!(entries[0]["relatedGoalId"], goal_id.as_str());

    let response = app
        .clone()
        .oneshot(send_empty(
            Method::DELETE,
            &format!("/api/goals/{goal_id}"),
            "alice-token",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Conflict: goal still has funds");

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/goals?ambienteId={ambiente_id}"),
            "alice-token",
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["goals"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invite_flow_over_http() {
    let (app, _stub) = test_app().await;
    let ambiente_id = create_ambiente(&app, "alice-token", "Casa").await;

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            "/api/invites",
            "alice-token",
            &json!({ "email": "bob@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["status"], "pending");
    assert_eq!(created["senderName"], "alice display");
    assert_eq!(created["ambienteName"], "Casa");
    let invite_id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get("/api/invites/me", "bob-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["invites"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/invites/{invite_id}/preview"), "bob-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["willLeaveCurrent"], false);
    assert!(body["currentAmbiente"].is_null());

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/invites/{invite_id}/preview"),
            "mallory-token",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(send_empty(
            Method::POST,
            &format!("/api/invites/{invite_id}/accept"),
            "bob-token",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ambiente"]["name"], "Casa");
    assert!(body["leftAmbienteId"].is_null());

    let response = app
        .clone()
        .oneshot(get("/api/user/me", "bob-token"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["needsSetup"], false);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/ambientes/{ambiente_id}"), "bob-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["members"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn remove_member_over_http() {
    let (app, _stub) = test_app().await;
    let ambiente_id = create_ambiente(&app, "alice-token", "Casa").await;

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            "/api/invites",
            "alice-token",
            &json!({ "email": "bob@example.com" }),
        ))
        .await
        .unwrap();
    let invite_id = body_json(response).await["id"].as_str().unwrap().to_string();
    app.clone()
        .oneshot(send_empty(
            Method::POST,
            &format!("/api/invites/{invite_id}/accept"),
            "bob-token",
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            &format!("/api/ambientes/{ambiente_id}/remove-member"),
            "bob-token",
            &json!({ "uid": "alice" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(send_json(
            Method::POST,
            &format!("/api/ambientes/{ambiente_id}/remove-member"),
            "alice-token",
            &json!({ "uid": "bob" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/ambientes/{ambiente_id}"), "alice-token"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["members"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get("/api/user/me", "bob-token"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["needsSetup"], true);
}

#[tokio::test]
async fn reports_over_http() {
    let (app, _stub) = test_app().await;
    let ambiente_id = create_ambiente(&app, "alice-token", "Casa").await;

    for entry in [
        json!({
            "ambienteId": ambiente_id,
            "description": "Salario",
            "amount": "3000.00",
            "type": "income",
            "date": "2024-01-01",
        }),
        json!({
            "ambienteId": ambiente_id,
            "description": "Mercado",
            "amount": "45.90",
            "type": "expense",
            "category": "Food",
            "date": "2024-01-05",
        }),
        json!({
            "ambienteId": ambiente_id,
            "description": "Farmacia",
            "amount": "12.00",
            "type": "expense",
            "category": "Health",
            "date": "2024-01-05",
        }),
    ] {
        let response = app
            .clone()
            .oneshot(send_json(
                Method::POST,
                "/api/transactions",
                "alice-token",
                &entry,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/reports?ambienteId={ambiente_id}"),
            "alice-token",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["totals"]["income"], "3000.00");
    assert_eq!(body["totals"]["expense"], "57.90");
    assert_eq!(body["totals"]["balance"], "2942.10");

    let expenses = body["expenseByCategory"].as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0]["category"], "Food");
    assert_eq!(expenses[0]["total"], "45.90");
    assert_eq!(expenses[1]["category"], "Health");
    assert_eq!(expenses[1]["total"], "12.00");
    assert!(expenses[0]["color"].as_str().unwrap().starts_with('#'));

    let income = body["incomeByCategory"].as_array().unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(income[0]["category"], "Uncategorized");
    assert_eq!(income[0]["total"], "3000.00");

    let daily = body["daily"].as_array().unwrap();
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0]["date"], "2024-01-01");
    assert_eq!(daily[0]["balance"], "3000.00");
    assert_eq!(daily[1]["date"], "2024-01-05");
    assert_eq!(daily[1]["expense"], "57.90");
    assert_eq!(daily[1]["balance"], "-57.90");

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/reports?ambienteId={ambiente_id}&type=expense&startDate=2024-01-02"),
            "alice-token",
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["totals"]["income"], "0.00");
    assert_eq!(body["totals"]["expense"], "57.90");
}

#[tokio::test]
async fn account_deletion_over_http() {
    let (app, stub) = test_app().await;
    create_ambiente(&app, "alice-token", "Casa").await;

    let response = app
        .clone()
        .oneshot(send_empty(Method::DELETE, "/api/user", "alice-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(stub.deleted.lock().unwrap().as_slice(), ["alice"]);

    let response = app
        .clone()
        .oneshot(get("/api/user/me", "alice-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["needsSetup"], true);
}
