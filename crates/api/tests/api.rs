//! End-to-end router tests over a mocked database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use tower::ServiceExt;

use regportal_api::{AppState, auth_middleware};
use regportal_common::TokenManager;
use regportal_core::services::{Mailer, RegistrationService, ReviewService, UserService};
use regportal_db::{
    entities::registration_request::{self, RequestStatus, RequestedRole},
    repositories::{RegistrationRequestRepository, UserRepository},
};

const SECRET: &str = "integration-test-secret";
const LOGIN_URL: &str = "https://portal.example.org/auth/login";

fn app(db: DatabaseConnection) -> Router {
    let db = Arc::new(db);
    let request_repo = RegistrationRequestRepository::new(Arc::clone(&db));
    let user_repo = UserRepository::new(db);

    let state = AppState {
        registration_service: RegistrationService::new(request_repo.clone()),
        review_service: ReviewService::new(request_repo, user_repo.clone(), LOGIN_URL.to_string()),
        user_service: UserService::new(user_repo),
        mailer: Mailer::disabled(),
        tokens: TokenManager::new(SECRET, 24),
    };

    Router::new()
        .nest("/api", regportal_api::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn bearer(role: &str) -> String {
    let token = TokenManager::new(SECRET, 24)
        .issue("admin1", role)
        .unwrap();
    format!("Bearer {token}")
}

fn mock_request(id: &str, status: RequestStatus) -> registration_request::Model {
    registration_request::Model {
        id: id.to_string(),
        full_name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone_number: "+15550001111".to_string(),
        about: "I would like to join the portal.".to_string(),
        consent_given: true,
        requested_role: RequestedRole::User,
        passport_number: None,
        passport_issued_by: None,
        passport_issue_date: None,
        director_approval_letter_url: None,
        status,
        reviewed_by: None,
        reviewed_at: None,
        rejection_reason: None,
        user_id: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_submit_returns_created() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Duplicate check finds nothing
        .append_query_results([Vec::<registration_request::Model>::new()])
        // Insert returns the created row
        .append_query_results([[mock_request("req1", RequestStatus::Pending)]])
        .into_connection();

    let body = serde_json::json!({
        "fullName": "Jane Doe",
        "email": "jane@x.com",
        "phoneNumber": "+15550001111",
        "about": "I would like to join the portal.",
        "consentGiven": true,
        "requestedRole": "user",
    });

    let response = app(db)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registration-requests")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], "req1");
    assert_eq!(json["data"]["status"], "pending");
}

#[tokio::test]
async fn test_list_without_token_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(db)
        .oneshot(
            Request::builder()
                .uri("/api/registration-requests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_with_non_admin_token_is_forbidden() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(db)
        .oneshot(
            Request::builder()
                .uri("/api/registration-requests")
                .header(header::AUTHORIZATION, bearer("user"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_returns_page_for_admin() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(2))
        }]])
        .append_query_results([[
            mock_request("req2", RequestStatus::Pending),
            mock_request("req1", RequestStatus::Pending),
        ]])
        .into_connection();

    let response = app(db)
        .oneshot(
            Request::builder()
                .uri("/api/registration-requests?status=pending&page=1&limit=5")
                .header(header::AUTHORIZATION, bearer("admin"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["pages"], 1);
    assert_eq!(json["data"]["requests"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_unknown_status_filter_is_bad_request() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(db)
        .oneshot(
            Request::builder()
                .uri("/api/registration-requests?status=archived")
                .header(header::AUTHORIZATION, bearer("admin"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_approve_already_reviewed_is_bad_request() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[mock_request("req1", RequestStatus::Approved)]])
        .into_connection();

    let response = app(db)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registration-requests/req1/approve")
                .header(header::AUTHORIZATION, bearer("admin"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "ALREADY_REVIEWED");
}

#[tokio::test]
async fn test_reject_with_short_reason_is_bad_request() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(db)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registration-requests/req1/reject")
                .header(header::AUTHORIZATION, bearer("admin"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"reason": "too short"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reject_dispatches_transition() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[mock_request("req1", RequestStatus::Pending)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let response = app(db)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registration-requests/req1/reject")
                .header(header::AUTHORIZATION, bearer("admin"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"reason": "Incomplete documentation provided"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["emailData"]["to"], "jane@x.com");
    assert_eq!(
        json["data"]["emailData"]["reason"],
        "Incomplete documentation provided"
    );
}
