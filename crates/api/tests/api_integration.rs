//! API integration tests.
//!
//! These drive the full router against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use serde_json::Value as Json;
use std::sync::Arc;
use tower::ServiceExt;
use voteboard_api::{AppState, router as api_router};
use voteboard_db::entities::{
    contest::{self, ContestStatus},
    contestant, ledger_entry, tally,
};

/// Create the test router over a prepared mock database.
fn create_test_router(db: MockDatabase) -> Router {
    let state = AppState::new(Arc::new(db.into_connection()));
    api_router().with_state(state)
}

fn empty_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Json {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_test_contest(id: &str) -> contest::Model {
    let now = Utc::now();
    contest::Model {
        id: id.to_string(),
        name: "Spring Vote".to_string(),
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(6),
        status: ContestStatus::Active,
        no_votes: 0,
        revenue: 0.0,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

fn create_test_tally(id: &str, contestant_id: &str, vote: i64) -> tally::Model {
    tally::Model {
        id: id.to_string(),
        contestant_id: contestant_id.to_string(),
        contest_id: "c1".to_string(),
        vote,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

fn create_test_contestant(id: &str) -> contestant::Model {
    contestant::Model {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        password_hash: "$argon2id$v=19$secret".to_string(),
        name: "Ada".to_string(),
        kind: "email".to_string(),
        dp: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_with_invalid_json_returns_envelope() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(json_request("POST", "/signup", "invalid json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_create_admin_requires_credentials() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(json_request("POST", "/create-admin", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Email and password are required.");
}

#[tokio::test]
async fn test_payment_rejects_zero_votes() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(json_request(
            "POST",
            "/web-create-payment",
            r#"{"contestId":"c1","contestantId":"u1","vote":0,"payment":5.0,"name":"Ada"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_increments_tally() {
    let entry = ledger_entry::Model {
        id: "l1".to_string(),
        contest_id: "c1".to_string(),
        contestant_id: "u1".to_string(),
        name: "Ada".to_string(),
        vote: 10,
        payment: 5.0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    };
    let db = empty_db()
        .append_query_results([[create_test_contest("c1")]])
        .append_query_results([[create_test_tally("t1", "u1", 10)]])
        .append_query_results([[entry]])
        .append_query_results([[create_test_tally("t1", "u1", 20)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }]);
    let app = create_test_router(db);

    let response = app
        .oneshot(json_request(
            "POST",
            "/web-create-payment",
            r#"{"contestId":"c1","contestantId":"u1","vote":10,"payment":5.0,"name":"Ada"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["transaction"]["vote"], 10);
    assert_eq!(body["data"]["updatedContestant"]["vote"], 20);
}

#[tokio::test]
async fn test_payment_for_unregistered_pair_returns_404() {
    let db = empty_db()
        .append_query_results([[create_test_contest("c1")]])
        .append_query_results([Vec::<tally::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(json_request(
            "POST",
            "/web-create-payment",
            r#"{"contestId":"c1","contestantId":"u9","vote":10,"payment":5.0,"name":"Ada"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Contestant not found in the contest.");
}

#[tokio::test]
async fn test_payment_for_deleted_contest_returns_404() {
    // The contest lookup filters tombstones, so a deleted contest comes back empty.
    let db = empty_db().append_query_results([Vec::<contest::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(json_request(
            "POST",
            "/web-create-payment",
            r#"{"contestId":"c1","contestantId":"u1","vote":10,"payment":5.0,"name":"Ada"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Contest not found.");
}

#[tokio::test]
async fn test_get_missing_contest_returns_404() {
    let db = empty_db().append_query_results([Vec::<contest::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/contest/missing")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Contest not found.");
}

#[tokio::test]
async fn test_contest_standings_hide_password_hash() {
    let db = empty_db()
        .append_query_results([[create_test_contest("c1")]])
        .append_query_results([[
            create_test_tally("t1", "u1", 40),
            create_test_tally("t2", "u2", 10),
        ]])
        .append_query_results([[maplit::btreemap! {
            "contest_id" => Value::from("c1"),
            "votes" => Value::BigInt(Some(50)),
            "revenue" => Value::Double(Some(25.0)),
        }]])
        .append_query_results([[create_test_contestant("u1"), create_test_contestant("u2")]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(json_request("POST", "/contestants", r#"{"contestId":"c1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let first = &body["data"]["contestants"][0];
    assert_eq!(first["position"], 1);
    assert_eq!(first["progress"], 100.0);
    assert_eq!(first["contestant"]["type"], "email");
    assert!(first["contestant"].get("passwordHash").is_none());
    assert!(first["contestant"].get("password_hash").is_none());
    assert_eq!(body["data"]["contestants"][1]["progress"], 25.0);
    assert_eq!(body["data"]["contestDetails"]["totalVotes"], 50);
    assert_eq!(body["data"]["contestDetails"]["totalContestants"], 2);
}

#[tokio::test]
async fn test_finished_contests_may_be_empty() {
    let db = empty_db().append_query_results([Vec::<contest::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/web-gettop-contest")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_delete_contest_accepts_contest_id_alias() {
    let db = empty_db().append_exec_results([MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }]);
    let app = create_test_router(db);

    let response = app
        .oneshot(json_request("DELETE", "/delete-contest", r#"{"contestId":"c1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Contest deleted successfully.");
}
