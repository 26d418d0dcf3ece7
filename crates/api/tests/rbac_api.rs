//! Integration tests for the role gate and scoped visibility at the HTTP
//! layer: ReadOnly rejection, admin-only account deletion, and
//! Forbidden-not-NotFound for out-of-scope producers.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use sentinel_db::models::account::CreateAccount;
use sentinel_db::repositories::{AccountRepo, AuditContext};

use common::{audit_count, build_test_app, user_with_token};

fn json_request(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn seed_account(pool: &PgPool, producer: Option<uuid::Uuid>) -> uuid::Uuid {
    let input = CreateAccount {
        name: "Seeded Account".to_string(),
        account_type: "Personal".to_string(),
        status: None,
        primary_contact_id: None,
        assigned_producer_id: producer,
        assigned_csr_id: None,
        address_line1: None,
        address_line2: None,
        city: None,
        state: None,
        zip_code: None,
        county: None,
        phone: None,
        email: None,
    };
    AccountRepo::create(pool, &AuditContext::default(), &input)
        .await
        .expect("account creation should succeed")
        .id
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_token_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/accounts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn read_only_cannot_create_anything(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "ReadOnly").await;
    let app = build_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/accounts",
            &token,
            serde_json::json!({ "name": "Blocked", "account_type": "Personal" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], "FORBIDDEN");

    // Nothing stored, nothing audited.
    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 0);
    let entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE entity_type = 'Account'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(entries, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn read_only_cannot_update(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "ReadOnly").await;
    let account_id = seed_account(&pool, None).await;
    let app = build_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/accounts/{account_id}"),
            &token,
            serde_json::json!({ "status": "Inactive" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(audit_count(&pool, "Account", account_id, "Update").await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_admin_deletes_accounts(pool: PgPool) {
    let (_, csr_token) = user_with_token(&pool, "CSR").await;
    let (_, producer_token) = user_with_token(&pool, "Producer").await;
    let (_, admin_token) = user_with_token(&pool, "Admin").await;
    let account_id = seed_account(&pool, None).await;

    for token in [&csr_token, &producer_token] {
        let app = build_test_app(pool.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/accounts/{account_id}"))
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
    assert_eq!(audit_count(&pool, "Account", account_id, "Delete").await, 0);

    let app = build_test_app(pool.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/accounts/{account_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {admin_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(audit_count(&pool, "Account", account_id, "Delete").await, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn out_of_scope_producer_gets_forbidden_not_notfound(pool: PgPool) {
    let (_, producer_token) = user_with_token(&pool, "Producer").await;
    let (other, _) = user_with_token(&pool, "Producer").await;
    let account_id = seed_account(&pool, Some(other.id)).await;

    let app = build_test_app(pool.clone());
    let response = app
        .oneshot(get_request(
            &format!("/api/v1/accounts/{account_id}"),
            &producer_token,
        ))
        .await
        .unwrap();
    // The row exists but belongs to another producer: Forbidden, not 404.
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool.clone());
    let response = app
        .oneshot(get_request(
            &format!("/api/v1/accounts/{}", uuid::Uuid::new_v4()),
            &producer_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_enum_value_is_rejected_before_any_write(pool: PgPool) {
    let (_, token) = user_with_token(&pool, "CSR").await;
    let app = build_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/accounts",
            &token,
            serde_json::json!({ "name": "Bad Type", "account_type": "Partnership" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 0);
}
