use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use sentinel_api::auth::jwt::{generate_access_token, JwtConfig};
use sentinel_api::config::ServerConfig;
use sentinel_api::router::build_app_router;
use sentinel_api::state::AppState;
use sentinel_core::types::DbId;
use sentinel_db::models::user::User;
use sentinel_db::repositories::{AuditContext, UserRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        auto_quota_target: 13,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 480,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Mirrors the production router construction so tests
/// exercise the same stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Create a user with the given role and return it with a valid bearer token.
pub async fn user_with_token(pool: &PgPool, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &AuditContext::default(),
        &format!("{}-{}@example.com", role.to_lowercase(), uuid::Uuid::new_v4()),
        "Test User",
        "not-a-real-hash",
        role,
    )
    .await
    .expect("user creation should succeed");

    let token = generate_access_token(user.id, role, &test_config().jwt)
        .expect("token generation should succeed");

    (user, token)
}

/// Count audit entries for one entity and action.
pub async fn audit_count(pool: &PgPool, entity_type: &str, entity_id: DbId, action: &str) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM audit_logs
         WHERE entity_type = $1 AND entity_id = $2 AND action = $3",
    )
    .bind(entity_type)
    .bind(entity_id)
    .bind(action)
    .fetch_one(pool)
    .await
    .expect("audit count query should succeed")
}
