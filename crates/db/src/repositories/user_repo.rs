//! Repository for the `users` table.

use sqlx::PgPool;

use sentinel_core::audit::EntityKind;
use sentinel_core::types::DbId;

use crate::models::user::User;

use super::mutation::{self, AuditContext};

/// Column list for `users` queries.
const COLUMNS: &str = "\
    id, email, name, password_hash, role, is_active, last_login, created_at, \
    updated_at";

/// Provides operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by email (login path).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total number of users. Zero means first-run setup is still open.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    /// Create a user and its Create audit entry in one transaction. The
    /// password hash is computed by the caller.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        email: &str,
        name: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (email, name, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(name)
            .bind(password_hash)
            .bind(role)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::User, user.id, None).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Record a successful login: stamp `last_login` and write the Login
    /// audit entry in one transaction.
    pub async fn record_login(
        pool: &PgPool,
        ctx: &AuditContext,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE users SET last_login = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        mutation::record_login(&mut tx, ctx, user_id).await?;
        tx.commit().await?;
        Ok(())
    }
}
