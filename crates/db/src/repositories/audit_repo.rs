//! Read side of the `audit_logs` table.
//!
//! The write side lives in [`super::mutation`] and only accepts an open
//! transaction. This repository exposes no update or delete operations at
//! all; the trail is append-only.

use sqlx::PgPool;

use sentinel_core::paging::{clamp_limit, clamp_offset};
use sentinel_core::types::{DbId, Timestamp};

use crate::models::audit::{AuditLogEntry, AuditQuery};
use crate::models::Page;

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "\
    id, timestamp, user_id, action, entity_type, entity_id, field_changed, \
    old_value, new_value, ip_address, user_agent, metadata_json";

/// Default number of audit entries per page.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum number of audit entries per page.
const MAX_LIMIT: i64 = 500;

/// Provides query operations for audit logs.
pub struct AuditRepo;

impl AuditRepo {
    /// Query audit logs with filtering and pagination, newest first.
    pub async fn query(
        pool: &PgPool,
        params: &AuditQuery,
    ) -> Result<Page<AuditLogEntry>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);

        let (where_clause, binds) = build_filter(params);
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {where_clause}
             ORDER BY timestamp DESC
             LIMIT ${} OFFSET ${}",
            binds.len() + 1,
            binds.len() + 2,
        );
        let q = bind_values(sqlx::query_as::<_, AuditLogEntry>(&query), &binds);
        let items = q.bind(limit).bind(offset).fetch_all(pool).await?;

        let count_query = format!("SELECT COUNT(*) FROM audit_logs {where_clause}");
        let q = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_query), &binds);
        let total = q.fetch_one(pool).await?;

        Ok(Page { items, total })
    }

    /// All entries for one entity, oldest first (its full change history).
    pub async fn history(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY timestamp ASC"
        );
        sqlx::query_as::<_, AuditLogEntry>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}

/// Typed bind value for dynamically-built audit queries.
enum BindValue {
    Id(DbId),
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from the filter parameters.
fn build_filter(params: &AuditQuery) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(user_id) = params.user_id {
        binds.push(BindValue::Id(user_id));
        conditions.push(format!("user_id = ${}", binds.len()));
    }
    if let Some(ref action) = params.action {
        binds.push(BindValue::Text(action.clone()));
        conditions.push(format!("action = ${}", binds.len()));
    }
    if let Some(ref entity_type) = params.entity_type {
        binds.push(BindValue::Text(entity_type.clone()));
        conditions.push(format!("entity_type = ${}", binds.len()));
    }
    if let Some(entity_id) = params.entity_id {
        binds.push(BindValue::Id(entity_id));
        conditions.push(format!("entity_id = ${}", binds.len()));
    }
    if let Some(from) = params.from {
        binds.push(BindValue::Timestamp(from));
        conditions.push(format!("timestamp >= ${}", binds.len()));
    }
    if let Some(to) = params.to {
        binds.push(BindValue::Timestamp(to));
        conditions.push(format!("timestamp <= ${}", binds.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, binds)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for value in binds {
        match value {
            BindValue::Id(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    binds: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for value in binds {
        match value {
            BindValue::Id(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
