//! Repository for the `service_items` table — the service board.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use sentinel_core::audit::EntityKind;
use sentinel_core::reporting::SERVICE_ITEM_TERMINAL;
use sentinel_core::types::DbId;

use crate::models::service_item::{
    CreateServiceItem, ServiceBoard, ServiceBoardParams, ServiceItem, ServiceItemRow,
    UpdateServiceItem,
};

use super::mutation::{self, patch_field, AuditContext};

/// Column list for `service_items` queries.
const COLUMNS: &str = "\
    id, item_type, account_id, policy_id, description, status, assigned_to, \
    due_date, urgency, completed_at, created_at, updated_at";

/// Qualified column list for joined board queries.
const JOINED_COLUMNS: &str = "\
    si.id, si.item_type, si.account_id, si.policy_id, si.description, \
    si.status, si.assigned_to, si.due_date, si.urgency, si.completed_at, \
    si.created_at, si.updated_at, \
    a.name AS account_name, p.line_of_business AS policy_lob, \
    u.name AS assignee_name";

/// Provides audited operations for service items.
pub struct ServiceItemRepo;

impl ServiceItemRepo {
    /// Create a service item and its Create audit entry in one transaction.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        input: &CreateServiceItem,
    ) -> Result<ServiceItem, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO service_items
                (item_type, account_id, policy_id, description, status,
                 assigned_to, due_date, urgency)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, ServiceItem>(&query)
            .bind(&input.item_type)
            .bind(input.account_id)
            .bind(input.policy_id)
            .bind(&input.description)
            .bind(input.status.as_deref().unwrap_or("Not Started"))
            .bind(input.assigned_to)
            .bind(input.due_date)
            .bind(input.urgency.as_deref().unwrap_or("Medium"))
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::ServiceItem, item.id, None).await?;
        tx.commit().await?;
        Ok(item)
    }

    /// Find a service item with joined display names.
    pub async fn find_row_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServiceItemRow>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM service_items si
             LEFT JOIN accounts a ON si.account_id = a.id
             LEFT JOIN policies p ON si.policy_id = p.id
             LEFT JOIN users u ON si.assigned_to = u.id
             WHERE si.id = $1"
        );
        sqlx::query_as::<_, ServiceItemRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The service board: filtered items ordered by urgency then due date,
    /// plus per-status and per-type counts for the board header. Without an
    /// explicit status filter, terminal items are excluded.
    pub async fn board(
        pool: &PgPool,
        params: &ServiceBoardParams,
    ) -> Result<ServiceBoard, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {JOINED_COLUMNS} FROM service_items si
             LEFT JOIN accounts a ON si.account_id = a.id
             LEFT JOIN policies p ON si.policy_id = p.id
             LEFT JOIN users u ON si.assigned_to = u.id
             WHERE 1=1"
        ));
        push_filters(&mut qb, params);
        qb.push(
            " ORDER BY CASE si.urgency
                 WHEN 'Critical' THEN 0
                 WHEN 'High' THEN 1
                 WHEN 'Medium' THEN 2
                 ELSE 3
               END,
               si.due_date ASC NULLS LAST",
        );
        let items = qb.build_query_as::<ServiceItemRow>().fetch_all(pool).await?;
        let total = items.len() as i64;

        let counts_by_status = Self::open_counts(pool, "status").await?;
        let counts_by_type = Self::open_counts(pool, "item_type").await?;

        Ok(ServiceBoard {
            items,
            total,
            counts_by_status,
            counts_by_type,
        })
    }

    /// Update a service item with per-field diffing and audit entries.
    ///
    /// Changing status to a terminal value also stamps `completed_at`; the
    /// stamp rides along on the status field's own audited change.
    pub async fn update(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
        patch: &UpdateServiceItem,
    ) -> Result<Option<ServiceItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM service_items WHERE id = $1");
        let Some(mut item) = sqlx::query_as::<_, ServiceItem>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut changes = Vec::new();
        patch_field!(changes, item, patch, item_type);
        patch_field!(changes, item, patch, opt policy_id);
        patch_field!(changes, item, patch, opt description);
        patch_field!(changes, item, patch, status);
        patch_field!(changes, item, patch, opt assigned_to);
        patch_field!(changes, item, patch, opt due_date);
        patch_field!(changes, item, patch, urgency);

        if changes.is_empty() {
            return Ok(Some(item));
        }

        if changes.iter().any(|c| c.field == "status")
            && SERVICE_ITEM_TERMINAL.contains(&item.status.as_str())
        {
            item.completed_at = Some(chrono::Utc::now());
        }

        let query = format!(
            "UPDATE service_items SET
                item_type = $2, policy_id = $3, description = $4, status = $5,
                assigned_to = $6, due_date = $7, urgency = $8,
                completed_at = $9, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, ServiceItem>(&query)
            .bind(id)
            .bind(&item.item_type)
            .bind(item.policy_id)
            .bind(&item.description)
            .bind(&item.status)
            .bind(item.assigned_to)
            .bind(item.due_date)
            .bind(&item.urgency)
            .bind(item.completed_at)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_field_changes(&mut tx, ctx, EntityKind::ServiceItem, id, &changes)
            .await?;
        tx.commit().await?;
        Ok(Some(item))
    }

    /// Count non-terminal items grouped by one column.
    async fn open_counts(
        pool: &PgPool,
        column: &'static str,
    ) -> Result<HashMap<String, i64>, sqlx::Error> {
        let query = format!(
            "SELECT {column} AS key, COUNT(*) AS count FROM service_items
             WHERE status != ALL($1)
             GROUP BY {column}"
        );
        let rows: Vec<(String, i64)> = sqlx::query_as(&query)
            .bind(terminal_statuses())
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().collect())
    }
}

fn terminal_statuses() -> Vec<String> {
    SERVICE_ITEM_TERMINAL.iter().map(|s| s.to_string()).collect()
}

/// Append WHERE conditions for board queries.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, params: &ServiceBoardParams) {
    if let Some(ref item_type) = params.item_type {
        qb.push(" AND si.item_type = ").push_bind(item_type.clone());
    }
    match params.status {
        Some(ref status) => {
            qb.push(" AND si.status = ").push_bind(status.clone());
        }
        None => {
            qb.push(" AND si.status != ALL(")
                .push_bind(terminal_statuses())
                .push(")");
        }
    }
    if let Some(ref urgency) = params.urgency {
        qb.push(" AND si.urgency = ").push_bind(urgency.clone());
    }
    if let Some(assigned_to) = params.assigned_to {
        qb.push(" AND si.assigned_to = ").push_bind(assigned_to);
    }
    if let Some(due_before) = params.due_before {
        qb.push(" AND si.due_date <= ").push_bind(due_before);
    }
    if let Some(due_after) = params.due_after {
        qb.push(" AND si.due_date >= ").push_bind(due_after);
    }
    if let Some(account_id) = params.account_id {
        qb.push(" AND si.account_id = ").push_bind(account_id);
    }
    if let Some(policy_id) = params.policy_id {
        qb.push(" AND si.policy_id = ").push_bind(policy_id);
    }
    if let Some(ref search) = params.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (a.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR si.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}
