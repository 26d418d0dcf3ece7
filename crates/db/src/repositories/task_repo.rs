//! Repository for the `tasks` table.

use sqlx::{PgPool, Postgres, QueryBuilder};

use sentinel_core::audit::EntityKind;
use sentinel_core::paging::clamp_limit;
use sentinel_core::reporting::TASK_OPEN;
use sentinel_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskListParams, UpdateTask};
use crate::models::Page;

use super::mutation::{self, patch_field, AuditContext};

/// Column list for `tasks` queries.
const COLUMNS: &str = "\
    id, title, description, linked_entity_type, linked_entity_id, \
    assigned_to, created_by, due_date, priority, status, completed_at, \
    is_recurring, recurrence_rule, source, created_at, updated_at";

/// Default cap on task list results.
const LIST_CAP: i64 = 100;

/// Provides audited CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Create a task and its Create audit entry in one transaction.
    ///
    /// An unassigned task defaults to the acting user.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let assigned_to = input.assigned_to.or(ctx.actor_id);
        let query = format!(
            "INSERT INTO tasks
                (title, description, linked_entity_type, linked_entity_id,
                 assigned_to, created_by, due_date, priority, is_recurring,
                 recurrence_rule)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.linked_entity_type)
            .bind(input.linked_entity_id)
            .bind(assigned_to)
            .bind(ctx.actor_id)
            .bind(input.due_date)
            .bind(input.priority.as_deref().unwrap_or("Medium"))
            .bind(input.is_recurring.unwrap_or(false))
            .bind(&input.recurrence_rule)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::Task, task.id, None).await?;
        tx.commit().await?;
        Ok(task)
    }

    /// Find a task by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks by filters. Without an explicit status filter, only open
    /// tasks are returned. Ordered by due date (nulls last) then priority.
    pub async fn list(pool: &PgPool, params: &TaskListParams) -> Result<Page<Task>, sqlx::Error> {
        let limit = clamp_limit(params.limit, LIST_CAP, LIST_CAP);

        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM tasks WHERE 1=1"));
        push_filters(&mut qb, params);
        qb.push(" ORDER BY due_date ASC NULLS LAST, priority DESC LIMIT ")
            .push_bind(limit);
        let items = qb.build_query_as::<Task>().fetch_all(pool).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM tasks WHERE 1=1");
        push_filters(&mut count_qb, params);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        Ok(Page { items, total })
    }

    /// List open tasks assigned to or created by one user.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM tasks WHERE (assigned_to = "
        ));
        qb.push_bind(user_id)
            .push(" OR created_by = ")
            .push_bind(user_id)
            .push(")");
        match status {
            Some(status) => {
                qb.push(" AND status = ").push_bind(status.to_string());
            }
            None => {
                qb.push(" AND status = ANY(").push_bind(open_statuses()).push(")");
            }
        }
        if let Some(priority) = priority {
            qb.push(" AND priority = ").push_bind(priority.to_string());
        }
        qb.push(" ORDER BY due_date ASC NULLS LAST");

        qb.build_query_as::<Task>().fetch_all(pool).await
    }

    /// Update a task with per-field diffing and audit entries.
    ///
    /// Changing status to "Completed" also stamps `completed_at`; the stamp
    /// rides along on the status field's own audited change.
    pub async fn update(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
        patch: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        let Some(mut task) = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut changes = Vec::new();
        patch_field!(changes, task, patch, title);
        patch_field!(changes, task, patch, opt description);
        patch_field!(changes, task, patch, opt assigned_to);
        patch_field!(changes, task, patch, opt due_date);
        patch_field!(changes, task, patch, priority);
        patch_field!(changes, task, patch, status);
        patch_field!(changes, task, patch, is_recurring);
        patch_field!(changes, task, patch, opt recurrence_rule);

        if changes.is_empty() {
            return Ok(Some(task));
        }

        if changes.iter().any(|c| c.field == "status") && task.status == "Completed" {
            task.completed_at = Some(chrono::Utc::now());
        }

        let query = format!(
            "UPDATE tasks SET
                title = $2, description = $3, assigned_to = $4, due_date = $5,
                priority = $6, status = $7, completed_at = $8,
                is_recurring = $9, recurrence_rule = $10, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.assigned_to)
            .bind(task.due_date)
            .bind(&task.priority)
            .bind(&task.status)
            .bind(task.completed_at)
            .bind(task.is_recurring)
            .bind(&task.recurrence_rule)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_field_changes(&mut tx, ctx, EntityKind::Task, id, &changes).await?;
        tx.commit().await?;
        Ok(Some(task))
    }
}

fn open_statuses() -> Vec<String> {
    TASK_OPEN.iter().map(|s| s.to_string()).collect()
}

/// Append WHERE conditions shared by the list and count queries.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, params: &TaskListParams) {
    if let Some(assigned_to) = params.assigned_to {
        qb.push(" AND assigned_to = ").push_bind(assigned_to);
    }
    match params.status {
        Some(ref status) => {
            qb.push(" AND status = ").push_bind(status.clone());
        }
        None => {
            qb.push(" AND status = ANY(").push_bind(open_statuses()).push(")");
        }
    }
    if let Some(ref priority) = params.priority {
        qb.push(" AND priority = ").push_bind(priority.clone());
    }
    if let Some(due_before) = params.due_before {
        qb.push(" AND due_date <= ").push_bind(due_before);
    }
    if let (Some(ref kind), Some(linked_id)) =
        (&params.linked_entity_type, params.linked_entity_id)
    {
        qb.push(" AND linked_entity_type = ")
            .push_bind(kind.clone())
            .push(" AND linked_entity_id = ")
            .push_bind(linked_id);
    }
}
