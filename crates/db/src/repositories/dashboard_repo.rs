//! Dashboard aggregation queries: pure reads, no audit entries.

use chrono::NaiveDate;
use sqlx::PgPool;

use sentinel_core::reporting::{
    self, quota_status, INSTALLMENT_PENDING, PROSPECT_CLOSED_STAGES, SERVICE_ITEM_TERMINAL,
    TASK_OPEN,
};
use sentinel_core::types::Money;

use crate::models::dashboard::DashboardSnapshot;
use crate::models::service_item::ServiceItemRow;
use crate::models::task::Task;

use super::sales_log_repo::SalesLogRepo;

/// Number of rows in the "next up" dashboard widgets.
const WIDGET_LIMIT: i64 = 10;

/// Provides the aggregated dashboard snapshot.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Assemble the full dashboard for `today`.
    pub async fn snapshot(
        pool: &PgPool,
        today: NaiveDate,
        quota_target: i64,
    ) -> Result<DashboardSnapshot, sqlx::Error> {
        let week_end = reporting::week_end(today);
        let month_start = reporting::month_start(today);

        let tasks_due_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE due_date = $1 AND status = ANY($2)",
        )
        .bind(today)
        .bind(owned(TASK_OPEN))
        .fetch_one(pool)
        .await?;

        let tasks_overdue: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE due_date < $1 AND status = ANY($2)",
        )
        .bind(today)
        .bind(owned(TASK_OPEN))
        .fetch_one(pool)
        .await?;

        let service_items_due_this_week: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM service_items
             WHERE due_date >= $1 AND due_date <= $2 AND status != ALL($3)",
        )
        .bind(today)
        .bind(week_end)
        .bind(owned(SERVICE_ITEM_TERMINAL))
        .fetch_one(pool)
        .await?;

        let service_items_overdue: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM service_items
             WHERE due_date < $1 AND status != ALL($2)",
        )
        .bind(today)
        .bind(owned(SERVICE_ITEM_TERMINAL))
        .fetch_one(pool)
        .await?;

        let installments_due_this_week: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM installments
             WHERE due_date >= $1 AND due_date <= $2 AND status = ANY($3)",
        )
        .bind(today)
        .bind(week_end)
        .bind(owned(INSTALLMENT_PENDING))
        .fetch_one(pool)
        .await?;

        let installments_past_due: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM installments
             WHERE due_date < $1 AND status = ANY($2)",
        )
        .bind(today)
        .bind(owned(INSTALLMENT_PENDING))
        .fetch_one(pool)
        .await?;

        let (pipeline_count, pipeline_value): (i64, Money) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(estimated_premium), 0)
             FROM prospects
             WHERE pipeline_stage != ALL($1)",
        )
        .bind(owned(PROSPECT_CLOSED_STAGES))
        .fetch_one(pool)
        .await?;

        let (sales_this_month, sales_premium_this_month): (i64, Money) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(premium), 0)
             FROM sales_log_entries
             WHERE sale_date >= $1",
        )
        .bind(month_start)
        .fetch_one(pool)
        .await?;

        let auto_items = SalesLogRepo::auto_items_since(pool, month_start).await?;

        let recent_tasks: Vec<Task> = sqlx::query_as(
            "SELECT id, title, description, linked_entity_type,
                    linked_entity_id, assigned_to, created_by, due_date,
                    priority, status, completed_at, is_recurring,
                    recurrence_rule, source, created_at, updated_at
             FROM tasks
             WHERE status = ANY($1)
             ORDER BY due_date ASC NULLS LAST
             LIMIT $2",
        )
        .bind(owned(TASK_OPEN))
        .bind(WIDGET_LIMIT)
        .fetch_all(pool)
        .await?;

        let recent_service_items: Vec<ServiceItemRow> = sqlx::query_as(
            "SELECT si.id, si.item_type, si.account_id, si.policy_id,
                    si.description, si.status, si.assigned_to, si.due_date,
                    si.urgency, si.completed_at, si.created_at, si.updated_at,
                    a.name AS account_name, p.line_of_business AS policy_lob,
                    u.name AS assignee_name
             FROM service_items si
             LEFT JOIN accounts a ON si.account_id = a.id
             LEFT JOIN policies p ON si.policy_id = p.id
             LEFT JOIN users u ON si.assigned_to = u.id
             WHERE si.status != ALL($1)
             ORDER BY si.due_date ASC NULLS LAST
             LIMIT $2",
        )
        .bind(owned(SERVICE_ITEM_TERMINAL))
        .bind(WIDGET_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(DashboardSnapshot {
            tasks_due_today,
            tasks_overdue,
            service_items_due_this_week,
            service_items_overdue,
            installments_due_this_week,
            installments_past_due,
            pipeline_count,
            pipeline_value,
            sales_this_month,
            sales_premium_this_month,
            auto_quota: quota_status(auto_items, quota_target, today),
            recent_tasks,
            recent_service_items,
        })
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
