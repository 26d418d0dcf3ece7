//! Dashboard snapshot types.

use serde::Serialize;

use sentinel_core::reporting::QuotaStatus;
use sentinel_core::types::Money;

use super::service_item::ServiceItemRow;
use super::task::Task;

/// Everything the dashboard shows for "today": due/overdue counts, the open
/// pipeline, month-to-date sales, and the next items needing attention.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot {
    pub tasks_due_today: i64,
    pub tasks_overdue: i64,
    pub service_items_due_this_week: i64,
    pub service_items_overdue: i64,
    pub installments_due_this_week: i64,
    pub installments_past_due: i64,
    pub pipeline_count: i64,
    pub pipeline_value: Money,
    pub sales_this_month: i64,
    pub sales_premium_this_month: Money,
    pub auto_quota: QuotaStatus,
    pub recent_tasks: Vec<Task>,
    pub recent_service_items: Vec<ServiceItemRow>,
}
