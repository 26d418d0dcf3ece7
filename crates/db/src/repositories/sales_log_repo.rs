//! Repository for the `sales_log_entries` table: entry logging, summary
//! cards, quota standing, and trend analysis.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use sentinel_core::audit::EntityKind;
use sentinel_core::paging::{clamp_limit, clamp_offset, DEFAULT_SALES_LIMIT, MAX_SALES_LIMIT};
use sentinel_core::reporting::{
    self, quota_status, QUOTA_LINE_OF_BUSINESS, QUOTA_SALE_TYPES,
};
use sentinel_core::types::DbId;

use crate::models::sales_log::{
    CreateSalesLogEntry, PeriodStats, SalesLogEntry, SalesLogParams, SalesLogRow, SalesSummary,
    TrendGroupBy, TrendPeriod, TrendPoint,
};
use crate::models::Page;

use super::mutation::{self, AuditContext};

/// Column list for `sales_log_entries` queries.
const COLUMNS: &str = "\
    id, sale_date, account_id, prospect_id, policy_id, line_of_business, \
    premium, carrier_id, producer_id, source, source_detail, zip_code, \
    county, sale_type, notes, created_at";

/// Qualified column list for joined list queries.
const JOINED_COLUMNS: &str = "\
    s.id, s.sale_date, s.account_id, s.prospect_id, s.policy_id, \
    s.line_of_business, s.premium, s.carrier_id, s.producer_id, s.source, \
    s.source_detail, s.zip_code, s.county, s.sale_type, s.notes, \
    s.created_at, a.name AS account_name, c.name AS carrier_name, \
    u.name AS producer_name";

/// Provides operations for the sales performance log.
pub struct SalesLogRepo;

impl SalesLogRepo {
    /// Log a sale and its Create audit entry in one transaction. The acting
    /// user is always the producer of record.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        producer_id: DbId,
        input: &CreateSalesLogEntry,
    ) -> Result<SalesLogEntry, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO sales_log_entries
                (sale_date, account_id, prospect_id, policy_id,
                 line_of_business, premium, carrier_id, producer_id, source,
                 source_detail, zip_code, county, sale_type, notes)
             VALUES (COALESCE($1, CURRENT_DATE), $2, $3, $4, $5, $6, $7, $8,
                     $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, SalesLogEntry>(&query)
            .bind(input.sale_date)
            .bind(input.account_id)
            .bind(input.prospect_id)
            .bind(input.policy_id)
            .bind(&input.line_of_business)
            .bind(input.premium)
            .bind(input.carrier_id)
            .bind(producer_id)
            .bind(&input.source)
            .bind(&input.source_detail)
            .bind(&input.zip_code)
            .bind(&input.county)
            .bind(&input.sale_type)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::SalesLogEntry, entry.id, None).await?;
        tx.commit().await?;
        Ok(entry)
    }

    /// List sales with filters and pagination, newest first, enriched with
    /// account/carrier/producer names.
    pub async fn list(
        pool: &PgPool,
        params: &SalesLogParams,
    ) -> Result<Page<SalesLogRow>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_SALES_LIMIT, MAX_SALES_LIMIT);
        let offset = clamp_offset(params.offset);

        let mut qb = QueryBuilder::new(format!(
            "SELECT {JOINED_COLUMNS} FROM sales_log_entries s
             LEFT JOIN accounts a ON s.account_id = a.id
             LEFT JOIN carriers c ON s.carrier_id = c.id
             LEFT JOIN users u ON s.producer_id = u.id
             WHERE 1=1"
        ));
        push_filters(&mut qb, params);
        qb.push(" ORDER BY s.sale_date DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let items = qb.build_query_as::<SalesLogRow>().fetch_all(pool).await?;

        let mut count_qb =
            QueryBuilder::new("SELECT COUNT(*) FROM sales_log_entries s WHERE 1=1");
        push_filters(&mut count_qb, params);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        Ok(Page { items, total })
    }

    /// Count + premium for one inclusive date window.
    pub async fn period_stats(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PeriodStats, sqlx::Error> {
        sqlx::query_as::<_, PeriodStats>(
            "SELECT COUNT(*) AS count, COALESCE(SUM(premium), 0) AS premium
             FROM sales_log_entries
             WHERE sale_date >= $1 AND sale_date <= $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }

    /// Month-to-date count of qualifying auto items (Personal Auto sold as
    /// New Business or Rewrite).
    pub async fn auto_items_since(
        pool: &PgPool,
        month_start: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales_log_entries
             WHERE sale_date >= $1
               AND line_of_business = $2
               AND sale_type = ANY($3)",
        )
        .bind(month_start)
        .bind(QUOTA_LINE_OF_BUSINESS)
        .bind(quota_sale_types())
        .fetch_one(pool)
        .await
    }

    /// Summary cards for today, this week, month-to-date, and YTD, plus the
    /// monthly auto-quota standing.
    pub async fn summary(
        pool: &PgPool,
        today: NaiveDate,
        quota_target: i64,
    ) -> Result<SalesSummary, sqlx::Error> {
        let month_start = reporting::month_start(today);

        let today_stats = Self::period_stats(pool, today, today).await?;
        let this_week = Self::period_stats(pool, reporting::week_start(today), today).await?;
        let this_month = Self::period_stats(pool, month_start, today).await?;
        let ytd = Self::period_stats(pool, reporting::year_start(today), today).await?;
        let auto_items = Self::auto_items_since(pool, month_start).await?;

        Ok(SalesSummary {
            today: today_stats,
            this_week,
            this_month,
            ytd,
            auto_quota: quota_status(auto_items, quota_target, today),
        })
    }

    /// Trend analysis: count + premium per period bucket per group.
    ///
    /// Period and group expressions come from fixed match tables, never from
    /// request input.
    pub async fn trends(
        pool: &PgPool,
        period: TrendPeriod,
        group_by: TrendGroupBy,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TrendPoint>, sqlx::Error> {
        let period_expr = match period {
            TrendPeriod::Daily => "sale_date",
            TrendPeriod::Weekly => "date_trunc('week', sale_date)::date",
            TrendPeriod::Monthly => "date_trunc('month', sale_date)::date",
        };
        let group_expr = match group_by {
            TrendGroupBy::Lob => "line_of_business",
            TrendGroupBy::Source => "source",
            TrendGroupBy::Zip => "zip_code",
            TrendGroupBy::County => "county",
            TrendGroupBy::Carrier => "carrier_id::text",
            TrendGroupBy::SaleType => "sale_type",
        };

        let query = format!(
            "SELECT {period_expr} AS period, {group_expr} AS group_key,
                    COUNT(*) AS count, COALESCE(SUM(premium), 0) AS premium
             FROM sales_log_entries
             WHERE sale_date >= $1 AND sale_date <= $2
             GROUP BY period, group_key
             ORDER BY period"
        );
        sqlx::query_as::<_, TrendPoint>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }
}

fn quota_sale_types() -> Vec<String> {
    QUOTA_SALE_TYPES.iter().map(|s| s.to_string()).collect()
}

/// Append WHERE conditions shared by the list and count queries.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, params: &SalesLogParams) {
    if let Some(from) = params.date_from {
        qb.push(" AND s.sale_date >= ").push_bind(from);
    }
    if let Some(to) = params.date_to {
        qb.push(" AND s.sale_date <= ").push_bind(to);
    }
    if let Some(ref lob) = params.line_of_business {
        qb.push(" AND s.line_of_business = ").push_bind(lob.clone());
    }
    if let Some(ref sale_type) = params.sale_type {
        qb.push(" AND s.sale_type = ").push_bind(sale_type.clone());
    }
    if let Some(ref source) = params.source {
        qb.push(" AND s.source = ").push_bind(source.clone());
    }
    if let Some(ref zip_code) = params.zip_code {
        qb.push(" AND s.zip_code = ").push_bind(zip_code.clone());
    }
    if let Some(ref county) = params.county {
        qb.push(" AND s.county ILIKE ").push_bind(format!("%{county}%"));
    }
    if let Some(carrier_id) = params.carrier_id {
        qb.push(" AND s.carrier_id = ").push_bind(carrier_id);
    }
    if let Some(producer_id) = params.producer_id {
        qb.push(" AND s.producer_id = ").push_bind(producer_id);
    }
}
