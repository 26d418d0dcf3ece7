//! Repository for the `prospects` table, including pipeline-stage moves and
//! conversion into accounts.

use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use sentinel_core::audit::{AuditValue, EntityKind, NULL_SENTINEL};
use sentinel_core::diff::Change;
use sentinel_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use sentinel_core::reporting::PROSPECT_CLOSED_STAGES;
use sentinel_core::types::DbId;

use crate::models::account::Account;
use crate::models::prospect::{
    ConvertOutcome, CreateProspect, PipelineStageSummary, Prospect, ProspectListParams,
    UpdateProspect,
};
use crate::models::Page;

use super::mutation::{self, patch_field, AuditContext};

/// Column list for `prospects` queries.
const COLUMNS: &str = "\
    id, first_name, last_name, business_name, email, phone, source, \
    source_detail, referrer_account_id, lob_interest, estimated_premium, \
    current_carrier, current_expiration, pipeline_stage, \
    assigned_producer_id, zip_code, county, closed_at, close_reason, \
    converted_account_id, created_at, updated_at";

/// Column list for `accounts` rows returned by conversion.
const ACCOUNT_COLUMNS: &str = "\
    id, name, account_type, status, primary_contact_id, assigned_producer_id, \
    assigned_csr_id, address_line1, address_line2, city, state, zip_code, \
    county, phone, email, created_at, updated_at";

/// Provides audited CRUD operations for prospects.
pub struct ProspectRepo;

impl ProspectRepo {
    /// Create a prospect and its Create audit entry in one transaction.
    ///
    /// An unassigned prospect defaults to the acting user as producer.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        input: &CreateProspect,
    ) -> Result<Prospect, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let assigned_producer_id = input.assigned_producer_id.or(ctx.actor_id);
        let query = format!(
            "INSERT INTO prospects
                (first_name, last_name, business_name, email, phone, source,
                 source_detail, referrer_account_id, lob_interest,
                 estimated_premium, current_carrier, current_expiration,
                 assigned_producer_id, zip_code, county)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     $14, $15)
             RETURNING {COLUMNS}"
        );
        let prospect = sqlx::query_as::<_, Prospect>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.business_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.source)
            .bind(&input.source_detail)
            .bind(input.referrer_account_id)
            .bind(&input.lob_interest)
            .bind(input.estimated_premium)
            .bind(&input.current_carrier)
            .bind(input.current_expiration)
            .bind(assigned_producer_id)
            .bind(&input.zip_code)
            .bind(&input.county)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::Prospect, prospect.id, None).await?;
        tx.commit().await?;
        Ok(prospect)
    }

    /// Find a prospect by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Prospect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prospects WHERE id = $1");
        sqlx::query_as::<_, Prospect>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List prospects with filters and pagination, most recently touched
    /// first. `scope` restricts results to one assigned producer.
    pub async fn list(
        pool: &PgPool,
        params: &ProspectListParams,
        scope: Option<DbId>,
    ) -> Result<Page<Prospect>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);

        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM prospects WHERE 1=1"));
        push_filters(&mut qb, params, scope);
        qb.push(" ORDER BY updated_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let items = qb.build_query_as::<Prospect>().fetch_all(pool).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM prospects WHERE 1=1");
        push_filters(&mut count_qb, params, scope);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        Ok(Page { items, total })
    }

    /// Per-stage counts and estimated value for the Kanban board, excluding
    /// closed stages.
    pub async fn pipeline_summary(
        pool: &PgPool,
        scope: Option<DbId>,
    ) -> Result<Vec<PipelineStageSummary>, sqlx::Error> {
        let mut qb = QueryBuilder::new(
            "SELECT pipeline_stage, COUNT(*) AS count,
                    COALESCE(SUM(estimated_premium), 0) AS value
             FROM prospects
             WHERE pipeline_stage != ALL(",
        );
        qb.push_bind(closed_stages());
        qb.push(")");
        if let Some(producer_id) = scope {
            qb.push(" AND assigned_producer_id = ").push_bind(producer_id);
        }
        qb.push(" GROUP BY pipeline_stage");

        qb.build_query_as::<PipelineStageSummary>()
            .fetch_all(pool)
            .await
    }

    /// Update a prospect with per-field diffing and audit entries.
    ///
    /// Moving `pipeline_stage` to a closed stage also stamps `closed_at`;
    /// the stamp rides along as a column write on the stage's own audited
    /// change.
    pub async fn update(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
        patch: &UpdateProspect,
    ) -> Result<Option<Prospect>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM prospects WHERE id = $1");
        let Some(mut prospect) = sqlx::query_as::<_, Prospect>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut changes = Vec::new();
        patch_field!(changes, prospect, patch, first_name);
        patch_field!(changes, prospect, patch, last_name);
        patch_field!(changes, prospect, patch, opt business_name);
        patch_field!(changes, prospect, patch, opt email);
        patch_field!(changes, prospect, patch, opt phone);
        patch_field!(changes, prospect, patch, opt source);
        patch_field!(changes, prospect, patch, opt source_detail);
        patch_field!(changes, prospect, patch, opt lob_interest);
        patch_field!(changes, prospect, patch, opt estimated_premium);
        patch_field!(changes, prospect, patch, opt current_carrier);
        patch_field!(changes, prospect, patch, opt current_expiration);
        patch_field!(changes, prospect, patch, pipeline_stage);
        patch_field!(changes, prospect, patch, opt assigned_producer_id);
        patch_field!(changes, prospect, patch, opt zip_code);
        patch_field!(changes, prospect, patch, opt county);
        patch_field!(changes, prospect, patch, opt close_reason);

        if changes.is_empty() {
            return Ok(Some(prospect));
        }

        let stage_closed = changes.iter().any(|c| c.field == "pipeline_stage")
            && PROSPECT_CLOSED_STAGES.contains(&prospect.pipeline_stage.as_str());
        if stage_closed {
            prospect.closed_at = Some(chrono::Utc::now());
        }

        let prospect = Self::write_back(&mut tx, id, &prospect).await?;
        mutation::record_field_changes(&mut tx, ctx, EntityKind::Prospect, id, &changes).await?;
        tx.commit().await?;
        Ok(Some(prospect))
    }

    /// Quick stage move for Kanban drag-and-drop: one audited field change.
    pub async fn update_stage(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
        stage: &str,
    ) -> Result<Option<Prospect>, sqlx::Error> {
        let patch = UpdateProspect {
            pipeline_stage: Some(stage.to_string()),
            ..UpdateProspect::default()
        };
        Self::update(pool, ctx, id, &patch).await
    }

    /// Convert a won prospect into an account, exactly once.
    ///
    /// One transaction: create the account from prospect fields, close the
    /// prospect, and write both audit entries (account Create with source
    /// metadata, prospect `converted_account_id` Update). A second attempt
    /// finds `converted_account_id` set and reports `AlreadyConverted`
    /// without creating anything.
    pub async fn convert(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
    ) -> Result<ConvertOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM prospects WHERE id = $1");
        let Some(mut prospect) = sqlx::query_as::<_, Prospect>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ConvertOutcome::NotFound);
        };

        if prospect.converted_account_id.is_some() {
            return Ok(ConvertOutcome::AlreadyConverted);
        }

        let name = match prospect.business_name {
            Some(ref business) => business.clone(),
            None => format!("{} {}", prospect.first_name, prospect.last_name),
        };
        let account_type = if prospect.business_name.is_some() {
            "Commercial"
        } else {
            "Personal"
        };

        let query = format!(
            "INSERT INTO accounts
                (name, account_type, status, assigned_producer_id, phone,
                 email, zip_code, county)
             VALUES ($1, $2, 'Active', $3, $4, $5, $6, $7)
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(&name)
            .bind(account_type)
            .bind(prospect.assigned_producer_id)
            .bind(&prospect.phone)
            .bind(&prospect.email)
            .bind(&prospect.zip_code)
            .bind(&prospect.county)
            .fetch_one(&mut *tx)
            .await?;

        prospect.pipeline_stage = "Closed-Won".to_string();
        prospect.closed_at = Some(chrono::Utc::now());
        prospect.converted_account_id = Some(account.id);
        Self::write_back(&mut tx, id, &prospect).await?;

        mutation::record_create(
            &mut tx,
            ctx,
            EntityKind::Account,
            account.id,
            Some(serde_json::json!({ "converted_from_prospect": id })),
        )
        .await?;
        mutation::record_field_changes(
            &mut tx,
            ctx,
            EntityKind::Prospect,
            id,
            &[Change {
                field: "converted_account_id",
                old: NULL_SENTINEL.to_string(),
                new: account.id.to_audit_string(),
            }],
        )
        .await?;

        tx.commit().await?;
        Ok(ConvertOutcome::Converted(account))
    }

    /// Write a prospect's full column set back inside an open transaction.
    async fn write_back(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        prospect: &Prospect,
    ) -> Result<Prospect, sqlx::Error> {
        let query = format!(
            "UPDATE prospects SET
                first_name = $2, last_name = $3, business_name = $4,
                email = $5, phone = $6, source = $7, source_detail = $8,
                lob_interest = $9, estimated_premium = $10,
                current_carrier = $11, current_expiration = $12,
                pipeline_stage = $13, assigned_producer_id = $14,
                zip_code = $15, county = $16, closed_at = $17,
                close_reason = $18, converted_account_id = $19,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prospect>(&query)
            .bind(id)
            .bind(&prospect.first_name)
            .bind(&prospect.last_name)
            .bind(&prospect.business_name)
            .bind(&prospect.email)
            .bind(&prospect.phone)
            .bind(&prospect.source)
            .bind(&prospect.source_detail)
            .bind(&prospect.lob_interest)
            .bind(prospect.estimated_premium)
            .bind(&prospect.current_carrier)
            .bind(prospect.current_expiration)
            .bind(&prospect.pipeline_stage)
            .bind(prospect.assigned_producer_id)
            .bind(&prospect.zip_code)
            .bind(&prospect.county)
            .bind(prospect.closed_at)
            .bind(&prospect.close_reason)
            .bind(prospect.converted_account_id)
            .fetch_one(&mut **tx)
            .await
    }
}

fn closed_stages() -> Vec<String> {
    PROSPECT_CLOSED_STAGES.iter().map(|s| s.to_string()).collect()
}

/// Append WHERE conditions shared by the list and count queries.
fn push_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    params: &ProspectListParams,
    scope: Option<DbId>,
) {
    if let Some(ref stage) = params.pipeline_stage {
        qb.push(" AND pipeline_stage = ").push_bind(stage.clone());
    }
    if let Some(ref source) = params.source {
        qb.push(" AND source = ").push_bind(source.clone());
    }
    if let Some(producer_id) = params.assigned_producer_id {
        qb.push(" AND assigned_producer_id = ").push_bind(producer_id);
    }
    if let Some(ref search) = params.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (first_name || ' ' || last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR business_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(producer_id) = scope {
        qb.push(" AND assigned_producer_id = ").push_bind(producer_id);
    }
}
