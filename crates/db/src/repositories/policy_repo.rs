//! Repositories for the `policies` and `installments` tables.

use sqlx::{PgPool, Postgres, QueryBuilder};

use sentinel_core::audit::EntityKind;
use sentinel_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use sentinel_core::types::DbId;

use crate::models::policy::{
    CreateInstallment, CreatePolicy, Installment, Policy, PolicyListParams, PolicyRow,
    UpdateInstallment, UpdatePolicy,
};
use crate::models::Page;

use super::mutation::{self, patch_field, AuditContext};

/// Column list for `policies` queries.
const COLUMNS: &str = "\
    id, account_id, carrier_id, line_of_business, policy_number, \
    effective_date, expiration_date, premium, payment_plan, renewal_status, \
    status, servicing_owner_id, producing_agent_id, prior_policy_id, \
    created_at, updated_at";

/// Qualified column list for joined `policies` queries.
const JOINED_COLUMNS: &str = "\
    p.id, p.account_id, p.carrier_id, p.line_of_business, p.policy_number, \
    p.effective_date, p.expiration_date, p.premium, p.payment_plan, \
    p.renewal_status, p.status, p.servicing_owner_id, p.producing_agent_id, \
    p.prior_policy_id, p.created_at, p.updated_at, \
    c.name AS carrier_name, a.name AS account_name";

/// Column list for `installments` queries.
const INSTALLMENT_COLUMNS: &str = "\
    id, policy_id, due_date, amount, status, payment_method, paid_date, \
    created_at, updated_at";

/// Provides audited CRUD operations for policies.
pub struct PolicyRepo;

impl PolicyRepo {
    /// Create a policy and its Create audit entry in one transaction.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        input: &CreatePolicy,
    ) -> Result<Policy, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO policies
                (account_id, carrier_id, line_of_business, policy_number,
                 effective_date, expiration_date, premium, payment_plan,
                 status, servicing_owner_id, producing_agent_id,
                 prior_policy_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        let policy = sqlx::query_as::<_, Policy>(&query)
            .bind(input.account_id)
            .bind(input.carrier_id)
            .bind(&input.line_of_business)
            .bind(&input.policy_number)
            .bind(input.effective_date)
            .bind(input.expiration_date)
            .bind(input.premium)
            .bind(&input.payment_plan)
            .bind(input.status.as_deref().unwrap_or("Active"))
            .bind(input.servicing_owner_id)
            .bind(input.producing_agent_id)
            .bind(input.prior_policy_id)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::Policy, policy.id, None).await?;
        tx.commit().await?;
        Ok(policy)
    }

    /// Find a policy with joined carrier/account names.
    pub async fn find_row_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PolicyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM policies p
             LEFT JOIN carriers c ON p.carrier_id = c.id
             LEFT JOIN accounts a ON p.account_id = a.id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, PolicyRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List policies with filters and pagination, ordered by expiration.
    pub async fn list(
        pool: &PgPool,
        params: &PolicyListParams,
    ) -> Result<Page<PolicyRow>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);

        let mut qb = QueryBuilder::new(format!(
            "SELECT {JOINED_COLUMNS} FROM policies p
             LEFT JOIN carriers c ON p.carrier_id = c.id
             LEFT JOIN accounts a ON p.account_id = a.id
             WHERE 1=1"
        ));
        push_filters(&mut qb, params);
        qb.push(" ORDER BY p.expiration_date LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let items = qb.build_query_as::<PolicyRow>().fetch_all(pool).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM policies p WHERE 1=1");
        push_filters(&mut count_qb, params);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        Ok(Page { items, total })
    }

    /// Update a policy with per-field diffing and audit entries.
    pub async fn update(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
        patch: &UpdatePolicy,
    ) -> Result<Option<Policy>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM policies WHERE id = $1");
        let Some(mut policy) = sqlx::query_as::<_, Policy>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut changes = Vec::new();
        patch_field!(changes, policy, patch, opt carrier_id);
        patch_field!(changes, policy, patch, line_of_business);
        patch_field!(changes, policy, patch, opt policy_number);
        patch_field!(changes, policy, patch, effective_date);
        patch_field!(changes, policy, patch, expiration_date);
        patch_field!(changes, policy, patch, opt premium);
        patch_field!(changes, policy, patch, opt payment_plan);
        patch_field!(changes, policy, patch, renewal_status);
        patch_field!(changes, policy, patch, status);
        patch_field!(changes, policy, patch, opt servicing_owner_id);
        patch_field!(changes, policy, patch, opt producing_agent_id);

        if changes.is_empty() {
            return Ok(Some(policy));
        }

        let query = format!(
            "UPDATE policies SET
                carrier_id = $2, line_of_business = $3, policy_number = $4,
                effective_date = $5, expiration_date = $6, premium = $7,
                payment_plan = $8, renewal_status = $9, status = $10,
                servicing_owner_id = $11, producing_agent_id = $12,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let policy = sqlx::query_as::<_, Policy>(&query)
            .bind(id)
            .bind(policy.carrier_id)
            .bind(&policy.line_of_business)
            .bind(&policy.policy_number)
            .bind(policy.effective_date)
            .bind(policy.expiration_date)
            .bind(policy.premium)
            .bind(&policy.payment_plan)
            .bind(&policy.renewal_status)
            .bind(&policy.status)
            .bind(policy.servicing_owner_id)
            .bind(policy.producing_agent_id)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_field_changes(&mut tx, ctx, EntityKind::Policy, id, &changes).await?;
        tx.commit().await?;
        Ok(Some(policy))
    }
}

/// Provides audited operations for policy installments.
pub struct InstallmentRepo;

impl InstallmentRepo {
    /// List a policy's installments by due date.
    pub async fn list_by_policy(
        pool: &PgPool,
        policy_id: DbId,
    ) -> Result<Vec<Installment>, sqlx::Error> {
        let query = format!(
            "SELECT {INSTALLMENT_COLUMNS} FROM installments
             WHERE policy_id = $1
             ORDER BY due_date"
        );
        sqlx::query_as::<_, Installment>(&query)
            .bind(policy_id)
            .fetch_all(pool)
            .await
    }

    /// Create an installment and its Create audit entry in one transaction.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        policy_id: DbId,
        input: &CreateInstallment,
    ) -> Result<Installment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO installments
                (policy_id, due_date, amount, status, payment_method)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {INSTALLMENT_COLUMNS}"
        );
        let installment = sqlx::query_as::<_, Installment>(&query)
            .bind(policy_id)
            .bind(input.due_date)
            .bind(input.amount)
            .bind(input.status.as_deref().unwrap_or("Scheduled"))
            .bind(&input.payment_method)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::Installment, installment.id, None)
            .await?;
        tx.commit().await?;
        Ok(installment)
    }

    /// Update an installment with per-field diffing and audit entries.
    pub async fn update(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
        patch: &UpdateInstallment,
    ) -> Result<Option<Installment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {INSTALLMENT_COLUMNS} FROM installments WHERE id = $1");
        let Some(mut installment) = sqlx::query_as::<_, Installment>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut changes = Vec::new();
        patch_field!(changes, installment, patch, due_date);
        patch_field!(changes, installment, patch, amount);
        patch_field!(changes, installment, patch, status);
        patch_field!(changes, installment, patch, opt payment_method);
        patch_field!(changes, installment, patch, opt paid_date);

        if changes.is_empty() {
            return Ok(Some(installment));
        }

        let query = format!(
            "UPDATE installments SET
                due_date = $2, amount = $3, status = $4, payment_method = $5,
                paid_date = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {INSTALLMENT_COLUMNS}"
        );
        let installment = sqlx::query_as::<_, Installment>(&query)
            .bind(id)
            .bind(installment.due_date)
            .bind(installment.amount)
            .bind(&installment.status)
            .bind(&installment.payment_method)
            .bind(installment.paid_date)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_field_changes(&mut tx, ctx, EntityKind::Installment, id, &changes)
            .await?;
        tx.commit().await?;
        Ok(Some(installment))
    }
}

/// Append WHERE conditions shared by the list and count queries.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, params: &PolicyListParams) {
    if let Some(account_id) = params.account_id {
        qb.push(" AND p.account_id = ").push_bind(account_id);
    }
    if let Some(ref lob) = params.line_of_business {
        qb.push(" AND p.line_of_business = ").push_bind(lob.clone());
    }
    if let Some(carrier_id) = params.carrier_id {
        qb.push(" AND p.carrier_id = ").push_bind(carrier_id);
    }
    if let Some(ref status) = params.status {
        qb.push(" AND p.status = ").push_bind(status.clone());
    }
    if let Some(before) = params.expiring_before {
        qb.push(" AND p.expiration_date <= ").push_bind(before);
    }
    if let Some(after) = params.expiring_after {
        qb.push(" AND p.expiration_date >= ").push_bind(after);
    }
}
