//! Repository for the `accounts` table.

use sqlx::{PgPool, Postgres, QueryBuilder};

use sentinel_core::audit::EntityKind;
use sentinel_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use sentinel_core::types::DbId;

use crate::models::account::{Account, AccountListParams, CreateAccount, UpdateAccount};
use crate::models::Page;

use super::mutation::{self, patch_field, AuditContext};

/// Column list for `accounts` queries.
const COLUMNS: &str = "\
    id, name, account_type, status, primary_contact_id, assigned_producer_id, \
    assigned_csr_id, address_line1, address_line2, city, state, zip_code, \
    county, phone, email, created_at, updated_at";

/// Provides audited CRUD operations for accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Create an account and its Create audit entry in one transaction.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        input: &CreateAccount,
    ) -> Result<Account, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO accounts
                (name, account_type, status, primary_contact_id,
                 assigned_producer_id, assigned_csr_id, address_line1,
                 address_line2, city, state, zip_code, county, phone, email)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(&input.name)
            .bind(&input.account_type)
            .bind(input.status.as_deref().unwrap_or("Active"))
            .bind(input.primary_contact_id)
            .bind(input.assigned_producer_id)
            .bind(input.assigned_csr_id)
            .bind(&input.address_line1)
            .bind(&input.address_line2)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.county)
            .bind(&input.phone)
            .bind(&input.email)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::Account, account.id, None).await?;
        tx.commit().await?;
        Ok(account)
    }

    /// Find an account by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List accounts with filters and pagination.
    ///
    /// `scope` restricts results to one assigned producer (Producer role).
    pub async fn list(
        pool: &PgPool,
        params: &AccountListParams,
        scope: Option<DbId>,
    ) -> Result<Page<Account>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);

        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM accounts WHERE 1=1"));
        push_filters(&mut qb, params, scope);
        qb.push(" ORDER BY name LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let items = qb.build_query_as::<Account>().fetch_all(pool).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM accounts WHERE 1=1");
        push_filters(&mut count_qb, params, scope);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        Ok(Page { items, total })
    }

    /// Update an account: diff each submitted field, write only real changes,
    /// and record one Update audit entry per changed field — all in one
    /// transaction. Returns `None` when the account does not exist.
    pub async fn update(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
        patch: &UpdateAccount,
    ) -> Result<Option<Account>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        let Some(mut account) = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut changes = Vec::new();
        patch_field!(changes, account, patch, name);
        patch_field!(changes, account, patch, account_type);
        patch_field!(changes, account, patch, status);
        patch_field!(changes, account, patch, opt primary_contact_id);
        patch_field!(changes, account, patch, opt assigned_producer_id);
        patch_field!(changes, account, patch, opt assigned_csr_id);
        patch_field!(changes, account, patch, opt address_line1);
        patch_field!(changes, account, patch, opt address_line2);
        patch_field!(changes, account, patch, opt city);
        patch_field!(changes, account, patch, opt state);
        patch_field!(changes, account, patch, opt zip_code);
        patch_field!(changes, account, patch, opt county);
        patch_field!(changes, account, patch, opt phone);
        patch_field!(changes, account, patch, opt email);

        if changes.is_empty() {
            // No-op edit: nothing written, nothing audited.
            return Ok(Some(account));
        }

        let query = format!(
            "UPDATE accounts SET
                name = $2, account_type = $3, status = $4,
                primary_contact_id = $5, assigned_producer_id = $6,
                assigned_csr_id = $7, address_line1 = $8, address_line2 = $9,
                city = $10, state = $11, zip_code = $12, county = $13,
                phone = $14, email = $15, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(&account.name)
            .bind(&account.account_type)
            .bind(&account.status)
            .bind(account.primary_contact_id)
            .bind(account.assigned_producer_id)
            .bind(account.assigned_csr_id)
            .bind(&account.address_line1)
            .bind(&account.address_line2)
            .bind(&account.city)
            .bind(&account.state)
            .bind(&account.zip_code)
            .bind(&account.county)
            .bind(&account.phone)
            .bind(&account.email)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_field_changes(&mut tx, ctx, EntityKind::Account, id, &changes).await?;
        tx.commit().await?;
        Ok(Some(account))
    }

    /// Delete an account, writing the Delete audit entry before the row is
    /// removed, in the same transaction. Returns `false` if the id is absent.
    pub async fn delete(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(false);
        }

        mutation::record_delete(&mut tx, ctx, EntityKind::Account, id).await?;
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

/// Append WHERE conditions shared by the list and count queries.
fn push_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    params: &AccountListParams,
    scope: Option<DbId>,
) {
    if let Some(ref search) = params.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR phone ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(ref account_type) = params.account_type {
        qb.push(" AND account_type = ").push_bind(account_type.clone());
    }
    if let Some(ref status) = params.status {
        qb.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(ref zip_code) = params.zip_code {
        qb.push(" AND zip_code = ").push_bind(zip_code.clone());
    }
    if let Some(ref county) = params.county {
        qb.push(" AND county ILIKE ").push_bind(format!("%{county}%"));
    }
    if let Some(producer_id) = scope {
        qb.push(" AND assigned_producer_id = ").push_bind(producer_id);
    }
}
