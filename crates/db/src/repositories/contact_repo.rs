//! Repository for the `contacts` table.

use sqlx::PgPool;

use sentinel_core::audit::EntityKind;
use sentinel_core::types::DbId;

use crate::models::contact::{Contact, CreateContact, UpdateContact};

use super::mutation::{self, patch_field, AuditContext};

/// Column list for `contacts` queries.
const COLUMNS: &str = "\
    id, account_id, first_name, last_name, email, phone, mobile_phone, role, \
    is_primary, communication_preference, date_of_birth, created_at, updated_at";

/// Provides audited CRUD operations for contacts.
pub struct ContactRepo;

impl ContactRepo {
    /// Create a contact and its Create audit entry in one transaction.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        input: &CreateContact,
    ) -> Result<Contact, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO contacts
                (account_id, first_name, last_name, email, phone, mobile_phone,
                 role, is_primary, communication_preference, date_of_birth)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(input.account_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.mobile_phone)
            .bind(&input.role)
            .bind(input.is_primary.unwrap_or(false))
            .bind(&input.communication_preference)
            .bind(input.date_of_birth)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::Contact, contact.id, None).await?;
        tx.commit().await?;
        Ok(contact)
    }

    /// Find a contact by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an account's contacts, primary contact first.
    pub async fn list_by_account(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts
             WHERE account_id = $1
             ORDER BY is_primary DESC, last_name"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(account_id)
            .fetch_all(pool)
            .await
    }

    /// Update a contact with per-field diffing and audit entries.
    pub async fn update(
        pool: &PgPool,
        ctx: &AuditContext,
        id: DbId,
        patch: &UpdateContact,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1");
        let Some(mut contact) = sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let mut changes = Vec::new();
        patch_field!(changes, contact, patch, first_name);
        patch_field!(changes, contact, patch, last_name);
        patch_field!(changes, contact, patch, opt email);
        patch_field!(changes, contact, patch, opt phone);
        patch_field!(changes, contact, patch, opt mobile_phone);
        patch_field!(changes, contact, patch, opt role);
        patch_field!(changes, contact, patch, is_primary);
        patch_field!(changes, contact, patch, opt communication_preference);
        patch_field!(changes, contact, patch, opt date_of_birth);

        if changes.is_empty() {
            return Ok(Some(contact));
        }

        let query = format!(
            "UPDATE contacts SET
                first_name = $2, last_name = $3, email = $4, phone = $5,
                mobile_phone = $6, role = $7, is_primary = $8,
                communication_preference = $9, date_of_birth = $10,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let contact = sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.mobile_phone)
            .bind(&contact.role)
            .bind(contact.is_primary)
            .bind(&contact.communication_preference)
            .bind(contact.date_of_birth)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_field_changes(&mut tx, ctx, EntityKind::Contact, id, &changes).await?;
        tx.commit().await?;
        Ok(Some(contact))
    }
}
