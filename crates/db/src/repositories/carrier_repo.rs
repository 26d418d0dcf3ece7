//! Repository for the `carriers` and `carrier_contacts` tables.

use sqlx::PgPool;

use sentinel_core::audit::EntityKind;
use sentinel_core::types::DbId;

use crate::models::carrier::{Carrier, CarrierContact, CreateCarrier, CreateCarrierContact};

use super::mutation::{self, AuditContext};

/// Column list for `carriers` queries.
const COLUMNS: &str = "\
    id, name, carrier_type, phone, email, portal_url, appetite_notes, \
    am_best_rating, created_at, updated_at";

/// Column list for `carrier_contacts` queries.
const CONTACT_COLUMNS: &str =
    "id, carrier_id, name, title, email, phone, specialty_lobs, notes, created_at";

/// Provides operations for carriers and their contacts.
pub struct CarrierRepo;

impl CarrierRepo {
    /// Create a carrier and its Create audit entry in one transaction.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        input: &CreateCarrier,
    ) -> Result<Carrier, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO carriers
                (name, carrier_type, phone, email, portal_url, appetite_notes,
                 am_best_rating)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let carrier = sqlx::query_as::<_, Carrier>(&query)
            .bind(&input.name)
            .bind(&input.carrier_type)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.portal_url)
            .bind(&input.appetite_notes)
            .bind(&input.am_best_rating)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::Carrier, carrier.id, None).await?;
        tx.commit().await?;
        Ok(carrier)
    }

    /// Find a carrier by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Carrier>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM carriers WHERE id = $1");
        sqlx::query_as::<_, Carrier>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List carriers, optionally filtered by a name search.
    pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<Carrier>, sqlx::Error> {
        match search {
            Some(term) => {
                let query =
                    format!("SELECT {COLUMNS} FROM carriers WHERE name ILIKE $1 ORDER BY name");
                sqlx::query_as::<_, Carrier>(&query)
                    .bind(format!("%{term}%"))
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM carriers ORDER BY name");
                sqlx::query_as::<_, Carrier>(&query).fetch_all(pool).await
            }
        }
    }

    /// List a carrier's contacts.
    pub async fn list_contacts(
        pool: &PgPool,
        carrier_id: DbId,
    ) -> Result<Vec<CarrierContact>, sqlx::Error> {
        let query = format!(
            "SELECT {CONTACT_COLUMNS} FROM carrier_contacts
             WHERE carrier_id = $1
             ORDER BY name"
        );
        sqlx::query_as::<_, CarrierContact>(&query)
            .bind(carrier_id)
            .fetch_all(pool)
            .await
    }

    /// Create a carrier contact and its Create audit entry in one transaction.
    pub async fn create_contact(
        pool: &PgPool,
        ctx: &AuditContext,
        carrier_id: DbId,
        input: &CreateCarrierContact,
    ) -> Result<CarrierContact, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO carrier_contacts
                (carrier_id, name, title, email, phone, specialty_lobs, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {CONTACT_COLUMNS}"
        );
        let contact = sqlx::query_as::<_, CarrierContact>(&query)
            .bind(carrier_id)
            .bind(&input.name)
            .bind(&input.title)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.specialty_lobs)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::CarrierContact, contact.id, None)
            .await?;
        tx.commit().await?;
        Ok(contact)
    }
}
