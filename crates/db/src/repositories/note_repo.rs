//! Repositories for the `notes` and `communication_logs` tables.

use sqlx::PgPool;

use sentinel_core::audit::EntityKind;
use sentinel_core::types::DbId;

use crate::models::note::{CommunicationLog, CreateCommunicationLog, CreateNote, Note};

use super::mutation::{self, AuditContext};

/// Column list for `notes` queries.
const NOTE_COLUMNS: &str =
    "id, content, linked_entity_type, linked_entity_id, created_by, created_at";

/// Column list for `communication_logs` queries.
const COMM_COLUMNS: &str = "\
    id, direction, channel, subject, body_preview, linked_entity_type, \
    linked_entity_id, contact_id, user_id, call_duration_seconds, sent_at, \
    logged_at";

/// Provides operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Create a note and its Create audit entry in one transaction.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        input: &CreateNote,
    ) -> Result<Note, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO notes
                (content, linked_entity_type, linked_entity_id, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {NOTE_COLUMNS}"
        );
        let note = sqlx::query_as::<_, Note>(&query)
            .bind(&input.content)
            .bind(&input.linked_entity_type)
            .bind(input.linked_entity_id)
            .bind(ctx.actor_id)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::Note, note.id, None).await?;
        tx.commit().await?;
        Ok(note)
    }

    /// List notes attached to one entity, newest first.
    pub async fn list_by_linked(
        pool: &PgPool,
        linked_entity_type: &str,
        linked_entity_id: DbId,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE linked_entity_type = $1 AND linked_entity_id = $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(linked_entity_type)
            .bind(linked_entity_id)
            .fetch_all(pool)
            .await
    }
}

/// Provides operations for communication logs.
pub struct CommLogRepo;

impl CommLogRepo {
    /// Log a communication and its Create audit entry in one transaction.
    pub async fn create(
        pool: &PgPool,
        ctx: &AuditContext,
        input: &CreateCommunicationLog,
    ) -> Result<CommunicationLog, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO communication_logs
                (direction, channel, subject, body_preview,
                 linked_entity_type, linked_entity_id, contact_id, user_id,
                 call_duration_seconds, sent_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COMM_COLUMNS}"
        );
        let log = sqlx::query_as::<_, CommunicationLog>(&query)
            .bind(&input.direction)
            .bind(&input.channel)
            .bind(&input.subject)
            .bind(&input.body_preview)
            .bind(&input.linked_entity_type)
            .bind(input.linked_entity_id)
            .bind(input.contact_id)
            .bind(ctx.actor_id)
            .bind(input.call_duration_seconds)
            .bind(input.sent_at)
            .fetch_one(&mut *tx)
            .await?;

        mutation::record_create(&mut tx, ctx, EntityKind::CommunicationLog, log.id, None)
            .await?;
        tx.commit().await?;
        Ok(log)
    }

    /// List communications attached to one entity, newest first, optionally
    /// filtered by channel.
    pub async fn list_by_linked(
        pool: &PgPool,
        linked_entity_type: &str,
        linked_entity_id: DbId,
        channel: Option<&str>,
    ) -> Result<Vec<CommunicationLog>, sqlx::Error> {
        match channel {
            Some(channel) => {
                let query = format!(
                    "SELECT {COMM_COLUMNS} FROM communication_logs
                     WHERE linked_entity_type = $1 AND linked_entity_id = $2
                       AND channel = $3
                     ORDER BY logged_at DESC"
                );
                sqlx::query_as::<_, CommunicationLog>(&query)
                    .bind(linked_entity_type)
                    .bind(linked_entity_id)
                    .bind(channel)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COMM_COLUMNS} FROM communication_logs
                     WHERE linked_entity_type = $1 AND linked_entity_id = $2
                     ORDER BY logged_at DESC"
                );
                sqlx::query_as::<_, CommunicationLog>(&query)
                    .bind(linked_entity_type)
                    .bind(linked_entity_id)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
