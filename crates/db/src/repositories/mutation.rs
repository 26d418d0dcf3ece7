//! Shared machinery for the audited mutation pipeline.
//!
//! Every mutating repository operation runs fetch → diff → apply → audit
//! inside a single transaction. The helpers here write the audit rows
//! against that open transaction only, so an entry can never exist for a
//! change that rolled back, and a committed change always carries its
//! entries.

use sqlx::{Postgres, Transaction};

use sentinel_core::audit::{AuditAction, EntityKind};
use sentinel_core::diff::Change;
use sentinel_core::types::DbId;

/// Request metadata threaded into every write path for audit enrichment.
///
/// `actor_id` is `None` for system-initiated actions.
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub actor_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl AuditContext {
    pub fn for_actor(actor_id: DbId) -> Self {
        Self {
            actor_id: Some(actor_id),
            ..Self::default()
        }
    }
}

/// Columns written for every audit insert.
const INSERT_COLUMNS: &str = "\
    user_id, action, entity_type, entity_id, field_changed, \
    old_value, new_value, ip_address, user_agent, metadata_json";

/// Number of bind parameters per audit row.
const INSERT_PARAMS: usize = 10;

/// Record a Create entry for a newly persisted entity.
pub async fn record_create(
    tx: &mut Transaction<'_, Postgres>,
    ctx: &AuditContext,
    entity: EntityKind,
    entity_id: DbId,
    metadata: Option<serde_json::Value>,
) -> Result<(), sqlx::Error> {
    insert_entry(
        tx,
        ctx,
        AuditAction::Create,
        entity,
        entity_id,
        None,
        None,
        None,
        metadata,
    )
    .await
}

/// Record a Delete entry. Must run before the row is removed, in the same
/// transaction as the DELETE.
pub async fn record_delete(
    tx: &mut Transaction<'_, Postgres>,
    ctx: &AuditContext,
    entity: EntityKind,
    entity_id: DbId,
) -> Result<(), sqlx::Error> {
    insert_entry(
        tx,
        ctx,
        AuditAction::Delete,
        entity,
        entity_id,
        None,
        None,
        None,
        None,
    )
    .await
}

/// Record a Login entry for a user.
pub async fn record_login(
    tx: &mut Transaction<'_, Postgres>,
    ctx: &AuditContext,
    user_id: DbId,
) -> Result<(), sqlx::Error> {
    insert_entry(
        tx,
        ctx,
        AuditAction::Login,
        EntityKind::User,
        user_id,
        None,
        None,
        None,
        None,
    )
    .await
}

/// Record one Update entry per field change, as a single multi-row INSERT.
///
/// No-op when `changes` is empty: a request that changed nothing leaves no
/// trace in the trail.
pub async fn record_field_changes(
    tx: &mut Transaction<'_, Postgres>,
    ctx: &AuditContext,
    entity: EntityKind,
    entity_id: DbId,
    changes: &[Change],
) -> Result<(), sqlx::Error> {
    if changes.is_empty() {
        return Ok(());
    }

    let mut query = format!("INSERT INTO audit_logs ({INSERT_COLUMNS}) VALUES ");
    let mut param = 1usize;
    for i in 0..changes.len() {
        if i > 0 {
            query.push_str(", ");
        }
        query.push('(');
        for j in 0..INSERT_PARAMS {
            if j > 0 {
                query.push_str(", ");
            }
            query.push_str(&format!("${param}"));
            param += 1;
        }
        query.push(')');
    }

    let mut q = sqlx::query(&query);
    for change in changes {
        q = q
            .bind(ctx.actor_id)
            .bind(AuditAction::Update.as_str())
            .bind(entity.as_str())
            .bind(entity_id)
            .bind(change.field)
            .bind(&change.old)
            .bind(&change.new)
            .bind(&ctx.ip_address)
            .bind(&ctx.user_agent)
            .bind(None::<serde_json::Value>);
    }

    q.execute(&mut **tx).await?;

    tracing::debug!(
        entity = entity.as_str(),
        %entity_id,
        fields = changes.len(),
        "Recorded field-level audit entries"
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn insert_entry(
    tx: &mut Transaction<'_, Postgres>,
    ctx: &AuditContext,
    action: AuditAction,
    entity: EntityKind,
    entity_id: DbId,
    field_changed: Option<&str>,
    old_value: Option<&str>,
    new_value: Option<&str>,
    metadata: Option<serde_json::Value>,
) -> Result<(), sqlx::Error> {
    let query = format!(
        "INSERT INTO audit_logs ({INSERT_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
    );
    sqlx::query(&query)
        .bind(ctx.actor_id)
        .bind(action.as_str())
        .bind(entity.as_str())
        .bind(entity_id)
        .bind(field_changed)
        .bind(old_value)
        .bind(new_value)
        .bind(&ctx.ip_address)
        .bind(&ctx.user_agent)
        .bind(metadata)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Diff one patch field against the loaded row, applying the new value and
/// collecting a [`Change`] only when the value actually differs.
///
/// Two arms: plain for NOT NULL columns (`row.field: T`, patch `Option<T>`),
/// `opt` for nullable columns (`row.field: Option<T>`). An absent patch
/// field touches nothing.
macro_rules! patch_field {
    ($changes:ident, $row:ident, $patch:ident, $field:ident) => {
        if let Some(ref new_value) = $patch.$field {
            if let Some(change) = ::sentinel_core::diff::diff_field(
                stringify!($field),
                &$row.$field,
                new_value,
            ) {
                $row.$field = new_value.clone();
                $changes.push(change);
            }
        }
    };
    ($changes:ident, $row:ident, $patch:ident, opt $field:ident) => {
        if let Some(ref new_value) = $patch.$field {
            let candidate = Some(new_value.clone());
            if let Some(change) = ::sentinel_core::diff::diff_field(
                stringify!($field),
                &$row.$field,
                &candidate,
            ) {
                $row.$field = candidate;
                $changes.push(change);
            }
        }
    };
}

pub(crate) use patch_field;
