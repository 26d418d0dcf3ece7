//! Integration tests for the audited mutation pipeline.
//!
//! Exercises the repository layer against a real database: create/update/
//! delete audit entries, per-field diffing, no-op idempotence, completion
//! stamps, and prospect conversion.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use sqlx::PgPool;

use sentinel_db::models::account::{CreateAccount, UpdateAccount};
use sentinel_db::models::prospect::{ConvertOutcome, CreateProspect, UpdateProspect};
use sentinel_db::models::service_item::{CreateServiceItem, UpdateServiceItem};
use sentinel_db::models::task::{CreateTask, UpdateTask};
use sentinel_db::repositories::{
    AccountRepo, AuditContext, ProspectRepo, ServiceItemRepo, TaskRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn test_actor(pool: &PgPool) -> AuditContext {
    let user = UserRepo::create(
        pool,
        &AuditContext::default(),
        &format!("actor-{}@example.com", uuid::Uuid::new_v4()),
        "Test Actor",
        "not-a-real-hash",
        "CSR",
    )
    .await
    .expect("user creation should succeed");

    AuditContext {
        actor_id: Some(user.id),
        ip_address: Some("203.0.113.7".to_string()),
        user_agent: Some("pipeline-tests".to_string()),
    }
}

fn new_account(name: &str) -> CreateAccount {
    CreateAccount {
        name: name.to_string(),
        account_type: "Personal".to_string(),
        status: None,
        primary_contact_id: None,
        assigned_producer_id: None,
        assigned_csr_id: None,
        address_line1: None,
        address_line2: None,
        city: None,
        state: None,
        zip_code: None,
        county: None,
        phone: None,
        email: None,
    }
}

fn new_prospect(first: &str, last: &str) -> CreateProspect {
    CreateProspect {
        first_name: first.to_string(),
        last_name: last.to_string(),
        business_name: None,
        email: None,
        phone: None,
        source: None,
        source_detail: None,
        referrer_account_id: None,
        lob_interest: None,
        estimated_premium: None,
        current_carrier: None,
        current_expiration: None,
        assigned_producer_id: None,
        zip_code: None,
        county: None,
    }
}

async fn audit_count(
    pool: &PgPool,
    entity_type: &str,
    entity_id: uuid::Uuid,
    action: &str,
) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM audit_logs
         WHERE entity_type = $1 AND entity_id = $2 AND action = $3",
    )
    .bind(entity_type)
    .bind(entity_id)
    .bind(action)
    .fetch_one(pool)
    .await
    .expect("audit count query should succeed")
}

// ---------------------------------------------------------------------------
// Create / update / delete entries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_writes_exactly_one_create_entry(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let account = AccountRepo::create(&pool, &ctx, &new_account("Quarry Lane LLC"))
        .await
        .unwrap();

    assert_eq!(account.status, "Active", "status should default");
    assert_eq!(audit_count(&pool, "Account", account.id, "Create").await, 1);
    assert_eq!(audit_count(&pool, "Account", account.id, "Update").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_writes_one_entry_per_changed_field(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let account = AccountRepo::create(&pool, &ctx, &new_account("Harbor & Sons"))
        .await
        .unwrap();

    let patch = UpdateAccount {
        status: Some("Inactive".to_string()),
        phone: Some("555-0100".to_string()),
        ..UpdateAccount::default()
    };
    let updated = AccountRepo::update(&pool, &ctx, account.id, &patch)
        .await
        .unwrap()
        .expect("account should exist");

    assert_eq!(updated.status, "Inactive");
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    assert_eq!(audit_count(&pool, "Account", account.id, "Update").await, 2);

    // The phone entry records the null sentinel as its old value.
    let (old_value, new_value): (Option<String>, Option<String>) = sqlx::query_as(
        "SELECT old_value, new_value FROM audit_logs
         WHERE entity_type = 'Account' AND entity_id = $1
           AND field_changed = 'phone'",
    )
    .bind(account.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(old_value.as_deref(), Some("null"));
    assert_eq!(new_value.as_deref(), Some("555-0100"));
}

#[sqlx::test(migrations = "./migrations")]
async fn noop_update_writes_nothing_and_is_idempotent(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let account = AccountRepo::create(&pool, &ctx, &new_account("Stillwater Farms"))
        .await
        .unwrap();

    let patch = UpdateAccount {
        name: Some("Stillwater Farms".to_string()),
        account_type: Some("Personal".to_string()),
        ..UpdateAccount::default()
    };

    let first = AccountRepo::update(&pool, &ctx, account.id, &patch)
        .await
        .unwrap()
        .unwrap();
    let second = AccountRepo::update(&pool, &ctx, account.id, &patch)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.updated_at, account.updated_at, "no write should occur");
    assert_eq!(second.updated_at, account.updated_at);
    assert_eq!(audit_count(&pool, "Account", account.id, "Update").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn absent_fields_are_left_untouched(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let mut input = new_account("Gable Roofing");
    input.email = Some("office@gable.example".to_string());
    let account = AccountRepo::create(&pool, &ctx, &input).await.unwrap();

    let patch = UpdateAccount {
        phone: Some("555-0199".to_string()),
        ..UpdateAccount::default()
    };
    let updated = AccountRepo::update(&pool, &ctx, account.id, &patch)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.email.as_deref(), Some("office@gable.example"));
    assert_eq!(audit_count(&pool, "Account", account.id, "Update").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_writes_entry_and_removes_row(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let account = AccountRepo::create(&pool, &ctx, &new_account("Closing Shop"))
        .await
        .unwrap();

    let deleted = AccountRepo::delete(&pool, &ctx, account.id).await.unwrap();
    assert!(deleted);

    assert_eq!(audit_count(&pool, "Account", account.id, "Delete").await, 1);
    assert!(AccountRepo::find_by_id(&pool, account.id)
        .await
        .unwrap()
        .is_none());

    // Deleting again reports absence.
    let deleted_again = AccountRepo::delete(&pool, &ctx, account.id).await.unwrap();
    assert!(!deleted_again);
}

// ---------------------------------------------------------------------------
// Completion stamps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn completing_a_task_stamps_completed_at(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let task = TaskRepo::create(
        &pool,
        &ctx,
        &CreateTask {
            title: "Call insured about renewal".to_string(),
            description: None,
            linked_entity_type: None,
            linked_entity_id: None,
            assigned_to: None,
            due_date: None,
            priority: None,
            is_recurring: None,
            recurrence_rule: None,
        },
    )
    .await
    .unwrap();
    assert!(task.completed_at.is_none());

    // An update that does not complete the task leaves the stamp unset.
    let patch = UpdateTask {
        priority: Some("High".to_string()),
        ..UpdateTask::default()
    };
    let task = TaskRepo::update(&pool, &ctx, task.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert!(task.completed_at.is_none());

    let patch = UpdateTask {
        status: Some("Completed".to_string()),
        ..UpdateTask::default()
    };
    let task = TaskRepo::update(&pool, &ctx, task.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert!(task.completed_at.is_some());

    // Status plus priority changes so far: one entry each.
    assert_eq!(audit_count(&pool, "Task", task.id, "Update").await, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn closing_a_service_item_stamps_completed_at(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let account = AccountRepo::create(&pool, &ctx, &new_account("Stamp Test Account"))
        .await
        .unwrap();

    let item = ServiceItemRepo::create(
        &pool,
        &ctx,
        &CreateServiceItem {
            item_type: "Renewal".to_string(),
            account_id: account.id,
            policy_id: None,
            description: Some("90-day renewal review".to_string()),
            status: None,
            assigned_to: None,
            due_date: None,
            urgency: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(item.status, "Not Started");
    assert_eq!(item.urgency, "Medium");

    let patch = UpdateServiceItem {
        status: Some("Closed".to_string()),
        ..UpdateServiceItem::default()
    };
    let item = ServiceItemRepo::update(&pool, &ctx, item.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert!(item.completed_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn closing_a_prospect_stamps_closed_at(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let prospect = ProspectRepo::create(&pool, &ctx, &new_prospect("Dana", "Whitfield"))
        .await
        .unwrap();
    assert_eq!(prospect.pipeline_stage, "New Lead");
    assert!(prospect.closed_at.is_none());

    let patch = UpdateProspect {
        pipeline_stage: Some("Closed-Lost".to_string()),
        ..UpdateProspect::default()
    };
    let prospect = ProspectRepo::update(&pool, &ctx, prospect.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert!(prospect.closed_at.is_some());
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn prospect_converts_exactly_once(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let prospect = ProspectRepo::create(&pool, &ctx, &new_prospect("Avery", "Lund"))
        .await
        .unwrap();

    let stage = UpdateProspect {
        pipeline_stage: Some("Closed-Won".to_string()),
        ..UpdateProspect::default()
    };
    ProspectRepo::update(&pool, &ctx, prospect.id, &stage)
        .await
        .unwrap()
        .unwrap();

    let outcome = ProspectRepo::convert(&pool, &ctx, prospect.id).await.unwrap();
    let account = match outcome {
        ConvertOutcome::Converted(account) => account,
        other => panic!("expected conversion, got {other:?}"),
    };
    assert_eq!(account.name, "Avery Lund");
    assert_eq!(account.account_type, "Personal");
    assert_eq!(audit_count(&pool, "Account", account.id, "Create").await, 1);

    // Second attempt conflicts and creates no duplicate account.
    let again = ProspectRepo::convert(&pool, &ctx, prospect.id).await.unwrap();
    assert_matches!(again, ConvertOutcome::AlreadyConverted);

    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 1);

    let converted = ProspectRepo::find_by_id(&pool, prospect.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(converted.converted_account_id, Some(account.id));
    assert_eq!(converted.pipeline_stage, "Closed-Won");
}

#[sqlx::test(migrations = "./migrations")]
async fn business_prospect_converts_to_commercial_account(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let mut input = new_prospect("Riley", "Marsh");
    input.business_name = Some("Marsh Logistics".to_string());
    let prospect = ProspectRepo::create(&pool, &ctx, &input).await.unwrap();

    let outcome = ProspectRepo::convert(&pool, &ctx, prospect.id).await.unwrap();
    match outcome {
        ConvertOutcome::Converted(account) => {
            assert_eq!(account.name, "Marsh Logistics");
            assert_eq!(account.account_type, "Commercial");
        }
        other => panic!("expected conversion, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Audit value stringification at the row level
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn date_fields_audit_in_iso_format(pool: PgPool) {
    let ctx = test_actor(&pool).await;
    let prospect = ProspectRepo::create(&pool, &ctx, &new_prospect("Noor", "Haddad"))
        .await
        .unwrap();

    let patch = UpdateProspect {
        current_expiration: Some(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()),
        ..UpdateProspect::default()
    };
    ProspectRepo::update(&pool, &ctx, prospect.id, &patch)
        .await
        .unwrap()
        .unwrap();

    let (old_value, new_value): (Option<String>, Option<String>) = sqlx::query_as(
        "SELECT old_value, new_value FROM audit_logs
         WHERE entity_type = 'Prospect' AND entity_id = $1
           AND field_changed = 'current_expiration'",
    )
    .bind(prospect.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(old_value.as_deref(), Some("null"));
    assert_eq!(new_value.as_deref(), Some("2026-11-01"));
}
