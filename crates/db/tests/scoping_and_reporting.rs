//! Integration tests for producer scoping and the reporting queries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use sentinel_db::models::account::{AccountListParams, CreateAccount};
use sentinel_db::models::prospect::CreateProspect;
use sentinel_db::models::sales_log::{CreateSalesLogEntry, TrendGroupBy, TrendPeriod};
use sentinel_db::repositories::{
    AccountRepo, AuditContext, DashboardRepo, ProspectRepo, SalesLogRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn make_user(pool: &PgPool, role: &str) -> uuid::Uuid {
    UserRepo::create(
        pool,
        &AuditContext::default(),
        &format!("{}-{}@example.com", role.to_lowercase(), uuid::Uuid::new_v4()),
        "Test User",
        "not-a-real-hash",
        role,
    )
    .await
    .expect("user creation should succeed")
    .id
}

fn account_for(producer: Option<uuid::Uuid>, name: &str) -> CreateAccount {
    CreateAccount {
        name: name.to_string(),
        account_type: "Personal".to_string(),
        status: None,
        primary_contact_id: None,
        assigned_producer_id: producer,
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

fn sale(
    account_id: uuid::Uuid,
    date: NaiveDate,
    lob: &str,
    sale_type: &str,
    premium: i64,
) -> CreateSalesLogEntry {
    CreateSalesLogEntry {
        sale_date: Some(date),
        account_id,
        prospect_id: None,
        policy_id: None,
        line_of_business: lob.to_string(),
        premium: Decimal::new(premium, 0),
        carrier_id: None,
        source: None,
        source_detail: None,
        zip_code: None,
        county: None,
        sale_type: sale_type.to_string(),
        notes: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Producer scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn producer_scope_restricts_account_list(pool: PgPool) {
    let producer_a = make_user(&pool, "Producer").await;
    let producer_b = make_user(&pool, "Producer").await;
    let ctx = AuditContext::for_actor(producer_a);

    AccountRepo::create(&pool, &ctx, &account_for(Some(producer_a), "Mine"))
        .await
        .unwrap();
    AccountRepo::create(&pool, &ctx, &account_for(Some(producer_b), "Theirs"))
        .await
        .unwrap();
    AccountRepo::create(&pool, &ctx, &account_for(None, "Unassigned"))
        .await
        .unwrap();

    let scoped = AccountRepo::list(&pool, &AccountListParams::default(), Some(producer_a))
        .await
        .unwrap();
    assert_eq!(scoped.total, 1);
    assert_eq!(scoped.items[0].name, "Mine");

    let unscoped = AccountRepo::list(&pool, &AccountListParams::default(), None)
        .await
        .unwrap();
    assert_eq!(unscoped.total, 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn pipeline_summary_excludes_closed_stages(pool: PgPool) {
    let producer = make_user(&pool, "Producer").await;
    let ctx = AuditContext::for_actor(producer);

    for (first, stage, premium) in [
        ("Open", "New Lead", 1000),
        ("AlsoOpen", "Quoting", 2500),
        ("Won", "Closed-Won", 9000),
        ("Lost", "Closed-Lost", 4000),
    ] {
        let input = CreateProspect {
            first_name: first.to_string(),
            last_name: "Case".to_string(),
            business_name: None,
            email: None,
            phone: None,
            source: None,
            source_detail: None,
            referrer_account_id: None,
            lob_interest: None,
            estimated_premium: Some(Decimal::new(premium, 0)),
            current_carrier: None,
            current_expiration: None,
            assigned_producer_id: Some(producer),
            zip_code: None,
            county: None,
        };
        let prospect = ProspectRepo::create(&pool, &ctx, &input).await.unwrap();
        if stage != "New Lead" {
            ProspectRepo::update_stage(&pool, &ctx, prospect.id, stage)
                .await
                .unwrap();
        }
    }

    let stages = ProspectRepo::pipeline_summary(&pool, None).await.unwrap();
    let total_count: i64 = stages.iter().map(|s| s.count).sum();
    assert_eq!(total_count, 2, "closed stages must be excluded");
    assert!(stages
        .iter()
        .all(|s| s.pipeline_stage != "Closed-Won" && s.pipeline_stage != "Closed-Lost"));
}

// ---------------------------------------------------------------------------
// Sales summary & quota
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn summary_reports_quota_standing(pool: PgPool) {
    let producer = make_user(&pool, "Producer").await;
    let ctx = AuditContext::for_actor(producer);
    let account = AccountRepo::create(&pool, &ctx, &account_for(None, "Quota Account"))
        .await
        .unwrap();

    let today = date(2026, 3, 10);

    // Five qualifying auto items this month.
    for day in 1..=5 {
        SalesLogRepo::create(
            &pool,
            &ctx,
            producer,
            &sale(account.id, date(2026, 3, day), "Personal Auto", "New Business", 1200),
        )
        .await
        .unwrap();
    }
    // Non-qualifying rows: wrong line, wrong sale type, wrong month.
    SalesLogRepo::create(
        &pool,
        &ctx,
        producer,
        &sale(account.id, date(2026, 3, 4), "Homeowners", "New Business", 900),
    )
    .await
    .unwrap();
    SalesLogRepo::create(
        &pool,
        &ctx,
        producer,
        &sale(account.id, date(2026, 3, 6), "Personal Auto", "Renewal", 1100),
    )
    .await
    .unwrap();
    SalesLogRepo::create(
        &pool,
        &ctx,
        producer,
        &sale(account.id, date(2026, 2, 20), "Personal Auto", "New Business", 1300),
    )
    .await
    .unwrap();

    let summary = SalesLogRepo::summary(&pool, today, 13).await.unwrap();

    // 5 sold on day 10: pace is 13 * 10 / 30 ≈ 4.33, so on track, 8 to go.
    assert_eq!(summary.auto_quota.sold, 5);
    assert_eq!(summary.auto_quota.remaining, 8);
    assert!(summary.auto_quota.on_track);

    // Month-to-date cards cover the seven March sales up to the 10th.
    assert_eq!(summary.this_month.count, 7);
    assert_eq!(summary.ytd.count, 8);
}

#[sqlx::test(migrations = "./migrations")]
async fn trends_group_by_line_of_business(pool: PgPool) {
    let producer = make_user(&pool, "Producer").await;
    let ctx = AuditContext::for_actor(producer);
    let account = AccountRepo::create(&pool, &ctx, &account_for(None, "Trend Account"))
        .await
        .unwrap();

    SalesLogRepo::create(
        &pool,
        &ctx,
        producer,
        &sale(account.id, date(2026, 1, 5), "Personal Auto", "New Business", 1000),
    )
    .await
    .unwrap();
    SalesLogRepo::create(
        &pool,
        &ctx,
        producer,
        &sale(account.id, date(2026, 1, 20), "Personal Auto", "Renewal", 1500),
    )
    .await
    .unwrap();
    SalesLogRepo::create(
        &pool,
        &ctx,
        producer,
        &sale(account.id, date(2026, 2, 3), "Homeowners", "New Business", 800),
    )
    .await
    .unwrap();

    let trends = SalesLogRepo::trends(
        &pool,
        TrendPeriod::Monthly,
        TrendGroupBy::Lob,
        date(2026, 1, 1),
        date(2026, 3, 1),
    )
    .await
    .unwrap();

    assert_eq!(trends.len(), 2);
    let auto = trends
        .iter()
        .find(|t| t.group_key.as_deref() == Some("Personal Auto"))
        .expect("auto bucket should exist");
    assert_eq!(auto.count, 2);
    assert_eq!(auto.premium, Decimal::new(2500, 0));
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn dashboard_counts_due_and_overdue_work(pool: PgPool) {
    use sentinel_db::models::service_item::CreateServiceItem;
    use sentinel_db::models::task::CreateTask;
    use sentinel_db::repositories::{ServiceItemRepo, TaskRepo};

    let user = make_user(&pool, "CSR").await;
    let ctx = AuditContext::for_actor(user);
    let account = AccountRepo::create(&pool, &ctx, &account_for(None, "Dash Account"))
        .await
        .unwrap();

    // 2026-03-04 is a Wednesday; its week runs through Sunday 2026-03-08.
    let today = date(2026, 3, 4);

    let task = |title: &str, due: NaiveDate| CreateTask {
        title: title.to_string(),
        description: None,
        linked_entity_type: None,
        linked_entity_id: None,
        assigned_to: None,
        due_date: Some(due),
        priority: None,
        is_recurring: None,
        recurrence_rule: None,
    };
    TaskRepo::create(&pool, &ctx, &task("due today", today)).await.unwrap();
    TaskRepo::create(&pool, &ctx, &task("overdue", date(2026, 3, 1)))
        .await
        .unwrap();
    TaskRepo::create(&pool, &ctx, &task("next week", date(2026, 3, 12)))
        .await
        .unwrap();

    let item = |due: NaiveDate| CreateServiceItem {
        item_type: "Renewal".to_string(),
        account_id: account.id,
        policy_id: None,
        description: None,
        status: None,
        assigned_to: None,
        due_date: Some(due),
        urgency: None,
    };
    ServiceItemRepo::create(&pool, &ctx, &item(date(2026, 3, 6)))
        .await
        .unwrap();
    ServiceItemRepo::create(&pool, &ctx, &item(date(2026, 3, 8)))
        .await
        .unwrap();
    ServiceItemRepo::create(&pool, &ctx, &item(date(2026, 2, 27)))
        .await
        .unwrap();
    ServiceItemRepo::create(&pool, &ctx, &item(date(2026, 3, 9)))
        .await
        .unwrap();

    let snapshot = DashboardRepo::snapshot(&pool, today, 13).await.unwrap();

    assert_eq!(snapshot.tasks_due_today, 1);
    assert_eq!(snapshot.tasks_overdue, 1);
    assert_eq!(snapshot.service_items_due_this_week, 2);
    assert_eq!(snapshot.service_items_overdue, 1);
    assert_eq!(snapshot.auto_quota.target, 13);
    assert_eq!(snapshot.recent_tasks.len(), 3);
}
