//! Tests contra PostgreSQL real. Se omiten si `TEST_DATABASE_URL` no está definida.

use std::sync::Arc;

use uuid::Uuid;

use dealership_manager::config::DatabaseConfig;
use dealership_manager::database::{MigrationError, MigrationRunner, MigrationScript, RunOptions, MIGRATIONS};
use dealership_manager::models::cost::CostQuery;
use dealership_manager::models::customer::{CustomerQuery, CustomerStatus};
use dealership_manager::models::dealer::{DealerProfile, NewDealer};
use dealership_manager::repositories::{CostRepository, DealerRepository, PgStore, Store};

// las pruebas comparten base de datos y ejecutan DDL
static DATABASE_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

async fn test_pool() -> Option<sqlx::PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = DatabaseConfig::with_url(url).create_pool().await.unwrap();
    Some(pool)
}

async fn table_columns(pool: &sqlx::PgPool) -> Vec<(String, String)> {
    sqlx::query_as(
        "SELECT table_name::text, column_name::text FROM information_schema.columns
         WHERE table_schema = current_schema() ORDER BY table_name, ordinal_position",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let _guard = DATABASE_LOCK.lock().await;
    let runner = MigrationRunner::new(&pool);

    runner.run(MIGRATIONS, RunOptions::default()).await.unwrap();
    let schema = table_columns(&pool).await;

    let second = runner.run(MIGRATIONS, RunOptions::default()).await.unwrap();
    assert!(second.applied.is_empty());
    assert_eq!(second.skipped.len(), MIGRATIONS.len());

    let forced = runner
        .run(MIGRATIONS, RunOptions { dry_run: false, reapply: true })
        .await
        .unwrap();
    assert_eq!(forced.applied.len(), MIGRATIONS.len());
    assert_eq!(table_columns(&pool).await, schema);

    let dry = runner
        .run(MIGRATIONS, RunOptions { dry_run: true, reapply: false })
        .await
        .unwrap();
    assert!(dry.pending.is_empty());

    pool.close().await;
}

#[tokio::test]
async fn test_pg_store_scopes_customers_by_dealer() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let _guard = DATABASE_LOCK.lock().await;
    MigrationRunner::new(&pool).run(MIGRATIONS, RunOptions::default()).await.unwrap();
    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));

    let new_dealer = |name: &str| NewDealer {
        external_user_id: format!("test_{}", Uuid::new_v4()),
        profile: DealerProfile {
            business_name: name.to_string(),
            contact_email: None,
            phone: None,
            address: None,
        },
    };
    let alpha_request = new_dealer("Alpha Motors");
    let (alpha, created) = store.create_dealer_if_absent(alpha_request.clone()).await.unwrap();
    assert!(created);
    let (again, created) = store.create_dealer_if_absent(alpha_request).await.unwrap();
    assert!(!created);
    assert_eq!(again.id, alpha.id);
    let (beta, _) = store.create_dealer_if_absent(new_dealer("Beta Autos")).await.unwrap();

    let email = format!("{}@example.com", Uuid::new_v4());
    let fields = dealership_manager::models::customer::CustomerFields {
        first_name: "Ann".to_string(),
        last_name: "Smith".to_string(),
        email: email.clone(),
        phone: None,
        address_line: None,
        city: None,
        postcode: None,
        status: CustomerStatus::Prospect,
        marketing_consent: false,
        sales_consent: false,
        gdpr_consent: false,
        consent_date: None,
        tags: vec!["vip".to_string()],
        custom_fields: serde_json::json!({ "source": "web" }),
        notes: None,
    };
    let customer = store.create_customer(alpha.id, fields.clone()).await.unwrap();
    assert_eq!(customer.status, CustomerStatus::Prospect);

    let mut duplicate = fields.clone();
    duplicate.email = email.to_uppercase();
    assert!(store.create_customer(alpha.id, duplicate).await.is_err());

    assert!(store.find_customer(beta.id, customer.id).await.unwrap().is_none());
    let query = CustomerQuery {
        search: Some("smith".to_string()),
        ..CustomerQuery::default()
    };
    assert!(store.list_customers(beta.id, &query).await.unwrap().is_empty());
    assert_eq!(store.list_customers(alpha.id, &query).await.unwrap().len(), 1);

    store.close().await;
}

#[tokio::test]
async fn test_failed_script_is_rolled_back() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let _guard = DATABASE_LOCK.lock().await;
    let runner = MigrationRunner::new(&pool);
    runner.run(MIGRATIONS, RunOptions::default()).await.unwrap();

    let broken = [MigrationScript {
        name: "9000_half_applied",
        sql: "CREATE TABLE IF NOT EXISTS half_applied (id INT);\nSELECT * FROM table_that_does_not_exist;",
    }];
    let err = runner.run(&broken, RunOptions::default()).await.unwrap_err();
    assert!(matches!(err, MigrationError::Statement { file: "9000_half_applied", index: 2, .. }));

    let leftover: bool = sqlx::query_scalar("SELECT to_regclass('half_applied') IS NOT NULL")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!leftover);
    assert!(!runner.applied_names().await.unwrap().contains("9000_half_applied"));

    pool.close().await;
}

#[tokio::test]
async fn test_pg_cost_summary_covers_every_row() {
    let Some(pool) = test_pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let _guard = DATABASE_LOCK.lock().await;
    MigrationRunner::new(&pool).run(MIGRATIONS, RunOptions::default()).await.unwrap();
    let store = PgStore::new(pool.clone());

    let (dealer, _) = store
        .create_dealer_if_absent(NewDealer {
            external_user_id: format!("test_{}", Uuid::new_v4()),
            profile: DealerProfile {
                business_name: "Gamma Cars".to_string(),
                contact_email: None,
                phone: None,
                address: None,
            },
        })
        .await
        .unwrap();

    for amount in ["10.50", "0.25", "4.00"] {
        sqlx::query(
            "INSERT INTO vehicle_costs (id, dealer_id, stock_number, category, amount)
             VALUES ($1, $2, 'STK-1', 'repair', $3::numeric)",
        )
        .bind(Uuid::new_v4())
        .bind(dealer.id)
        .bind(amount)
        .execute(&pool)
        .await
        .unwrap();
    }

    let page = CostQuery {
        limit: 1,
        ..CostQuery::default()
    };
    assert_eq!(store.list_vehicle_costs(dealer.id, &page).await.unwrap().len(), 1);
    let summary = store.vehicle_cost_summary(dealer.id, &page).await.unwrap();
    assert_eq!(summary.entries, 3);
    assert_eq!(summary.total.to_string(), "14.75");

    let empty = store.return_cost_summary(dealer.id, &CostQuery::default()).await.unwrap();
    assert_eq!(empty.entries, 0);
    assert_eq!(empty.total.to_string(), "0.00");

    store.close().await;
}
