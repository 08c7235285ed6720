//! Shared setup for tests that need a real PostGIS database.
//!
//! Point `TEST_DATABASE_URL` at a disposable database and run
//! `cargo test -- --ignored`. Every test wipes the `public` schema first, so
//! the tests take a process-wide lock and run one at a time.

use std::sync::{Mutex, MutexGuard, PoisonError};

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use smart_airbnb::db::{self, InitOutcome};

static DATABASE_LOCK: Mutex<()> = Mutex::new(());

pub struct TestDatabase {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

impl TestDatabase {
    /// An empty database with no tables at all.
    pub async fn empty() -> TestDatabase {
        let guard = DATABASE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must point at a disposable PostGIS database");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .expect("failed to connect to TEST_DATABASE_URL");
        pool.execute("DROP SCHEMA IF EXISTS public CASCADE; CREATE SCHEMA public;")
            .await
            .expect("failed to reset the public schema");
        TestDatabase { pool, _guard: guard }
    }

    /// Schema, sample data and analytics views, as the server sets them up.
    pub async fn seeded() -> TestDatabase {
        let test_db = TestDatabase::empty().await;
        let outcome = db::initialize(&test_db.pool)
            .await
            .expect("database initialization failed");
        assert_eq!(outcome, InitOutcome::Initialized);
        test_db
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }
}
