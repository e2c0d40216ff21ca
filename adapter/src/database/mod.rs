use std::{str::FromStr, time::Duration};

use shared::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

pub mod model;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn make_sqlite_connect_options(cfg: &DatabaseConfig) -> AppResult<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(&cfg.url)
        .map_err(AppError::SpecificOperationError)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    Ok(options)
}

#[derive(Clone)]
pub struct ConnectionPool(SqlitePool);

impl ConnectionPool {
    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }

    pub fn inner_ref(&self) -> &SqlitePool {
        &self.0
    }

    pub async fn begin(&self) -> AppResult<sqlx::Transaction<'_, sqlx::Sqlite>> {
        self.0.begin().await.map_err(AppError::TransactionError)
    }

    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.0).await?;
        Ok(())
    }

    // 著者が 1 件も無いときだけサンプルの蔵書データを投入する
    pub async fn seed_library(&self) -> AppResult<bool> {
        let mut tx = self.begin().await?;
        let authors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if authors > 0 {
            return Ok(false);
        }
        sqlx::raw_sql(include_str!("../../fixtures/library.sql"))
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        tx.commit().await.map_err(AppError::TransactionError)?;
        tracing::info!("seeded the sample library");
        Ok(true)
    }
}

pub fn connect_database_with(cfg: &DatabaseConfig) -> AppResult<ConnectionPool> {
    let options = make_sqlite_connect_options(cfg)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_lazy_with(options);
    Ok(ConnectionPool(pool))
}


#[cfg(test)]
mod tests {
    use super::testing::setup_in_memory;

    #[tokio::test]
    async fn seeding_is_skipped_when_authors_exist() {
        let pool = setup_in_memory().await;
        assert!(!pool.seed_library().await.unwrap());

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(pool.inner_ref())
            .await
            .unwrap();
        assert_eq!(books, 8);
    }

    #[tokio::test]
    async fn open_borrow_index_rejects_a_second_open_record() {
        let pool = setup_in_memory().await;
        // 蔵書 2 は fixture で貸出中
        let result = sqlx::query(
            "INSERT INTO borrow_records (user_name, book_id, borrow_at, created_at, updated_at)
             VALUES ('Bob', 2, '2026-02-01T00:00:00+00:00', '2026-02-01T00:00:00+00:00', '2026-02-01T00:00:00+00:00')",
        )
        .execute(pool.inner_ref())
        .await;
        match result {
            Err(sqlx::Error::Database(e)) => assert!(e.is_unique_violation()),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }
}
