use color_eyre::Result;
use sqlx::{migrate::MigrateDatabase, query, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use tracing::info;

/// Creates the local tables if they don't exist
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE TABLE IF NOT EXISTS redemption_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            voucher_id TEXT NOT NULL,
            title TEXT NOT NULL,
            merchant TEXT NOT NULL DEFAULT '',
            cost INTEGER NOT NULL,
            code TEXT NOT NULL,
            redeemed_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Opens (creating if needed) the sqlite file behind `database_url` and
/// brings its schema up to date.
pub async fn create_database_pool(database_url: &str) -> Result<SqlitePool> {
    info!(database_url, "opening local store");

    if !Sqlite::database_exists(database_url).await? {
        info!("local store does not exist, creating it");
        Sqlite::create_database(database_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::query_scalar;

    #[tokio::test]
    async fn setup_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        setup_database(&pool).await?;
        setup_database(&pool).await?;

        let merchant_columns: i64 = query_scalar(
            "SELECT COUNT(*) FROM pragma_table_info('redemption_log') WHERE name = 'merchant'",
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(merchant_columns, 1);

        Ok(())
    }

    #[tokio::test]
    async fn creates_database_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sentinel.db");
        let url = format!("sqlite://{}", path.display());

        let pool = create_database_pool(&url).await?;
        assert!(path.exists());
        pool.close().await;

        Ok(())
    }
}
