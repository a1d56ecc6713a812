use sqlx::{query, query_as, query_scalar, SqlitePool};

use crate::db::models::{NewRedemption, RedemptionRecord};

pub async fn get_value(pool: &SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
    query_scalar("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
}

/// Inserts or overwrites a key/value entry
pub async fn set_value(pool: &SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    let updated = chrono::Utc::now().to_rfc3339();
    query(
        "INSERT INTO kv_store (key, value, updated) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated = excluded.updated",
    )
    .bind(key)
    .bind(value)
    .bind(updated)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_value(pool: &SqlitePool, key: &str) -> Result<(), sqlx::Error> {
    query("DELETE FROM kv_store WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn insert_redemption(
    pool: &SqlitePool,
    params: &NewRedemption<'_>,
) -> Result<i64, sqlx::Error> {
    let result = query(
        "INSERT INTO redemption_log (voucher_id, title, merchant, cost, code, redeemed_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(params.voucher_id)
    .bind(params.title)
    .bind(params.merchant)
    .bind(params.cost)
    .bind(params.code)
    .bind(&params.redeemed_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Most recent redemptions first
pub async fn recent_redemptions(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<RedemptionRecord>, sqlx::Error> {
    query_as::<_, RedemptionRecord>(
        "SELECT id, voucher_id, title, merchant, cost, code, redeemed_at \
         FROM redemption_log ORDER BY id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn total_points_redeemed(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COALESCE(SUM(cost), 0) FROM redemption_log")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Result<SqlitePool, sqlx::Error> {
        // A single connection keeps every query on the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        setup_database(&pool).await?;
        Ok(pool)
    }

    #[tokio::test]
    async fn test_value_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        assert_eq!(get_value(&pool, "userPoints").await?, None);

        set_value(&pool, "userPoints", "1240").await?;
        assert_eq!(get_value(&pool, "userPoints").await?.as_deref(), Some("1240"));

        set_value(&pool, "userPoints", "240").await?;
        assert_eq!(get_value(&pool, "userPoints").await?.as_deref(), Some("240"));

        delete_value(&pool, "userPoints").await?;
        assert_eq!(get_value(&pool, "userPoints").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_redemption_log_order() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        for (voucher_id, cost) in [("V1", 500), ("V2", 1000)] {
            insert_redemption(
                &pool,
                &NewRedemption {
                    voucher_id,
                    title: "Coffee",
                    merchant: "Highlands",
                    cost,
                    code: "QR-1",
                    redeemed_at: "2026-10-15T09:00:00Z".to_string(),
                },
            )
            .await?;
        }

        let recent = recent_redemptions(&pool, 10).await?;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].voucher_id, "V2");
        assert_eq!(total_points_redeemed(&pool).await?, 1500);

        Ok(())
    }
}
