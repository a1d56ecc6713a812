mod common;

use common::{coffee, grocery, memory_store, RecordingApi};
use dengue_sentinel::db::{queries, POINTS_KEY};
use dengue_sentinel::ledger::{redeem, LedgerError, PointsLedger};

#[tokio::test]
async fn unaffordable_voucher_never_reaches_the_server() -> Result<(), Box<dyn std::error::Error>> {
    let pool = memory_store().await?;
    queries::set_value(&pool, POINTS_KEY, "1240").await?;
    let mut ledger = PointsLedger::load(pool.clone()).await?;
    let api = RecordingApi::default();

    let result = redeem(&api, &mut ledger, "user_123", &grocery()).await;

    assert!(matches!(
        result,
        Err(LedgerError::InsufficientPoints {
            balance: 1240,
            cost: 1500
        })
    ));
    assert_eq!(api.redeem_calls(), 0);
    assert_eq!(ledger.balance(), 1240);
    assert_eq!(
        queries::get_value(&pool, POINTS_KEY).await?.as_deref(),
        Some("1240")
    );
    Ok(())
}

#[tokio::test]
async fn affordable_voucher_is_debited_and_logged() -> Result<(), Box<dyn std::error::Error>> {
    let pool = memory_store().await?;
    queries::set_value(&pool, POINTS_KEY, "1240").await?;
    let mut ledger = PointsLedger::load(pool.clone()).await?;
    let api = RecordingApi::default();

    let record = redeem(&api, &mut ledger, "user_123", &coffee()).await?;

    assert_eq!(api.redeem_calls(), 1);
    assert_eq!(record.code, "SENTINEL-V1-user_123");
    assert_eq!(ledger.balance(), 240);
    assert_eq!(
        queries::get_value(&pool, POINTS_KEY).await?.as_deref(),
        Some("240")
    );

    let log = queries::recent_redemptions(&pool, 10).await?;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].voucher_id, "V1");
    assert_eq!(log[0].cost, 1000);
    assert_eq!(queries::total_points_redeemed(&pool).await?, 1000);
    Ok(())
}

#[tokio::test]
async fn reload_keeps_the_debited_balance() -> Result<(), Box<dyn std::error::Error>> {
    let pool = memory_store().await?;
    queries::set_value(&pool, POINTS_KEY, "1240").await?;
    let mut ledger = PointsLedger::load(pool.clone()).await?;
    redeem(&RecordingApi::default(), &mut ledger, "user_123", &coffee()).await?;

    // Server still reports the pre-redemption balance; the cache wins.
    let reloaded = PointsLedger::load_with_server(pool, Some(1240)).await?;
    assert_eq!(reloaded.balance(), 240);
    Ok(())
}

#[tokio::test]
async fn citizen_backend_refuses_manager_endpoints() {
    use dengue_sentinel::api::SentinelApi;
    let api = RecordingApi::default();

    let endpoints = [
        api.sensors().await.err().map(|e| e.endpoint().to_string()),
        api.priority_zones().await.err().map(|e| e.endpoint().to_string()),
        api.roi_stats().await.err().map(|e| e.endpoint().to_string()),
        api.district_forecast(14).await.err().map(|e| e.endpoint().to_string()),
    ];

    for endpoint in endpoints {
        let endpoint = endpoint.unwrap_or_default();
        assert!(endpoint.starts_with("/api/manager/"), "{endpoint}");
    }
}
