use crate::api::{ApiError, SentinelApi};
use crate::app::jobs::FetchEvent;
use crate::app::App;
use crate::config::AppConfig;
use crate::db::{queries, setup_database, POINTS_KEY};
use crate::ledger::PointsLedger;
use async_trait::async_trait;
use sentinel_core::models::{BroadcastRequest, RedeemRequest, Redemption, VerifyRequest};
use sentinel_core::{
    BroadcastAck, DailyTask, DistrictRisk, Forecast, HeatmapZone, PriorityZone, RiskFactors,
    RiskReport, RoiStats, SensorArray, SensorReading, Task, TaskStatus, VerifyOutcome, Voucher,
    VoucherCatalog,
};
use sentinel_core::Role;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// In-process [`SentinelApi`] that answers with canned data and counts calls.
#[derive(Debug, Default)]
pub struct FakeApi {
    fail_status: Option<u16>,
    redeem_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    chat_calls: AtomicUsize,
    server_points: Option<i64>,
    last_verify: Mutex<Option<VerifyRequest>>,
}

impl FakeApi {
    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_server_points(points: i64) -> Self {
        Self {
            server_points: Some(points),
            ..Self::default()
        }
    }

    pub fn redeem_calls(&self) -> usize {
        self.redeem_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn last_verify(&self) -> Option<VerifyRequest> {
        self.last_verify.lock().ok().and_then(|guard| guard.clone())
    }

    fn check(&self, endpoint: &str) -> Result<(), ApiError> {
        match self.fail_status {
            Some(status) => Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
            }),
            None => Ok(()),
        }
    }
}

fn factors() -> RiskFactors {
    RiskFactors {
        temperature: "31.2".into(),
        rainfall: "12.0".into(),
        humidity: "84".into(),
    }
}

fn reading(value: f64, unit: &str, status: &str) -> SensorReading {
    SensorReading {
        value,
        unit: unit.into(),
        status: status.into(),
        trend: "up".into(),
    }
}

#[async_trait]
impl SentinelApi for FakeApi {
    async fn risk(&self) -> Result<RiskReport, ApiError> {
        self.check("/api/risk")?;
        Ok(RiskReport {
            risk_percentage: 78,
            risk_level: "HIGH".into(),
            confidence: 94,
            factors: factors(),
            last_update: "2026-10-15 08:00".into(),
            color: "#ef4444".into(),
        })
    }

    async fn forecast(&self, days: u32) -> Result<Forecast, ApiError> {
        self.check("/api/forecast")?;
        Ok(Forecast {
            risk_percentage: 64,
            risk_level: "MEDIUM".into(),
            date: format!("+{days}d"),
            factors: factors(),
            color: "#f97316".into(),
        })
    }

    async fn heatmap(&self, _date_offset: u32) -> Result<Vec<HeatmapZone>, ApiError> {
        self.check("/api/heatmap")?;
        Ok(vec![
            HeatmapZone { lat: 10.04, lon: 105.74, risk: 85 },
            HeatmapZone { lat: 10.25, lon: 105.97, risk: 55 },
            HeatmapZone { lat: 9.60, lon: 105.97, risk: 20 },
        ])
    }

    async fn daily_task(&self, user_id: &str) -> Result<DailyTask, ApiError> {
        self.check("/api/daily-task")?;
        Ok(DailyTask {
            user_id: user_id.to_string(),
            current_local_risk: 78,
            task: Task {
                task_id: "T1".into(),
                title: "Daily Prevention Quest".into(),
                description: "Clean stagnant water in 3 jars".into(),
                reward_points: 50,
                kind: "photo".into(),
                status: TaskStatus::Pending,
                expiry: "2026-10-15T23:59:59".into(),
            },
        })
    }

    async fn verify_task(&self, request: &VerifyRequest) -> Result<VerifyOutcome, ApiError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_verify.lock() {
            *last = Some(request.clone());
        }
        self.check("/api/tasks/verify")?;
        Ok(VerifyOutcome {
            verified: true,
            points_earned: Some(50),
            message: Some("Great job!".into()),
        })
    }

    async fn vouchers(&self) -> Result<VoucherCatalog, ApiError> {
        self.check("/api/vouchers")?;
        Ok(VoucherCatalog {
            vouchers: vec![
                Voucher {
                    id: "V1".into(),
                    title: "Free Coffee".into(),
                    points: 1000,
                    merchant: "Highlands".into(),
                },
                Voucher {
                    id: "V2".into(),
                    title: "Grocery 100k".into(),
                    points: 1500,
                    merchant: "Co.op Mart".into(),
                },
            ],
            user_points: self.server_points,
        })
    }

    async fn redeem_voucher(&self, request: &RedeemRequest) -> Result<Redemption, ApiError> {
        self.redeem_calls.fetch_add(1, Ordering::SeqCst);
        self.check("/api/vouchers/redeem")?;
        Ok(Redemption {
            qr_code: format!("QR-{}-{}", request.user_id, request.voucher_id),
        })
    }

    async fn chat(&self, message: &str) -> Result<String, ApiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.check("/api/chat")?;
        Ok(format!("### Answer\n- You asked **{message}**"))
    }

    async fn sensors(&self) -> Result<SensorArray, ApiError> {
        self.check("/api/manager/sensors")?;
        Ok(SensorArray {
            salinity: reading(1.2, "ppt", "Alert"),
            rainfall: reading(45.0, "mm", "High"),
            temperature: reading(32.5, "C", "Elevated"),
            water_level: reading(1.4, "m", "alert"),
        })
    }

    async fn priority_zones(&self) -> Result<Vec<PriorityZone>, ApiError> {
        self.check("/api/manager/priority-zones")?;
        Ok(vec![PriorityZone {
            id: "Z1".into(),
            name: "Ninh Kieu, Ward 5".into(),
            mosquito_index: 8.8,
            risk_label: "CRITICAL".into(),
            status: "Pending".into(),
            action_needed: "Immediate Spraying".into(),
        }])
    }

    async fn roi_stats(&self) -> Result<RoiStats, ApiError> {
        self.check("/api/manager/roi-stats")?;
        Ok(RoiStats {
            cases_avoided: 342,
            money_saved_usd: 51_300,
            money_saved_vnd: 1_282_500_000,
            citizen_actions: 5_230,
            prevention_rate_improvement: "24%".into(),
        })
    }

    async fn district_forecast(&self, _days: u32) -> Result<Vec<DistrictRisk>, ApiError> {
        self.check("/api/manager/heatmap")?;
        Ok(vec![DistrictRisk {
            name: "Ninh Kieu".into(),
            id: "CT-NK".into(),
            center: [10.03, 105.78],
            risk: 70,
            projected_risk: 78,
            trend: "up".into(),
            pop: 280_000,
            color: "#ef4444".into(),
        }])
    }

    async fn broadcast(&self, request: &BroadcastRequest) -> Result<BroadcastAck, ApiError> {
        self.check("/api/manager/broadcast")?;
        Ok(BroadcastAck {
            success: true,
            recipients: 5_420,
            zone: Some(request.zone_id.clone()),
            status: "Sent".into(),
        })
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        api_url: "http://localhost:5328".into(),
        user_id: "user_123".into(),
        database_path: PathBuf::from(":memory:"),
        database_url: "sqlite::memory:".into(),
        refresh_interval: Duration::from_secs(30),
        request_timeout: Duration::from_secs(1),
        log_path: PathBuf::from("test.log"),
        role: Role::Citizen,
        mock: false,
    }
}

pub async fn test_app(
    api: Arc<FakeApi>,
    cached_points: Option<&str>,
) -> Result<(App, UnboundedReceiver<FetchEvent>), Box<dyn std::error::Error>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    setup_database(&pool).await?;
    if let Some(value) = cached_points {
        queries::set_value(&pool, POINTS_KEY, value).await?;
    }

    let ledger = PointsLedger::load(pool).await?;
    let (tx, rx) = mpsc::unbounded_channel();
    Ok((App::new(test_config(), api, ledger, tx), rx))
}
