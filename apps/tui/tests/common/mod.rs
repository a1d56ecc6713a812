#![allow(dead_code)]

use async_trait::async_trait;
use dengue_sentinel::api::{ApiError, SentinelApi};
use dengue_sentinel::db::setup_database;
use sentinel_core::models::{
    BroadcastRequest, RedeemRequest, Redemption, RiskFactors, VerifyRequest,
};
use sentinel_core::{
    BroadcastAck, DailyTask, DistrictRisk, Forecast, HeatmapZone, PriorityZone, RiskReport,
    RoiStats, SensorArray, VerifyOutcome, Voucher, VoucherCatalog,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Backend double that records what it was asked to do.
#[derive(Default)]
pub struct RecordingApi {
    pub redeem_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub last_image: Mutex<Option<String>>,
    pub reject_verification: bool,
}

impl RecordingApi {
    pub fn redeem_calls(&self) -> usize {
        self.redeem_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

fn unavailable(endpoint: &str) -> ApiError {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
    }
}

#[async_trait]
impl SentinelApi for RecordingApi {
    async fn risk(&self) -> Result<RiskReport, ApiError> {
        Ok(RiskReport {
            risk_percentage: 60,
            risk_level: "Medium".to_string(),
            confidence: 80,
            factors: RiskFactors::default(),
            last_update: String::new(),
            color: String::new(),
        })
    }

    async fn forecast(&self, _days: u32) -> Result<Forecast, ApiError> {
        Err(unavailable("/api/forecast"))
    }

    async fn heatmap(&self, _date_offset: u32) -> Result<Vec<HeatmapZone>, ApiError> {
        Err(unavailable("/api/heatmap"))
    }

    async fn daily_task(&self, _user_id: &str) -> Result<DailyTask, ApiError> {
        Err(unavailable("/api/daily-task"))
    }

    async fn verify_task(&self, request: &VerifyRequest) -> Result<VerifyOutcome, ApiError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut image) = self.last_image.lock() {
            *image = Some(request.image.clone());
        }
        Ok(VerifyOutcome {
            verified: !self.reject_verification,
            points_earned: Some(50),
            message: None,
        })
    }

    async fn vouchers(&self) -> Result<VoucherCatalog, ApiError> {
        Ok(VoucherCatalog {
            vouchers: vec![coffee(), grocery()],
            user_points: Some(1240),
        })
    }

    async fn redeem_voucher(&self, request: &RedeemRequest) -> Result<Redemption, ApiError> {
        self.redeem_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Redemption {
            qr_code: format!("SENTINEL-{}-{}", request.voucher_id, request.user_id),
        })
    }

    async fn chat(&self, _message: &str) -> Result<String, ApiError> {
        Err(unavailable("/api/chat"))
    }

    async fn sensors(&self) -> Result<SensorArray, ApiError> {
        Err(unavailable("/api/manager/sensors"))
    }

    async fn priority_zones(&self) -> Result<Vec<PriorityZone>, ApiError> {
        Err(unavailable("/api/manager/priority-zones"))
    }

    async fn roi_stats(&self) -> Result<RoiStats, ApiError> {
        Err(unavailable("/api/manager/roi-stats"))
    }

    async fn district_forecast(&self, _days: u32) -> Result<Vec<DistrictRisk>, ApiError> {
        Err(unavailable("/api/manager/heatmap"))
    }

    async fn broadcast(&self, _request: &BroadcastRequest) -> Result<BroadcastAck, ApiError> {
        Err(unavailable("/api/manager/broadcast"))
    }
}

pub fn coffee() -> Voucher {
    Voucher {
        id: "V1".to_string(),
        title: "Free Coffee".to_string(),
        points: 1000,
        merchant: "Highlands Coffee".to_string(),
    }
}

pub fn grocery() -> Voucher {
    Voucher {
        id: "V2".to_string(),
        title: "Grocery 100k".to_string(),
        points: 1500,
        merchant: "Co.op Mart".to_string(),
    }
}

pub async fn memory_store() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    setup_database(&pool).await?;
    Ok(pool)
}
