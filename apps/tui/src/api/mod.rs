mod client;
mod error;

pub use client::HttpApi;
pub use error::ApiError;

use async_trait::async_trait;
use sentinel_core::models::{BroadcastRequest, RedeemRequest, Redemption, VerifyRequest};
use sentinel_core::{
    BroadcastAck, DailyTask, DistrictRisk, Forecast, HeatmapZone, PriorityZone, RiskReport,
    RoiStats, SensorArray, VerifyOutcome, VoucherCatalog,
};

pub const DEFAULT_API_URL: &str = "http://localhost:5328";

#[async_trait]
pub trait SentinelApi: Send + Sync {
    async fn risk(&self) -> Result<RiskReport, ApiError>;
    async fn forecast(&self, days: u32) -> Result<Forecast, ApiError>;
    async fn heatmap(&self, date_offset: u32) -> Result<Vec<HeatmapZone>, ApiError>;
    async fn daily_task(&self, user_id: &str) -> Result<DailyTask, ApiError>;
    async fn verify_task(&self, request: &VerifyRequest) -> Result<VerifyOutcome, ApiError>;
    async fn vouchers(&self) -> Result<VoucherCatalog, ApiError>;
    async fn redeem_voucher(&self, request: &RedeemRequest) -> Result<Redemption, ApiError>;
    async fn chat(&self, message: &str) -> Result<String, ApiError>;

    async fn sensors(&self) -> Result<SensorArray, ApiError>;
    async fn priority_zones(&self) -> Result<Vec<PriorityZone>, ApiError>;
    async fn roi_stats(&self) -> Result<RoiStats, ApiError>;
    async fn district_forecast(&self, days: u32) -> Result<Vec<DistrictRisk>, ApiError>;
    async fn broadcast(&self, request: &BroadcastRequest) -> Result<BroadcastAck, ApiError>;
}
