use super::{ApiError, SentinelApi};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use sentinel_core::models::{
    BroadcastRequest, ChatReply, ChatRequest, DistrictsResponse, HeatmapResponse, RedeemRequest,
    Redemption, VerifyRequest,
};
use sentinel_core::{
    BroadcastAck, DailyTask, DistrictRisk, Forecast, HeatmapZone, PriorityZone, RiskReport,
    RoiStats, SensorArray, VerifyOutcome, VoucherCatalog,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(endpoint, "sending request");

        let response = request.send().await.map_err(|source| {
            warn!(endpoint, error = %source, "request failed");
            ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "non-success status");
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let endpoint = path.split('?').next().unwrap_or(path);
        self.send(endpoint, self.client.get(self.url(path))).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send(path, self.client.post(self.url(path)).json(body))
            .await
    }
}

#[async_trait]
impl SentinelApi for HttpApi {
    async fn risk(&self) -> Result<RiskReport, ApiError> {
        self.get("/api/risk").await
    }

    async fn forecast(&self, days: u32) -> Result<Forecast, ApiError> {
        self.get(&format!("/api/forecast?days={days}")).await
    }

    async fn heatmap(&self, date_offset: u32) -> Result<Vec<HeatmapZone>, ApiError> {
        let response: HeatmapResponse = self
            .get(&format!("/api/heatmap?date_offset={date_offset}"))
            .await?;
        Ok(response.zones)
    }

    async fn daily_task(&self, user_id: &str) -> Result<DailyTask, ApiError> {
        let request = self
            .client
            .get(self.url("/api/daily-task"))
            .query(&[("user_id", user_id)]);
        self.send("/api/daily-task", request).await
    }

    async fn verify_task(&self, request: &VerifyRequest) -> Result<VerifyOutcome, ApiError> {
        self.post("/api/tasks/verify", request).await
    }

    async fn vouchers(&self) -> Result<VoucherCatalog, ApiError> {
        self.get("/api/vouchers").await
    }

    async fn redeem_voucher(&self, request: &RedeemRequest) -> Result<Redemption, ApiError> {
        self.post("/api/vouchers/redeem", request).await
    }

    async fn chat(&self, message: &str) -> Result<String, ApiError> {
        let request = ChatRequest {
            message: message.to_string(),
        };
        let reply: ChatReply = self.post("/api/chat", &request).await?;
        Ok(reply.response)
    }

    async fn sensors(&self) -> Result<SensorArray, ApiError> {
        self.get("/api/manager/sensors").await
    }

    async fn priority_zones(&self) -> Result<Vec<PriorityZone>, ApiError> {
        self.get("/api/manager/priority-zones").await
    }

    async fn roi_stats(&self) -> Result<RoiStats, ApiError> {
        self.get("/api/manager/roi-stats").await
    }

    async fn district_forecast(&self, days: u32) -> Result<Vec<DistrictRisk>, ApiError> {
        let response: DistrictsResponse = self
            .get(&format!("/api/manager/heatmap?days={days}"))
            .await?;
        Ok(response.districts)
    }

    async fn broadcast(&self, request: &BroadcastRequest) -> Result<BroadcastAck, ApiError> {
        self.post("/api/manager/broadcast", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() -> Result<(), ApiError> {
        let api = HttpApi::new("http://localhost:5328/", Duration::from_secs(1))?;
        assert_eq!(api.base_url(), "http://localhost:5328");
        assert_eq!(api.url("/api/risk"), "http://localhost:5328/api/risk");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() -> Result<(), ApiError> {
        // Port 9 (discard) is not expected to serve HTTP locally.
        let api = HttpApi::new("http://127.0.0.1:9", Duration::from_millis(500))?;
        let err = api.risk().await.err();
        assert!(matches!(err, Some(ApiError::Transport { .. })));
        Ok(())
    }
}
