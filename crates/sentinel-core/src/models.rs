use crate::tier::RiskTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapZone {
    pub lat: f64,
    pub lon: f64,
    pub risk: u8,
}

impl HeatmapZone {
    pub const fn tier(&self) -> RiskTier {
        RiskTier::classify(self.risk)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapResponse {
    pub zones: Vec<HeatmapZone>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub temperature: String,
    pub rainfall: String,
    pub humidity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    pub risk_percentage: u8,
    pub risk_level: String,
    #[serde(default)]
    pub confidence: u8,
    pub factors: RiskFactors,
    #[serde(default)]
    pub last_update: String,
    #[serde(default)]
    pub color: String,
}

impl RiskReport {
    pub const fn tier(&self) -> RiskTier {
        RiskTier::classify(self.risk_percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub risk_percentage: u8,
    pub risk_level: String,
    pub date: String,
    pub factors: RiskFactors,
    #[serde(default)]
    pub color: String,
}

impl Forecast {
    pub const fn tier(&self) -> RiskTier {
        RiskTier::classify(self.risk_percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[serde(alias = "assigned")]
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub reward_points: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: TaskStatus,
    pub expiry: String,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    pub user_id: String,
    #[serde(default)]
    pub current_local_risk: u8,
    pub task: Task,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub user_id: String,
    pub task_id: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub verified: bool,
    #[serde(default)]
    pub points_earned: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: String,
    pub title: String,
    pub points: i64,
    pub merchant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherCatalog {
    pub vouchers: Vec<Voucher>,
    #[serde(default)]
    pub user_points: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub user_id: String,
    pub voucher_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    pub qr_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub value: f64,
    pub unit: String,
    pub status: String,
    pub trend: String,
}

impl SensorReading {
    pub fn is_alert(&self) -> bool {
        self.status.eq_ignore_ascii_case("alert")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorArray {
    pub salinity: SensorReading,
    pub rainfall: SensorReading,
    pub temperature: SensorReading,
    pub water_level: SensorReading,
}

impl SensorArray {
    /// Salinity above 1.0 ppt is highlighted on the manager dashboard.
    pub fn salinity_alert(&self) -> bool {
        self.salinity.value > 1.0
    }

    pub fn readings(&self) -> [(&'static str, &SensorReading); 4] {
        [
            ("Salinity", &self.salinity),
            ("Rainfall", &self.rainfall),
            ("Temperature", &self.temperature),
            ("Water level", &self.water_level),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityZone {
    pub id: String,
    pub name: String,
    pub mosquito_index: f64,
    pub risk_label: String,
    pub status: String,
    pub action_needed: String,
}

impl PriorityZone {
    pub fn is_critical(&self) -> bool {
        self.risk_label.eq_ignore_ascii_case("critical")
    }

    /// The mosquito index is reported on a 0-10 scale; this maps it onto
    /// the 0-100 risk scale used for tiers.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn index_risk(&self) -> u8 {
        (self.mosquito_index * 10.0).round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoiStats {
    pub cases_avoided: i64,
    pub money_saved_usd: i64,
    #[serde(default)]
    pub money_saved_vnd: i64,
    pub citizen_actions: i64,
    pub prevention_rate_improvement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRisk {
    pub name: String,
    pub id: String,
    pub center: [f64; 2],
    pub risk: u8,
    pub projected_risk: u8,
    pub trend: String,
    pub pop: u64,
    #[serde(default)]
    pub color: String,
}

impl DistrictRisk {
    pub const fn tier(&self) -> RiskTier {
        RiskTier::classify(self.projected_risk)
    }

    pub fn is_rising(&self) -> bool {
        self.trend.eq_ignore_ascii_case("up")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictsResponse {
    pub districts: Vec<DistrictRisk>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub zone_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub recipients: u64,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_task_accepts_assigned_status() -> Result<(), serde_json::Error> {
        let payload = r#"{
            "user_id": "user_123",
            "current_local_risk": 81,
            "task": {
                "task_id": "T1",
                "title": "Daily Prevention Quest",
                "description": "Clean stagnant water in 3 jars",
                "reward_points": 50,
                "type": "photo",
                "status": "assigned",
                "expiry": "2026-10-15T23:59:59"
            }
        }"#;

        let daily: DailyTask = serde_json::from_str(payload)?;
        assert_eq!(daily.task.status, TaskStatus::Pending);
        assert_eq!(daily.task.kind, "photo");
        assert!(!daily.task.is_completed());
        Ok(())
    }

    #[test]
    fn verify_outcome_tolerates_missing_points() -> Result<(), serde_json::Error> {
        let outcome: VerifyOutcome =
            serde_json::from_str(r#"{"verified": false, "message": "Could not verify"}"#)?;
        assert!(!outcome.verified);
        assert_eq!(outcome.points_earned, None);
        Ok(())
    }

    #[test]
    fn district_tier_uses_projected_risk() -> Result<(), serde_json::Error> {
        let district: DistrictRisk = serde_json::from_str(
            r##"{"name": "Ninh Kieu", "id": "CT-NK", "center": [10.03, 105.78],
                "pop": 280000, "risk": 70, "projected_risk": 78, "trend": "up",
                "color": "#ef4444"}"##,
        )?;
        assert_eq!(district.tier(), RiskTier::High);
        assert!(district.is_rising());
        Ok(())
    }

    #[test]
    fn sensor_salinity_alert_threshold() -> Result<(), serde_json::Error> {
        let sensors: SensorArray = serde_json::from_str(
            r#"{
                "salinity": {"value": 1.2, "unit": "ppt", "status": "Alert", "trend": "up"},
                "rainfall": {"value": 45, "unit": "mm", "status": "High", "trend": "up"},
                "temperature": {"value": 32.5, "unit": "C", "status": "Elevated", "trend": "up"},
                "water_level": {"value": 1.4, "unit": "m", "status": "alert", "trend": "up"}
            }"#,
        )?;
        assert!(sensors.salinity_alert());
        assert!(sensors.water_level.is_alert());
        assert!(!sensors.rainfall.is_alert());
        Ok(())
    }

    #[test]
    fn mosquito_index_scales_to_risk_tiers() -> Result<(), serde_json::Error> {
        let zone: PriorityZone = serde_json::from_str(
            r#"{"id": "CT-NK-5", "name": "Ninh Kieu, Ward 5", "mosquito_index": 8.8,
                "risk_label": "CRITICAL", "status": "Pending", "action_needed": "Fogging"}"#,
        )?;
        assert!(zone.is_critical());
        assert_eq!(zone.index_risk(), 88);
        assert_eq!(RiskTier::classify(zone.index_risk()), RiskTier::High);

        let quiet = PriorityZone {
            mosquito_index: 3.1,
            ..zone.clone()
        };
        assert_eq!(RiskTier::classify(quiet.index_risk()), RiskTier::Low);

        let off_scale = PriorityZone {
            mosquito_index: 42.0,
            ..zone
        };
        assert_eq!(off_scale.index_risk(), 100);
        Ok(())
    }
}
