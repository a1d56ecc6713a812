pub mod chat;
pub mod hospital;
pub mod models;
pub mod rewards;
pub mod role;
pub mod tier;
pub mod zones;

pub use models::{
    BroadcastAck, DailyTask, DistrictRisk, Forecast, HeatmapZone, PriorityZone, RiskFactors,
    RiskReport, RoiStats, SensorArray, SensorReading, Task, TaskStatus, VerifyOutcome, Voucher,
    VoucherCatalog,
};
pub use role::Role;
pub use tier::RiskTier;
