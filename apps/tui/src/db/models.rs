use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct RedemptionRecord {
    pub id: i64,
    pub voucher_id: String,
    pub title: String,
    pub merchant: String,
    pub cost: i64,
    pub code: String,
    pub redeemed_at: String,
}

/// Parameters for logging a new redemption
#[derive(Debug, Clone)]
pub struct NewRedemption<'a> {
    pub voucher_id: &'a str,
    pub title: &'a str,
    pub merchant: &'a str,
    pub cost: i64,
    pub code: &'a str,
    pub redeemed_at: String,
}
