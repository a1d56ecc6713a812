use crate::api::{ApiError, SentinelApi};
use crate::db::models::{NewRedemption, RedemptionRecord};
use crate::db::{queries, POINTS_KEY};
use sentinel_core::models::RedeemRequest;
use sentinel_core::rewards::reward_for;
use sentinel_core::Voucher;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Not enough points! You have {balance}, this voucher costs {cost}.")]
    InsufficientPoints { balance: i64, cost: i64 },

    #[error("local store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSource {
    Cache,
    Server,
    Default,
}

/// Sole writer of the cached balance.
#[derive(Debug, Clone)]
pub struct PointsLedger {
    pool: SqlitePool,
    balance: i64,
    source: BalanceSource,
}

impl PointsLedger {
    /// Reads the cached balance. A missing or non-numeric cache leaves the
    /// balance at 0 until a server balance is observed.
    pub async fn load(pool: SqlitePool) -> Result<Self, LedgerError> {
        let cached = queries::get_value(&pool, POINTS_KEY).await?;

        let parsed = cached.as_deref().and_then(|raw| {
            let value = raw.trim().parse::<i64>().ok();
            if value.is_none() {
                warn!(raw, "ignoring unparsable cached balance");
            }
            value
        });

        let ledger = match parsed {
            Some(balance) => Self {
                pool,
                balance,
                source: BalanceSource::Cache,
            },
            None => Self {
                pool,
                balance: 0,
                source: BalanceSource::Default,
            },
        };

        debug!(balance = ledger.balance, source = ?ledger.source, "ledger loaded");
        Ok(ledger)
    }

    pub async fn load_with_server(
        pool: SqlitePool,
        server_balance: Option<i64>,
    ) -> Result<Self, LedgerError> {
        let mut ledger = Self::load(pool).await?;
        if let Some(server) = server_balance {
            ledger.observe_server_balance(server);
        }
        Ok(ledger)
    }

    pub const fn balance(&self) -> i64 {
        self.balance
    }

    pub const fn source(&self) -> BalanceSource {
        self.source
    }

    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Adopt a balance reported by the server unless a cached one exists.
    pub fn observe_server_balance(&mut self, server_balance: i64) {
        if self.source == BalanceSource::Cache {
            return;
        }
        self.balance = server_balance;
        self.source = BalanceSource::Server;
    }

    pub async fn sync_from_server(&mut self, server_balance: i64) -> Result<(), LedgerError> {
        info!(
            previous = self.balance,
            server = server_balance,
            "syncing balance from server"
        );
        self.balance = server_balance;
        self.persist().await
    }

    pub async fn credit_task(&mut self, task_id: &str) -> Result<i64, LedgerError> {
        let reward = reward_for(task_id);
        self.balance += reward;
        self.persist().await?;
        info!(task_id, reward, balance = self.balance, "task credited");
        Ok(reward)
    }

    pub fn ensure_affordable(&self, cost: i64) -> Result<(), LedgerError> {
        if self.balance < cost {
            return Err(LedgerError::InsufficientPoints {
                balance: self.balance,
                cost,
            });
        }
        Ok(())
    }

    pub async fn apply_redemption(
        &mut self,
        voucher: &Voucher,
        code: &str,
    ) -> Result<RedemptionRecord, LedgerError> {
        if self.balance < voucher.points {
            warn!(
                voucher = %voucher.id,
                balance = self.balance,
                cost = voucher.points,
                "debit exceeds balance, flooring at zero"
            );
        }
        self.balance = (self.balance - voucher.points).max(0);
        self.persist().await?;

        let redeemed_at = chrono::Utc::now().to_rfc3339();
        let id = queries::insert_redemption(
            &self.pool,
            &NewRedemption {
                voucher_id: &voucher.id,
                title: &voucher.title,
                merchant: &voucher.merchant,
                cost: voucher.points,
                code,
                redeemed_at: redeemed_at.clone(),
            },
        )
        .await?;

        info!(voucher = %voucher.id, cost = voucher.points, balance = self.balance, "voucher redeemed");

        Ok(RedemptionRecord {
            id,
            voucher_id: voucher.id.clone(),
            title: voucher.title.clone(),
            merchant: voucher.merchant.clone(),
            cost: voucher.points,
            code: code.to_string(),
            redeemed_at,
        })
    }

    async fn persist(&mut self) -> Result<(), LedgerError> {
        queries::set_value(&self.pool, POINTS_KEY, &self.balance.to_string()).await?;
        self.source = BalanceSource::Cache;
        Ok(())
    }
}

pub async fn redeem(
    api: &dyn SentinelApi,
    ledger: &mut PointsLedger,
    user_id: &str,
    voucher: &Voucher,
) -> Result<RedemptionRecord, LedgerError> {
    ledger.ensure_affordable(voucher.points)?;

    let redemption = api
        .redeem_voucher(&RedeemRequest {
            user_id: user_id.to_string(),
            voucher_id: voucher.id.clone(),
        })
        .await?;

    ledger.apply_redemption(voucher, &redemption.qr_code).await
}
