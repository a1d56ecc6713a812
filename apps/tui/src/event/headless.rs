use crate::api::SentinelApi;
use crate::config::AppConfig;
use crate::db::queries;
use crate::ledger::{BalanceSource, PointsLedger};
use color_eyre::Result;
use sentinel_core::zones::{generate_mock_zones, TierCounts};
use sentinel_core::RiskTier;
use serde::Serialize;
use tracing::warn;

/// Run the application in headless mode (no UI)
pub async fn run_headless(
    api: &dyn SentinelApi,
    ledger: &mut PointsLedger,
    config: &AppConfig,
    json: bool,
) -> Result<()> {
    let report = build_report(api, ledger, config).await?;

    if json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &HeadlessReport) {
    println!("\nDengue Sentinel");
    println!("===============");
    println!("Backend: {}", report.api_url);
    println!("Role: {}", report.role);

    match &report.risk {
        Some(risk) => println!(
            "Current risk: {}% {} (confidence {}%, updated {})",
            risk.percentage, risk.tier, risk.confidence, risk.updated
        ),
        None => println!("Current risk: unavailable"),
    }
    match &report.forecast {
        Some(forecast) => println!(
            "Forecast {}: {}% {}",
            forecast.date, forecast.percentage, forecast.tier
        ),
        None => println!("Forecast: unavailable"),
    }

    println!("\nRisk zones ({}):", report.zones.source);
    for tier in RiskTier::ALL.iter().rev() {
        println!("- {}: {}", tier.label(), report.zones.counts.get(*tier));
    }

    println!("\nPoints: {} ({})", report.balance.points, report.balance.source);
    println!(
        "Redeemed so far: {} vouchers, {} pts",
        report.redemptions.count, report.redemptions.points
    );

    println!("\nVouchers:");
    if report.vouchers.is_empty() {
        println!("- none available");
    }
    for voucher in &report.vouchers {
        let mark = if voucher.affordable { "*" } else { " " };
        println!(
            "{mark} {} | {} | {} pts | {}",
            voucher.id, voucher.title, voucher.points, voucher.merchant
        );
    }

    if let Some(manager) = &report.manager {
        println!("\nCDC summary:");
        println!("- Sensor alerts: {}", manager.sensor_alerts.join(", "));
        println!("- Critical zones: {}", manager.critical_zones.join(", "));
        if let Some(cases) = manager.cases_avoided {
            println!("- Cases avoided: {cases}");
        }
    }
}

pub async fn build_report(
    api: &dyn SentinelApi,
    ledger: &mut PointsLedger,
    config: &AppConfig,
) -> Result<HeadlessReport> {
    let (risk, forecast, heatmap, catalog, sensors, priority, roi) = tokio::join!(
        api.risk(),
        api.forecast(crate::app::actions::FORECAST_DAYS),
        api.heatmap(0),
        api.vouchers(),
        api.sensors(),
        api.priority_zones(),
        api.roi_stats(),
    );

    let risk = risk
        .map_err(|e| warn!(error = %e, "risk unavailable"))
        .ok()
        .map(|risk| RiskLine {
            percentage: risk.risk_percentage,
            tier: risk.tier().label(),
            confidence: risk.confidence,
            updated: risk.last_update,
        });

    let forecast = forecast
        .map_err(|e| warn!(error = %e, "forecast unavailable"))
        .ok()
        .map(|forecast| ForecastLine {
            percentage: forecast.risk_percentage,
            tier: forecast.tier().label(),
            date: forecast.date,
        });

    let zones = match heatmap {
        Ok(zones) if !config.mock => ZoneSummary {
            source: "live",
            counts: TierCounts::tally(&zones),
        },
        other => {
            if let Err(e) = other {
                warn!(error = %e, "heatmap unavailable, generating zones");
            }
            let zones = generate_mock_zones(&mut rand::thread_rng());
            ZoneSummary {
                source: "generated",
                counts: TierCounts::tally(&zones),
            }
        }
    };

    let mut vouchers = Vec::new();
    match catalog {
        Ok(catalog) => {
            if let Some(points) = catalog.user_points {
                ledger.observe_server_balance(points);
            }
            vouchers = catalog
                .vouchers
                .into_iter()
                .map(|voucher| VoucherLine {
                    affordable: ledger.balance() >= voucher.points,
                    id: voucher.id,
                    title: voucher.title,
                    points: voucher.points,
                    merchant: voucher.merchant,
                })
                .collect();
        }
        Err(e) => warn!(error = %e, "vouchers unavailable"),
    }

    let sensors = sensors.map_err(|e| warn!(error = %e, "sensors unavailable")).ok();
    let priority = priority
        .map_err(|e| warn!(error = %e, "priority zones unavailable"))
        .ok();
    let roi = roi.map_err(|e| warn!(error = %e, "roi unavailable")).ok();

    let manager = (sensors.is_some() || priority.is_some() || roi.is_some()).then(|| {
        ManagerSummary {
            sensor_alerts: sensors
                .iter()
                .flat_map(|array| array.readings())
                .filter(|(_, reading)| reading.is_alert())
                .map(|(name, _)| name.to_string())
                .collect(),
            critical_zones: priority
                .iter()
                .flatten()
                .filter(|zone| zone.is_critical())
                .map(|zone| zone.name.clone())
                .collect(),
            cases_avoided: roi.as_ref().map(|roi| roi.cases_avoided),
        }
    });

    let pool = ledger.pool();
    let redemptions = RedemptionSummary {
        count: queries::recent_redemptions(pool, i64::MAX).await?.len(),
        points: queries::total_points_redeemed(pool).await?,
    };

    Ok(HeadlessReport {
        api_url: config.api_url.clone(),
        role: config.role.as_str(),
        generated_at: chrono::Local::now().to_rfc3339(),
        risk,
        forecast,
        zones,
        balance: BalanceLine {
            points: ledger.balance(),
            source: match ledger.source() {
                BalanceSource::Cache => "cache",
                BalanceSource::Server => "server",
                BalanceSource::Default => "default",
            },
        },
        vouchers,
        manager,
        redemptions,
    })
}

#[derive(Debug, Serialize)]
pub struct HeadlessReport {
    api_url: String,
    role: &'static str,
    generated_at: String,
    risk: Option<RiskLine>,
    forecast: Option<ForecastLine>,
    zones: ZoneSummary,
    balance: BalanceLine,
    vouchers: Vec<VoucherLine>,
    manager: Option<ManagerSummary>,
    redemptions: RedemptionSummary,
}

#[derive(Debug, Serialize)]
struct RiskLine {
    percentage: u8,
    tier: &'static str,
    confidence: u8,
    updated: String,
}

#[derive(Debug, Serialize)]
struct ForecastLine {
    percentage: u8,
    tier: &'static str,
    date: String,
}

#[derive(Debug, Serialize)]
struct ZoneSummary {
    source: &'static str,
    counts: TierCounts,
}

#[derive(Debug, Serialize)]
struct BalanceLine {
    points: i64,
    source: &'static str,
}

#[derive(Debug, Serialize)]
struct VoucherLine {
    id: String,
    title: String,
    points: i64,
    merchant: String,
    affordable: bool,
}

#[derive(Debug, Serialize)]
struct ManagerSummary {
    sensor_alerts: Vec<String>,
    critical_zones: Vec<String>,
    cases_avoided: Option<i64>,
}

#[derive(Debug, Serialize)]
struct RedemptionSummary {
    count: usize,
    points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{setup_database, POINTS_KEY};
    use crate::testing::FakeApi;
    use sentinel_core::Role;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config(mock: bool) -> AppConfig {
        AppConfig {
            api_url: "http://localhost:5328".into(),
            user_id: "user_123".into(),
            database_path: PathBuf::from(":memory:"),
            database_url: "sqlite::memory:".into(),
            refresh_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(1),
            log_path: PathBuf::from("test.log"),
            role: Role::Manager,
            mock,
        }
    }

    async fn ledger(cached: Option<&str>) -> Result<PointsLedger, Box<dyn std::error::Error>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        setup_database(&pool).await?;
        if let Some(value) = cached {
            queries::set_value(&pool, POINTS_KEY, value).await?;
        }
        Ok(PointsLedger::load(pool).await?)
    }

    #[tokio::test]
    async fn report_summarises_live_data() -> Result<(), Box<dyn std::error::Error>> {
        let api = FakeApi::with_server_points(1200);
        let mut ledger = ledger(None).await?;

        let report = build_report(&api, &mut ledger, &config(false)).await?;

        assert_eq!(report.zones.source, "live");
        assert_eq!(report.zones.counts.high, 1);
        assert_eq!(report.balance.points, 1200);
        assert_eq!(report.balance.source, "server");
        assert!(report.vouchers[0].affordable);
        assert!(!report.vouchers[1].affordable);

        let manager = report.manager.as_ref().ok_or("no manager summary")?;
        assert_eq!(manager.sensor_alerts, vec!["Salinity", "Water level"]);
        assert_eq!(manager.critical_zones, vec!["Ninh Kieu, Ward 5"]);
        Ok(())
    }

    #[tokio::test]
    async fn backend_outage_still_reports() -> Result<(), Box<dyn std::error::Error>> {
        let api = FakeApi::failing(503);
        let mut ledger = ledger(Some("1240")).await?;

        let report = build_report(&api, &mut ledger, &config(false)).await?;

        assert!(report.risk.is_none());
        assert!(report.manager.is_none());
        assert_eq!(report.zones.source, "generated");
        assert!(report.zones.counts.total() >= 30);
        assert_eq!(report.balance.points, 1240);

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["balance"]["source"], "cache");
        Ok(())
    }
}
