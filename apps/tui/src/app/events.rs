use crate::api::ApiError;
use crate::app::jobs::{ActionOutcome, FetchEvent, HomeBundle, ManagerBundle, PageUpdate};
use crate::app::redeem_flow::RedeemEvent;
use crate::app::state::{App, QrModal};
use chrono::Local;
use ratatui::style::Color;
use sentinel_core::chat::{NETWORK_ERROR, SERVER_TROUBLE};
use sentinel_core::models::Redemption;
use sentinel_core::zones::generate_mock_zones;
use sentinel_core::{BroadcastAck, TaskStatus, VerifyOutcome, Voucher, VoucherCatalog};
use std::time::Duration;
use tachyonfx::{fx, Interpolation};
use tracing::{debug, info, warn};

const BROADCAST_STATUS_TTL: Duration = Duration::from_secs(5);
pub const REDEEMED_MESSAGE: &str = "Redeemed! Present this code to the merchant.";

fn settle<T>(what: &str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(what, endpoint = e.endpoint(), error = %e, "fetch failed");
            None
        }
    }
}

impl App {
    pub async fn apply_event(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Page { generation, update } => {
                if generation != self.jobs.generation() {
                    debug!(generation, current = self.jobs.generation(), "dropping stale page result");
                    return;
                }
                self.apply_page(update);
            }
            FetchEvent::Action(outcome) => self.apply_action(outcome).await,
        }
    }

    fn apply_page(&mut self, update: PageUpdate) {
        match update {
            PageUpdate::Home(bundle) => self.apply_home(*bundle),
            PageUpdate::Heatmap {
                date_offset,
                result,
            } => {
                if date_offset != self.map.date_offset {
                    return;
                }
                match result {
                    Ok(zones) => self.map.replace_zones(zones, false),
                    Err(e) => {
                        warn!(error = %e, "heatmap unavailable, generating zones");
                        self.map
                            .replace_zones(generate_mock_zones(&mut rand::thread_rng()), true);
                        self.set_status("Live heatmap unavailable, showing generated zones");
                    }
                }
            }
            PageUpdate::Vouchers(result) => {
                self.rewards.loading = false;
                if let Some(catalog) = settle("vouchers", result) {
                    self.apply_catalog(catalog);
                }
            }
            PageUpdate::Manager(bundle) => self.apply_manager(*bundle),
            PageUpdate::Districts(result) => {
                if let Some(districts) = settle("district forecast", result) {
                    self.manager.search.refresh(&districts);
                    self.manager.districts = districts;
                }
            }
        }
    }

    fn apply_home(&mut self, bundle: HomeBundle) {
        self.home.loading = false;
        if let Some(risk) = settle("risk", bundle.risk) {
            self.home.risk = Some(risk);
        }
        if let Some(forecast) = settle("forecast", bundle.forecast) {
            self.home.forecast = Some(forecast);
        }
        if let Some(daily) = settle("daily task", bundle.daily) {
            self.home.daily = Some(daily);
        }
        if let Some(zones) = settle("heatmap", bundle.zones) {
            self.home.zones = zones;
        }
    }

    fn apply_manager(&mut self, bundle: ManagerBundle) {
        self.manager.loading = false;
        if let Some(sensors) = settle("sensors", bundle.sensors) {
            self.manager.sensors = Some(sensors);
        }
        if let Some(zones) = settle("priority zones", bundle.zones) {
            if self.manager.selected_zone >= zones.len() {
                self.manager.selected_zone = 0;
            }
            self.manager.zones = zones;
        }
        if let Some(roi) = settle("roi stats", bundle.roi) {
            self.manager.roi = Some(roi);
        }
        self.manager.last_refresh = Some(Local::now());
    }

    fn apply_catalog(&mut self, catalog: VoucherCatalog) {
        if let Some(points) = catalog.user_points {
            self.ledger.observe_server_balance(points);
        }
        self.rewards.vouchers = catalog.vouchers;
        if self.rewards.selected >= self.rewards.vouchers.len() {
            self.rewards.selected = 0;
        }
    }

    async fn apply_action(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::Verified { task_id, result } => {
                self.pending.verify = None;
                match result {
                    Ok(outcome) => self.apply_verification(&task_id, outcome).await,
                    Err(e) => {
                        warn!(task_id = %task_id, error = %e, "verification failed");
                        self.set_error(e);
                    }
                }
            }
            ActionOutcome::Redeemed { voucher, result } => {
                self.apply_redemption(voucher, result).await;
            }
            ActionOutcome::Synced(result) => {
                self.pending.sync = false;
                match result {
                    Ok(catalog) => {
                        let server = catalog.user_points;
                        self.rewards.vouchers = catalog.vouchers;
                        match server {
                            Some(points) => match self.ledger.sync_from_server(points).await {
                                Ok(()) => self.set_status(format!("Balance synced: {points} pts")),
                                Err(e) => self.set_error(e),
                            },
                            None => self.set_status("Server did not report a balance"),
                        }
                    }
                    Err(e) => self.set_error(e),
                }
            }
            ActionOutcome::Broadcast { zone_name, result } => {
                self.pending.broadcast = None;
                self.apply_broadcast(&zone_name, result);
            }
            ActionOutcome::ChatReply(result) => {
                let reply = match result {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(error = %e, "chat failed");
                        if e.is_status() {
                            SERVER_TROUBLE.to_string()
                        } else {
                            NETWORK_ERROR.to_string()
                        }
                    }
                };
                self.chat.transcript.receive(reply);
            }
        }
    }

    async fn apply_verification(&mut self, task_id: &str, outcome: VerifyOutcome) {
        if !outcome.verified {
            let reason = outcome
                .message
                .unwrap_or_else(|| "photo not accepted".to_string());
            info!(task_id, reason = %reason, "verification rejected");
            self.set_status(format!("Verification rejected: {reason}"));
            return;
        }

        match self.ledger.credit_task(task_id).await {
            Ok(reward) => {
                self.flash_points(reward);
                if !self.tasks.completed.iter().any(|id| id == task_id) {
                    self.tasks.completed.push(task_id.to_string());
                }
                if let Some(daily) = self.home.daily.as_mut() {
                    if daily.task.task_id == task_id {
                        daily.task.status = TaskStatus::Completed;
                    }
                }
                let message = outcome
                    .message
                    .unwrap_or_else(|| "Task verified".to_string());
                self.set_status(format!("{message} +{reward} pts"));
            }
            Err(e) => self.set_error(e),
        }
    }

    async fn apply_redemption(&mut self, voucher: Voucher, result: Result<Redemption, ApiError>) {
        let redemption = match result {
            Ok(redemption) => redemption,
            Err(e) => {
                warn!(voucher = %voucher.id, error = %e, "redemption failed");
                if let Err(transition) = self
                    .redeem
                    .process_event(&RedeemEvent::Rejected(e.to_string()))
                {
                    warn!(error = %transition, "unexpected redemption failure");
                }
                self.set_error(format!("Redemption failed: {e}"));
                return;
            }
        };

        if let Err(e) = self
            .redeem
            .process_event(&RedeemEvent::Accepted(redemption.qr_code.clone()))
        {
            warn!(error = %e, "unexpected redemption reply");
        }

        match self
            .ledger
            .apply_redemption(&voucher, &redemption.qr_code)
            .await
        {
            Ok(record) => {
                self.rewards.total_redeemed += record.cost;
                self.rewards.log.insert(0, record);
                self.set_status(REDEEMED_MESSAGE);
            }
            Err(e) => self.set_error(e),
        }

        self.rewards.qr = Some(QrModal {
            title: voucher.title,
            merchant: voucher.merchant,
            code: redemption.qr_code,
        });
        if let Ok(mut effect) = self.qr_fx.lock() {
            *effect = Some(fx::fade_from_fg(
                Color::Black,
                (800, Interpolation::SineOut),
            ));
        }
    }

    fn apply_broadcast(&mut self, zone_name: &str, result: Result<BroadcastAck, ApiError>) {
        match result {
            Ok(ack) if ack.success => {
                info!(zone = zone_name, recipients = ack.recipients, "broadcast sent");
                self.set_status_for(
                    format!("Alert sent to residents in {zone_name}"),
                    BROADCAST_STATUS_TTL,
                );
            }
            Ok(ack) => {
                warn!(zone = zone_name, status = %ack.status, "broadcast not accepted");
                self.set_status(format!("Broadcast not accepted: {}", ack.status));
            }
            Err(e) => {
                warn!(zone = zone_name, error = %e, "broadcast failed");
                self.set_error(e);
            }
        }
    }
}
