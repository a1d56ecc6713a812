use crate::app::jobs::{ActionOutcome, HomeBundle, ManagerBundle, PageUpdate};
use crate::app::redeem_flow::RedeemEvent;
use crate::app::state::{App, AppScreen, PhotoPrompt};
use crate::config::StoredSettings;
use crate::db::queries;
use crate::verify::{expand_path, submit_task};
use sentinel_core::models::BroadcastRequest;
use sentinel_core::rewards::MISSIONS;
use sentinel_core::zones::generate_mock_zones;
use std::time::Duration;
use tracing::{info, warn};

pub const FORECAST_DAYS: u32 = 2;
pub const DISTRICT_FORECAST_DAYS: u32 = 14;
pub const BROADCAST_MESSAGE: &str = "Urgent prevention required.";
const REDEMPTION_LOG_LIMIT: i64 = 10;
const BROADCAST_STATUS_TTL: Duration = Duration::from_secs(5);

impl App {
    pub async fn enter_screen(&mut self, screen: AppScreen) {
        self.jobs.leave_page();
        self.screen = screen;
        self.load_screen().await;
    }

    pub async fn refresh_screen(&mut self) {
        self.jobs.leave_page();
        self.load_screen().await;
    }

    async fn load_screen(&mut self) {
        match self.screen {
            AppScreen::Home => self.load_home(),
            AppScreen::Map => self.load_map(),
            AppScreen::Rewards => {
                self.load_vouchers();
                self.reload_redemption_log().await;
            }
            AppScreen::Manager => self.load_manager(),
            AppScreen::Tasks | AppScreen::Hospital | AppScreen::Settings => {}
        }
    }

    fn load_home(&mut self) {
        self.home.loading = true;
        let api = self.api.clone();
        let user_id = self.config.user_id.clone();

        self.jobs.spawn_page(async move {
            let (risk, forecast, daily, zones) = tokio::join!(
                api.risk(),
                api.forecast(FORECAST_DAYS),
                api.daily_task(&user_id),
                api.heatmap(0),
            );
            PageUpdate::Home(Box::new(HomeBundle {
                risk,
                forecast,
                daily,
                zones,
            }))
        });
    }

    fn load_map(&mut self) {
        if self.config.mock {
            let zones = generate_mock_zones(&mut rand::thread_rng());
            self.map.replace_zones(zones, true);
            return;
        }

        self.map.loading = true;
        let api = self.api.clone();
        let date_offset = self.map.date_offset;

        self.jobs.spawn_page(async move {
            PageUpdate::Heatmap {
                date_offset,
                result: api.heatmap(date_offset).await,
            }
        });
    }

    fn load_vouchers(&mut self) {
        self.rewards.loading = true;
        let api = self.api.clone();
        self.jobs
            .spawn_page(async move { PageUpdate::Vouchers(api.vouchers().await) });
    }

    fn load_manager(&mut self) {
        self.manager.loading = true;

        let api = self.api.clone();
        self.jobs
            .spawn_page_every(self.config.refresh_interval, move || {
                let api = api.clone();
                async move {
                    let (sensors, zones, roi) =
                        tokio::join!(api.sensors(), api.priority_zones(), api.roi_stats());
                    PageUpdate::Manager(Box::new(ManagerBundle {
                        sensors,
                        zones,
                        roi,
                    }))
                }
            });

        let api = self.api.clone();
        self.jobs.spawn_page(async move {
            PageUpdate::Districts(api.district_forecast(DISTRICT_FORECAST_DAYS).await)
        });
    }

    pub async fn reload_redemption_log(&mut self) {
        let pool = self.ledger.pool().clone();
        match queries::recent_redemptions(&pool, REDEMPTION_LOG_LIMIT).await {
            Ok(log) => self.rewards.log = log,
            Err(e) => warn!(error = %e, "could not read redemption log"),
        }
        match queries::total_points_redeemed(&pool).await {
            Ok(total) => self.rewards.total_redeemed = total,
            Err(e) => warn!(error = %e, "could not total redemptions"),
        }
    }

    pub async fn toggle_map_day(&mut self) {
        self.map.date_offset = if self.map.date_offset == 0 { 2 } else { 0 };
        self.map.selected = 0;
        self.map.show_detail = false;
        self.refresh_screen().await;
    }

    pub fn start_mission(&mut self) {
        let Some(mission) = MISSIONS.get(self.tasks.selected) else {
            return;
        };
        self.open_photo_prompt(mission.id, mission.title);
    }

    pub fn start_daily_quest(&mut self) {
        let Some(daily) = &self.home.daily else {
            self.set_status("No quest loaded yet");
            return;
        };
        if daily.task.is_completed() {
            self.set_status("Today's quest is already done");
            return;
        }
        let (id, title) = (daily.task.task_id.clone(), daily.task.title.clone());
        self.open_photo_prompt(&id, &title);
    }

    fn open_photo_prompt(&mut self, task_id: &str, title: &str) {
        if let Some(pending) = &self.pending.verify {
            self.set_status(format!("Still verifying {pending}..."));
            return;
        }
        self.photo_prompt = Some(PhotoPrompt {
            task_id: task_id.to_string(),
            title: title.to_string(),
            input: String::new(),
        });
    }

    pub fn submit_photo(&mut self) {
        let Some(prompt) = self.photo_prompt.take() else {
            return;
        };
        if prompt.input.trim().is_empty() {
            self.set_status("Enter the path to a photo");
            self.photo_prompt = Some(prompt);
            return;
        }

        let path = expand_path(&prompt.input);
        let api = self.api.clone();
        let user_id = self.config.user_id.clone();
        let task_id = prompt.task_id;

        info!(task_id = %task_id, path = %path.display(), "verifying task");
        self.pending.verify = Some(task_id.clone());
        self.set_status(format!("Verifying {}...", prompt.title));

        self.jobs.spawn_action(async move {
            let result = submit_task(api.as_ref(), &user_id, &task_id, &path).await;
            ActionOutcome::Verified { task_id, result }
        });
    }

    pub fn request_redeem(&mut self) {
        let Some(voucher) = self.rewards.selected_voucher().cloned() else {
            return;
        };
        if self.pending.sync {
            self.set_status("Wait for the balance sync to finish");
            return;
        }

        if let Err(e) = self.ledger.ensure_affordable(voucher.points) {
            info!(voucher = %voucher.id, balance = self.ledger.balance(), "redemption refused locally");
            self.alert = Some(e.to_string());
            return;
        }

        if let Err(e) = self
            .redeem
            .process_event(&RedeemEvent::Request(voucher.id.clone()))
        {
            warn!(error = %e, "redeem ignored");
            return;
        }

        self.set_status(format!("Redeeming {}...", voucher.title));
        let api = self.api.clone();
        let request = sentinel_core::models::RedeemRequest {
            user_id: self.config.user_id.clone(),
            voucher_id: voucher.id.clone(),
        };
        self.jobs.spawn_action(async move {
            let result = api.redeem_voucher(&request).await;
            ActionOutcome::Redeemed { voucher, result }
        });
    }

    pub fn dismiss_qr(&mut self) {
        self.rewards.qr = None;
        if let Ok(mut fx) = self.qr_fx.lock() {
            *fx = None;
        }
        if let Err(e) = self.redeem.process_event(&RedeemEvent::Dismiss) {
            warn!(error = %e, "dismiss outside a redemption");
        }
    }

    pub fn request_sync(&mut self) {
        if self.pending.sync {
            return;
        }
        if self.redeem.is_requesting() {
            self.set_status("Wait for the redemption to finish");
            return;
        }
        self.pending.sync = true;
        self.set_status("Syncing balance from server...");
        let api = self.api.clone();
        self.jobs
            .spawn_action(async move { ActionOutcome::Synced(api.vouchers().await) });
    }

    pub fn request_broadcast(&mut self) {
        let Some(zone) = self.manager.zones.get(self.manager.selected_zone).cloned() else {
            return;
        };
        if self.pending.broadcast.is_some() {
            return;
        }

        self.pending.broadcast = Some(zone.name.clone());
        self.set_status_for(format!("Broadcasting to {}...", zone.name), BROADCAST_STATUS_TTL);

        let api = self.api.clone();
        let request = BroadcastRequest {
            zone_id: zone.id,
            message: BROADCAST_MESSAGE.to_string(),
        };
        let zone_name = zone.name;
        self.jobs.spawn_action(async move {
            let result = api.broadcast(&request).await;
            ActionOutcome::Broadcast { zone_name, result }
        });
    }

    pub fn send_chat(&mut self) {
        let Some(text) = self.chat.transcript.submit(&self.chat.input) else {
            return;
        };
        self.chat.input.clear();

        let api = self.api.clone();
        self.jobs
            .spawn_action(async move { ActionOutcome::ChatReply(api.chat(&text).await) });
    }

    pub fn begin_settings_edit(&mut self) {
        self.settings.input = match self.settings.selected {
            0 => self.settings.api_url.clone(),
            _ => self.settings.user_id.clone(),
        };
        self.settings.editing = true;
    }

    pub async fn commit_settings_edit(&mut self) {
        let value = self.settings.input.trim().to_string();
        self.settings.editing = false;
        if value.is_empty() {
            self.set_status("Value cannot be empty");
            return;
        }

        match self.settings.selected {
            0 => self.settings.api_url = value.trim_end_matches('/').to_string(),
            _ => self.settings.user_id = value,
        }

        let stored = StoredSettings {
            api_url: Some(self.settings.api_url.clone()),
            user_id: Some(self.settings.user_id.clone()),
        };
        match stored.save(self.ledger.pool()).await {
            Ok(()) => {
                info!(api_url = %self.settings.api_url, user_id = %self.settings.user_id, "settings saved");
                self.set_status("Settings saved. They apply on next start.");
            }
            Err(e) => self.set_error(e),
        }
    }

    pub async fn reset_settings(&mut self) {
        match StoredSettings::default().save(self.ledger.pool()).await {
            Ok(()) => {
                self.settings.api_url = self.config.api_url.clone();
                self.settings.user_id = self.config.user_id.clone();
                self.set_status("Saved settings cleared");
            }
            Err(e) => self.set_error(e),
        }
    }
}
