use crate::api::SentinelApi;
use crate::app::jobs::{FetchEvent, JobRunner};
use crate::app::redeem_flow::RedeemFlow;
use crate::config::AppConfig;
use crate::db::models::RedemptionRecord;
use crate::ledger::PointsLedger;
use chrono::{DateTime, Local};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use sentinel_core::chat::Transcript;
use sentinel_core::hospital::HospitalSnapshot;
use sentinel_core::zones::{self, TierCounts};
use sentinel_core::{
    DailyTask, DistrictRisk, Forecast, HeatmapZone, PriorityZone, RiskReport, Role, RoiStats,
    SensorArray, Voucher,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tachyonfx::Effect;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Map,
    Tasks,
    Rewards,
    Manager,
    Hospital,
    Settings,
}

impl AppScreen {
    pub const ALL: [Self; 7] = [
        Self::Home,
        Self::Map,
        Self::Tasks,
        Self::Rewards,
        Self::Manager,
        Self::Hospital,
        Self::Settings,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Map => "Sentinel Map",
            Self::Tasks => "Tasks",
            Self::Rewards => "Rewards",
            Self::Manager => "CDC Command",
            Self::Hospital => "Hospital",
            Self::Settings => "Settings",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Map => 1,
            Self::Tasks => 2,
            Self::Rewards => 3,
            Self::Manager => 4,
            Self::Hospital => 5,
            Self::Settings => 6,
        }
    }

    pub fn from_digit(ch: char) -> Option<Self> {
        let digit = ch.to_digit(10)? as usize;
        digit
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub const fn landing(role: Role) -> Self {
        match role {
            Role::Citizen => Self::Home,
            Role::Manager => Self::Manager,
            Role::Hospital => Self::Hospital,
        }
    }
}

#[derive(Debug, Default)]
pub struct HomeState {
    pub loading: bool,
    pub risk: Option<RiskReport>,
    pub forecast: Option<Forecast>,
    pub daily: Option<DailyTask>,
    pub zones: Vec<HeatmapZone>,
}

#[derive(Debug, Default)]
pub struct MapState {
    pub loading: bool,
    /// 0 for today, 2 for the two-day forecast.
    pub date_offset: u32,
    pub zones: Vec<HeatmapZone>,
    pub mock: bool,
    pub selected: usize,
    pub show_detail: bool,
}

impl MapState {
    pub fn plotted(&self) -> Vec<&HeatmapZone> {
        zones::plotted(&self.zones).collect()
    }

    pub fn selected_zone(&self) -> Option<&HeatmapZone> {
        zones::plotted(&self.zones).nth(self.selected)
    }

    pub fn counts(&self) -> TierCounts {
        TierCounts::tally(&self.zones)
    }

    pub fn replace_zones(&mut self, zones: Vec<HeatmapZone>, mock: bool) {
        self.zones = zones;
        self.mock = mock;
        self.loading = false;
        let plotted = self.plotted().len();
        if self.selected >= plotted {
            self.selected = 0;
        }
    }
}

#[derive(Debug, Default)]
pub struct TasksState {
    pub selected: usize,
    pub completed: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PhotoPrompt {
    pub task_id: String,
    pub title: String,
    pub input: String,
}

#[derive(Debug, Clone)]
pub struct QrModal {
    pub title: String,
    pub merchant: String,
    pub code: String,
}

#[derive(Debug, Default)]
pub struct RewardsState {
    pub loading: bool,
    pub vouchers: Vec<Voucher>,
    pub selected: usize,
    pub qr: Option<QrModal>,
    pub log: Vec<RedemptionRecord>,
    pub total_redeemed: i64,
}

impl RewardsState {
    pub fn selected_voucher(&self) -> Option<&Voucher> {
        self.vouchers.get(self.selected)
    }
}

#[derive(Debug, Default)]
pub struct DistrictSearch {
    pub active: bool,
    pub query: String,
    pub matches: Vec<usize>,
    pub selected: usize,
}

impl DistrictSearch {
    pub fn refresh(&mut self, districts: &[DistrictRisk]) {
        let query = self.query.trim();
        if query.is_empty() {
            self.matches = (0..districts.len()).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, usize)> = districts
                .iter()
                .enumerate()
                .filter_map(|(index, district)| {
                    let haystack = format!("{} {}", district.name, district.id);
                    matcher
                        .fuzzy_match(&haystack, query)
                        .map(|score| (score, index))
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            self.matches = scored.into_iter().map(|(_, index)| index).collect();
        }

        if self.selected >= self.matches.len() {
            self.selected = 0;
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.matches.get(self.selected).copied()
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.query.clear();
        self.selected = 0;
    }
}

#[derive(Debug, Default)]
pub struct ManagerState {
    pub loading: bool,
    pub sensors: Option<SensorArray>,
    pub zones: Vec<PriorityZone>,
    pub roi: Option<RoiStats>,
    pub districts: Vec<DistrictRisk>,
    pub selected_zone: usize,
    pub search: DistrictSearch,
    pub last_refresh: Option<DateTime<Local>>,
}

impl ManagerState {
    pub fn selected_district(&self) -> Option<&DistrictRisk> {
        self.search
            .selected_index()
            .and_then(|index| self.districts.get(index))
    }
}

pub const SETTINGS_FIELDS: usize = 2;

#[derive(Debug, Default)]
pub struct SettingsState {
    pub selected: usize,
    pub editing: bool,
    pub input: String,
    pub api_url: String,
    pub user_id: String,
}

#[derive(Debug, Default)]
pub struct ChatState {
    pub open: bool,
    pub transcript: Transcript,
    pub input: String,
}

#[derive(Debug, Default)]
pub struct Pending {
    pub verify: Option<String>,
    pub broadcast: Option<String>,
    pub sync: bool,
}

impl Pending {
    pub const fn any(&self) -> bool {
        self.verify.is_some() || self.broadcast.is_some() || self.sync
    }
}

pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub role: Role,
    pub config: AppConfig,
    pub status_message: String,
    pub status_expires: Option<Instant>,
    pub show_help: bool,
    pub alert: Option<String>,
    pub flash: Option<(String, Instant)>,
    pub photo_prompt: Option<PhotoPrompt>,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub last_tick: Duration,
    pub home: HomeState,
    pub map: MapState,
    pub tasks: TasksState,
    pub rewards: RewardsState,
    pub manager: ManagerState,
    pub hospital: HospitalSnapshot,
    pub settings: SettingsState,
    pub chat: ChatState,
    pub pending: Pending,
    pub redeem: RedeemFlow,
    pub ledger: PointsLedger,
    pub api: Arc<dyn SentinelApi>,
    pub jobs: JobRunner,
    pub qr_fx: Mutex<Option<Effect>>,
}

const FLASH_DURATION: Duration = Duration::from_secs(2);

impl App {
    pub fn new(
        config: AppConfig,
        api: Arc<dyn SentinelApi>,
        ledger: PointsLedger,
        events: UnboundedSender<FetchEvent>,
    ) -> Self {
        let settings = SettingsState {
            api_url: config.api_url.clone(),
            user_id: config.user_id.clone(),
            ..SettingsState::default()
        };

        Self {
            running: true,
            screen: AppScreen::landing(config.role),
            role: config.role,
            status_message: String::new(),
            status_expires: None,
            show_help: false,
            alert: None,
            flash: None,
            photo_prompt: None,
            animation_counter: 0.0,
            last_frame: Instant::now(),
            last_tick: Duration::ZERO,
            home: HomeState::default(),
            map: MapState::default(),
            tasks: TasksState::default(),
            rewards: RewardsState::default(),
            manager: ManagerState::default(),
            hospital: HospitalSnapshot::sample(),
            settings,
            chat: ChatState::default(),
            pending: Pending::default(),
            redeem: RedeemFlow::default(),
            ledger,
            api,
            jobs: JobRunner::new(events),
            qr_fx: Mutex::new(None),
            config,
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.last_tick = delta;
        // Cycles between 0 and 2*PI
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.status_expires.is_some_and(|at| now >= at) {
            self.status_message.clear();
            self.status_expires = None;
        }
        if self
            .flash
            .as_ref()
            .is_some_and(|(_, at)| now.duration_since(*at) >= FLASH_DURATION)
        {
            self.flash = None;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_expires = None;
    }

    pub fn set_status_for(&mut self, message: impl Into<String>, ttl: Duration) {
        self.status_message = message.into();
        self.status_expires = Some(Instant::now() + ttl);
    }

    pub fn set_error(&mut self, message: impl std::fmt::Display) {
        self.set_status(format!("Error: {message}"));
    }

    pub fn flash_points(&mut self, points: i64) {
        self.flash = Some((format!("+{points}"), Instant::now()));
    }

    pub fn is_busy(&self) -> bool {
        self.home.loading
            || self.map.loading
            || self.rewards.loading
            || self.manager.loading
            || self.pending.any()
            || self.redeem.is_requesting()
    }

    /// Text entry has focus, so single-letter shortcuts must not fire.
    pub const fn captures_text(&self) -> bool {
        self.photo_prompt.is_some()
            || self.chat.open
            || self.settings.editing
            || self.manager.search.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn district(name: &str, id: &str) -> DistrictRisk {
        DistrictRisk {
            name: name.into(),
            id: id.into(),
            center: [10.0, 105.7],
            risk: 50,
            projected_risk: 60,
            trend: "stable".into(),
            pop: 100_000,
            color: String::new(),
        }
    }

    #[test]
    fn digits_map_to_screens() {
        assert_eq!(AppScreen::from_digit('1'), Some(AppScreen::Home));
        assert_eq!(AppScreen::from_digit('7'), Some(AppScreen::Settings));
        assert_eq!(AppScreen::from_digit('0'), None);
        assert_eq!(AppScreen::from_digit('8'), None);
    }

    #[test]
    fn roles_land_on_their_dashboard() {
        assert_eq!(AppScreen::landing(Role::Citizen), AppScreen::Home);
        assert_eq!(AppScreen::landing(Role::Manager), AppScreen::Manager);
        assert_eq!(AppScreen::landing(Role::Hospital), AppScreen::Hospital);
    }

    #[test]
    fn district_search_ranks_matches() {
        let districts = vec![
            district("Ninh Kieu", "CT-NK"),
            district("Cai Rang", "CT-CR"),
            district("Cao Lanh", "DT-CL"),
        ];
        let mut search = DistrictSearch::default();

        search.refresh(&districts);
        assert_eq!(search.matches, vec![0, 1, 2]);

        search.query = "cao".into();
        search.refresh(&districts);
        assert_eq!(search.selected_index(), Some(2));
        assert!(!search.matches.contains(&0));

        search.query = "zzz".into();
        search.refresh(&districts);
        assert!(search.matches.is_empty());
        assert_eq!(search.selected_index(), None);
    }

    #[test]
    fn map_selection_only_walks_plotted_zones() {
        let mut map = MapState::default();
        map.replace_zones(
            vec![
                HeatmapZone { lat: 10.0, lon: 105.0, risk: 10 },
                HeatmapZone { lat: 10.1, lon: 105.1, risk: 85 },
            ],
            false,
        );
        assert_eq!(map.plotted().len(), 1);
        assert_eq!(map.selected_zone().map(|z| z.risk), Some(85));
        assert_eq!(map.counts().low, 1);
    }
}
