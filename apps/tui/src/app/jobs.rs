use crate::api::ApiError;
use crate::verify::SubmitError;
use sentinel_core::models::Redemption;
use sentinel_core::{
    BroadcastAck, DailyTask, DistrictRisk, Forecast, HeatmapZone, PriorityZone, RiskReport,
    RoiStats, SensorArray, VerifyOutcome, Voucher, VoucherCatalog,
};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

#[derive(Debug)]
pub enum FetchEvent {
    Page { generation: u64, update: PageUpdate },
    Action(ActionOutcome),
}

#[derive(Debug)]
pub struct HomeBundle {
    pub risk: Result<RiskReport, ApiError>,
    pub forecast: Result<Forecast, ApiError>,
    pub daily: Result<DailyTask, ApiError>,
    pub zones: Result<Vec<HeatmapZone>, ApiError>,
}

#[derive(Debug)]
pub struct ManagerBundle {
    pub sensors: Result<SensorArray, ApiError>,
    pub zones: Result<Vec<PriorityZone>, ApiError>,
    pub roi: Result<RoiStats, ApiError>,
}

#[derive(Debug)]
pub enum PageUpdate {
    Home(Box<HomeBundle>),
    Heatmap {
        date_offset: u32,
        result: Result<Vec<HeatmapZone>, ApiError>,
    },
    Vouchers(Result<VoucherCatalog, ApiError>),
    Manager(Box<ManagerBundle>),
    Districts(Result<Vec<DistrictRisk>, ApiError>),
}

#[derive(Debug)]
pub enum ActionOutcome {
    Verified {
        task_id: String,
        result: Result<VerifyOutcome, SubmitError>,
    },
    Redeemed {
        voucher: Voucher,
        result: Result<Redemption, ApiError>,
    },
    Synced(Result<VoucherCatalog, ApiError>),
    Broadcast {
        zone_name: String,
        result: Result<BroadcastAck, ApiError>,
    },
    ChatReply(Result<String, ApiError>),
}

/// Page jobs are aborted when the screen changes and tagged with the
/// generation they started under; action jobs always run to completion.
#[derive(Debug)]
pub struct JobRunner {
    events: UnboundedSender<FetchEvent>,
    generation: u64,
    page_jobs: Vec<AbortHandle>,
}

impl JobRunner {
    pub const fn new(events: UnboundedSender<FetchEvent>) -> Self {
        Self {
            events,
            generation: 0,
            page_jobs: Vec::new(),
        }
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort every loader of the current page and start a new generation.
    pub fn leave_page(&mut self) {
        let aborted = self.page_jobs.len();
        for handle in self.page_jobs.drain(..) {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
        debug!(aborted, generation = self.generation, "page jobs reset");
    }

    pub fn active_page_jobs(&self) -> usize {
        self.page_jobs
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    pub fn spawn_page<F>(&mut self, job: F)
    where
        F: Future<Output = PageUpdate> + Send + 'static,
    {
        let events = self.events.clone();
        let generation = self.generation;
        let handle = tokio::spawn(async move {
            let update = job.await;
            // The receiver only goes away on shutdown.
            let _ = events.send(FetchEvent::Page { generation, update });
        });
        self.page_jobs.retain(|handle| !handle.is_finished());
        self.page_jobs.push(handle.abort_handle());
    }

    pub fn spawn_page_every<F, Fut>(&mut self, period: Duration, mut job: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = PageUpdate> + Send + 'static,
    {
        let events = self.events.clone();
        let generation = self.generation;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let update = job().await;
                if events.send(FetchEvent::Page { generation, update }).is_err() {
                    break;
                }
            }
        });
        self.page_jobs.push(handle.abort_handle());
    }

    pub fn spawn_action<F>(&self, job: F)
    where
        F: Future<Output = ActionOutcome> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = job.await;
            let _ = events.send(FetchEvent::Action(outcome));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn failed_vouchers() -> PageUpdate {
        PageUpdate::Vouchers(Err(ApiError::Status {
            endpoint: "/api/vouchers".into(),
            status: 500,
        }))
    }

    #[tokio::test]
    async fn page_results_carry_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut jobs = JobRunner::new(tx);
        jobs.leave_page();
        jobs.spawn_page(async { failed_vouchers() });

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(matches!(
            event,
            Ok(Some(FetchEvent::Page { generation: 1, .. }))
        ));
    }

    #[tokio::test]
    async fn leaving_page_aborts_loaders() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut jobs = JobRunner::new(tx);
        jobs.spawn_page(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            failed_vouchers()
        });
        assert_eq!(jobs.active_page_jobs(), 1);

        jobs.leave_page();

        let event = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
        assert!(event.is_err(), "aborted loader still reported");
        assert_eq!(jobs.active_page_jobs(), 0);
    }

    #[tokio::test]
    async fn refreshing_job_repeats() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut jobs = JobRunner::new(tx);
        jobs.spawn_page_every(Duration::from_millis(20), || async { failed_vouchers() });

        for _ in 0..3 {
            let event = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
            assert!(matches!(event, Ok(Some(FetchEvent::Page { .. }))));
        }
        jobs.leave_page();
    }

    #[tokio::test]
    async fn actions_survive_page_changes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut jobs = JobRunner::new(tx);
        jobs.spawn_action(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            ActionOutcome::ChatReply(Ok("hi".into()))
        });
        jobs.leave_page();

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(matches!(
            event,
            Ok(Some(FetchEvent::Action(ActionOutcome::ChatReply(Ok(_)))))
        ));
    }
}
