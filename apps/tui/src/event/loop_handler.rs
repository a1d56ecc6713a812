use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::app::{handle_input, App, FetchEvent};
use crate::ui;

// Event poll timeout (ms), also the frame interval while idle
const EVENT_POLL_TIMEOUT: u64 = 50;

pub async fn drain_events(app: &mut App, events: &mut UnboundedReceiver<FetchEvent>) -> usize {
    let mut applied = 0;
    while let Ok(event) = events.try_recv() {
        app.apply_event(event).await;
        applied += 1;
    }
    applied
}

fn retire_finished_effects(app: &App) {
    if let Ok(mut effect) = app.qr_fx.lock() {
        if effect.as_ref().is_some_and(tachyonfx::Effect::done) {
            *effect = None;
        }
    }
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    mut events: UnboundedReceiver<FetchEvent>,
) -> Result<()> {
    info!(screen = app.screen.title(), role = app.role.as_str(), "dashboard started");
    app.refresh_screen().await;

    loop {
        let applied = drain_events(app, &mut events).await;
        if applied > 0 {
            debug!(applied, "job results applied");
        }

        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }
        retire_finished_effects(app);

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code).await;
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Redraw at the new size; a failure here shows on the next frame
                    let _ = terminal.draw(|f| ui::ui(app, f));
                }
                Ok(_) | Err(_) => {}
            }
        }
    }

    app.jobs.leave_page();
    info!("dashboard closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppScreen;
    use crate::testing::{test_app, FakeApi};
    use std::sync::Arc;

    #[tokio::test]
    async fn loaders_fill_the_home_page() -> Result<(), Box<dyn std::error::Error>> {
        let (mut app, mut rx) = test_app(Arc::new(FakeApi::default()), None).await?;
        app.refresh_screen().await;
        assert!(app.home.loading);

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await?
            .ok_or("channel closed")?;
        app.apply_event(event).await;

        assert!(!app.home.loading);
        assert_eq!(app.home.risk.as_ref().map(|r| r.risk_percentage), Some(78));
        assert_eq!(app.home.zones.len(), 3);
        assert_eq!(drain_events(&mut app, &mut rx).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn manager_page_loads_bundle_and_districts() -> Result<(), Box<dyn std::error::Error>> {
        let (mut app, mut rx) = test_app(Arc::new(FakeApi::default()), None).await?;
        app.enter_screen(AppScreen::Manager).await;

        for _ in 0..2 {
            let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await?
                .ok_or("channel closed")?;
            app.apply_event(event).await;
        }

        assert!(app.manager.sensors.as_ref().is_some_and(|s| s.salinity_alert()));
        assert_eq!(app.manager.districts.len(), 1);
        assert_eq!(app.manager.search.matches, vec![0]);
        assert!(app.manager.last_refresh.is_some());
        Ok(())
    }
}
