use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod help;
mod home;
mod manager;
mod map;
mod overlays;
mod rewards;
mod settings;
mod tasks;

/// Route a key press. Overlays take keys before the screen does, and text
/// entry swallows the single-letter shortcuts.
pub async fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }
    if overlays::handle_alert(app, key) {
        return;
    }
    if overlays::handle_qr_modal(app, key) {
        return;
    }
    if overlays::handle_photo_prompt(app, key) {
        return;
    }
    if overlays::handle_chat(app, key) {
        return;
    }

    if app.captures_text() {
        match app.screen {
            AppScreen::Settings => settings::handle_settings_input(app, key).await,
            AppScreen::Manager => manager::handle_manager_input(app, key),
            _ => {}
        }
        return;
    }

    if handle_global_keys(app, key).await {
        return;
    }

    match app.screen {
        AppScreen::Home => home::handle_home_input(app, key).await,
        AppScreen::Map => map::handle_map_input(app, key).await,
        AppScreen::Tasks => tasks::handle_tasks_input(app, key),
        AppScreen::Rewards => rewards::handle_rewards_input(app, key),
        AppScreen::Manager => manager::handle_manager_input(app, key),
        AppScreen::Hospital => {}
        AppScreen::Settings => settings::handle_settings_input(app, key).await,
    }
}

async fn handle_global_keys(app: &mut App, key: KeyCode) -> bool {
    let screens = AppScreen::ALL.len();
    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Tab => {
            let next = AppScreen::ALL[wrap_increment(app.screen.index(), screens)];
            app.enter_screen(next).await;
        }
        KeyCode::BackTab => {
            let previous = AppScreen::ALL[wrap_decrement(app.screen.index(), screens)];
            app.enter_screen(previous).await;
        }
        KeyCode::Char(ch @ '1'..='9') => match AppScreen::from_digit(ch) {
            Some(screen) if screen != app.screen => app.enter_screen(screen).await,
            _ => return false,
        },
        KeyCode::Char('c') => app.chat.open = true,
        KeyCode::Char('r') => {
            app.refresh_screen().await;
            app.set_status("Refreshing...");
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_app, FakeApi};
    use std::sync::Arc;

    #[tokio::test]
    async fn number_keys_switch_screens() -> Result<(), Box<dyn std::error::Error>> {
        let (mut app, _rx) = test_app(Arc::new(FakeApi::default()), None).await?;
        dispatch_input(&mut app, KeyCode::Char('6')).await;
        assert_eq!(app.screen, AppScreen::Hospital);

        dispatch_input(&mut app, KeyCode::Tab).await;
        assert_eq!(app.screen, AppScreen::Settings);
        dispatch_input(&mut app, KeyCode::Tab).await;
        assert_eq!(app.screen, AppScreen::Home);
        Ok(())
    }

    #[tokio::test]
    async fn typing_in_chat_does_not_quit() -> Result<(), Box<dyn std::error::Error>> {
        let (mut app, _rx) = test_app(Arc::new(FakeApi::default()), None).await?;
        dispatch_input(&mut app, KeyCode::Char('c')).await;
        assert!(app.chat.open);

        dispatch_input(&mut app, KeyCode::Char('q')).await;
        assert!(app.running);
        assert_eq!(app.chat.input, "q");

        dispatch_input(&mut app, KeyCode::Esc).await;
        assert!(!app.chat.open);
        dispatch_input(&mut app, KeyCode::Char('q')).await;
        assert!(!app.running);
        Ok(())
    }

    #[tokio::test]
    async fn alert_blocks_until_dismissed() -> Result<(), Box<dyn std::error::Error>> {
        let (mut app, _rx) = test_app(Arc::new(FakeApi::default()), None).await?;
        app.alert = Some("Not enough points!".into());

        dispatch_input(&mut app, KeyCode::Char('2')).await;
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.alert.is_some());

        dispatch_input(&mut app, KeyCode::Enter).await;
        assert!(app.alert.is_none());
        Ok(())
    }
}
