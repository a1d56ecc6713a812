use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub async fn handle_home_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter | KeyCode::Char('v') => app.start_daily_quest(),
        KeyCode::Char('m') => app.enter_screen(AppScreen::Map).await,
        _ => {}
    }
}
