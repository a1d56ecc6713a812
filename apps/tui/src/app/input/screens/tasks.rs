use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;
use sentinel_core::rewards::MISSIONS;

pub fn handle_tasks_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.tasks.selected = wrap_decrement(app.tasks.selected, MISSIONS.len());
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.tasks.selected = wrap_increment(app.tasks.selected, MISSIONS.len());
        }
        KeyCode::Enter => app.start_mission(),
        _ => {}
    }
}
