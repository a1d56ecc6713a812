use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub async fn handle_map_input(app: &mut App, key: KeyCode) {
    let plotted = app.map.plotted().len();
    match key {
        KeyCode::Char('t') => app.toggle_map_day().await,
        KeyCode::Right | KeyCode::Down | KeyCode::Char('j') => {
            app.map.selected = wrap_increment(app.map.selected, plotted);
        }
        KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => {
            app.map.selected = wrap_decrement(app.map.selected, plotted);
        }
        KeyCode::Enter => {
            app.map.show_detail = plotted > 0 && !app.map.show_detail;
        }
        KeyCode::Esc => app.map.show_detail = false,
        _ => {}
    }
}
