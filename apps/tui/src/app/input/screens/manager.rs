use crate::app::input::helpers::{edit_text, wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_manager_input(app: &mut App, key: KeyCode) {
    if app.manager.search.active {
        handle_search_input(app, key);
        return;
    }

    let zones = app.manager.zones.len();
    let districts = app.manager.search.matches.len();
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.manager.selected_zone = wrap_decrement(app.manager.selected_zone, zones);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.manager.selected_zone = wrap_increment(app.manager.selected_zone, zones);
        }
        KeyCode::Left => {
            app.manager.search.selected = wrap_decrement(app.manager.search.selected, districts);
        }
        KeyCode::Right => {
            app.manager.search.selected = wrap_increment(app.manager.search.selected, districts);
        }
        KeyCode::Char('b') | KeyCode::Enter => app.request_broadcast(),
        KeyCode::Char('/') => app.manager.search.active = true,
        KeyCode::Esc => {
            app.manager.search.clear();
            app.manager.search.refresh(&app.manager.districts);
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    let search = &mut app.manager.search;
    match key {
        KeyCode::Esc => {
            search.clear();
        }
        KeyCode::Enter => search.active = false,
        KeyCode::Up => search.selected = wrap_decrement(search.selected, search.matches.len()),
        KeyCode::Down => search.selected = wrap_increment(search.selected, search.matches.len()),
        other => {
            if edit_text(&mut search.query, other) {
                search.selected = 0;
            }
        }
    }
    app.manager.search.refresh(&app.manager.districts);
}
