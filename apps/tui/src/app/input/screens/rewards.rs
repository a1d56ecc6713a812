use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_rewards_input(app: &mut App, key: KeyCode) {
    let vouchers = app.rewards.vouchers.len();
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.rewards.selected = wrap_decrement(app.rewards.selected, vouchers);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.rewards.selected = wrap_increment(app.rewards.selected, vouchers);
        }
        KeyCode::Enter => app.request_redeem(),
        KeyCode::Char('s') => app.request_sync(),
        _ => {}
    }
}
