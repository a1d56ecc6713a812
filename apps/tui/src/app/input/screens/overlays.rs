use crate::app::input::helpers::edit_text;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_alert(app: &mut App, key: KeyCode) -> bool {
    if app.alert.is_none() {
        return false;
    }
    if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.alert = None;
    }
    true
}

pub fn handle_qr_modal(app: &mut App, key: KeyCode) -> bool {
    if app.rewards.qr.is_none() {
        return false;
    }
    if matches!(key, KeyCode::Enter | KeyCode::Esc) {
        app.dismiss_qr();
    }
    true
}

pub fn handle_photo_prompt(app: &mut App, key: KeyCode) -> bool {
    let Some(prompt) = app.photo_prompt.as_mut() else {
        return false;
    };
    match key {
        KeyCode::Esc => app.photo_prompt = None,
        KeyCode::Enter => app.submit_photo(),
        other => {
            edit_text(&mut prompt.input, other);
        }
    }
    true
}

pub fn handle_chat(app: &mut App, key: KeyCode) -> bool {
    if !app.chat.open {
        return false;
    }
    match key {
        KeyCode::Esc => app.chat.open = false,
        KeyCode::Enter => app.send_chat(),
        other => {
            edit_text(&mut app.chat.input, other);
        }
    }
    true
}
