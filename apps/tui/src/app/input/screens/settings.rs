use crate::app::input::helpers::{edit_text, wrap_decrement, wrap_increment};
use crate::app::state::{App, SETTINGS_FIELDS};
use crossterm::event::KeyCode;

pub async fn handle_settings_input(app: &mut App, key: KeyCode) {
    if app.settings.editing {
        match key {
            KeyCode::Esc => {
                app.settings.editing = false;
                app.settings.input.clear();
            }
            KeyCode::Enter => {
                app.commit_settings_edit().await;
                app.settings.input.clear();
            }
            other => {
                edit_text(&mut app.settings.input, other);
            }
        }
        return;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings.selected = wrap_decrement(app.settings.selected, SETTINGS_FIELDS);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.settings.selected = wrap_increment(app.settings.selected, SETTINGS_FIELDS);
        }
        KeyCode::Enter => app.begin_settings_edit(),
        KeyCode::Char('x') => app.reset_settings().await,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoredSettings;
    use crate::testing::{test_app, FakeApi};
    use std::sync::Arc;

    #[tokio::test]
    async fn edited_user_id_is_persisted() -> Result<(), Box<dyn std::error::Error>> {
        let (mut app, _rx) = test_app(Arc::new(FakeApi::default()), None).await?;

        handle_settings_input(&mut app, KeyCode::Down).await;
        handle_settings_input(&mut app, KeyCode::Enter).await;
        assert!(app.settings.editing);
        assert_eq!(app.settings.input, "user_123");

        app.settings.input.clear();
        for ch in "user_777".chars() {
            handle_settings_input(&mut app, KeyCode::Char(ch)).await;
        }
        handle_settings_input(&mut app, KeyCode::Enter).await;

        assert!(!app.settings.editing);
        let stored = StoredSettings::load(app.ledger.pool()).await?;
        assert_eq!(stored.user_id.as_deref(), Some("user_777"));
        assert_eq!(stored.api_url.as_deref(), Some("http://localhost:5328"));
        Ok(())
    }
}
