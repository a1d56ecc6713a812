use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, ThrobberState, BRAILLE_SIX};

pub fn render_spinner(f: &mut Frame<'_>, area: Rect, label: &str, animation: f64) {
    #[allow(clippy::cast_possible_truncation)]
    let step = ((animation * 4.0) as i8).rem_euclid(6) + 1;
    let mut state = ThrobberState::default();
    state.calc_step(step);

    let throbber = Throbber::default()
        .label(label.to_string())
        .style(Style::default().fg(Color::Cyan))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(BRAILLE_SIX);

    f.render_stateful_widget(throbber, area, &mut state);
}
