// Rendering: one frame layout shared by every screen, overlays on top

pub mod screens;
pub mod widgets;

use crate::app::{App, AppScreen};
use crate::ui::widgets::charts::render_screen_tabs;
use crate::ui::widgets::spinner::render_spinner;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title and tabs
            Constraint::Min(8),    // Screen body
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_title_section(app, f, layout[0]);

    match app.screen {
        AppScreen::Home => screens::home::render_home(app, f, layout[1]),
        AppScreen::Map => screens::map::render_map(app, f, layout[1]),
        AppScreen::Tasks => screens::tasks::render_tasks(app, f, layout[1]),
        AppScreen::Rewards => screens::rewards::render_rewards(app, f, layout[1]),
        AppScreen::Manager => screens::manager::render_manager(app, f, layout[1]),
        AppScreen::Hospital => screens::hospital::render_hospital(app, f, layout[1]),
        AppScreen::Settings => screens::settings::render_settings(app, f, layout[1]),
    }

    render_status_section(app, f, layout[2]);
    render_shortcuts(app, f, layout[3]);

    screens::overlays::render_overlays(app, f, layout[1]);
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title(format!(" Dengue Sentinel | {} ", app.role.label()))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = title_block.inner(area);
    f.render_widget(title_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    render_screen_tabs(app.screen, f, chunks[0]);

    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let mut balance = vec![
        Span::styled("Points: ", Style::default().fg(Color::Gray)),
        Span::styled(
            app.ledger.balance().to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some((flash, _)) = &app.flash {
        balance.push(Span::styled(
            format!("  {flash}"),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(
        Paragraph::new(TextLine::from(balance)).alignment(Alignment::Left),
        row[0],
    );

    if app.is_busy() {
        render_spinner(f, row[1], "Loading...", app.animation_counter);
    } else {
        let user = Paragraph::new(TextLine::from(Span::styled(
            format!("user {}", app.config.user_id),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right);
        f.render_widget(user, row[1]);
    }
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    let status = Paragraph::new(Text::from(Span::styled(app.status_message.clone(), style)))
        .block(status_block);
    f.render_widget(status, area);
}

fn shortcut_hints(screen: AppScreen) -> &'static [(&'static str, &'static str)] {
    match screen {
        AppScreen::Home => &[("Enter", "verify quest"), ("m", "map")],
        AppScreen::Map => &[("t", "today / +2 days"), ("←/→", "zone"), ("Enter", "details")],
        AppScreen::Tasks => &[("↑/↓", "mission"), ("Enter", "submit photo")],
        AppScreen::Rewards => &[("↑/↓", "voucher"), ("Enter", "redeem"), ("s", "sync")],
        AppScreen::Manager => &[("↑/↓", "zone"), ("b", "broadcast"), ("/", "search"), ("←/→", "district")],
        AppScreen::Hospital => &[],
        AppScreen::Settings => &[("↑/↓", "field"), ("Enter", "edit"), ("x", "clear saved")],
    }
}

fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    let common = [("Tab", "screens"), ("c", "chat"), ("r", "refresh"), ("?", "help"), ("q", "quit")];
    for (key, action) in shortcut_hints(app.screen).iter().chain(common.iter()) {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(format!(": {action}   ")));
    }

    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}
