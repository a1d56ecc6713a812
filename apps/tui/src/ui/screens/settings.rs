use crate::app::App;
use crate::ui::widgets::tables::selected_row_style;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_settings(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Editable fields
            Constraint::Length(3), // Edit input
            Constraint::Min(5),    // Active session
        ])
        .split(area);

    let fields = [
        ("API base URL", app.settings.api_url.as_str()),
        ("User ID", app.settings.user_id.as_str()),
    ];
    let items: Vec<ListItem<'_>> = fields
        .iter()
        .map(|(label, value)| {
            ListItem::new(TextLine::from(vec![
                Span::styled(format!("{label:<14}"), Style::default().fg(Color::Gray)),
                Span::raw(*value),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.settings.selected));
    let list = List::new(items)
        .block(
            Block::default()
                .title("Settings")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(selected_row_style())
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], &mut state);

    let (input_text, input_style) = if app.settings.editing {
        (
            format!("{}_", app.settings.input),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (
            "Enter to edit the selected field".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(
        Paragraph::new(input_text).block(
            Block::default()
                .title("Edit")
                .borders(Borders::ALL)
                .border_style(input_style),
        ),
        chunks[1],
    );

    let session = vec![
        TextLine::from(format!("Role: {}", app.role.label())),
        TextLine::from(format!("Connected to: {}", app.config.api_url)),
        TextLine::from(format!("Signed in as: {}", app.config.user_id)),
        TextLine::from(format!(
            "Database: {}",
            app.config.database_path.display()
        )),
        TextLine::from(Span::styled(
            "Saved changes apply on next start. Press x to clear saved settings.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(session)
            .block(
                Block::default()
                    .title("Active Session")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: true }),
        chunks[2],
    );
}
