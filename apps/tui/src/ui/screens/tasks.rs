use crate::app::App;
use crate::ui::widgets::tables::selected_row_style;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use sentinel_core::rewards::MISSIONS;

pub fn render_tasks(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let items: Vec<ListItem<'_>> = MISSIONS
        .iter()
        .map(|mission| {
            let done = app.tasks.completed.iter().any(|id| id == mission.id);
            let marker = if done {
                Span::styled("✓ ", Style::default().fg(Color::Green))
            } else {
                Span::raw("  ")
            };
            ListItem::new(TextLine::from(vec![
                marker,
                Span::raw(mission.title),
                Span::styled(
                    format!("  +{} pts", mission.reward()),
                    Style::default().fg(Color::Yellow),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Task Center")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(selected_row_style())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.tasks.selected));
    f.render_stateful_widget(list, chunks[0], &mut state);

    let Some(mission) = MISSIONS.get(app.tasks.selected) else {
        return;
    };

    let verifying = app.pending.verify.as_deref() == Some(mission.id);
    let footer = if verifying {
        Span::styled("AI is verifying your photo...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            "Press Enter to submit a photo",
            Style::default().fg(Color::DarkGray),
        )
    };

    let lines = vec![
        TextLine::from(Span::styled(
            mission.title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(mission.description),
        TextLine::from(""),
        TextLine::from(vec![
            Span::styled("Reward: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("+{} pts", mission.reward()),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        TextLine::from(footer),
    ];

    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .title("Mission")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: true }),
        chunks[1],
    );
}
