use crate::app::App;
use crate::ui::widgets::charts::{risk_color, tier_color};
use crate::ui::widgets::geo::render_mini_map;
use crate::ui::widgets::spinner::render_spinner;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;
use sentinel_core::models::RiskFactors;
use sentinel_core::TaskStatus;

pub fn render_home(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Today's risk
            Constraint::Length(6), // Forecast
            Constraint::Min(5),    // Daily quest
        ])
        .split(columns[0]);

    render_risk_card(app, f, left[0]);
    render_forecast_card(app, f, left[1]);
    render_daily_quest(app, f, left[2]);
    render_mini_map(f, columns[1], &app.home.zones, app.animation_counter);
}

fn factor_line(factors: &RiskFactors) -> TextLine<'static> {
    let label = Style::default().fg(Color::Gray);
    TextLine::from(vec![
        Span::styled("Temp ", label),
        Span::raw(factors.temperature.clone()),
        Span::styled("  Rain ", label),
        Span::raw(factors.rainfall.clone()),
        Span::styled("  Humidity ", label),
        Span::raw(factors.humidity.clone()),
    ])
}

fn render_risk_card(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Today's Outbreak Risk")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(risk) = &app.home.risk else {
        let inner = block.inner(area);
        f.render_widget(block, area);
        if app.home.loading {
            render_spinner(f, inner, "Fetching risk...", app.animation_counter);
        } else {
            f.render_widget(Paragraph::new("Risk unavailable"), inner);
        }
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let color = tier_color(risk.tier());
    let headline = TextLine::from(vec![
        Span::styled(
            risk.tier().label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  confidence {}%", risk.confidence),
            Style::default().fg(Color::Gray),
        ),
    ]);
    f.render_widget(Paragraph::new(headline), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .percent(u16::from(risk.risk_percentage.min(100)))
        .label(format!("{}%", risk.risk_percentage));
    f.render_widget(gauge, rows[1]);

    f.render_widget(Paragraph::new(factor_line(&risk.factors)), rows[2]);
    if !risk.last_update.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!("Updated {}", risk.last_update),
                Style::default().fg(Color::DarkGray),
            )),
            rows[3],
        );
    }
}

fn render_forecast_card(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Forecast (+2 days)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = match &app.home.forecast {
        Some(forecast) => vec![
            TextLine::from(vec![
                Span::styled(
                    format!("{}%", forecast.risk_percentage),
                    Style::default()
                        .fg(risk_color(forecast.risk_percentage))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {} on {}", forecast.tier().label(), forecast.date)),
            ]),
            factor_line(&forecast.factors),
        ],
        None if app.home.loading => vec![TextLine::from("Loading forecast...")],
        None => vec![TextLine::from("Forecast unavailable")],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_daily_quest(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Daily Prevention Quest")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let Some(daily) = &app.home.daily else {
        let message = if app.home.loading {
            "Loading quest..."
        } else {
            "No quest assigned today"
        };
        f.render_widget(Paragraph::new(message).block(block), area);
        return;
    };

    let task = &daily.task;
    let (status, status_style) = match task.status {
        TaskStatus::Completed => ("Completed", Style::default().fg(Color::Green)),
        TaskStatus::Pending if app.pending.verify.as_deref() == Some(task.task_id.as_str()) => {
            ("Verifying...", Style::default().fg(Color::Yellow))
        }
        TaskStatus::Pending => ("Pending", Style::default().fg(Color::Yellow)),
    };

    let mut lines = vec![
        TextLine::from(Span::styled(
            task.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(task.description.clone()),
        TextLine::from(vec![
            Span::styled("Reward ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("+{} pts", task.reward_points),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("  Status ", Style::default().fg(Color::Gray)),
            Span::styled(status, status_style),
        ]),
    ];
    if task.status == TaskStatus::Pending {
        lines.push(TextLine::from(Span::styled(
            "Press Enter to submit a photo",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
