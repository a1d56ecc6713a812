use crate::app::App;
use crate::ui::widgets::charts::{risk_color, tier_color};
use crate::ui::widgets::geo::render_district_map;
use crate::ui::widgets::spinner::render_spinner;
use crate::ui::widgets::tables::{header_style, scroll_offset, selected_row_style};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;
use sentinel_core::{SensorArray, SensorReading};

pub fn render_manager(app: &App, f: &mut Frame<'_>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),      // Sensor cards
            Constraint::Percentage(50), // District map and list
            Constraint::Min(6),         // Priority zones
        ])
        .split(area);

    render_sensor_row(app, f, rows[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);
    render_district_map(
        f,
        middle[0],
        &app.manager.districts,
        app.manager.selected_district(),
        app.animation_counter,
    );
    render_district_panel(app, f, middle[1]);

    render_priority_zones(app, f, rows[2]);
}

fn reading_style(name: &str, reading: &SensorReading, sensors: &SensorArray) -> Style {
    let alert = if name == "Salinity" {
        sensors.salinity_alert()
    } else {
        reading.is_alert()
    };
    if alert {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    }
}

fn render_sensor_row(app: &App, f: &mut Frame<'_>, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    match &app.manager.sensors {
        Some(sensors) => {
            for (index, (name, reading)) in sensors.readings().into_iter().enumerate() {
                let style = reading_style(name, reading, sensors);
                let lines = vec![
                    TextLine::from(Span::styled(
                        format!("{} {}", reading.value, reading.unit),
                        style,
                    )),
                    TextLine::from(Span::styled(
                        format!("{} ({})", reading.status, reading.trend),
                        Style::default().fg(Color::Gray),
                    )),
                ];
                let block = Block::default()
                    .title(name)
                    .borders(Borders::ALL)
                    .border_style(style);
                f.render_widget(Paragraph::new(lines).block(block), cards[index]);
            }
        }
        None => {
            let block = Block::default()
                .title("Sensors")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan));
            let inner = block.inner(area);
            f.render_widget(block, area);
            if app.manager.loading {
                render_spinner(f, inner, "Reading sensors...", app.animation_counter);
            } else {
                f.render_widget(Paragraph::new("Sensor feed unavailable"), inner);
            }
            return;
        }
    }

    let roi_block = Block::default()
        .title("Impact")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let roi_lines = match &app.manager.roi {
        Some(roi) => vec![
            TextLine::from(Span::styled(
                format!("{} cases avoided", roi.cases_avoided),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            TextLine::from(format!(
                "${} saved, {} actions",
                roi.money_saved_usd, roi.citizen_actions
            )),
        ],
        None => vec![TextLine::from("ROI pending")],
    };
    f.render_widget(Paragraph::new(roi_lines).block(roi_block), cards[4]);
}

fn render_district_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let search = &app.manager.search;
    let search_style = if search.active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let search_text = if search.active || !search.query.is_empty() {
        format!("{}{}", search.query, if search.active { "_" } else { "" })
    } else {
        "Press / to search districts".to_string()
    };
    f.render_widget(
        Paragraph::new(search_text).block(
            Block::default()
                .title("Search")
                .borders(Borders::ALL)
                .border_style(search_style),
        ),
        chunks[0],
    );

    let rows: Vec<Row<'_>> = search
        .matches
        .iter()
        .filter_map(|index| app.manager.districts.get(*index))
        .map(|district| {
            let arrow = if district.is_rising() { "▲" } else { "▼" };
            Row::new(vec![
                Cell::from(district.name.clone()),
                Cell::from(format!("{}%", district.risk)),
                Cell::from(Span::styled(
                    format!("{}% {arrow}", district.projected_risk),
                    Style::default().fg(tier_color(district.tier())),
                )),
                Cell::from(format!("{}k", district.pop / 1_000)),
            ])
        })
        .collect();

    let title = match app.manager.last_refresh {
        Some(at) => format!("Districts (updated {})", at.format("%H:%M:%S")),
        None => "Districts".to_string(),
    };

    let visible = usize::from(chunks[1].height.saturating_sub(3));
    let mut state = TableState::default()
        .with_offset(scroll_offset(search.matches.len(), visible, search.selected))
        .with_selected((!search.matches.is_empty()).then_some(search.selected));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ],
    )
    .header(Row::new(vec!["District", "Now", "14 days", "Pop"]).style(header_style()))
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .row_highlight_style(selected_row_style());

    f.render_stateful_widget(table, chunks[1], &mut state);
}

fn render_priority_zones(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Priority Zones")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    if app.manager.zones.is_empty() {
        f.render_widget(Paragraph::new("No priority zones").block(block), area);
        return;
    }

    let rows: Vec<Row<'_>> = app
        .manager
        .zones
        .iter()
        .map(|zone| {
            let label_style = if zone.is_critical() {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Yellow)
            };
            let broadcasting = app.pending.broadcast.as_deref() == Some(zone.name.as_str());
            let index_color = risk_color(zone.index_risk());
            Row::new(vec![
                Cell::from(zone.name.clone()),
                Cell::from(Span::styled(zone.risk_label.clone(), label_style)),
                Cell::from(Span::styled(
                    format!("{:.1}/10", zone.mosquito_index),
                    Style::default().fg(index_color),
                )),
                Cell::from(zone.status.clone()),
                Cell::from(if broadcasting {
                    "Sending...".to_string()
                } else {
                    zone.action_needed.clone()
                }),
            ])
        })
        .collect();

    let visible = usize::from(area.height.saturating_sub(3));
    let mut state = TableState::default()
        .with_offset(scroll_offset(
            app.manager.zones.len(),
            visible,
            app.manager.selected_zone,
        ))
        .with_selected(Some(app.manager.selected_zone));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(28),
            Constraint::Percentage(12),
            Constraint::Percentage(12),
            Constraint::Percentage(18),
            Constraint::Percentage(30),
        ],
    )
    .header(
        Row::new(vec!["Zone", "Risk", "Index", "Status", "Action"]).style(header_style()),
    )
    .block(block)
    .row_highlight_style(selected_row_style())
    .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SentinelApi;
    use crate::testing::{test_app, FakeApi};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sentinel_core::RiskTier;
    use std::sync::Arc;

    #[tokio::test]
    async fn critical_zone_index_is_drawn_high() -> Result<(), Box<dyn std::error::Error>> {
        let api = Arc::new(FakeApi::default());
        let (mut app, _rx) = test_app(api.clone(), None).await?;
        app.manager.zones = api.priority_zones().await?;
        let mut terminal = Terminal::new(TestBackend::new(140, 40))?;

        terminal.draw(|f| render_manager(&app, f, f.area()))?;

        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let cell = (area.top()..area.bottom())
            .flat_map(|y| (area.left()..area.right()).map(move |x| (x, y)))
            .find(|&(x, y)| {
                x + 3 < area.right()
                    && buffer[(x, y)].symbol() == "8"
                    && buffer[(x + 1, y)].symbol() == "."
                    && buffer[(x + 3, y)].symbol() == "/"
            })
            .ok_or("index cell not drawn")?;
        assert_eq!(buffer[cell].fg, tier_color(RiskTier::High));
        Ok(())
    }
}
