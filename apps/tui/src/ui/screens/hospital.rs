use crate::app::App;
use crate::ui::widgets::charts::render_inflow_chart;
use crate::ui::widgets::tables::header_style;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;
use sentinel_core::hospital::{Route, Severity};

const fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Normal => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Critical => Color::Red,
    }
}

pub fn render_hospital(app: &App, f: &mut Frame<'_>, area: Rect) {
    let snapshot = &app.hospital;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),      // KPI cards
            Constraint::Percentage(45), // Inflow chart and recommendation
            Constraint::Min(6),         // Facilities and inventory
        ])
        .split(area);

    let card_count = snapshot.kpis.len().max(1);
    #[allow(clippy::cast_possible_truncation)]
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, card_count as u32); card_count])
        .split(rows[0]);
    for (kpi, card) in snapshot.kpis.iter().zip(cards.iter()) {
        let color = severity_color(kpi.severity);
        let lines = vec![
            TextLine::from(Span::styled(
                kpi.value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            TextLine::from(Span::styled(kpi.note, Style::default().fg(Color::Gray))),
        ];
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .title(kpi.label)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            *card,
        );
    }

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);
    render_inflow_chart(&snapshot.inflow, f, middle[0]);

    let mut advice = Vec::new();
    if let Some(peak) = snapshot.peak() {
        advice.push(TextLine::from(Span::styled(
            format!("Peak: {} with {} patients", peak.day, peak.patients),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        advice.push(TextLine::from(""));
    }
    advice.push(TextLine::from(snapshot.recommendation));
    f.render_widget(
        Paragraph::new(advice)
            .block(
                Block::default()
                    .title("AI Recommendation")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .wrap(Wrap { trim: true }),
        middle[1],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    let facility_rows: Vec<Row<'_>> = snapshot
        .facilities
        .iter()
        .map(|facility| {
            let beds_style = if facility.is_full() {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            let route = match facility.route {
                Route::River => "river",
                Route::Road => "road",
            };
            Row::new(vec![
                Cell::from(facility.name),
                Cell::from(facility.status),
                Cell::from(Span::styled(facility.beds_free.to_string(), beds_style)),
                Cell::from(format!("{}m by {route}", facility.travel_minutes)),
            ])
        })
        .collect();

    let facilities = Table::new(
        facility_rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
            Constraint::Percentage(30),
        ],
    )
    .header(Row::new(vec!["Facility", "Status", "Beds", "Transfer"]).style(header_style()))
    .block(
        Block::default()
            .title("Regional Load Balancing")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(facilities, bottom[0]);

    let supply_rows: Vec<Row<'_>> = snapshot
        .inventory
        .iter()
        .map(|line| {
            Row::new(vec![
                Cell::from(line.item),
                Cell::from(line.stock.to_string()),
                Cell::from(line.outlook),
                Cell::from(Span::styled(
                    line.status,
                    Style::default().fg(severity_color(line.severity)),
                )),
            ])
        })
        .collect();

    let inventory = Table::new(
        supply_rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(12),
            Constraint::Percentage(33),
            Constraint::Percentage(25),
        ],
    )
    .header(Row::new(vec!["Item", "Stock", "72h Outlook", "Status"]).style(header_style()))
    .block(
        Block::default()
            .title("Supply Inventory")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(inventory, bottom[1]);
}
