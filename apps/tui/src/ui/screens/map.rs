use crate::app::App;
use crate::ui::widgets::charts::{render_tier_barchart, tier_color};
use crate::ui::widgets::geo::render_zone_map;
use crate::ui::widgets::popup::{centered_box, ClearWidget};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use sentinel_core::zones::nearest_center;
use sentinel_core::HeatmapZone;

fn day_label(date_offset: u32) -> &'static str {
    if date_offset == 0 {
        "Today"
    } else {
        "+2 days"
    }
}

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let title = format!(" Sentinel Map | {} ", day_label(app.map.date_offset));
    render_zone_map(
        f,
        columns[0],
        &title,
        &app.map.zones,
        app.map.selected_zone(),
        app.animation_counter,
    );

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(7)])
        .split(columns[1]);

    render_tier_barchart(&app.map.counts(), f, side[0]);
    render_legend(app, f, side[1]);

    if app.map.show_detail {
        if let Some(zone) = app.map.selected_zone() {
            render_zone_detail(zone, f, columns[0]);
        }
    }
}

fn render_legend(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Legend")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines: Vec<TextLine<'_>> = sentinel_core::RiskTier::ALL
        .iter()
        .rev()
        .filter(|tier| tier.is_plotted())
        .map(|tier| {
            TextLine::from(vec![
                Span::styled("● ", Style::default().fg(tier_color(*tier))),
                Span::raw(tier.label()),
            ])
        })
        .collect();

    let plotted = app.map.plotted().len();
    lines.push(TextLine::from(format!(
        "{plotted} of {} zones shown",
        app.map.zones.len()
    )));
    if app.map.mock {
        lines.push(TextLine::from(Span::styled(
            "Generated zones (no live data)",
            Style::default().fg(Color::Yellow),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_zone_detail(zone: &HeatmapZone, f: &mut Frame<'_>, area: Rect) {
    let popup = centered_box(50, 8, area);
    f.render_widget(ClearWidget, popup);

    let color = tier_color(zone.tier());
    let block = Block::default()
        .title(" Zone Detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let center = nearest_center(zone.lat, zone.lon);
    let lines = vec![
        TextLine::from(Span::styled(
            zone.tier().label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(format!("Risk score: {}%", zone.risk)),
        TextLine::from(format!("Lat {:.4}, Lon {:.4}", zone.lat, zone.lon)),
        TextLine::from(format!("Near {}", center.name)),
        TextLine::from(Span::styled(
            "Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Paragraph::new(lines).block(block), popup);
}
