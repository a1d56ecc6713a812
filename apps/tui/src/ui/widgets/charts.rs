use crate::app::AppScreen;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Tabs};
use ratatui::Frame;
use sentinel_core::hospital::InflowDay;
use sentinel_core::zones::TierCounts;
use sentinel_core::RiskTier;

pub fn tier_color(tier: RiskTier) -> Color {
    let (r, g, b) = tier.rgb();
    Color::Rgb(r, g, b)
}

pub fn risk_color(risk: u8) -> Color {
    tier_color(RiskTier::classify(risk))
}

pub fn render_screen_tabs(current: AppScreen, f: &mut Frame<'_>, area: Rect) {
    let titles = AppScreen::ALL
        .iter()
        .enumerate()
        .map(|(index, screen)| TextLine::from(format!("{} {}", index + 1, screen.title())))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .select(current.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

fn empty_panel(f: &mut Frame<'_>, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

pub fn render_tier_barchart(counts: &TierCounts, f: &mut Frame<'_>, area: Rect) {
    if counts.total() == 0 {
        empty_panel(f, area, "Zones by Tier", "No zones loaded");
        return;
    }

    let bars: Vec<Bar<'_>> = RiskTier::ALL
        .iter()
        .rev()
        .map(|tier| {
            Bar::default()
                .value(counts.get(*tier) as u64)
                .label(TextLine::from(tier.label()))
                .style(Style::default().fg(tier_color(*tier)))
                .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        })
        .collect();

    let max_value = RiskTier::ALL
        .iter()
        .map(|tier| counts.get(*tier) as u64)
        .max()
        .unwrap_or(0)
        .max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Zones by Tier")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_gap(1)
        .bar_width(8);

    f.render_widget(chart, area);
}

pub fn render_inflow_chart(days: &[InflowDay], f: &mut Frame<'_>, area: Rect) {
    if days.is_empty() {
        empty_panel(f, area, "Patient Inflow", "No forecast");
        return;
    }

    let peak = days.iter().map(|day| day.patients).max().unwrap_or(0);
    let bars: Vec<Bar<'_>> = days
        .iter()
        .map(|day| {
            let color = if day.patients == peak {
                Color::Rgb(239, 68, 68)
            } else {
                Color::Rgb(56, 189, 248)
            };
            Bar::default()
                .value(day.patients)
                .label(TextLine::from(day.day))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("7-Day Patient Surge Forecast")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(&bars))
        .max(peak.max(1))
        .bar_gap(1)
        .bar_width(6);

    f.render_widget(chart, area);
}
