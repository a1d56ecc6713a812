mod animation;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use animation::PulseClock;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle},
        Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Wrap,
    },
    Frame, Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use sentinel_core::models::HeatmapResponse;
use sentinel_core::zones::{self, generate_mock_zones, nearest_center, GeoBounds, TierCounts};
use sentinel_core::{HeatmapZone, RiskReport, RiskTier};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Request, RequestInit, RequestMode, Response};

const DEFAULT_API_URL: &str = "http://localhost:5328";

#[derive(Default)]
struct Dashboard {
    risk: Option<RiskReport>,
    risk_failed: bool,
    zones: Vec<HeatmapZone>,
    mock: bool,
    loading: bool,
    date_offset: u32,
    selected: usize,
    clock: PulseClock,
}

impl Dashboard {
    fn selected_zone(&self) -> Option<&HeatmapZone> {
        zones::plotted(&self.zones).nth(self.selected)
    }

    fn plotted_count(&self) -> usize {
        zones::plotted(&self.zones).count()
    }

    const fn empty_heatmap_message(&self) -> &'static str {
        if self.loading {
            "Loading heatmap..."
        } else {
            "No zones"
        }
    }
}

type Shared = Rc<RefCell<Dashboard>>;

fn main() -> io::Result<()> {
    let api_url = api_url_from_location();
    let state: Shared = Rc::new(RefCell::new(Dashboard {
        loading: true,
        ..Dashboard::default()
    }));

    spawn_local(load_risk(api_url.clone(), state.clone()));
    spawn_local(load_heatmap(api_url.clone(), state.clone()));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = state.clone();
        move |event| {
            let mut dashboard = state.borrow_mut();
            let plotted = dashboard.plotted_count();
            match event.code {
                ratzilla::event::KeyCode::Left if plotted > 0 => {
                    dashboard.selected = if dashboard.selected == 0 {
                        plotted - 1
                    } else {
                        dashboard.selected - 1
                    };
                }
                ratzilla::event::KeyCode::Right if plotted > 0 => {
                    dashboard.selected = (dashboard.selected + 1) % plotted;
                }
                ratzilla::event::KeyCode::Char('t') if !dashboard.loading => {
                    dashboard.date_offset = if dashboard.date_offset == 0 { 2 } else { 0 };
                    dashboard.loading = true;
                    drop(dashboard);
                    spawn_local(load_heatmap(api_url.clone(), state.clone()));
                }
                ratzilla::event::KeyCode::Char(' ') => dashboard.clock.toggle_pause(),
                _ => {}
            }
        }
    });

    terminal.draw_web(move |f| {
        let mut dashboard = state.borrow_mut();
        dashboard.clock.advance(js_sys::Date::now() / 1000.0);

        let area = f.area();
        let block = Block::default()
            .title("Dengue Sentinel")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area).inner(Margin::new(1, 1));
        f.render_widget(block, area);

        render_dashboard(&dashboard, f, inner);
    });

    Ok(())
}

/// `?api=` on the page URL overrides the backend address.
fn api_url_from_location() -> String {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
        .and_then(|params| params.get("api"))
        .filter(|value| !value.trim().is_empty())
        .map_or_else(
            || DEFAULT_API_URL.to_string(),
            |value| value.trim_end_matches('/').to_string(),
        )
}

fn tier_color(tier: RiskTier) -> Color {
    let (r, g, b) = tier.rgb();
    Color::Rgb(r, g, b)
}

fn render_dashboard(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(1),
        ])
        .split(area);

    render_risk_gauge(dashboard, f, main_layout[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(main_layout[1]);

    render_heatmap(dashboard, f, content[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(content[1]);
    render_tier_chart(dashboard, f, side[0]);
    render_zone_detail(dashboard, f, side[1]);

    let hint = Paragraph::new(TextLine::from(vec![
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" zone   "),
        Span::styled("t", Style::default().fg(Color::Yellow)),
        Span::raw(" today / +2 days   "),
        Span::styled("space", Style::default().fg(Color::Yellow)),
        Span::raw(if dashboard.clock.is_paused() {
            " resume"
        } else {
            " pause"
        }),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, main_layout[2]);
}

fn render_risk_gauge(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Today's Outbreak Risk")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    match &dashboard.risk {
        Some(risk) => {
            let color = tier_color(risk.tier());
            let gauge = Gauge::default()
                .block(block)
                .gauge_style(Style::default().fg(color).bg(Color::Black))
                .percent(u16::from(risk.risk_percentage.min(100)))
                .label(format!(
                    "{}% {} | temp {} rain {} humidity {}",
                    risk.risk_percentage,
                    risk.tier().label(),
                    risk.factors.temperature,
                    risk.factors.rainfall,
                    risk.factors.humidity
                ));
            f.render_widget(gauge, area);
        }
        None => {
            let message = if dashboard.risk_failed {
                "Risk service unavailable"
            } else {
                "Loading risk..."
            };
            let paragraph = Paragraph::new(message)
                .block(block)
                .alignment(Alignment::Center);
            f.render_widget(paragraph, area);
        }
    }
}

fn render_heatmap(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let day = if dashboard.date_offset == 0 {
        "Today"
    } else {
        "+2 days"
    };
    let source = if dashboard.mock { " (generated)" } else { "" };
    let block = Block::default()
        .title(format!("Risk Map | {day}{source}"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if dashboard.zones.is_empty() {
        let message = dashboard.empty_heatmap_message();
        let paragraph = Paragraph::new(Text::from(TextLine::from(message)))
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let b = zones::bounds(dashboard.zones.iter().map(|z| (z.lat, z.lon)), 0.12)
        .unwrap_or(GeoBounds::MEKONG);
    let selected = dashboard.selected_zone().copied();
    let scale = dashboard.clock.ring_scale();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([b.min_lon, b.max_lon])
        .y_bounds([b.min_lat, b.max_lat])
        .paint(|ctx| {
            for zone in zones::plotted(&dashboard.zones) {
                ctx.draw(&Circle {
                    x: zone.lon,
                    y: zone.lat,
                    radius: 0.018,
                    color: tier_color(zone.tier()),
                });
            }
            if let Some(zone) = selected {
                ctx.draw(&Circle {
                    x: zone.lon,
                    y: zone.lat,
                    radius: 0.036 * scale,
                    color: Color::White,
                });
            }
            for center in &zones::MEKONG_CENTERS {
                ctx.print(
                    center.lon,
                    center.lat,
                    Span::styled(center.name, Style::default().fg(Color::Gray)),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn render_tier_chart(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let counts = TierCounts::tally(&dashboard.zones);
    let bars: Vec<Bar<'_>> = RiskTier::ALL
        .iter()
        .rev()
        .map(|tier| {
            Bar::default()
                .value(counts.get(*tier) as u64)
                .label(TextLine::from(tier.label()))
                .style(Style::default().fg(tier_color(*tier)))
                .value_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Zones by Tier")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_gap(1)
        .bar_width(7);

    f.render_widget(chart, area);
}

fn render_zone_detail(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Selected Zone")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = match dashboard.selected_zone() {
        Some(zone) => vec![
            TextLine::from(Span::styled(
                zone.tier().label(),
                Style::default()
                    .fg(tier_color(zone.tier()))
                    .add_modifier(Modifier::BOLD),
            )),
            TextLine::from(format!("Risk score: {}%", zone.risk)),
            TextLine::from(format!("Lat {:.4}, Lon {:.4}", zone.lat, zone.lon)),
            TextLine::from(format!("Near {}", nearest_center(zone.lat, zone.lon).name)),
        ],
        None => vec![TextLine::from("No medium or high risk zones")],
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

async fn fetch_json(url: &str) -> Option<wasm_bindgen::JsValue> {
    let window = web_sys::window()?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts).ok()?;
    let response_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .ok()?;

    let Ok(response) = response_value.dyn_into::<Response>() else {
        web_sys::console::error_1(&"Failed to read response".into());
        return None;
    };
    if !response.ok() {
        web_sys::console::error_1(&format!("{url} returned HTTP {}", response.status()).into());
        return None;
    }

    let body = response.json().ok()?;
    wasm_bindgen_futures::JsFuture::from(body).await.ok()
}

async fn load_risk(api_url: String, state: Shared) {
    let url = format!("{api_url}/api/risk");
    let parsed = fetch_json(&url).await.and_then(|json| {
        serde_wasm_bindgen::from_value::<RiskReport>(json)
            .map_err(|error| {
                web_sys::console::error_1(&format!("Failed to parse risk: {error}").into());
            })
            .ok()
    });

    let mut dashboard = state.borrow_mut();
    dashboard.risk_failed = parsed.is_none();
    dashboard.risk = parsed;
}

async fn load_heatmap(api_url: String, state: Shared) {
    let date_offset = state.borrow().date_offset;
    let url = format!("{api_url}/api/heatmap?date_offset={date_offset}");
    let live = fetch_json(&url)
        .await
        .and_then(|json| serde_wasm_bindgen::from_value::<HeatmapResponse>(json).ok());

    let mut dashboard = state.borrow_mut();
    if dashboard.date_offset != date_offset {
        return;
    }
    match live {
        Some(response) => {
            dashboard.zones = response.zones;
            dashboard.mock = false;
        }
        None => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let seed = js_sys::Date::now() as u64;
            dashboard.zones = generate_mock_zones(&mut ChaCha8Rng::seed_from_u64(seed));
            dashboard.mock = true;
        }
    }
    dashboard.loading = false;
    if dashboard.selected >= dashboard.plotted_count() {
        dashboard.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_heatmap_only_says_loading_while_loading() {
        let mut dashboard = Dashboard {
            loading: true,
            ..Dashboard::default()
        };
        assert_eq!(dashboard.empty_heatmap_message(), "Loading heatmap...");

        dashboard.loading = false;
        assert_eq!(dashboard.empty_heatmap_message(), "No zones");
    }
}
