use crate::ui::widgets::charts::tier_color;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Map, MapResolution};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use sentinel_core::zones::{self, GeoBounds, MEKONG_CENTERS};
use sentinel_core::{DistrictRisk, HeatmapZone};
use std::f64::consts::TAU;

const ZONE_RADIUS_DEG: f64 = 0.018;

fn view_bounds(points: impl IntoIterator<Item = (f64, f64)>) -> GeoBounds {
    zones::bounds(points, 0.12).unwrap_or(GeoBounds::MEKONG)
}

fn draw_scan_line(ctx: &mut ratatui::widgets::canvas::Context<'_>, b: &GeoBounds, animation: f64) {
    let progress = (animation / TAU).clamp(0.0, 1.0);
    let lat = (b.min_lat - b.max_lat).mul_add(progress, b.max_lat);
    ctx.draw(&CanvasLine {
        x1: b.min_lon,
        y1: lat,
        x2: b.max_lon,
        y2: lat,
        color: Color::Rgb(30, 64, 80),
    });
}

fn empty_map(f: &mut Frame<'_>, area: Rect, block: Block<'_>, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(paragraph, area);
}

pub fn render_zone_map(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    zones: &[HeatmapZone],
    selected: Option<&HeatmapZone>,
    animation: f64,
) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if area.width < 8 || area.height < 6 {
        return;
    }
    if zones.is_empty() {
        empty_map(f, area, block, "No risk zones loaded");
        return;
    }

    let b = view_bounds(zones.iter().map(|zone| (zone.lat, zone.lon)));
    let plotted: Vec<&HeatmapZone> = zones::plotted(zones).collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([b.min_lon, b.max_lon])
        .y_bounds([b.min_lat, b.max_lat])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            draw_scan_line(ctx, &b, animation);
            ctx.layer();

            for zone in &plotted {
                ctx.draw(&Circle {
                    x: zone.lon,
                    y: zone.lat,
                    radius: ZONE_RADIUS_DEG,
                    color: tier_color(zone.tier()),
                });
            }

            if let Some(zone) = selected {
                let pulse = (animation * 3.0).sin().mul_add(0.5, 1.5);
                ctx.draw(&Circle {
                    x: zone.lon,
                    y: zone.lat,
                    radius: ZONE_RADIUS_DEG * 2.0 * pulse,
                    color: Color::White,
                });
            }

            for center in &MEKONG_CENTERS {
                let inside = (b.min_lat..=b.max_lat).contains(&center.lat)
                    && (b.min_lon..=b.max_lon).contains(&center.lon);
                if inside {
                    ctx.print(
                        center.lon,
                        center.lat,
                        Span::styled(center.name, Style::default().fg(Color::Gray)),
                    );
                }
            }
        });

    f.render_widget(canvas, area);
}

pub fn render_mini_map(f: &mut Frame<'_>, area: Rect, zones: &[HeatmapZone], animation: f64) {
    let block = Block::default()
        .title("Risk Map")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if zones.is_empty() {
        empty_map(f, area, block, "Loading map...");
        return;
    }

    let b = view_bounds(zones.iter().map(|zone| (zone.lat, zone.lon)));
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([b.min_lon, b.max_lon])
        .y_bounds([b.min_lat, b.max_lat])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::Low,
                color: Color::DarkGray,
            });
            draw_scan_line(ctx, &b, animation);
            for zone in zones::plotted(zones) {
                ctx.draw(&Circle {
                    x: zone.lon,
                    y: zone.lat,
                    radius: ZONE_RADIUS_DEG,
                    color: tier_color(zone.tier()),
                });
            }
        });

    f.render_widget(canvas, area);
}

/// District forecast map. Circle size follows population, color follows
/// projected risk.
pub fn render_district_map(
    f: &mut Frame<'_>,
    area: Rect,
    districts: &[DistrictRisk],
    selected: Option<&DistrictRisk>,
    animation: f64,
) {
    let block = Block::default()
        .title("14-Day District Forecast")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if districts.is_empty() {
        empty_map(f, area, block, "No district forecast");
        return;
    }

    let b = view_bounds(districts.iter().map(|d| (d.center[0], d.center[1])));
    let max_pop = districts.iter().map(|d| d.pop).max().unwrap_or(1).max(1);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([b.min_lon, b.max_lon])
        .y_bounds([b.min_lat, b.max_lat])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();

            for district in districts {
                #[allow(clippy::cast_precision_loss)]
                let share = district.pop as f64 / max_pop as f64;
                ctx.draw(&Circle {
                    x: district.center[1],
                    y: district.center[0],
                    radius: share.sqrt().mul_add(0.03, 0.015),
                    color: tier_color(district.tier()),
                });
            }

            if let Some(district) = selected {
                let pulse = (animation * 3.0).sin().mul_add(0.5, 1.5);
                ctx.draw(&Circle {
                    x: district.center[1],
                    y: district.center[0],
                    radius: 0.05 * pulse,
                    color: Color::White,
                });
                ctx.print(
                    district.center[1],
                    district.center[0],
                    Span::styled(district.name.clone(), Style::default().fg(Color::White)),
                );
            }
        });

    f.render_widget(canvas, area);
}
