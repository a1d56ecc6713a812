use crate::app::App;
use crate::ledger::BalanceSource;
use crate::ui::widgets::tables::{header_style, scroll_offset, selected_row_style};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

const fn source_label(source: BalanceSource) -> &'static str {
    match source {
        BalanceSource::Cache => "saved on this device",
        BalanceSource::Server => "from server",
        BalanceSource::Default => "no balance yet",
    }
}

pub fn render_rewards(app: &App, f: &mut Frame<'_>, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Balance card
            Constraint::Min(6),    // Voucher table
            Constraint::Length(8), // Redemption log
        ])
        .split(area);

    render_balance_card(app, f, rows[0]);
    render_voucher_table(app, f, rows[1]);
    render_redemption_log(app, f, rows[2]);
}

fn render_balance_card(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Your Sentinel Points")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let lines = vec![
        TextLine::from(vec![
            Span::styled(
                format!("{} pts", app.ledger.balance()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", source_label(app.ledger.source())),
                Style::default().fg(Color::Gray),
            ),
        ]),
        TextLine::from(Span::styled(
            format!(
                "Redeemed so far: {} pts. Press s to sync with the server.",
                app.rewards.total_redeemed
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_voucher_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Voucher Store")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.rewards.vouchers.is_empty() {
        let message = if app.rewards.loading {
            "Loading vouchers..."
        } else {
            "No vouchers available"
        };
        f.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let balance = app.ledger.balance();
    let rows: Vec<Row<'_>> = app
        .rewards
        .vouchers
        .iter()
        .map(|voucher| {
            let affordable = balance >= voucher.points;
            let cost_style = if affordable {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let action = if affordable {
                Cell::from(Span::styled("Redeem", Style::default().fg(Color::Green)))
            } else {
                Cell::from(Span::styled(
                    format!("Need {}", voucher.points - balance),
                    Style::default().fg(Color::DarkGray),
                ))
            };
            Row::new(vec![
                Cell::from(voucher.title.clone()),
                Cell::from(voucher.merchant.clone()),
                Cell::from(Span::styled(format!("{} pts", voucher.points), cost_style)),
                action,
            ])
        })
        .collect();

    let visible = usize::from(area.height.saturating_sub(3));
    let mut state = TableState::default()
        .with_offset(scroll_offset(
            app.rewards.vouchers.len(),
            visible,
            app.rewards.selected,
        ))
        .with_selected(Some(app.rewards.selected));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
        ],
    )
    .header(Row::new(vec!["Voucher", "Merchant", "Cost", ""]).style(header_style()))
    .block(block)
    .row_highlight_style(selected_row_style())
    .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut state);
}

fn render_redemption_log(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Recent Redemptions")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.rewards.log.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "Nothing redeemed yet",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block),
            area,
        );
        return;
    }

    let rows: Vec<Row<'_>> = app
        .rewards
        .log
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.redeemed_at.clone()),
                Cell::from(record.title.clone()),
                Cell::from(format!("-{}", record.cost)),
                Cell::from(record.code.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Percentage(35),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(Row::new(vec!["When", "Voucher", "Points", "Code"]).style(header_style()))
    .block(block);

    f.render_widget(table, area);
}
