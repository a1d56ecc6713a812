use crate::app::App;
use crate::ui::widgets::popup::{centered_box, centered_rect, render_message_popup, ClearWidget};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use sentinel_core::chat::{format_reply, ChatRole, FormattedLine, Segment};
use tachyonfx::EffectRenderer;

pub fn render_overlays(app: &App, f: &mut Frame<'_>, area: Rect) {
    if app.chat.open {
        render_chat(app, f, area);
    }
    if let Some(prompt) = &app.photo_prompt {
        let lines = vec![
            TextLine::from(prompt.title.clone()),
            TextLine::from(""),
            TextLine::from(Span::styled(
                format!("{}_", prompt.input),
                Style::default().fg(Color::Yellow),
            )),
            TextLine::from(""),
            TextLine::from(Span::styled(
                "Path to a photo. Enter to submit, Esc to cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        render_message_popup(f, centered_box(60, 9, area), "Submit Photo", lines, Color::Cyan);
    }
    if app.rewards.qr.is_some() {
        render_qr_modal(app, f, area);
    }
    if let Some(alert) = &app.alert {
        let lines = vec![
            TextLine::from(alert.clone()),
            TextLine::from(""),
            TextLine::from(Span::styled("Enter to close", Style::default().fg(Color::DarkGray))),
        ];
        render_message_popup(f, centered_box(50, 7, area), "Not enough points", lines, Color::Red);
    }
    if app.show_help {
        render_help(f, area);
    }
}

fn segment_spans(segments: &[Segment]) -> Vec<Span<'static>> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain(text) => Span::raw(text.clone()),
            Segment::Bold(text) => {
                Span::styled(text.clone(), Style::default().add_modifier(Modifier::BOLD))
            }
        })
        .collect()
}

pub fn reply_lines(reply: &str) -> Vec<TextLine<'static>> {
    format_reply(reply)
        .into_iter()
        .map(|line| match line {
            FormattedLine::Header(text) => TextLine::from(Span::styled(
                text,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            FormattedLine::Bullet(segments) => {
                let mut spans = vec![Span::raw("  • ")];
                spans.extend(segment_spans(&segments));
                TextLine::from(spans)
            }
            FormattedLine::Text(segments) => TextLine::from(segment_spans(&segments)),
            FormattedLine::Blank => TextLine::from(""),
        })
        .collect()
}

fn render_chat(app: &App, f: &mut Frame<'_>, area: Rect) {
    let width = area.width.min(60);
    let panel = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: area.height,
    };
    f.render_widget(ClearWidget, panel);

    let block = Block::default()
        .title(" Sentinel AI ")
        .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(inner);

    let mut lines = Vec::new();
    for message in app.chat.transcript.messages() {
        match message.role {
            ChatRole::User => {
                lines.push(TextLine::from(Span::styled(
                    format!("You: {}", message.text),
                    Style::default().fg(Color::Cyan),
                )));
            }
            ChatRole::Bot => lines.extend(reply_lines(&message.text)),
        }
        lines.push(TextLine::from(""));
    }
    if app.chat.transcript.is_pending() {
        lines.push(TextLine::from(Span::styled(
            "Sentinel AI is typing...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Keep the newest messages in view.
    let visible = usize::from(chunks[0].height);
    let skip = lines.len().saturating_sub(visible);
    let shown: Vec<TextLine<'static>> = lines.into_iter().skip(skip).collect();
    f.render_widget(
        Paragraph::new(Text::from(shown)).wrap(Wrap { trim: false }),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(format!("{}_", app.chat.input)).block(
            Block::default()
                .title("Ask about prevention or symptoms")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        chunks[1],
    );
}

fn render_qr_modal(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(qr) = &app.rewards.qr else {
        return;
    };
    let popup = centered_box(50, 11, area);

    let lines = vec![
        TextLine::from(Span::styled(
            qr.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(qr.merchant.clone(), Style::default().fg(Color::Gray))),
        TextLine::from(""),
        TextLine::from(Span::styled(
            qr.code.clone(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from("Present this code to the merchant."),
        TextLine::from(Span::styled("Enter to close", Style::default().fg(Color::DarkGray))),
    ];
    render_message_popup(f, popup, "Voucher Redeemed", lines, Color::Green);

    if let Ok(mut effect) = app.qr_fx.lock() {
        if let Some(effect) = effect.as_mut() {
            let buffer = f.buffer_mut();
            buffer.render_effect(effect, popup, app.last_tick);
        }
    }
}

fn render_help(f: &mut Frame<'_>, area: Rect) {
    let popup = centered_rect(60, 80, area);
    f.render_widget(ClearWidget, popup);

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let section = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let entry = |k: &'static str, what: &'static str| {
        TextLine::from(vec![Span::styled(format!("{k:<10}"), key), Span::raw(what)])
    };

    let lines = vec![
        TextLine::from(Span::styled("== Help & Keyboard Shortcuts ==", section)),
        TextLine::from(""),
        TextLine::from(Span::styled("Navigation", section)),
        entry("1-7", "Jump to a screen"),
        entry("Tab", "Next screen (Shift+Tab for previous)"),
        entry("r", "Reload the current screen"),
        entry("c", "Open the Sentinel AI chat"),
        entry("q", "Quit"),
        TextLine::from(""),
        TextLine::from(Span::styled("Citizen", section)),
        entry("Enter", "Home: submit the daily quest photo"),
        entry("t", "Map: switch between today and +2 days"),
        entry("Enter", "Tasks: submit a photo / Rewards: redeem"),
        entry("s", "Rewards: sync points with the server"),
        TextLine::from(""),
        TextLine::from(Span::styled("CDC Command", section)),
        entry("b", "Broadcast an alert to the selected zone"),
        entry("/", "Search districts"),
        TextLine::from(""),
        TextLine::from(Span::styled("Press Esc or ? to close", Style::default().fg(Color::DarkGray))),
    ];

    let help = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(help, popup);
}
