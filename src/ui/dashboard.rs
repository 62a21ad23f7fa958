//! The authenticator grid with the shared countdown gauge.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::App;
use crate::countdown::STEP_SECONDS;
use crate::models::OtpEntry;
use crate::traits::HttpClient;
use crate::ui::{centered_rect, theme};

/// Seconds left at which the countdown switches to the warning style.
const WARNING_SECONDS: u64 = 5;

pub fn render<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // countdown gauge
            Constraint::Min(3),    // entry grid
            Constraint::Length(1), // footer / status
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_countdown(frame, app, chunks[1]);
    render_entries(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn render_header<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " ChronoAuth ",
            Style::default()
                .fg(theme::COLOR_BRAND)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("· your authenticators", Style::default().fg(theme::COLOR_DIM)),
    ]);
    let user = Line::from(Span::styled(
        format!("signed in as {} ", app.username),
        Style::default().fg(theme::COLOR_DIM),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::COLOR_BORDER));
    frame.render_widget(
        Paragraph::new(title).block(block.clone()),
        area,
    );
    frame.render_widget(
        Paragraph::new(user).alignment(Alignment::Right).block(block),
        area,
    );
}

fn render_countdown<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let remaining = app.seconds_remaining.min(STEP_SECONDS);
    let color = if remaining <= WARNING_SECONDS {
        theme::COLOR_GAUGE_WARNING
    } else {
        theme::COLOR_GAUGE
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::COLOR_BORDER)),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(remaining as f64 / STEP_SECONDS as f64)
        .label(format!("{}s", remaining));
    frame.render_widget(gauge, area);
}

fn render_entries<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::COLOR_BORDER))
        .title(" Authenticators ");

    if app.entries.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No authenticators yet",
                Style::default().fg(theme::COLOR_ACCENT),
            )),
            Line::from(Span::styled(
                "Press 'a' to scan a QR image or paste a setup key.",
                Style::default().fg(theme::COLOR_DIM),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| entry_row(app, entry, i == app.selected))
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(35),
        ],
    )
    .header(
        Row::new(vec!["Service", "Owner", "Code"])
            .style(Style::default().fg(theme::COLOR_DIM)),
    )
    .block(block);
    frame.render_widget(table, area);
}

fn entry_row<'a, C: HttpClient + 'static>(
    app: &App<C>,
    entry: &'a OtpEntry,
    selected: bool,
) -> Row<'a> {
    // The owner badge only appears for entries held by another identity.
    let owner = match &entry.owner {
        Some(owner) if *owner != app.username => Span::styled(
            format!("owner: {}", owner),
            Style::default().fg(theme::COLOR_OWNER_BADGE),
        ),
        _ => Span::raw(""),
    };

    let name_style = if selected {
        Style::default()
            .fg(theme::COLOR_ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::COLOR_ACCENT)
    };
    let marker = if selected { "▸ " } else { "  " };

    Row::new(vec![
        Cell::from(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme::COLOR_BRAND)),
            Span::styled(entry.service_name.clone(), name_style),
        ])),
        Cell::from(Line::from(owner)),
        Cell::from(Line::from(Span::styled(
            format_code(&entry.code),
            Style::default()
                .fg(theme::COLOR_CODE)
                .add_modifier(Modifier::BOLD),
        ))),
    ])
}

/// Split a 6-digit code into two readable halves ("492 039"). Anything
/// else (the placeholder, unexpected lengths) renders as-is.
fn format_code(code: &str) -> String {
    if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
        format!("{} {}", &code[..3], &code[3..])
    } else {
        code.to_string()
    }
}

fn render_footer<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let line = match &app.status {
        Some(status) => {
            let color = if status.is_error {
                theme::COLOR_ERROR
            } else {
                theme::COLOR_OK
            };
            Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            " a add · d delete · c copy · l logs · ↑/↓ select · q quit",
            Style::default().fg(theme::COLOR_DIM),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Delete confirmation modal over the dashboard.
pub fn render_delete_confirm<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>) {
    let Some(id) = app.pending_delete else { return };
    let name = app
        .entries
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.service_name.as_str())
        .unwrap_or("this service");

    let area = centered_rect(44, 5, frame.area());
    frame.render_widget(Clear, area);

    let dialog = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Delete {}?", name),
            Style::default().fg(theme::COLOR_ACCENT),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y confirm · n / esc cancel",
            Style::default().fg(theme::COLOR_DIM),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::COLOR_ERROR))
            .title(" Confirm "),
    );
    frame.render_widget(dialog, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code_splits_six_digits() {
        assert_eq!(format_code("492039"), "492 039");
    }

    #[test]
    fn test_format_code_leaves_placeholder() {
        assert_eq!(format_code("------"), "------");
        assert_eq!(format_code("1234"), "1234");
    }
}
