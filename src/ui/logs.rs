//! Activity-log table view.

use chrono::NaiveDateTime;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::App;
use crate::traits::HttpClient;
use crate::ui::theme;

pub fn render<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(Span::styled(
        " Activity Logs ",
        Style::default().fg(theme::COLOR_BRAND),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::COLOR_BORDER)),
    );
    frame.render_widget(header, chunks[0]);

    render_table(frame, app, chunks[1]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " l back to authenticators · q quit",
        Style::default().fg(theme::COLOR_DIM),
    )));
    frame.render_widget(footer, chunks[2]);
}

fn render_table<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::COLOR_BORDER));

    if app.logs.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No activity logs found.",
            Style::default().fg(theme::COLOR_DIM),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .logs
        .iter()
        .map(|log| {
            Row::new(vec![
                Cell::from(Span::styled(
                    log.action.clone(),
                    Style::default().fg(theme::COLOR_OK),
                )),
                Cell::from(log.details.clone()),
                Cell::from(Span::styled(
                    format_timestamp(&log.timestamp),
                    Style::default().fg(theme::COLOR_DIM),
                )),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(30),
            Constraint::Length(20),
        ],
    )
    .header(Row::new(vec!["Action", "Details", "Time"]).style(Style::default().fg(theme::COLOR_DIM)))
    .block(block);
    frame.render_widget(table, area);
}

/// Render the server's ISO-8601 timestamp in a compact local form,
/// falling back to the raw string if it does not parse.
fn format_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
