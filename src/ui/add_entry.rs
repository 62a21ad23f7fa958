//! The add-entry modal with its QR and manual tabs.

use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::{AddEntryDialog, AddTab, App, ManualField};
use crate::traits::HttpClient;
use crate::ui::{centered_rect, theme};

pub fn render<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>) {
    let Some(dialog) = app.add_dialog.as_ref() else {
        return;
    };

    let area = centered_rect(56, 13, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![tab_line(dialog), Line::from("")];
    match dialog.tab {
        AddTab::Qr => lines.extend(qr_tab_lines(dialog)),
        AddTab::Manual => lines.extend(manual_tab_lines(dialog)),
    }

    if let Some(error) = &dialog.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme::COLOR_ERROR),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        hint(dialog),
        Style::default().fg(theme::COLOR_DIM),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::COLOR_BRAND))
        .title(" Add New Service ");
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left).block(block), area);
}

fn tab_line(dialog: &AddEntryDialog) -> Line<'static> {
    let active = Style::default()
        .fg(theme::COLOR_BRAND)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(theme::COLOR_DIM);
    let (qr_style, manual_style) = match dialog.tab {
        AddTab::Qr => (active, inactive),
        AddTab::Manual => (inactive, active),
    };
    Line::from(vec![
        Span::styled("[ Scan QR ]", qr_style),
        Span::raw("  "),
        Span::styled("[ Manual Entry ]", manual_style),
    ])
}

fn qr_tab_lines(dialog: &AddEntryDialog) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "QR image path",
            Style::default().fg(theme::COLOR_ACCENT),
        )),
        field_line(&dialog.qr_path, true),
        Line::from(""),
        Line::from(Span::styled(
            "Paste or drop a screenshot of the provider's QR code.",
            Style::default().fg(theme::COLOR_DIM),
        )),
    ]
}

fn manual_tab_lines(dialog: &AddEntryDialog) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Service Name",
            Style::default().fg(theme::COLOR_ACCENT),
        )),
        field_line(&dialog.service_name, dialog.field == ManualField::Name),
        Line::from(Span::styled(
            "Secret Key (Base32)",
            Style::default().fg(theme::COLOR_ACCENT),
        )),
        field_line(&dialog.secret, dialog.field == ManualField::Secret),
    ]
}

fn field_line(value: &str, focused: bool) -> Line<'static> {
    let caret = if focused { "█" } else { "" };
    let style = if focused {
        Style::default().fg(theme::COLOR_ACCENT)
    } else {
        Style::default().fg(theme::COLOR_DIM)
    };
    Line::from(vec![
        Span::styled("> ", Style::default().fg(theme::COLOR_BRAND)),
        Span::styled(format!("{}{}", value, caret), style),
    ])
}

fn hint(dialog: &AddEntryDialog) -> &'static str {
    match dialog.tab {
        AddTab::Qr => "enter decode · tab manual entry · esc cancel",
        AddTab::Manual => {
            if dialog.submitting {
                "saving..."
            } else {
                "enter save · ↑/↓ switch field · tab scan qr · esc cancel"
            }
        }
    }
}
