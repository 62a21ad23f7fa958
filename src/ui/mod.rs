//! UI rendering for the ChronoAuth dashboard.
//!
//! - Header with brand, signed-in user and view hints
//! - Dashboard: authenticator grid with the shared countdown gauge
//! - Logs: activity-log table
//! - Modals: add-entry dialog (QR / manual tabs) and delete confirmation

mod add_entry;
mod dashboard;
mod logs;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{App, Screen};
use crate::traits::HttpClient;

/// Render the whole frame. Modals draw over the active view.
pub fn render<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>) {
    match app.screen {
        Screen::Dashboard => dashboard::render(frame, app),
        Screen::Logs => logs::render(frame, app),
    }

    if app.add_dialog.is_some() {
        add_entry::render(frame, app);
    } else if app.pending_delete.is_some() {
        dashboard::render_delete_confirm(frame, app);
    }
}

/// A centered rect of fixed size, clamped to the frame.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(50, 10, area);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 10);
        assert_eq!(rect.x, 25);
        assert_eq!(rect.y, 15);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 30, 8);
        let rect = centered_rect(50, 10, area);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }
}
