//! Color theme constants for the ChronoAuth UI.
//!
//! Defines the minimal dark color palette used throughout the UI.

use ratatui::style::Color;

/// Primary border color - dark gray for minimal aesthetic
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Accent color - white for highlights and important elements
pub const COLOR_ACCENT: Color = Color::White;

/// Brand color for the header
pub const COLOR_BRAND: Color = Color::Cyan;

/// Dim text for less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// The code digits
pub const COLOR_CODE: Color = Color::LightGreen;

/// Countdown gauge fill while plenty of time remains
pub const COLOR_GAUGE: Color = Color::Cyan;

/// Countdown gauge fill in the final five seconds
pub const COLOR_GAUGE_WARNING: Color = Color::LightRed;

/// Error messages
pub const COLOR_ERROR: Color = Color::Red;

/// Success / info status messages
pub const COLOR_OK: Color = Color::LightGreen;

/// Owner badge on entries shared by another identity
pub const COLOR_OWNER_BADGE: Color = Color::Yellow;
