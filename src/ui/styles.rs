//! UI styles
//!
//! Defines consistent styling for the entire application.

use ratatui::style::{Color, Modifier, Style};

use crate::cit::NotificationKind;

/// Color palette
pub mod colors {
    use ratatui::style::Color;

    // Base colors
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;

    // UI elements
    pub const HEADER_BG: Color = Color::Rgb(40, 44, 52);
    pub const HEADER_FG: Color = Color::White;
    pub const FOOTER_BG: Color = Color::Rgb(40, 44, 52);
    pub const FOOTER_FG: Color = Color::DarkGray;

    // Selection
    pub const CURSOR_BG: Color = Color::Rgb(80, 80, 100);

    // Tree
    pub const FOLDER_FG: Color = Color::Cyan;
    pub const HIDDEN_FG: Color = Color::DarkGray;

    // Notifications
    pub const INFO_FG: Color = Color::Green;
    pub const WARNING_FG: Color = Color::Yellow;
    pub const ERROR_FG: Color = Color::Red;

    // Borders
    pub const BORDER: Color = Color::DarkGray;
    pub const BORDER_FOCUS: Color = Color::Cyan;

    // Popup
    pub const POPUP_BG: Color = Color::Rgb(30, 34, 42);
    pub const POPUP_BORDER: Color = Color::Cyan;
}

/// Collection of styles used throughout the UI
#[derive(Clone)]
pub struct Styles {
    // Header/Footer
    pub header: Style,
    pub header_dim: Style,
    pub footer: Style,
    pub footer_key: Style,

    // Sidebar
    pub sidebar_normal: Style,
    pub sidebar_cursor: Style,
    pub sidebar_hidden: Style,
    pub sidebar_hidden_cursor: Style,
    pub folder: Style,
    pub folder_icon: Style,

    // Output pane
    pub output_text: Style,
    pub output_info: Style,
    pub output_warning: Style,
    pub output_error: Style,

    // Borders
    pub border: Style,
    pub border_focus: Style,

    // Popup
    pub popup: Style,
    pub popup_title: Style,
    pub popup_placeholder: Style,

    // Help
    pub help_key: Style,
    pub help_desc: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self::new()
    }
}

impl Styles {
    /// Create a new Styles instance with default values
    pub fn new() -> Self {
        Self {
            // Header/Footer
            header: Style::default()
                .bg(colors::HEADER_BG)
                .fg(colors::HEADER_FG),
            header_dim: Style::default()
                .bg(colors::HEADER_BG)
                .fg(colors::DIM),
            footer: Style::default()
                .bg(colors::FOOTER_BG)
                .fg(colors::FOOTER_FG),
            footer_key: Style::default()
                .fg(colors::HEADER_FG)
                .add_modifier(Modifier::BOLD),

            // Sidebar
            sidebar_normal: Style::default().fg(colors::FG),
            sidebar_cursor: Style::default()
                .bg(colors::CURSOR_BG)
                .fg(colors::FG)
                .add_modifier(Modifier::BOLD),
            sidebar_hidden: Style::default().fg(colors::HIDDEN_FG),
            sidebar_hidden_cursor: Style::default()
                .bg(colors::CURSOR_BG)
                .fg(colors::HIDDEN_FG),
            folder: Style::default()
                .fg(colors::FOLDER_FG)
                .add_modifier(Modifier::BOLD),
            folder_icon: Style::default().fg(colors::DIM),

            // Output pane
            output_text: Style::default().fg(colors::FG),
            output_info: Style::default()
                .fg(colors::INFO_FG)
                .add_modifier(Modifier::BOLD),
            output_warning: Style::default()
                .fg(colors::WARNING_FG)
                .add_modifier(Modifier::BOLD),
            output_error: Style::default()
                .fg(colors::ERROR_FG)
                .add_modifier(Modifier::BOLD),

            // Borders
            border: Style::default().fg(colors::BORDER),
            border_focus: Style::default().fg(colors::BORDER_FOCUS),

            // Popup
            popup: Style::default().bg(colors::POPUP_BG).fg(colors::FG),
            popup_title: Style::default()
                .fg(colors::POPUP_BORDER)
                .add_modifier(Modifier::BOLD),
            popup_placeholder: Style::default()
                .bg(colors::POPUP_BG)
                .fg(colors::DIM)
                .add_modifier(Modifier::ITALIC),

            // Help
            help_key: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(colors::DIM),
        }
    }

    /// Label style for a notification kind
    pub fn notification(&self, kind: NotificationKind) -> Style {
        match kind {
            NotificationKind::Info => self.output_info,
            NotificationKind::Warning => self.output_warning,
            NotificationKind::Error => self.output_error,
        }
    }
}
