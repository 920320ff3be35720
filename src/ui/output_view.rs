//! Output pane rendering
//!
//! Shows the notification history, newest at the bottom. Tool output is
//! printed verbatim, wrapped to the pane width.

use std::collections::VecDeque;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthChar;

use super::Styles;
use crate::cit::{Notification, NotificationKind};

fn label(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "info",
        NotificationKind::Warning => "warn",
        NotificationKind::Error => "error",
    }
}

/// Split `text` into rows no wider than `width` columns
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in text.trim_end_matches('\n').split('\n') {
        let line = line.trim_end_matches('\r');
        let mut row = String::new();
        let mut row_width = 0;

        for c in line.chars() {
            let cw = c.width().unwrap_or(0);
            if row_width + cw > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(c);
            row_width += cw;
        }
        rows.push(row);
    }

    rows
}

/// Styled rows for one notification
fn notification_lines<'a>(
    notification: &'a Notification,
    width: usize,
    styles: &Styles,
) -> Vec<Line<'a>> {
    let tag = format!("{:>5} ", label(notification.kind));
    let indent = tag.len();
    let rows = wrap_text(&notification.text, width.saturating_sub(indent));

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let prefix = if i == 0 {
                Span::styled(tag.clone(), styles.notification(notification.kind))
            } else {
                Span::raw(" ".repeat(indent))
            };
            Line::from(vec![prefix, Span::styled(row, styles.output_text)])
        })
        .collect()
}

/// Total wrapped rows for the history at `width`
pub fn calculate_total_lines(notifications: &VecDeque<Notification>, width: usize, styles: &Styles) -> usize {
    notifications
        .iter()
        .map(|n| notification_lines(n, width, styles).len())
        .sum()
}

/// Output pane widget
pub struct OutputView<'a> {
    pub notifications: &'a VecDeque<Notification>,
    /// Rows scrolled back from the newest entry
    pub scroll_back: usize,
    pub styles: &'a Styles,
}

impl Widget for OutputView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.scroll_back > 0 {
            format!(" Output (-{}) ", self.scroll_back)
        } else {
            " Output ".to_string()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.styles.border)
            .title(Span::styled(title, self.styles.popup_title));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.notifications.is_empty() {
            buf.set_line(
                inner.x,
                inner.y,
                &Line::styled(" No commands run yet. Press ? for help.", self.styles.help_desc),
                inner.width,
            );
            return;
        }

        let width = inner.width as usize;
        let lines: Vec<Line> = self
            .notifications
            .iter()
            .flat_map(|n| notification_lines(n, width, self.styles))
            .collect();

        let height = inner.height as usize;
        let end = lines.len().saturating_sub(self.scroll_back);
        let start = end.saturating_sub(height);

        for (i, line) in lines[start..end].iter().enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}

/// Render the output pane
pub fn render_output(
    buf: &mut Buffer,
    area: Rect,
    notifications: &VecDeque<Notification>,
    scroll_back: usize,
    styles: &Styles,
) {
    let view = OutputView {
        notifications,
        scroll_back,
        styles,
    };
    view.render(area, buf);
}
