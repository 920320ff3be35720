//! Header rendering
//!
//! Displays the workspace root, the external tool and running commands.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::Styles;

/// Header widget showing workspace info
pub struct Header<'a> {
    /// Workspace root directory
    pub workspace: &'a str,
    /// External tool executable
    pub tool: &'a str,
    /// Commands still waiting for the tool or for the user
    pub running: usize,
    /// Currently selected path, relative to the workspace
    pub selected: Option<&'a str>,
    /// Styles
    pub styles: &'a Styles,
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Clear the header area
        for x in area.x..area.x + area.width {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.styles.header);
        }

        let mut spans = vec![
            Span::styled(format!(" {} ", self.workspace), self.styles.header),
            Span::styled(" │ ", self.styles.header_dim),
            Span::styled(format!("tool: {}", self.tool), self.styles.header),
        ];

        if self.running > 0 {
            spans.push(Span::styled(" │ ", self.styles.header_dim));
            spans.push(Span::styled(
                format!("[{} running]", self.running),
                self.styles.output_warning,
            ));
        }

        // Selected path (right-aligned)
        if let Some(selected) = self.selected {
            let info = format!(" {} ", selected);
            let info_width = info.chars().count() as u16;
            let left_width: u16 = spans.iter().map(|s| s.content.chars().count() as u16).sum();

            if left_width + info_width < area.width {
                let padding = area.width - left_width - info_width;
                spans.push(Span::styled(" ".repeat(padding as usize), self.styles.header));
                spans.push(Span::styled(info, self.styles.header_dim));
            }
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Render the header bar
pub fn render_header(
    buf: &mut Buffer,
    area: Rect,
    workspace: &str,
    tool: &str,
    running: usize,
    selected: Option<&str>,
    styles: &Styles,
) {
    let header = Header {
        workspace,
        tool,
        running,
        selected,
        styles,
    };
    header.render(area, buf);
}
