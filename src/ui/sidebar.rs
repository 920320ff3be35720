//! Sidebar rendering
//!
//! Displays the workspace tree with expandable folders.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::{Styles, TreeNode};

/// Maximum visual indentation depth (to prevent deep files from being invisible)
const MAX_VISUAL_INDENT: usize = 8;

/// Sidebar widget showing the workspace tree
pub struct Sidebar<'a> {
    /// Visible tree rows
    pub nodes: &'a [&'a TreeNode],
    /// Cursor position within `nodes`
    pub cursor: usize,
    /// Scroll offset
    pub scroll: usize,
    /// Name of the workspace root
    pub root_name: &'a str,
    /// Number of rows filtered out as hidden
    pub hidden_count: usize,
    /// Styles
    pub styles: &'a Styles,
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.hidden_count > 0 {
            format!(" {} ({} hidden) ", self.root_name, self.hidden_count)
        } else {
            format!(" {} ", self.root_name)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.styles.border_focus)
            .title(Span::styled(title, self.styles.popup_title));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.nodes.is_empty() {
            buf.set_line(
                inner.x,
                inner.y,
                &Line::styled(" (empty)", self.styles.help_desc),
                inner.width,
            );
            return;
        }

        let visible_height = inner.height as usize;

        for (i, node) in self.nodes.iter().skip(self.scroll).take(visible_height).enumerate() {
            let y = inner.y + i as u16;

            let is_cursor = i + self.scroll == self.cursor;
            let is_hidden = node.entry.is_hidden();
            let style = match (is_cursor, is_hidden) {
                (true, true) => self.styles.sidebar_hidden_cursor,
                (true, false) => self.styles.sidebar_cursor,
                (false, true) => self.styles.sidebar_hidden,
                (false, false) => self.styles.sidebar_normal,
            };

            let mut spans = Vec::new();

            // Indentation (capped to prevent deep files from being invisible)
            let visual_depth = node.depth.min(MAX_VISUAL_INDENT);
            spans.push(Span::styled("  ".repeat(visual_depth), style));

            // Depth indicator for very deep items
            let mut indicator_width = 0;
            if node.depth > MAX_VISUAL_INDENT {
                let indicator = format!("{}·", node.depth - MAX_VISUAL_INDENT);
                indicator_width = indicator.width();
                spans.push(Span::styled(indicator, self.styles.help_desc));
            }

            // Folder icon or file indicator
            let name_style = if node.entry.is_expandable() {
                let icon = if node.expanded { "▼ " } else { "▶ " };
                spans.push(Span::styled(icon, self.styles.folder_icon));
                if is_cursor || is_hidden {
                    style
                } else {
                    self.styles.folder
                }
            } else {
                spans.push(Span::styled("  ", style));
                style
            };

            let used = visual_depth * 2 + indicator_width + 2;
            let max_name_width = (inner.width as usize).saturating_sub(used + 1);
            spans.push(Span::styled(
                smart_truncate(&node.entry.name, max_name_width),
                name_style,
            ));

            let line = Line::from(spans);
            buf.set_line(inner.x, y, &line, inner.width);

            // Fill background for cursor line
            if is_cursor {
                for x in inner.x..inner.x + inner.width {
                    buf[(x, y)].set_style(style);
                }
            }
        }
    }
}

/// Smart truncate: shows beginning...end for better context
///
/// For "very_long_filename.tsx" with max 12 this yields "very_lo….tsx",
/// keeping the extension visible.
fn smart_truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    if max_width < 5 {
        // Too small for smart truncation
        return s.chars().take(max_width).collect();
    }

    let ellipsis = "…";
    let available = max_width - 1;

    // Allocate more to the beginning (where the unique part usually is)
    let prefix_len = (available * 2) / 3;
    let suffix_len = available - prefix_len;

    let prefix: String = s.chars().take(prefix_len).collect();
    let suffix: String = s
        .chars()
        .rev()
        .take(suffix_len)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    format!("{}{}{}", prefix, ellipsis, suffix)
}

/// Render the sidebar
pub fn render_sidebar(
    buf: &mut Buffer,
    area: Rect,
    nodes: &[&TreeNode],
    cursor: usize,
    scroll: usize,
    root_name: &str,
    hidden_count: usize,
    styles: &Styles,
) {
    let sidebar = Sidebar {
        nodes,
        cursor,
        scroll,
        root_name,
        hidden_count,
        styles,
    };
    sidebar.render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::{DirectoryEntry, EntryKind};
    use std::path::PathBuf;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_deep_rows_show_depth_indicator() {
        let styles = Styles::new();
        let shallow = TreeNode {
            entry: DirectoryEntry::new(PathBuf::from("/ws/a.txt"), EntryKind::File),
            depth: 1,
            expanded: false,
        };
        let deep = TreeNode {
            entry: DirectoryEntry::new(PathBuf::from("/ws/deep.txt"), EntryKind::File),
            depth: MAX_VISUAL_INDENT + 2,
            expanded: false,
        };
        let rows = [&shallow, &deep];

        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        render_sidebar(&mut buf, area, &rows, 0, 0, "ws", 0, &styles);

        assert!(!row_text(&buf, 1).contains('·'));
        let deep_row = row_text(&buf, 2);
        assert!(deep_row.contains("2·"));
        assert!(deep_row.contains("deep.txt"));
    }

    #[test]
    fn test_smart_truncate_keeps_extension() {
        assert_eq!(smart_truncate("short.rs", 20), "short.rs");
        assert_eq!(smart_truncate("very_long_filename.tsx", 12), "very_lo….tsx");
        assert_eq!(smart_truncate("abcdef", 3), "abc");
    }
}
