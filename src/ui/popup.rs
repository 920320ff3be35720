//! Popup overlays
//!
//! Version name input, version picker, and help overlay.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use super::Styles;

/// Render a centered popup overlay
fn render_centered_popup(buf: &mut Buffer, area: Rect, width: u16, height: u16, title: &str, styles: &Styles) -> Rect {
    // Calculate centered position
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    let popup_area = Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    );

    // Clear the popup area
    Clear.render(popup_area, buf);

    // Draw border
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles.border_focus)
        .title(Span::styled(format!(" {} ", title), styles.popup_title))
        .style(styles.popup);

    let inner = block.inner(popup_area);
    block.render(popup_area, buf);

    inner
}

/// Indices of `items` matching `filter` (case-insensitive substring)
pub fn filter_items(items: &[String], filter: &str) -> Vec<usize> {
    let needle = filter.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| needle.is_empty() || item.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Render the free-text input popup
pub fn render_input_popup(
    buf: &mut Buffer,
    area: Rect,
    prompt: &str,
    placeholder: &str,
    value: &str,
    styles: &Styles,
) {
    let width = 60.min(area.width.saturating_sub(4));
    let height = 5.min(area.height.saturating_sub(2));

    let inner = render_centered_popup(buf, area, width, height, prompt, styles);
    if inner.height == 0 {
        return;
    }

    // Input line; the tail stays visible when the text is wider than the box
    let line = if value.is_empty() {
        Line::from(vec![
            Span::styled("> ", styles.popup_title),
            Span::styled(placeholder.to_string(), styles.popup_placeholder),
        ])
    } else {
        let room = (inner.width as usize).saturating_sub(3);
        let skip = value.chars().count().saturating_sub(room);
        let shown: String = value.chars().skip(skip).collect();
        Line::from(vec![
            Span::styled("> ", styles.popup_title),
            Span::styled(shown, styles.popup),
            Span::styled("█", styles.popup_title),
        ])
    };
    buf.set_line(inner.x, inner.y, &line, inner.width);

    if inner.height > 2 {
        buf.set_line(
            inner.x,
            inner.y + 2,
            &Line::styled("Enter: confirm  Esc: cancel", styles.help_desc),
            inner.width,
        );
    }
}

/// Render the version picker popup
pub fn render_pick_popup(
    buf: &mut Buffer,
    area: Rect,
    title: &str,
    items: &[String],
    cursor: usize,
    filter: &str,
    styles: &Styles,
) {
    let width = 60.min(area.width.saturating_sub(4));
    let height = (items.len() as u16 + 4).min(area.height.saturating_sub(4));

    let inner = render_centered_popup(buf, area, width, height, title, styles);
    if inner.height == 0 {
        return;
    }

    // Filter input
    let filter_line = format!("> {}", filter);
    buf.set_line(inner.x, inner.y, &Line::styled(&filter_line, styles.popup_title), inner.width);

    // Separator
    if inner.height > 1 {
        buf.set_line(
            inner.x,
            inner.y + 1,
            &Line::styled("─".repeat(inner.width as usize), styles.border),
            inner.width,
        );
    }

    let matches = filter_items(items, filter);
    let list_height = inner.height.saturating_sub(2) as usize;
    // Keep the cursor row on screen
    let scroll = (cursor + 1).saturating_sub(list_height);

    for (row, &index) in matches.iter().skip(scroll).take(list_height).enumerate() {
        let y = inner.y + 2 + row as u16;
        let is_cursor = row + scroll == cursor;
        let style = if is_cursor {
            styles.sidebar_cursor
        } else {
            styles.popup
        };

        let line = Line::from(vec![
            Span::styled(if is_cursor { " › " } else { "   " }, style),
            Span::styled(items[index].as_str(), style),
        ]);
        buf.set_line(inner.x, y, &line, inner.width);

        if is_cursor {
            for x in inner.x..inner.x + inner.width {
                buf[(x, y)].set_style(style);
            }
        }
    }
}

/// Render help overlay
pub fn render_help_popup(buf: &mut Buffer, area: Rect, styles: &Styles) {
    let width = 50.min(area.width.saturating_sub(4));
    let height = 26.min(area.height.saturating_sub(4));

    let inner = render_centered_popup(buf, area, width, height, "Help", styles);

    let help_items = [
        ("Navigation", ""),
        ("j/k", "Move down/up"),
        ("Ctrl+d/u", "Page down/up"),
        ("g/G", "Go to top/bottom"),
        ("Enter/l", "Expand folder / open file"),
        ("h", "Collapse folder / go to parent"),
        ("Space", "Toggle folder"),
        ("J/K", "Scroll output"),
        ("", ""),
        ("Versions", ""),
        ("i", "Initialize cit for selection"),
        ("a", "Add a named version"),
        ("c", "Commit file"),
        ("s", "Switch to a version"),
        ("", ""),
        ("View", ""),
        ("r", "Refresh tree"),
        (".", "Toggle dotfiles"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    for (i, (key, desc)) in help_items.iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.y + inner.height {
            break;
        }

        if key.is_empty() && desc.is_empty() {
            continue;
        }

        if desc.is_empty() {
            // Section header
            buf.set_line(
                inner.x,
                y,
                &Line::styled(format!(" {}", key), styles.popup_title),
                inner.width,
            );
        } else {
            // Key/desc pair
            let line = Line::from(vec![
                Span::styled(format!("  {:>10} ", key), styles.help_key),
                Span::styled(*desc, styles.help_desc),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_items() {
        let items = vec!["v1".to_string(), "release-2".to_string(), "V10".to_string()];
        assert_eq!(filter_items(&items, ""), vec![0, 1, 2]);
        assert_eq!(filter_items(&items, "v1"), vec![0, 2]);
        assert_eq!(filter_items(&items, "REL"), vec![1]);
        assert!(filter_items(&items, "zzz").is_empty());
    }
}
