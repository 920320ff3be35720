//! Footer rendering
//!
//! Displays keybinding hints and the hidden-file state.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::Styles;

/// Footer widget showing keybinding hints
pub struct Footer<'a> {
    /// Whether dotfiles are shown
    pub show_hidden: bool,
    /// Whether a prompt currently owns the keyboard
    pub prompt_open: bool,
    /// Styles
    pub styles: &'a Styles,
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Clear the footer area
        for x in area.x..area.x + area.width {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.styles.footer);
        }

        let mut spans = Vec::new();
        spans.push(Span::styled(" ", self.styles.footer));

        let hints: Vec<(&str, &str)> = if self.prompt_open {
            vec![("enter", "confirm"), ("esc", "cancel")]
        } else {
            vec![
                ("j/k", "move"),
                ("enter", "open"),
                ("i", "init"),
                ("a", "add"),
                ("c", "commit"),
                ("s", "switch"),
                ("r", "refresh"),
                (".", if self.show_hidden { "hide dotfiles" } else { "show dotfiles" }),
                ("?", "help"),
                ("q", "quit"),
            ]
        };

        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", self.styles.footer));
            }
            spans.push(Span::styled(*key, self.styles.footer_key));
            spans.push(Span::styled(format!(" {}", desc), self.styles.footer));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Render the footer bar
pub fn render_footer(
    buf: &mut Buffer,
    area: Rect,
    show_hidden: bool,
    prompt_open: bool,
    styles: &Styles,
) {
    let footer = Footer {
        show_hidden,
        prompt_open,
        styles,
    };
    footer.render(area, buf);
}
