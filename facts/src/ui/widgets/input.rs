//! Question input widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::FactsTheme;

/// Single-line input with a visible cursor while active.
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a FactsTheme,
    placeholder: &'a str,
    is_active: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a FactsTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            placeholder: "Ask a follow-up question...",
            is_active: false,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));

        let inner = block.inner(area);
        block.render(area, buf);

        let prompt = Span::styled("> ", self.theme.question_style());

        let line = if self.content.is_empty() && !self.is_active {
            Line::from(vec![
                prompt,
                Span::styled(self.placeholder, Style::default().add_modifier(Modifier::DIM)),
            ])
        } else {
            // Character-based slicing for unicode safety
            let before: String = self.content.chars().take(self.cursor_position).collect();
            let at = self
                .content
                .chars()
                .nth(self.cursor_position)
                .map(String::from)
                .unwrap_or_else(|| " ".to_string());
            let after: String = self.content.chars().skip(self.cursor_position + 1).collect();

            let cursor_style = if self.is_active {
                Style::default()
                    .fg(self.theme.question_text)
                    .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
            } else {
                Style::default()
            };

            Line::from(vec![
                prompt,
                Span::raw(before),
                Span::styled(at, cursor_style),
                Span::raw(after),
            ])
        };

        Paragraph::new(line).render(inner, buf);
    }
}
