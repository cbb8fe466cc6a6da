//! Tutor conversation widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::app::{TutorEntry, TutorView};
use crate::ui::theme::FactsTheme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Scrollable tutor transcript with the streaming answer at the bottom.
pub struct TutorWidget<'a> {
    view: &'a TutorView,
    theme: &'a FactsTheme,
    animation_frame: u8,
}

impl<'a> TutorWidget<'a> {
    pub fn new(view: &'a TutorView, theme: &'a FactsTheme) -> Self {
        Self {
            view,
            theme,
            animation_frame: 0,
        }
    }

    pub fn animation_frame(mut self, frame: u8) -> Self {
        self.animation_frame = frame;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        for entry in &self.view.entries {
            match entry {
                TutorEntry::Question(text) => {
                    lines.push(Line::from(Span::styled(
                        format!("> {text}"),
                        self.theme.question_style(),
                    )));
                }
                TutorEntry::Answer(text) => {
                    for line in text.lines() {
                        lines.push(Line::from(Span::styled(
                            line.to_string(),
                            self.theme.answer_style(),
                        )));
                    }
                }
                TutorEntry::Notice(text) => {
                    lines.push(Line::from(Span::styled(
                        format!("[ {text} ]"),
                        self.theme.notice_style(),
                    )));
                }
            }
            lines.push(Line::from(""));
        }

        if let Some(streaming) = &self.view.streaming_text {
            let style = self.theme.answer_style().add_modifier(Modifier::DIM);
            for line in streaming.lines() {
                lines.push(Line::from(Span::styled(line.to_string(), style)));
            }
        }

        if self.view.waiting && self.view.streaming_text.is_none() {
            let frame = SPINNER[usize::from(self.animation_frame) % SPINNER.len()];
            lines.push(Line::from(Span::styled(
                format!("{frame} thinking"),
                self.theme.system_style(),
            )));
        }

        lines
    }
}

/// Rows `lines` take once wrapped to `width`, close enough for scrolling.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

impl Widget for TutorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Learn: {} ", self.view.topic))
            .title_style(self.theme.title_style())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = self.lines();

        // Pinned to the newest text; `view.scroll` counts lines back up
        let total = wrapped_height(&lines, inner.width);
        let max_scroll = total.saturating_sub(usize::from(inner.height));
        let scroll = max_scroll.saturating_sub(self.view.scroll);
        let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_height() {
        let lines = vec![
            Line::from("short"),
            Line::from(""),
            Line::from("thirty-four characters, more or so"),
        ];
        assert_eq!(wrapped_height(&lines, 10), 1 + 1 + 4);
        assert_eq!(wrapped_height(&lines, 0), 5 + 1 + 34);
    }
}
