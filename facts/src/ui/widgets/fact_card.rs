//! Full-screen fact card widget

use facts_core::Fact;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::theme::{CardGradient, FactsTheme};

/// One card filling the feed area.
pub struct FactCardWidget<'a> {
    fact: &'a Fact,
    position: usize,
    total: usize,
    theme: &'a FactsTheme,
    gradient: CardGradient,
    loading_more: bool,
}

impl<'a> FactCardWidget<'a> {
    pub fn new(fact: &'a Fact, position: usize, theme: &'a FactsTheme) -> Self {
        Self {
            fact,
            position,
            total: position + 1,
            theme,
            gradient: theme.card_gradient(position),
            loading_more: false,
        }
    }

    pub fn total(mut self, total: usize) -> Self {
        self.total = total;
        self
    }

    pub fn loading_more(mut self, loading: bool) -> Self {
        self.loading_more = loading;
        self
    }
}

impl Widget for FactCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Gradient backdrop, one color per row
        for row in 0..area.height {
            let color = FactsTheme::gradient_color(self.gradient, row, area.height);
            let line = Rect::new(area.x, area.y + row, area.width, 1);
            buf.set_style(line, Style::default().bg(color));
        }

        let counter = format!(" {}/{} ", self.position + 1, self.total);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.foreground))
            .title(counter)
            .title_alignment(Alignment::Right);

        let inner = block.inner(area);
        block.render(area, buf);

        let [_, topic_area, _, fact_area, footer_area] = Layout::vertical([
            Constraint::Percentage(25),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(Line::from(Span::styled(
            self.fact.topic.to_uppercase(),
            self.theme.title_style(),
        )))
        .alignment(Alignment::Center)
        .render(topic_area, buf);

        Paragraph::new(self.fact.fact.as_str())
            .style(self.theme.fact_style())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(fact_area, buf);

        let footer = if self.loading_more {
            "Loading more facts..."
        } else {
            "t: learn more"
        };
        Paragraph::new(Span::styled(footer, self.theme.system_style()))
            .alignment(Alignment::Center)
            .render(footer_area, buf);
    }
}
