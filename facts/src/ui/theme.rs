//! Color theme and styling for the facts TUI

use facts_core::palette_entry;
use ratatui::style::{Color, Modifier, Style};

/// Colors for one card: a two-stop gradient drawn from `top` to `bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardGradient {
    pub top: Color,
    pub bottom: Color,
}

impl CardGradient {
    const fn new(top: Color, bottom: Color) -> Self {
        Self { top, bottom }
    }
}

/// Card gradients, cycled by card position.
pub const CARD_GRADIENTS: [CardGradient; 6] = [
    CardGradient::new(Color::Rgb(255, 94, 98), Color::Rgb(255, 153, 102)),
    CardGradient::new(Color::Rgb(54, 209, 220), Color::Rgb(91, 134, 229)),
    CardGradient::new(Color::Rgb(86, 171, 47), Color::Rgb(168, 224, 99)),
    CardGradient::new(Color::Rgb(142, 45, 226), Color::Rgb(74, 0, 224)),
    CardGradient::new(Color::Rgb(247, 151, 30), Color::Rgb(255, 210, 0)),
    CardGradient::new(Color::Rgb(236, 0, 140), Color::Rgb(252, 103, 103)),
];

/// UI color theme
#[derive(Debug, Clone)]
pub struct FactsTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Text colors
    pub title_text: Color,
    pub question_text: Color,
    pub answer_text: Color,
    pub notice_text: Color,
    pub system_text: Color,

    pub cards: Vec<CardGradient>,
}

impl Default for FactsTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            title_text: Color::LightYellow,
            question_text: Color::Cyan,
            answer_text: Color::White,
            notice_text: Color::LightRed,
            system_text: Color::DarkGray,

            cards: CARD_GRADIENTS.to_vec(),
        }
    }
}

impl FactsTheme {
    /// Gradient for the card at `position`.
    pub fn card_gradient(&self, position: usize) -> CardGradient {
        palette_entry(&self.cards, position)
            .copied()
            .unwrap_or(CardGradient::new(self.border_focused, self.border))
    }

    /// Linear blend between the gradient stops, `row` of `height`.
    ///
    /// Terminals without truecolor get the nearest stop instead.
    pub fn gradient_color(gradient: CardGradient, row: u16, height: u16) -> Color {
        match (gradient.top, gradient.bottom) {
            (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) if height > 1 => {
                let t = f32::from(row.min(height - 1)) / f32::from(height - 1);
                let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
                Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
            }
            (top, bottom) => {
                if row.saturating_mul(2) < height {
                    top
                } else {
                    bottom
                }
            }
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title_text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn fact_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn question_style(&self) -> Style {
        Style::default()
            .fg(self.question_text)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn answer_style(&self) -> Style {
        Style::default().fg(self.answer_text)
    }

    pub fn notice_style(&self) -> Style {
        Style::default().fg(self.notice_text)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_gradient_cycles() {
        let theme = FactsTheme::default();
        let len = theme.cards.len();
        for position in 0..(len * 3 + 2) {
            assert_eq!(theme.card_gradient(position), theme.cards[position % len]);
        }
    }

    #[test]
    fn test_empty_palette_falls_back_to_borders() {
        let theme = FactsTheme {
            cards: Vec::new(),
            ..FactsTheme::default()
        };
        let gradient = theme.card_gradient(7);
        assert_eq!(gradient.top, theme.border_focused);
        assert_eq!(gradient.bottom, theme.border);
    }

    #[test]
    fn test_gradient_endpoints() {
        let gradient = CARD_GRADIENTS[0];
        assert_eq!(FactsTheme::gradient_color(gradient, 0, 10), gradient.top);
        assert_eq!(FactsTheme::gradient_color(gradient, 9, 10), gradient.bottom);
        assert_eq!(FactsTheme::gradient_color(gradient, 30, 10), gradient.bottom);

        let named = CardGradient::new(Color::Red, Color::Blue);
        assert_eq!(FactsTheme::gradient_color(named, 1, 10), Color::Red);
        assert_eq!(FactsTheme::gradient_color(named, 8, 10), Color::Blue);
    }
}
