//! Status and hotkey bars

use facts_core::Route;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::InputMode;
use crate::ui::theme::FactsTheme;

/// Mode indicator, feed position and the latest status message.
pub struct StatusBarWidget<'a> {
    route: &'a Route,
    input_mode: InputMode,
    theme: &'a FactsTheme,
    position: Option<(usize, usize)>,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(route: &'a Route, input_mode: InputMode, theme: &'a FactsTheme) -> Self {
        Self {
            route,
            input_mode,
            theme,
            position: None,
            message: None,
        }
    }

    /// Current card index and loaded card count.
    pub fn position(mut self, position: Option<(usize, usize)>) -> Self {
        self.position = position;
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (mode_text, mode_style) = match self.input_mode {
            InputMode::Normal => (
                "NORMAL",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            InputMode::Insert => (
                "INSERT",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        };

        let view = match self.route {
            Route::Home => "HOME",
            Route::Feed => "FEED",
            Route::Tutor { .. } => "TUTOR",
        };

        let mut spans = vec![
            Span::styled(format!("-- {mode_text} --"), mode_style),
            Span::raw(" | "),
            Span::styled(view, self.theme.system_style()),
        ];

        if let Some((current, total)) = self.position {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(format!("Card {} of {}", current + 1, total)));
        }

        if let Some(msg) = self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(msg, Style::default().add_modifier(Modifier::DIM)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// Keys available in the current view.
pub struct HotkeyBarWidget<'a> {
    route: &'a Route,
    input_mode: InputMode,
    theme: &'a FactsTheme,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(route: &'a Route, input_mode: InputMode, theme: &'a FactsTheme) -> Self {
        Self {
            route,
            input_mode,
            theme,
        }
    }

    fn hotkeys(&self) -> &'static [(&'static str, &'static str)] {
        match (self.route, self.input_mode) {
            (_, InputMode::Insert) => &[("Enter", "ask"), ("Esc", "cancel")],
            (Route::Home, _) => &[("Enter", "open feed"), ("q", "quit")],
            (Route::Feed, _) => &[
                ("j/k", "next/prev"),
                ("g/G", "first/last"),
                ("t", "learn more"),
                ("Esc", "home"),
            ],
            (Route::Tutor { .. }, _) => &[("i", "ask"), ("j/k", "scroll"), ("Esc", "back")],
        }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key_style = Style::default()
            .fg(self.theme.border_focused)
            .add_modifier(Modifier::BOLD);

        let mut spans = Vec::new();
        for (i, (key, action)) in self.hotkeys().iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::styled(format!(" {action}"), self.theme.system_style()));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
