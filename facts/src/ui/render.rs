//! Render orchestration for the facts TUI

use facts_core::{FeedStatus, Route};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode};
use crate::ui::widgets::{
    FactCardWidget, HotkeyBarWidget, InputWidget, StatusBarWidget, TutorWidget,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Screen regions shared by every view.
struct AppLayout {
    title_area: Rect,
    content_area: Rect,
    status_bar: Rect,
    hotkey_bar: Rect,
}

impl AppLayout {
    fn calculate(area: Rect) -> Self {
        let [title_area, content_area, status_bar, hotkey_bar] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            title_area,
            content_area,
            status_bar,
            hotkey_bar,
        }
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::calculate(frame.area());

    render_title_bar(frame, app, layout.title_area);

    match app.route() {
        Route::Home => render_home(frame, app, layout.content_area),
        Route::Feed => render_feed(frame, app, layout.content_area),
        Route::Tutor { .. } => render_tutor(frame, app, layout.content_area),
    }

    render_status_bar(frame, app, layout.status_bar);
    frame.render_widget(
        HotkeyBarWidget::new(app.route(), app.input_mode, &app.theme),
        layout.hotkey_bar,
    );
}

fn spinner(app: &App) -> &'static str {
    SPINNER[usize::from(app.animation_frame) % SPINNER.len()]
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" FACTS ", app.theme.title_style())];
    if app.is_busy() {
        spans.push(Span::styled(spinner(app), app.theme.system_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let [_, body, _] = Layout::vertical([
        Constraint::Percentage(35),
        Constraint::Length(5),
        Constraint::Min(0),
    ])
    .areas(area);

    let lines = vec![
        Line::from(Span::styled("FACTS", app.theme.title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "An endless feed of surprising trivia",
            app.theme.fact_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to start  ·  q to quit",
            app.theme.system_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}

fn render_feed(frame: &mut Frame, app: &App, area: Rect) {
    let Some(feed) = app.feed() else {
        return;
    };

    match feed.current() {
        Some(fact) => {
            let card = FactCardWidget::new(fact, feed.current_index(), &app.theme)
                .total(feed.len())
                .loading_more(feed.status() == FeedStatus::FetchingMore);
            frame.render_widget(card, area);
        }
        None => {
            let [_, body, _] = Layout::vertical([
                Constraint::Percentage(45),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .areas(area);
            let text = format!("{} Loading facts...", spinner(app));
            frame.render_widget(
                Paragraph::new(Span::styled(text, app.theme.system_style()))
                    .alignment(Alignment::Center),
                body,
            );
        }
    }
}

fn render_tutor(frame: &mut Frame, app: &App, area: Rect) {
    let Some(tutor) = app.tutor() else {
        return;
    };

    let [transcript_area, input_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

    frame.render_widget(
        TutorWidget::new(tutor, &app.theme).animation_frame(app.animation_frame),
        transcript_area,
    );

    let placeholder = if tutor.waiting {
        "Waiting for the answer..."
    } else {
        "Press i to ask a follow-up question"
    };
    let input = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .placeholder(placeholder)
        .active(app.input_mode == InputMode::Insert);
    frame.render_widget(input, input_area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let position = app
        .feed()
        .filter(|feed| !feed.is_empty())
        .map(|feed| (feed.current_index(), feed.len()));

    let status = StatusBarWidget::new(app.route(), app.input_mode, &app.theme)
        .position(position)
        .message(app.status_message());
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::harness;
    use crate::worker::{WorkerRequest, WorkerResponse};
    use facts_core::numbered_facts;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_home_screen() {
        let h = harness();
        let screen = draw(&h.app);
        assert!(screen.contains("Enter to start"));
        assert!(screen.contains("HOME"));
    }

    #[test]
    fn test_feed_loading_then_card() {
        let mut h = harness();
        h.app.open_feed();
        assert!(draw(&h.app).contains("Loading facts..."));

        let Ok(WorkerRequest::FetchFacts(ticket)) = h.requests.try_recv() else {
            panic!("expected initial fetch");
        };
        h.app.apply_response(WorkerResponse::Facts {
            ticket,
            facts: numbered_facts("card", 3),
        });

        let screen = draw(&h.app);
        assert!(screen.contains("CARD 0"));
        assert!(screen.contains("Card 1 of 3"));
    }
}
