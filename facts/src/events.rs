//! Event handling for the facts TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use facts_core::Route;

use crate::app::{App, InputMode};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Scrolling pages the feed one card at a time.
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    let up = match mouse.kind {
        MouseEventKind::ScrollUp => true,
        MouseEventKind::ScrollDown => false,
        _ => return EventResult::Continue,
    };

    match app.route() {
        Route::Feed if up => app.prev_card(),
        Route::Feed => app.next_card(),
        Route::Tutor { .. } if up => app.scroll_tutor_up(3),
        Route::Tutor { .. } => app.scroll_tutor_down(3),
        Route::Home => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    let result = if app.input_mode == InputMode::Insert {
        handle_insert_mode(app, key)
    } else {
        match app.route() {
            Route::Home => handle_home_keys(app, key),
            Route::Feed => handle_feed_keys(app, key),
            Route::Tutor { .. } => handle_tutor_keys(app, key),
        }
    };

    if app.should_quit {
        EventResult::Quit
    } else {
        result
    }
}

fn handle_home_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.open_feed();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') | KeyCode::Esc => EventResult::Quit,
        _ => EventResult::Continue,
    }
}

fn handle_feed_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::PageDown | KeyCode::Char(' ') => {
            app.next_card();
        }
        KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => app.prev_card(),
        KeyCode::Char('g') | KeyCode::Home => app.first_card(),
        KeyCode::Char('G') | KeyCode::End => app.last_card(),
        KeyCode::Char('t') | KeyCode::Enter => app.open_tutor(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => app.dismiss(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_tutor_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('a') => app.enter_insert_mode(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_tutor_up(1),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_tutor_down(1),
        KeyCode::PageUp => app.scroll_tutor_up(10),
        KeyCode::PageDown => app.scroll_tutor_down(10),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => app.dismiss(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle keys in INSERT mode (typing a question)
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => app.enter_normal_mode(),
        KeyCode::Enter => app.submit_question(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Char(c) => app.type_char(c),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::harness;
    use crate::worker::{WorkerRequest, WorkerResponse};
    use facts_core::numbered_facts;

    fn press(app: &mut App, code: KeyCode) -> EventResult {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_home_enter_opens_feed_and_q_quits() {
        let mut h = harness();
        assert_eq!(press(&mut h.app, KeyCode::Enter), EventResult::NeedsRedraw);
        assert_eq!(h.app.route(), &Route::Feed);

        press(&mut h.app, KeyCode::Esc);
        assert_eq!(h.app.route(), &Route::Home);
        assert_eq!(press(&mut h.app, KeyCode::Char('q')), EventResult::Quit);
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut h = harness();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(&mut h.app, ctrl_c), EventResult::Quit);
    }

    #[test]
    fn test_feed_paging_and_tutor() {
        let mut h = harness();
        press(&mut h.app, KeyCode::Enter);
        let Ok(WorkerRequest::FetchFacts(ticket)) = h.requests.try_recv() else {
            panic!("expected initial fetch");
        };
        h.app.apply_response(WorkerResponse::Facts {
            ticket,
            facts: numbered_facts("a", 3),
        });

        press(&mut h.app, KeyCode::Char('j'));
        assert_eq!(h.app.feed().unwrap().current_index(), 1);
        press(&mut h.app, KeyCode::Char('k'));
        assert_eq!(h.app.feed().unwrap().current_index(), 0);

        press(&mut h.app, KeyCode::Char('t'));
        assert_eq!(
            h.app.route(),
            &Route::Tutor {
                topic: "a 0".to_string()
            }
        );

        // Typing 'q' in insert mode is text, not a quit
        press(&mut h.app, KeyCode::Char('i'));
        assert_eq!(h.app.input_mode, InputMode::Insert);
        assert_eq!(press(&mut h.app, KeyCode::Char('q')), EventResult::NeedsRedraw);
        assert_eq!(h.app.input_buffer(), "q");

        press(&mut h.app, KeyCode::Esc);
        assert_eq!(h.app.input_mode, InputMode::Normal);
        press(&mut h.app, KeyCode::Esc);
        assert_eq!(h.app.route(), &Route::Feed);
    }
}
