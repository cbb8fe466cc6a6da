//! Main application state and logic

use facts_core::{
    Applied, Fact, FactsConfig, Feed, FeedStatus, FetchKind, FetchTicket, Navigator, Route,
    Transition,
};
use tokio::sync::mpsc;

use crate::ui::theme::FactsTheme;
use crate::worker::{TutorId, WorkerRequest, WorkerResponse};

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - typing a tutor question
    Insert,
}

/// One line of a tutor conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TutorEntry {
    Question(String),
    Answer(String),
    /// Inline failure notice.
    Notice(String),
}

/// State of the open tutor view.
#[derive(Debug, Clone)]
pub struct TutorView {
    pub id: TutorId,
    pub topic: String,
    pub entries: Vec<TutorEntry>,
    pub streaming_text: Option<String>,
    /// An answer is in flight.
    pub waiting: bool,
    /// Lines scrolled back from the newest text.
    pub scroll: usize,
}

impl TutorView {
    fn new(id: TutorId, topic: String) -> Self {
        Self {
            id,
            topic,
            entries: Vec::new(),
            streaming_text: None,
            waiting: true,
            scroll: 0,
        }
    }

    fn finalize_streaming(&mut self) {
        if let Some(text) = self.streaming_text.take() {
            if !text.is_empty() {
                self.entries.push(TutorEntry::Answer(text));
            }
        }
        self.waiting = false;
    }
}

/// Main application state
pub struct App {
    // Channel communication with the worker
    request_tx: mpsc::Sender<WorkerRequest>,
    response_rx: mpsc::UnboundedReceiver<WorkerResponse>,

    config: FactsConfig,
    navigator: Navigator,
    feed: Option<Feed>,
    tutor: Option<TutorView>,
    next_tutor_id: TutorId,

    // UI state
    pub theme: FactsTheme,
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,

    // Animation
    pub animation_frame: u8,
}

impl App {
    /// Create a new application on the home view.
    pub fn new(
        request_tx: mpsc::Sender<WorkerRequest>,
        response_rx: mpsc::UnboundedReceiver<WorkerResponse>,
        config: FactsConfig,
    ) -> Self {
        Self {
            request_tx,
            response_rx,
            config,
            navigator: Navigator::new(),
            feed: None,
            tutor: None,
            next_tutor_id: 1,
            theme: FactsTheme::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            status_message: None,
            should_quit: false,
            animation_frame: 0,
        }
    }

    pub fn route(&self) -> &Route {
        self.navigator.current()
    }

    pub fn feed(&self) -> Option<&Feed> {
        self.feed.as_ref()
    }

    pub fn tutor(&self) -> Option<&TutorView> {
        self.tutor.as_ref()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Open the feed from home. Every open is a new mount.
    pub fn open_feed(&mut self) {
        let transition = self.navigator.open_feed();
        self.handle_transition(transition);
    }

    /// Open the tutor on the current card's topic.
    pub fn open_tutor(&mut self) {
        let Some(topic) = self.current_fact().map(|fact| fact.topic.clone()) else {
            return;
        };
        let transition = self.navigator.open_tutor(topic);
        self.handle_transition(transition);
    }

    /// Return to the parent view; quits from home.
    pub fn dismiss(&mut self) {
        let transition = self.navigator.dismiss();
        self.handle_transition(transition);
    }

    fn handle_transition(&mut self, transition: Transition) {
        match transition {
            Transition::MountFeed => {
                let mut feed = Feed::new(&self.config);
                let ticket = feed.begin_initial_load();
                self.feed = Some(feed);
                self.clear_status();
                if let Some(ticket) = ticket {
                    self.dispatch(ticket);
                }
            }
            Transition::UnmountFeed => {
                if let Some(mut feed) = self.feed.take() {
                    feed.unmount();
                }
                self.clear_status();
            }
            Transition::OpenTutor { topic } => {
                let id = self.next_tutor_id;
                self.next_tutor_id += 1;
                self.tutor = Some(TutorView::new(id, topic.clone()));
                self.input_mode = InputMode::Normal;
                if !self.send(WorkerRequest::OpenTutor { id, topic }) {
                    // The worker never saw this tutor, so no answer will come.
                    let back = self.navigator.dismiss();
                    self.handle_transition(back);
                    self.set_status("Tutor unavailable, try again");
                }
            }
            Transition::CloseTutor => {
                self.tutor = None;
                self.input_mode = InputMode::Normal;
                self.clear_input();
                self.send(WorkerRequest::CloseTutor);
            }
            Transition::Exit => {
                self.should_quit = true;
            }
            Transition::None => {}
        }
    }

    // =========================================================================
    // Feed
    // =========================================================================

    pub fn current_fact(&self) -> Option<&Fact> {
        self.feed.as_ref().and_then(Feed::current)
    }

    pub fn next_card(&mut self) {
        let ticket = self.feed.as_mut().and_then(Feed::next_card);
        if let Some(ticket) = ticket {
            self.dispatch(ticket);
        }
    }

    pub fn prev_card(&mut self) {
        let ticket = self.feed.as_mut().and_then(Feed::prev_card);
        if let Some(ticket) = ticket {
            self.dispatch(ticket);
        }
    }

    pub fn first_card(&mut self) {
        let ticket = self.feed.as_mut().and_then(|feed| feed.jump_to(0));
        if let Some(ticket) = ticket {
            self.dispatch(ticket);
        }
    }

    pub fn last_card(&mut self) {
        let ticket = self.feed.as_mut().and_then(|feed| feed.jump_to(usize::MAX));
        if let Some(ticket) = ticket {
            self.dispatch(ticket);
        }
    }

    /// Hand a fetch to the worker.
    fn dispatch(&mut self, ticket: FetchTicket) {
        if ticket.kind == FetchKind::More {
            self.set_status("Loading more facts...");
        }
        if let Err(e) = self.request_tx.try_send(WorkerRequest::FetchFacts(ticket)) {
            tracing::warn!(error = %e, "could not reach worker, treating fetch as failed");
            // Settle the feed the same way a failed fetch would.
            self.apply_facts(ticket, Vec::new());
        }
    }

    fn apply_facts(&mut self, ticket: FetchTicket, facts: Vec<Fact>) {
        let Some(feed) = self.feed.as_mut() else {
            tracing::debug!(mount = %ticket.mount, "feed closed, dropping result");
            return;
        };

        let applied = feed.apply(ticket, facts);
        let follow_up = feed.poll_observer();

        match applied {
            Applied::Initial { fallback: true, .. } => {
                self.set_status("Couldn't load facts, showing a classic");
            }
            Applied::Initial { .. } => self.clear_status(),
            Applied::More { appended: 0, .. } => self.set_status("No new facts this time"),
            Applied::More { .. } => self.clear_status(),
            Applied::Stale => {}
        }

        if let Some(ticket) = follow_up {
            self.dispatch(ticket);
        }
    }

    // =========================================================================
    // Worker responses
    // =========================================================================

    /// Apply every response the worker has produced so far.
    pub fn process_responses(&mut self) {
        while let Ok(response) = self.response_rx.try_recv() {
            self.apply_response(response);
        }
    }

    pub fn apply_response(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::Facts { ticket, facts } => self.apply_facts(ticket, facts),
            WorkerResponse::TutorChunk { id, text } => {
                if let Some(tutor) = self.tutor_for(id) {
                    tutor
                        .streaming_text
                        .get_or_insert_with(String::new)
                        .push_str(&text);
                }
            }
            WorkerResponse::TutorComplete { id } => {
                if let Some(tutor) = self.tutor_for(id) {
                    tutor.finalize_streaming();
                }
            }
            WorkerResponse::TutorError { id, message } => {
                if let Some(tutor) = self.tutor_for(id) {
                    tutor.finalize_streaming();
                    tutor.entries.push(TutorEntry::Notice(message));
                }
            }
        }
    }

    /// The open tutor, if `id` still refers to it.
    fn tutor_for(&mut self, id: TutorId) -> Option<&mut TutorView> {
        self.tutor.as_mut().filter(|tutor| tutor.id == id)
    }

    // =========================================================================
    // Tutor
    // =========================================================================

    /// Send the input buffer as a follow-up question.
    pub fn submit_question(&mut self) {
        let waiting = self.tutor.as_ref().map_or(true, |tutor| tutor.waiting);
        if waiting {
            self.set_status("Wait for the current answer");
            return;
        }
        let question = std::mem::take(&mut self.input_buffer).trim().to_string();
        self.cursor_position = 0;
        self.input_mode = InputMode::Normal;
        if question.is_empty() {
            return;
        }

        if let Some(tutor) = self.tutor.as_mut() {
            tutor.entries.push(TutorEntry::Question(question.clone()));
            tutor.waiting = true;
        }
        if !self.send(WorkerRequest::AskTutor(question)) {
            if let Some(tutor) = self.tutor.as_mut() {
                tutor.finalize_streaming();
                tutor
                    .entries
                    .push(TutorEntry::Notice("Question not sent, try again".into()));
            }
        }
    }

    /// Scroll the transcript back, away from the newest text.
    pub fn scroll_tutor_up(&mut self, lines: usize) {
        if let Some(tutor) = self.tutor.as_mut() {
            tutor.scroll = tutor.scroll.saturating_add(lines);
        }
    }

    pub fn scroll_tutor_down(&mut self, lines: usize) {
        if let Some(tutor) = self.tutor.as_mut() {
            tutor.scroll = tutor.scroll.saturating_sub(lines);
        }
    }

    /// Queue a request for the worker. Returns false if it was dropped.
    fn send(&mut self, request: WorkerRequest) -> bool {
        match self.request_tx.try_send(request) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "worker request dropped");
                self.set_status("Worker busy, please try again");
                false
            }
        }
    }

    /// Ask the worker to stop.
    pub fn shutdown(&self) {
        let _ = self.request_tx.try_send(WorkerRequest::Shutdown);
    }

    // =========================================================================
    // Input editing
    // =========================================================================

    pub fn enter_insert_mode(&mut self) {
        if self.tutor.is_some() {
            self.input_mode = InputMode::Insert;
        }
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    // =========================================================================
    // Status and animation
    // =========================================================================

    /// Tick for animations
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    /// Whether something is loading, for the spinner.
    pub fn is_busy(&self) -> bool {
        let feed_busy = self
            .feed
            .as_ref()
            .is_some_and(|feed| feed.status() != FeedStatus::Success);
        let tutor_busy = self.tutor.as_ref().is_some_and(|tutor| tutor.waiting);
        feed_busy || tutor_busy
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
