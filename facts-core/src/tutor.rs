//! Tutor conversations about a single topic.
//!
//! Opened from a feed card. The tutor streams its answers so the view can
//! show text as it arrives, and keeps the conversation so follow-up questions
//! have context.

use claude::{Claude, Message, Request, StreamEvent};
use futures::{Stream, StreamExt};
use thiserror::Error;

use crate::config::FactsConfig;
use crate::prompts;

/// Errors from a tutor exchange.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Claude API error: {0}")]
    Api(#[from] claude::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Question is empty")]
    EmptyQuestion,
}

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorTurn {
    pub question: String,
    pub answer: String,
}

/// A tutoring conversation about one topic.
#[derive(Debug, Clone)]
pub struct TutorSession {
    topic: String,
    turns: Vec<TutorTurn>,
    config: FactsConfig,
    base_url: Option<String>,
}

impl TutorSession {
    pub fn new(topic: impl Into<String>, config: FactsConfig) -> Self {
        Self {
            topic: topic.into(),
            turns: Vec::new(),
            config,
            base_url: None,
        }
    }

    /// Send requests to a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Completed exchanges, oldest first.
    pub fn turns(&self) -> &[TutorTurn] {
        &self.turns
    }

    /// The question the tutor starts with.
    pub fn opening_question(&self) -> String {
        prompts::tutor_opening(&self.topic)
    }

    /// Ask the opening question.
    pub async fn open<F>(&mut self, on_text: F) -> Result<String, TutorError>
    where
        F: FnMut(&str),
    {
        let question = self.opening_question();
        self.ask(&question, on_text).await
    }

    /// Ask a question, streaming answer text through `on_text`.
    ///
    /// The exchange is only recorded once the full answer arrived.
    pub async fn ask<F>(&mut self, question: &str, mut on_text: F) -> Result<String, TutorError>
    where
        F: FnMut(&str),
    {
        let question = question.trim();
        if question.is_empty() {
            return Err(TutorError::EmptyQuestion);
        }

        let mut client = Claude::from_env()?;
        if let Some(model) = &self.config.model {
            client = client.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            client = client.with_base_url(base_url.clone());
        }

        tracing::info!(topic = %self.topic, turn = self.turns.len(), "tutor question");
        let stream = client.stream(&self.build_request(question)).await?;
        let answer = collect_answer(stream, &mut on_text).await?;

        self.turns.push(TutorTurn {
            question: question.to_string(),
            answer: answer.clone(),
        });
        Ok(answer)
    }

    /// Build the request for `question` on top of the conversation so far.
    pub fn build_request(&self, question: &str) -> Request {
        let mut messages = Vec::with_capacity(self.turns.len() * 2 + 1);
        for turn in &self.turns {
            messages.push(Message::user(turn.question.clone()));
            messages.push(Message::assistant(turn.answer.clone()));
        }
        messages.push(Message::user(question));

        let mut request = Request::new(messages)
            .with_system(prompts::TUTOR_SYSTEM)
            .with_max_tokens(self.config.max_tokens);
        if let Some(model) = &self.config.model {
            request = request.with_model(model.clone());
        }
        request
    }
}

/// Forward streamed text to `on_text` until the reply finishes.
///
/// A stream that ends before `message_stop` lost its connection mid-answer.
async fn collect_answer<S, F>(mut stream: S, on_text: &mut F) -> Result<String, TutorError>
where
    S: Stream<Item = Result<StreamEvent, claude::Error>> + Unpin,
    F: FnMut(&str),
{
    let mut answer = String::new();
    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::Text(text) => {
                on_text(&text);
                answer.push_str(&text);
            }
            StreamEvent::Failed(message) => return Err(TutorError::Stream(message)),
            StreamEvent::Done => return Ok(answer),
            _ => {}
        }
    }
    Err(TutorError::Stream("connection closed".to_string()))
}
