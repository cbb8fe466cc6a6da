//! A small client for the Anthropic Messages API.
//!
//! Two call shapes are supported: [`Claude::complete`] for a whole reply
//! (optionally forced through a single tool so the answer is schema-shaped
//! JSON), and [`Claude::stream`] for text that arrives as server-sent events.

mod client;
mod error;
mod messages;
mod sse;

pub use client::{Claude, EventStream, API_KEY_ENV, DEFAULT_MODEL};
pub use error::Error;
pub use messages::{Block, Message, Reply, Request, Role, StopReason, Tool, ToolChoice, Usage};
pub use sse::StreamEvent;
