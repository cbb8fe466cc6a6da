//! Paginated AI trivia feed.
//!
//! This crate provides:
//! - The feed state machine: initial load, guarded incremental fetches,
//!   de-duplicating appends and the last-card observer that triggers them
//! - Fact providers, including one backed by Claude with schema-constrained
//!   output
//! - A streaming tutor for digging into a card's topic
//! - Route handling between home, feed and tutor views
//!
//! # Quick Start
//!
//! ```ignore
//! use facts_core::{ClaudeFactProvider, FactProvider, Feed, FactsConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = FactsConfig::from_env().unwrap_or_default();
//!     let provider = ClaudeFactProvider::new(config.clone());
//!     let mut feed = Feed::new(&config);
//!
//!     if let Some(ticket) = feed.begin_initial_load() {
//!         let facts = provider.fetch_facts(ticket.count).await;
//!         feed.apply(ticket, facts);
//!     }
//!
//!     for fact in feed.facts() {
//!         println!("{}: {}", fact.topic, fact.fact);
//!     }
//! }
//! ```

pub mod config;
pub mod fact;
pub mod feed;
pub mod headless;
pub mod navigation;
pub mod prompts;
pub mod provider;
pub mod testing;
pub mod tutor;
pub mod viewport;

// Re-export for convenience
pub use claude::API_KEY_ENV;
pub use facts_macros::Tool;

// Primary public API
pub use config::{ConfigError, FactsConfig};
pub use fact::{fallback_fact, palette_entry, palette_slot, Fact};
pub use feed::{Applied, Feed, FeedStatus, FetchKind, FetchTicket, MountId};
pub use headless::HeadlessFeed;
pub use navigation::{Navigator, Route, Transition};
pub use provider::{ClaudeFactProvider, FactProvider, ProviderError};
pub use testing::{numbered_facts, MockFactProvider};
pub use tutor::{TutorError, TutorSession, TutorTurn};
