//! Headless feed interface for programmatic use.
//!
//! Drives a [`Feed`] with a [`FactProvider`] without any UI. Fetches run
//! inline, so every call returns with the feed settled. It's designed for:
//! - Integration tests against a mock provider
//! - Script-driven sessions through `facts --headless`
//!
//! # Example
//!
//! ```ignore
//! use facts_core::{ClaudeFactProvider, FactsConfig, HeadlessFeed};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = FactsConfig::new();
//!     let mut feed = HeadlessFeed::new(ClaudeFactProvider::new(config.clone()), config);
//!     feed.start().await;
//!
//!     while let Some(fact) = feed.current() {
//!         println!("{}: {}", fact.topic, fact.fact);
//!         if !feed.next().await {
//!             break;
//!         }
//!     }
//! }
//! ```

use crate::config::FactsConfig;
use crate::fact::Fact;
use crate::feed::{Applied, Feed, FetchTicket};
use crate::provider::FactProvider;
use crate::tutor::TutorSession;

/// A feed plus the provider that fills it.
pub struct HeadlessFeed<P> {
    provider: P,
    config: FactsConfig,
    feed: Feed,
    fetches: usize,
}

impl<P: FactProvider> HeadlessFeed<P> {
    /// Mount a feed. Nothing is fetched until [`HeadlessFeed::start`].
    pub fn new(provider: P, config: FactsConfig) -> Self {
        let feed = Feed::new(&config);
        Self {
            provider,
            config,
            feed,
            fetches: 0,
        }
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn current(&self) -> Option<&Fact> {
        self.feed.current()
    }

    /// Provider calls made across all mounts.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Run the initial load. Repeated calls do nothing.
    pub async fn start(&mut self) -> Option<Applied> {
        let ticket = self.feed.begin_initial_load()?;
        Some(self.run(ticket).await)
    }

    /// Page forward. Returns `false` if already on the last card.
    pub async fn next(&mut self) -> bool {
        let before = self.feed.current_index();
        if let Some(ticket) = self.feed.next_card() {
            self.run(ticket).await;
        }
        self.feed.current_index() != before
    }

    /// Page back. Returns `false` if already on the first card.
    pub async fn prev(&mut self) -> bool {
        let before = self.feed.current_index();
        if let Some(ticket) = self.feed.prev_card() {
            self.run(ticket).await;
        }
        self.feed.current_index() != before
    }

    /// Dismiss the feed and mount a fresh one.
    pub fn remount(&mut self) {
        self.feed.unmount();
        self.feed = Feed::new(&self.config);
    }

    /// Tutor session for the current card's topic.
    pub fn tutor(&self) -> Option<TutorSession> {
        self.feed
            .current()
            .map(|fact| TutorSession::new(fact.topic.clone(), self.config.clone()))
    }

    /// Fetch and apply a ticket, then deliver any observer entry the new
    /// cards produced.
    async fn run(&mut self, ticket: FetchTicket) -> Applied {
        let applied = self.fetch_and_apply(ticket).await;
        while let Some(follow_up) = self.feed.poll_observer() {
            self.fetch_and_apply(follow_up).await;
        }
        applied
    }

    async fn fetch_and_apply(&mut self, ticket: FetchTicket) -> Applied {
        self.fetches += 1;
        let facts = self.provider.fetch_facts(ticket.count).await;
        self.feed.apply(ticket, facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::fallback_fact;
    use crate::testing::{numbered_facts, MockFactProvider};

    fn config() -> FactsConfig {
        FactsConfig::new().with_initial_batch(3).with_batch_size(2)
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let mock = MockFactProvider::new(vec![numbered_facts("a", 3)]);
        let mut headless = HeadlessFeed::new(mock, config());

        assert!(headless.start().await.is_some());
        assert!(headless.start().await.is_none());
        assert_eq!(headless.provider().calls(), vec![3]);
        assert_eq!(headless.feed().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_start_fetches_again_from_fallback() {
        let mock = MockFactProvider::failing();
        let mut headless = HeadlessFeed::new(mock, config());

        let applied = headless.start().await;
        assert_eq!(
            applied,
            Some(Applied::Initial {
                loaded: 1,
                fallback: true
            })
        );
        assert_eq!(headless.current(), Some(&fallback_fact()));
        // The lone fallback card is the visible last card, so one incremental
        // fetch follows; it also fails and the feed stays put.
        assert_eq!(headless.provider().calls(), vec![3, 2]);
        assert!(!headless.next().await);
    }

    #[tokio::test]
    async fn test_remount_starts_over() {
        let mock = MockFactProvider::new(vec![numbered_facts("a", 3), numbered_facts("b", 3)]);
        let mut headless = HeadlessFeed::new(mock, config());
        headless.start().await;
        let first_mount = headless.feed().mount();

        let old = headless.feed().mount();
        headless.remount();
        assert_ne!(old, headless.feed().mount());
        assert_ne!(headless.feed().mount(), first_mount);
        assert!(headless.feed().is_empty());

        headless.start().await;
        assert_eq!(headless.current().map(|f| f.topic.as_str()), Some("b 0"));
        assert_eq!(headless.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_tutor_uses_current_topic() {
        let mock = MockFactProvider::new(vec![numbered_facts("a", 3)]);
        let mut headless = HeadlessFeed::new(mock, config());
        assert!(headless.tutor().is_none());

        headless.start().await;
        headless.next().await;
        assert_eq!(headless.tutor().unwrap().topic(), "a 1");
    }
}
