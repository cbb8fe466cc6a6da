//! Testing utilities for the facts feed.
//!
//! - `MockFactProvider` returns scripted batches without API calls and
//!   records every request it receives
//! - `numbered_facts` builds distinct facts quickly

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::fact::Fact;
use crate::provider::FactProvider;

/// A provider that replays scripted batches.
///
/// Each call pops the next batch (truncated to the requested count). Once
/// the script runs out every call returns nothing, like a failing provider.
#[derive(Debug, Default)]
pub struct MockFactProvider {
    batches: Mutex<VecDeque<Vec<Fact>>>,
    calls: Mutex<Vec<usize>>,
}

impl MockFactProvider {
    pub fn new(batches: Vec<Vec<Fact>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every call fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Queue another batch.
    pub fn push_batch(&self, batch: Vec<Fact>) {
        self.batches
            .lock()
            .expect("mock provider lock poisoned")
            .push_back(batch);
    }

    /// Queue a failed call.
    pub fn push_failure(&self) {
        self.push_batch(Vec::new());
    }

    /// Requested counts, in call order.
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().expect("mock provider lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock provider lock poisoned").len()
    }
}

#[async_trait]
impl FactProvider for MockFactProvider {
    async fn fetch_facts(&self, count: usize) -> Vec<Fact> {
        self.calls
            .lock()
            .expect("mock provider lock poisoned")
            .push(count);

        let mut batch = self
            .batches
            .lock()
            .expect("mock provider lock poisoned")
            .pop_front()
            .unwrap_or_default();
        batch.truncate(count);
        batch
    }
}

/// `count` distinct facts: `"<prefix> fact 0"`, `"<prefix> fact 1"`, ...
pub fn numbered_facts(prefix: &str, count: usize) -> Vec<Fact> {
    (0..count)
        .map(|i| Fact::new(format!("{prefix} {i}"), format!("{prefix} fact {i}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_and_records() {
        let mock = MockFactProvider::new(vec![numbered_facts("a", 5)]);
        mock.push_failure();

        assert_eq!(mock.fetch_facts(3).await.len(), 3);
        assert!(mock.fetch_facts(2).await.is_empty());
        assert!(mock.fetch_facts(2).await.is_empty(), "script exhausted");
        assert_eq!(mock.calls(), vec![3, 2, 2]);
    }

    #[test]
    fn test_numbered_facts_are_distinct() {
        let facts = numbered_facts("x", 4);
        let mut texts: Vec<_> = facts.iter().map(|f| f.fact.clone()).collect();
        texts.dedup();
        assert_eq!(texts.len(), 4);
    }
}
