//! Integration tests that call the real Claude API.
//!
//! These tests require ANTHROPIC_API_KEY to be set (via .env file or environment).
//! Run with: `cargo test -p facts-core --test api_integration -- --ignored`
//!
//! Marked #[ignore] by default: they cost money and take seconds each.

use facts_core::{ClaudeFactProvider, FactProvider, FactsConfig, HeadlessFeed, TutorSession};

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    std::env::var("ANTHROPIC_API_KEY").is_ok_and(|key| !key.trim().is_empty())
}

fn config() -> FactsConfig {
    FactsConfig::new()
        .with_initial_batch(4)
        .with_batch_size(2)
        .with_max_tokens(1024)
}

#[tokio::test]
#[ignore] // Run with: cargo test -p facts-core --test api_integration -- --ignored
async fn test_provider_returns_structured_facts() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let provider = ClaudeFactProvider::new(config());
    let facts = provider
        .try_fetch(4)
        .await
        .expect("provider should return facts");

    println!("Facts: {facts:#?}");
    assert!(!facts.is_empty(), "expected at least one fact");
    assert!(facts.len() <= 4, "provider must not exceed the requested count");
    for fact in &facts {
        assert!(!fact.topic.trim().is_empty());
        assert!(!fact.fact.trim().is_empty());
    }
}

#[tokio::test]
#[ignore]
async fn test_headless_feed_grows_past_first_batch() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let config = config();
    let mut headless = HeadlessFeed::new(ClaudeFactProvider::new(config.clone()), config);
    headless.start().await;
    let first_batch = headless.feed().len();
    assert!(first_batch >= 1);

    while headless.feed().current_index() + 1 < first_batch {
        headless.next().await;
    }

    println!(
        "Loaded {} facts after {} fetches",
        headless.feed().len(),
        headless.fetch_count()
    );
    assert!(headless.fetch_count() >= 2, "last card should trigger a fetch");
}

#[tokio::test]
#[ignore]
async fn test_tutor_streams_and_keeps_history() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let mut tutor = TutorSession::new("Octopuses", config());

    let mut chunks = 0;
    let opening = tutor
        .open(|_| chunks += 1)
        .await
        .expect("tutor should answer");
    println!("Opening ({chunks} chunks): {opening}");
    assert!(!opening.is_empty());
    assert!(chunks >= 1);

    let follow_up = tutor
        .ask("Why do they need more than one heart?", |_| {})
        .await
        .expect("tutor should answer follow-up");
    println!("Follow-up: {follow_up}");
    assert_eq!(tutor.turns().len(), 2);
}
