//! Fetch one batch of facts from Claude and print them.
//!
//! Run with: `cargo run -p facts-core --example fetch_batch -- 5`

use facts_core::{ClaudeFactProvider, FactsConfig};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let count = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(3);

    let config = match FactsConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Bad configuration: {e}");
            std::process::exit(1);
        }
    };

    println!("=== Fetching {count} facts ===\n");
    let provider = ClaudeFactProvider::new(config);
    match provider.try_fetch(count).await {
        Ok(facts) => {
            for (i, fact) in facts.iter().enumerate() {
                println!("{}. [{}] {}", i + 1, fact.topic, fact.fact);
            }
            println!("\n=== Got {} of {count} ===", facts.len());
        }
        Err(e) => {
            eprintln!("Fetch failed: {e}");
            std::process::exit(1);
        }
    }
}
