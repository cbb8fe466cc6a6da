//! Fact providers.
//!
//! A [`FactProvider`] is best-effort by contract: it returns up to the
//! requested number of facts and turns every failure into a shorter (possibly
//! empty) batch. [`ClaudeFactProvider`] is the real implementation; tests use
//! [`crate::testing::MockFactProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use claude::{Claude, Message, Request};
use facts_macros::Tool;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::FactsConfig;
use crate::fact::Fact;
use crate::prompts;

/// Something that can produce facts for the feed.
#[async_trait]
pub trait FactProvider: Send + Sync {
    /// Return up to `count` facts. Never fails; failures yield fewer facts.
    async fn fetch_facts(&self, count: usize) -> Vec<Fact>;
}

#[async_trait]
impl<P: FactProvider + ?Sized> FactProvider for Arc<P> {
    async fn fetch_facts(&self, count: usize) -> Vec<Fact> {
        (**self).fetch_facts(count).await
    }
}

/// Why a provider call produced nothing. Only surfaced through logs.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Claude API error: {0}")]
    Api(#[from] claude::Error),

    #[error("Response was not fact JSON: {0}")]
    Malformed(String),
}

/// A single piece of trivia
#[derive(Debug, Tool, Deserialize)]
pub struct FactEntry {
    /// Subject of the fact, one to three words
    pub topic: String,
    /// The fact itself, one or two sentences
    pub fact: String,
}

/// Record a batch of trivia facts for the feed
#[derive(Debug, Tool, Deserialize)]
#[tool(name = "record_facts")]
pub struct RecordFacts {
    /// The facts, one entry per card
    #[tool(nested)]
    pub facts: Vec<FactEntry>,
}

/// Fact provider backed by the Claude Messages API.
///
/// The API key is read from `ANTHROPIC_API_KEY` on every call, so a key
/// added to the environment after startup is picked up by the next fetch.
#[derive(Debug, Clone)]
pub struct ClaudeFactProvider {
    config: FactsConfig,
    base_url: Option<String>,
}

impl ClaudeFactProvider {
    pub fn new(config: FactsConfig) -> Self {
        Self {
            config,
            base_url: None,
        }
    }

    /// Send requests to a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Fetch facts, reporting failures instead of swallowing them.
    pub async fn try_fetch(&self, count: usize) -> Result<Vec<Fact>, ProviderError> {
        let mut client = Claude::from_env()?;
        if let Some(model) = &self.config.model {
            client = client.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            client = client.with_base_url(base_url.clone());
        }

        let mut request = Request::new(vec![Message::user(prompts::facts_request(count))])
            .with_system(prompts::FACTS_SYSTEM)
            .with_max_tokens(self.config.max_tokens)
            .with_forced_tool(RecordFacts::as_tool());
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }

        let reply = client.complete(&request).await?;
        tracing::debug!(
            input_tokens = reply.usage.input_tokens,
            output_tokens = reply.usage.output_tokens,
            "facts response"
        );

        let mut facts = match reply.tool_input(RecordFacts::tool_name()) {
            Some(input) => facts_from_value(input.clone()),
            None => parse_facts_text(&reply.text())?,
        };
        facts.truncate(count);
        Ok(facts)
    }
}

#[async_trait]
impl FactProvider for ClaudeFactProvider {
    async fn fetch_facts(&self, count: usize) -> Vec<Fact> {
        if count == 0 {
            return Vec::new();
        }
        match self.try_fetch(count).await {
            Ok(facts) => {
                tracing::info!(requested = count, received = facts.len(), "fetched facts");
                facts
            }
            Err(e) => {
                tracing::warn!(requested = count, error = %e, "fact fetch failed");
                Vec::new()
            }
        }
    }
}

/// Parse model text as fact JSON.
///
/// Accepts a single `{topic, fact}` object, an array of them, or an object
/// with a `facts` array, optionally wrapped in a markdown code fence or
/// surrounded by prose.
pub fn parse_facts_text(text: &str) -> Result<Vec<Fact>, ProviderError> {
    let body = strip_code_fence(text.trim());

    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(first) => {
            let embedded = embedded_json(body)
                .ok_or_else(|| ProviderError::Malformed(first.to_string()))?;
            serde_json::from_str::<Value>(embedded)
                .map_err(|e| ProviderError::Malformed(e.to_string()))?
        }
    };

    Ok(facts_from_value(value))
}

/// Pull facts out of any of the accepted JSON shapes, dropping entries that
/// lack a non-empty topic or fact.
pub fn facts_from_value(value: Value) -> Vec<Fact> {
    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("facts") {
            Some(Value::Array(items)) => items,
            Some(_) => Vec::new(),
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<Fact>(entry).ok())
        .filter_map(Fact::normalized)
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the language tag line, e.g. ```json
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn embedded_json(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let close = if text[start..].starts_with('[') { ']' } else { '}' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_facts_schema() {
        let schema = RecordFacts::input_schema();
        assert_eq!(RecordFacts::tool_name(), "record_facts");
        assert_eq!(schema["properties"]["facts"]["type"], "array");

        let item = &schema["properties"]["facts"]["items"];
        assert_eq!(item["type"], "object");
        assert_eq!(item["properties"]["topic"]["type"], "string");
        assert_eq!(item["properties"]["fact"]["type"], "string");

        let required = item["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "topic"));
        assert!(required.iter().any(|v| v == "fact"));
    }

    #[test]
    fn test_parse_single_object() {
        let facts = parse_facts_text(r#"{"topic": "Honey", "fact": "Honey never spoils."}"#).unwrap();
        assert_eq!(facts, vec![Fact::new("Honey", "Honey never spoils.")]);
    }

    #[test]
    fn test_parse_array_in_code_fence() {
        let text = "```json\n[\n {\"topic\": \"Mars\", \"fact\": \"Mars has the tallest volcano.\"},\n {\"topic\": \"Bees\", \"fact\": \"Bees can recognise faces.\"}\n]\n```";
        let facts = parse_facts_text(text).unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[1].topic, "Bees");
    }

    #[test]
    fn test_parse_wrapped_with_prose() {
        let text = "Here you go: {\"facts\": [{\"topic\": \"Ice\", \"fact\": \"Hot water can freeze faster.\"}]} Enjoy!";
        let facts = parse_facts_text(text).unwrap();
        assert_eq!(facts, vec![Fact::new("Ice", "Hot water can freeze faster.")]);
    }

    #[test]
    fn test_invalid_entries_dropped() {
        let value = serde_json::json!([
            {"topic": "Ok", "fact": "Valid entry."},
            {"topic": "Missing fact"},
            {"topic": " ", "fact": "Blank topic."},
            "not an object"
        ]);
        assert_eq!(facts_from_value(value), vec![Fact::new("Ok", "Valid entry.")]);
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            parse_facts_text("I'm sorry, I can't help with that."),
            Err(ProviderError::Malformed(_))
        ));
        assert!(facts_from_value(serde_json::json!({"facts": "nope"})).is_empty());
        assert!(facts_from_value(serde_json::json!(42)).is_empty());
    }

    #[test]
    fn test_api_key_variable_is_shared_with_client() {
        assert_eq!(crate::API_KEY_ENV, "ANTHROPIC_API_KEY");
        assert_eq!(crate::API_KEY_ENV, claude::API_KEY_ENV);
    }

    #[tokio::test]
    async fn test_missing_key_yields_no_facts() {
        // Points at an unroutable base URL so a configured key still can't reach the API.
        let provider = ClaudeFactProvider::new(FactsConfig::new())
            .with_base_url("http://127.0.0.1:9");
        assert!(provider.fetch_facts(3).await.is_empty());
        assert!(provider.fetch_facts(0).await.is_empty());
    }
}
