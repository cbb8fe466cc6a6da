//! Schema output of `#[derive(Tool)]` field attributes.

use facts_core::Tool;

/// Look up a card in the feed
#[derive(Tool)]
#[allow(dead_code)]
struct LookupCard {
    /// Zero-based card position
    #[tool(rename = "position")]
    index: usize,
    /// Topic filter
    #[tool(optional)]
    topic: String,
    note: Option<String>,
    tags: Vec<String>,
}

#[test]
fn test_rename_and_optional_fields() {
    let schema = LookupCard::input_schema();
    let properties = &schema["properties"];

    assert_eq!(LookupCard::tool_name(), "lookup_card");
    assert_eq!(LookupCard::tool_description(), "Look up a card in the feed");

    assert!(properties.get("index").is_none());
    assert_eq!(properties["position"]["type"], "integer");
    assert_eq!(properties["position"]["description"], "Zero-based card position");
    assert_eq!(properties["topic"]["type"], "string");
    assert_eq!(properties["note"]["type"], "string");
    assert!(properties["note"].get("description").is_none());
    assert_eq!(properties["tags"]["items"]["type"], "string");

    let required: Vec<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(required, vec!["position", "tags"]);
}

#[test]
fn test_as_tool_carries_schema() {
    let tool = LookupCard::as_tool();
    assert_eq!(tool.name, "lookup_card");
    assert_eq!(tool.input_schema, LookupCard::input_schema());
}
