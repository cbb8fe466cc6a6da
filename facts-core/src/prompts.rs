//! Prompt text sent to the model.

/// System prompt for fact generation.
pub const FACTS_SYSTEM: &str = "You write short, surprising, verifiable trivia for a \
scrolling feed. Each fact has a topic of one to three words and a fact of one or two \
sentences, under 40 words. Cover a wide spread of subjects: science, history, nature, \
language, space, food, sport, art, the human body. Never repeat a fact. Never invent \
statistics. No preamble and no commentary.";

/// User prompt asking for `count` facts.
pub fn facts_request(count: usize) -> String {
    let noun = if count == 1 { "fact" } else { "facts" };
    format!(
        "Give me {count} random interesting {noun}. Record them with the record_facts tool. \
If you cannot use the tool, reply with only a JSON array of objects with string \
fields \"topic\" and \"fact\"."
    )
}

/// System prompt for the tutor view.
pub const TUTOR_SYSTEM: &str = "You are a patient tutor. The learner just read a piece of \
trivia and wants to understand the topic behind it. Explain in plain language, build from \
what they likely already know, and keep each answer under 200 words. Use short paragraphs, \
no markdown headings. End with one question that invites them to go deeper.";

/// First tutor message for a topic.
pub fn tutor_opening(topic: &str) -> String {
    format!("Teach me about {topic}. Start with the big picture, then one detail that makes it memorable.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facts_request_count() {
        assert!(facts_request(1).contains("1 random interesting fact."));
        assert!(facts_request(5).contains("5 random interesting facts."));
    }

    #[test]
    fn test_tutor_opening_names_topic() {
        assert!(tutor_opening("Black holes").contains("Black holes"));
    }
}
