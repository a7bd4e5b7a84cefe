//! Prompts sent to the model.

use crate::card::Card;

const NO_HISTORY: &str = "This is the first section. Please generate the introduction.";

/// Static instructions: role, citation rules, output format and card schemas.
pub fn system_prompt() -> String {
    let mut prompt = String::new();
    prompt.push_str(include_str!("prompts/role.txt"));
    prompt.push('\n');
    prompt.push_str(include_str!("prompts/layout.txt"));
    prompt.push('\n');
    prompt.push_str(include_str!("prompts/card_types.txt"));
    prompt.push('\n');
    prompt.push_str(include_str!("prompts/final_rules.txt"));
    prompt
}

/// Request for the next section of the infographic about `topic`.
pub fn section_prompt(topic: &str, history: &[Card]) -> String {
    let mut prompt = String::new();
    push_topic(&mut prompt, topic);

    prompt.push_str("\n## Continuity\n");
    prompt.push_str(&format!(
        "- Initial request (empty history): generate the first 2-4 cards for an infographic about \"{topic}\". This should be a strong, cited introduction.\n"
    ));
    prompt.push_str(
        "- Later requests (with history): generate the next logical section. Do not repeat information. Introduce new, cited sub-topics.\n",
    );

    push_history(&mut prompt, history);
    prompt.push_str("\nGenerate the JSON for the next set of infographic cards now.\n");
    prompt
}

/// Request for a replacement of the card at `index` in `history`.
pub fn regenerate_prompt(topic: &str, history: &[Card], index: usize) -> String {
    let mut prompt = String::new();
    push_topic(&mut prompt, topic);
    push_history(&mut prompt, history);

    prompt.push_str("\n## Replace One Card\n");
    match history.get(index) {
        Some(card) => {
            prompt.push_str(&format!(
                "The reader wants card number {} (a `{}` card, counting from 1) replaced with a fresh alternative.\n",
                index + 1,
                card.kind()
            ));
            prompt.push_str(&format!(
                "- Keep the type `{}` and the width `{}` so the layout does not change.\n",
                card.kind(),
                match card.width() {
                    crate::card::Width::Full => "full",
                    crate::card::Width::Half => "half",
                }
            ));
        }
        None => prompt.push_str("The reader wants one new card to replace a removed one.\n"),
    }
    prompt.push_str("- Cover the same part of the topic with different facts or framing.\n");
    prompt.push_str("- Respond with a JSON array containing exactly one card.\n");
    prompt
}

fn push_topic(prompt: &mut String, topic: &str) {
    prompt.push_str("## Instructions\n");
    prompt.push_str(&format!("- Topic: the requested topic is **\"{topic}\"**.\n"));
    prompt.push_str(
        "- Variety is key: mix card types and layouts. A good response contains 2-4 cards.\n",
    );
}

fn push_history(prompt: &mut String, history: &[Card]) {
    prompt.push_str("\n## History (Previously Generated Cards)\n");
    if history.is_empty() {
        prompt.push_str(NO_HISTORY);
    } else {
        let json = serde_json::to_string_pretty(history).unwrap_or_else(|_| "[]".to_string());
        prompt.push_str(&json);
    }
    prompt.push('\n');
}
