use crate::model::message::{Message, Role};

/// Prompt templates. Pure text formatting only; no networking.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn opening_persona() -> String {
        "You are the Game Master of a solo RPG. You create immersive, detailed, and engaging \
narratives based on the player's world description. Always end your responses with a question \
or prompt about what the player wants to do next."
            .to_string()
    }

    pub fn opening_prompt(world_description: &str) -> String {
        format!(
            "The player has described their world as: \"{world_description}\". Begin an immersive \
story. Narrate the first scene vividly and ask \"What do you do?\" at the end. Keep your response \
under 400 words."
        )
    }

    pub fn continuation_persona(world_description: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str("You are the Game Master of a solo RPG. The world is described as: ");
        prompt.push_str(world_description);
        prompt.push_str("\n\n");

        prompt.push_str(
            "Rules:\n\
1. Create immersive, detailed, and engaging narratives\n\
2. Respond to the player's actions realistically within the world's context\n\
3. Introduce challenges, NPCs, and plot developments to keep the story interesting\n\
4. Always end your responses with a question or prompt about what the player wants to do next\n\
5. Keep your responses under 400 words\n\
6. Never break character or acknowledge that you are an AI",
        );

        prompt
    }

    pub fn continuation_prompt(history: &str) -> String {
        format!(
            "Here is the conversation history so far:\n\n{history}\n\nContinue the story based on \
the player's last action. Be descriptive and engaging. End with a question about what they do next."
        )
    }

    /// Content of the first system message, or empty when there is none.
    pub fn world_of(transcript: &[Message]) -> &str {
        transcript
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    /// Renders every non-system message as `Player:` / `Game Master:` lines.
    pub fn render_history(transcript: &[Message]) -> String {
        transcript
            .iter()
            .filter_map(|m| match m.role {
                Role::System => None,
                Role::User => Some(format!("Player: {}", m.content)),
                Role::Assistant => Some(format!("Game Master: {}", m.content)),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_prompt_embeds_world_and_closing_question() {
        let prompt = PromptBuilder::opening_prompt("a flooded cyberpunk city");
        assert!(prompt.contains("\"a flooded cyberpunk city\""));
        assert!(prompt.contains("\"What do you do?\""));
        assert!(prompt.contains("under 400 words"));
    }

    #[test]
    fn history_skips_system_and_keeps_order() {
        let transcript = vec![
            Message::world("moon base"),
            Message::assistant("Alarms blare."),
            Message::user("I run"),
            Message::assistant("You trip."),
        ];

        assert_eq!(
            PromptBuilder::render_history(&transcript),
            "Game Master: Alarms blare.\n\nPlayer: I run\n\nGame Master: You trip."
        );
    }

    #[test]
    fn world_lookup_is_by_role_not_position() {
        let transcript = vec![Message::user("hello"), Message::world("ice caves")];
        assert_eq!(PromptBuilder::world_of(&transcript), "World: ice caves");
        assert_eq!(PromptBuilder::world_of(&[Message::user("hello")]), "");
    }

    #[test]
    fn continuation_persona_carries_rules() {
        let persona = PromptBuilder::continuation_persona("World: ice caves");
        assert!(persona.contains("The world is described as: World: ice caves"));
        assert!(persona.contains("Never break character or acknowledge that you are an AI"));
        assert!(persona.contains("Introduce challenges, NPCs, and plot developments"));
    }
}
