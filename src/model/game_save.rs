use serde::{Deserialize, Serialize};

use crate::model::message::Message;

/// Everything that survives a restart. Field names match the save blobs
/// written by earlier versions of the game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSave {
    #[serde(rename = "savedMessages")]
    pub messages: Vec<Message>,
    #[serde(rename = "savedGameStarted")]
    pub game_started: bool,
    #[serde(rename = "savedWorldPrompt")]
    pub world_prompt: String,
}

impl GameSave {
    /// Empty sessions are never written.
    pub fn worth_saving(&self) -> bool {
        !self.messages.is_empty() || self.game_started
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_started_game() {
        let save = GameSave {
            messages: vec![
                Message::world("a desert ruled by talking cacti"),
                Message::assistant("Sand hisses. What do you do?"),
                Message::user("I greet the nearest cactus"),
            ],
            game_started: true,
            world_prompt: "a desert ruled by talking cacti".into(),
        };

        let restored = GameSave::from_json(&save.to_json().unwrap()).unwrap();
        assert_eq!(restored, save);
    }

    #[test]
    fn reads_legacy_blob_layout() {
        let blob = r#"{
            "savedMessages": [{"role": "system", "content": "World: moon"}],
            "savedGameStarted": false,
            "savedWorldPrompt": "moon"
        }"#;

        let save = GameSave::from_json(blob).unwrap();
        assert_eq!(save.messages, vec![Message::system("World: moon")]);
        assert!(!save.game_started);
        assert_eq!(save.world_prompt, "moon");
    }

    #[test]
    fn missing_fields_are_rejected() {
        assert!(GameSave::from_json(r#"{"savedMessages": []}"#).is_err());
        assert!(GameSave::from_json("not json").is_err());
    }

    #[test]
    fn empty_session_is_not_worth_saving() {
        assert!(!GameSave::default().worth_saving());
        let started = GameSave { game_started: true, ..Default::default() };
        assert!(started.worth_saving());
    }
}
