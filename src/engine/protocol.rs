use crate::engine::narrator::GenerationFailed;
use crate::engine::session::Ticket;
use crate::model::message::Message;
use crate::ui::settings::LlmSettings;

pub enum EngineCommand {
    GenerateOpening { ticket: Ticket, world_description: String },
    ContinueNarrative { ticket: Ticket, transcript: Vec<Message> },
    Configure(LlmSettings),
    TestConnection,
}

pub enum EngineResponse {
    Narrative { ticket: Ticket, result: Result<String, GenerationFailed> },
    ConnectionStatus(Result<String, String>),
}
