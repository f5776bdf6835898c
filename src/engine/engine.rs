use std::sync::mpsc::{Receiver, Sender};

use tracing::{info, warn};

use crate::engine::llm_client::ChatClient;
use crate::engine::narrator::NarrativeGenerator;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::ui::settings::LlmSettings;

/// Worker that owns the blocking HTTP client. Holds no session state.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    generator: NarrativeGenerator<ChatClient>,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        settings: &LlmSettings,
    ) -> Self {
        Self {
            rx,
            tx,
            generator: NarrativeGenerator::new(ChatClient::new(settings), settings.model.clone()),
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            let resp = match cmd {
                EngineCommand::GenerateOpening { ticket, world_description } => EngineResponse::Narrative {
                    ticket,
                    result: self.generator.generate_opening(&world_description),
                },

                EngineCommand::ContinueNarrative { ticket, transcript } => EngineResponse::Narrative {
                    ticket,
                    result: self.generator.continue_narrative(&transcript),
                },

                EngineCommand::Configure(settings) => {
                    info!(base_url = %settings.base_url, model = %settings.model, "provider reconfigured");
                    self.generator =
                        NarrativeGenerator::new(ChatClient::new(&settings), settings.model.clone());
                    continue;
                }

                EngineCommand::TestConnection => {
                    let status = self.generator.provider().test_connection().map_err(|e| {
                        warn!(error = ?e, "connection test failed");
                        format!("{e:#}")
                    });
                    EngineResponse::ConnectionStatus(status)
                }
            };

            if self.tx.send(resp).is_err() {
                break;
            }
        }
        info!("engine stopped");
    }
}
