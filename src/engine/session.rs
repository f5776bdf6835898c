use tracing::{info, warn};

use crate::engine::llm_client::CompletionProvider;
use crate::engine::narrator::{GenerationFailed, GenerationStage, NarrativeGenerator};
use crate::engine::save_store::{SessionStore, StoreError, SESSION_KEY};
use crate::model::game_save::GameSave;
use crate::model::message::{Message, Role};

pub const START_FAILED_NOTICE: &str = "Error starting game. Please try again.";
pub const ACTION_FAILED_NOTICE: &str = "Something went wrong. Please try again.";

/// Identifies one generation request. Only the ticket currently in flight
/// is accepted by [`SessionController::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    pub stage: GenerationStage,
}

/// Owns the transcript and mirrors it into a [`SessionStore`].
///
/// Generation is split in two phases so the caller can run the provider
/// call elsewhere: `begin_*` validates input, flips the loading gate and
/// hands back a [`Ticket`] plus what the narrator needs; `complete` records
/// the outcome for that ticket and clears the gate. [`start_game`](Self::start_game)
/// and [`submit_action`](Self::submit_action) run both phases inline.
pub struct SessionController<S> {
    store: S,
    state: GameSave,
    in_flight: Option<Ticket>,
    next_id: u64,
}

impl<S: SessionStore> SessionController<S> {
    /// Hydrates from the store. Anything unreadable counts as no prior state.
    pub fn restore(store: S) -> Self {
        let state = match store.get(SESSION_KEY) {
            Ok(Some(blob)) => match GameSave::from_json(&blob) {
                Ok(save) => {
                    info!(messages = save.messages.len(), started = save.game_started, "restored saved game");
                    save
                }
                Err(e) => {
                    warn!(error = %e, "ignoring corrupt saved game");
                    GameSave::default()
                }
            },
            Ok(None) => GameSave::default(),
            Err(e) => {
                warn!(error = %e, "could not read saved game");
                GameSave::default()
            }
        };

        Self { store, state, in_flight: None, next_id: 0 }
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn game_started(&self) -> bool {
        self.state.game_started
    }

    pub fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    pub fn world_prompt(&self) -> &str {
        &self.state.world_prompt
    }

    /// The start-failure notice, when the last start attempt failed.
    pub fn start_error(&self) -> Option<&str> {
        match self.state.messages.as_slice() {
            [m] if !self.state.game_started && m.role == Role::System && m.content == START_FAILED_NOTICE => {
                Some(m.content.as_str())
            }
            _ => None,
        }
    }

    pub fn set_world_prompt(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.state.world_prompt {
            self.state.world_prompt = text;
            self.persist();
        }
    }

    fn issue(&mut self, stage: GenerationStage) -> Ticket {
        self.next_id += 1;
        let ticket = Ticket { id: self.next_id, stage };
        self.in_flight = Some(ticket);
        ticket
    }

    /// Returns the ticket and the world text to hand to the narrator, or
    /// `None` when the input is blank or a generation is already running.
    pub fn begin_start(&mut self, world_description: &str) -> Option<(Ticket, String)> {
        if world_description.trim().is_empty() || self.loading() {
            return None;
        }

        self.set_world_prompt(world_description);
        info!("starting new game");
        Some((self.issue(GenerationStage::Opening), self.state.world_prompt.clone()))
    }

    /// Appends the player's action right away and returns the ticket and
    /// the transcript the narrator should continue. `None` when blank or busy.
    pub fn begin_action(&mut self, player_text: &str) -> Option<(Ticket, Vec<Message>)> {
        if player_text.trim().is_empty() || self.loading() {
            return None;
        }

        self.state.messages.push(Message::user(player_text));
        let ticket = self.issue(GenerationStage::Continuation);
        self.persist();
        Some((ticket, self.state.messages.clone()))
    }

    /// Records the narrator's answer for `ticket`. Answers for any other
    /// ticket (superseded by a reset, or already settled) are dropped.
    pub fn complete(&mut self, ticket: Ticket, result: Result<String, GenerationFailed>) -> bool {
        if self.in_flight != Some(ticket) {
            warn!(stage = %ticket.stage, "dropping stale narrative response");
            return false;
        }

        match ticket.stage {
            GenerationStage::Opening => self.settle_start(result),
            GenerationStage::Continuation => self.settle_action(result),
        }

        self.in_flight = None;
        self.persist();
        true
    }

    /// Fails whatever is in flight, e.g. when the worker running it is gone.
    pub fn abandon_in_flight(&mut self) -> bool {
        match self.in_flight {
            Some(ticket) => self.complete(ticket, Err(GenerationFailed { stage: ticket.stage })),
            None => false,
        }
    }

    fn settle_start(&mut self, result: Result<String, GenerationFailed>) {
        match result {
            Ok(opening) => {
                self.state.messages = vec![
                    Message::world(&self.state.world_prompt),
                    Message::assistant(opening),
                ];
                self.state.game_started = true;
            }
            Err(e) => {
                warn!(error = %e, "game did not start");
                self.state.messages = vec![Message::system(START_FAILED_NOTICE)];
                self.state.game_started = false;
            }
        }
    }

    fn settle_action(&mut self, result: Result<String, GenerationFailed>) {
        let reply = result.unwrap_or_else(|e| {
            warn!(error = %e, "narrative continuation failed");
            ACTION_FAILED_NOTICE.to_string()
        });

        self.state.messages.push(Message::assistant(reply));
    }

    /// Runs both start phases against `generator`. Returns false on no-op.
    pub fn start_game<P: CompletionProvider>(
        &mut self,
        generator: &NarrativeGenerator<P>,
        world_description: &str,
    ) -> bool {
        let Some((ticket, world)) = self.begin_start(world_description) else {
            return false;
        };
        self.complete(ticket, generator.generate_opening(&world))
    }

    /// Runs both action phases against `generator`. Returns false on no-op.
    pub fn submit_action<P: CompletionProvider>(
        &mut self,
        generator: &NarrativeGenerator<P>,
        player_text: &str,
    ) -> bool {
        let Some((ticket, transcript)) = self.begin_action(player_text) else {
            return false;
        };
        self.complete(ticket, generator.continue_narrative(&transcript))
    }

    /// Wipes the session and its stored copy, but only if `confirm` says yes.
    /// A generation still in flight is orphaned; its answer will be dropped.
    pub fn reset(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }

        self.state = GameSave::default();
        self.in_flight = None;
        if let Err(e) = self.store.remove(SESSION_KEY) {
            warn!(error = %e, "could not delete saved game");
        }
        info!("session reset");
        true
    }

    fn persist(&mut self) {
        if !self.state.worth_saving() {
            return;
        }

        let result = self
            .state
            .to_json()
            .map_err(StoreError::from)
            .and_then(|blob| self.store.set(SESSION_KEY, &blob));

        if let Err(e) = result {
            warn!(error = %e, "could not save game");
        }
    }
}
