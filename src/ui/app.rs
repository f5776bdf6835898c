use eframe::egui;
use egui::Layout;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;

use tracing::{error, info};

use crate::engine::engine::Engine;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::save_store::FileStore;
use crate::engine::session::SessionController;
use crate::model::message::{Message, Role};
use crate::ui::center_panel::draw_center_panel;
use crate::ui::left_panel::draw_left_panel;
use crate::ui::settings::UiSettings;
use crate::ui::settings_io::load_settings;

/* =========================
   UI State
   ========================= */

#[derive(Default)]
pub struct UiState {
    pub world_input: String,
    pub input_text: String,

    pub should_auto_scroll: bool,
    pub show_settings: bool,
    pub show_reset_confirm: bool,

    pub connection_status: Option<Result<String, String>>,
}

/* =========================
   App
   ========================= */

pub struct TextRpgApp {
    pub ui: UiState,
    pub settings: UiSettings,
    pub session: SessionController<FileStore>,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl TextRpgApp {
    pub fn new(store: FileStore) -> Self {
        let settings = load_settings();
        let session = SessionController::restore(store);
        let (cmd_tx, resp_rx) = spawn_engine(&settings);

        Self {
            ui: UiState {
                world_input: session.world_prompt().to_string(),
                should_auto_scroll: true,
                ..Default::default()
            },
            settings,
            session,
            cmd_tx,
            resp_rx,
        }
    }

    pub fn send_command(&mut self, cmd: EngineCommand) {
        let Err(mpsc::SendError(cmd)) = self.cmd_tx.send(cmd) else {
            return;
        };

        error!("engine is gone, restarting it");
        self.restart_engine();
        if self.cmd_tx.send(cmd).is_err() {
            error!("restarted engine is not accepting commands");
            self.session.abandon_in_flight();
            self.ui.should_auto_scroll = true;
        }
    }

    fn restart_engine(&mut self) {
        let (cmd_tx, resp_rx) = spawn_engine(&self.settings);
        self.cmd_tx = cmd_tx;
        self.resp_rx = resp_rx;
    }

    pub fn start_game(&mut self) {
        if let Some((ticket, world_description)) = self.session.begin_start(&self.ui.world_input) {
            self.send_command(EngineCommand::GenerateOpening { ticket, world_description });
        }
    }

    pub fn submit_action(&mut self) {
        if let Some((ticket, transcript)) = self.session.begin_action(&self.ui.input_text) {
            self.ui.input_text.clear();
            self.ui.should_auto_scroll = true;
            self.send_command(EngineCommand::ContinueNarrative { ticket, transcript });
        }
    }

    fn drain_responses(&mut self) {
        loop {
            match self.resp_rx.try_recv() {
                Ok(EngineResponse::Narrative { ticket, result }) => {
                    if self.session.complete(ticket, result) {
                        self.ui.should_auto_scroll = true;
                    }
                }
                Ok(EngineResponse::ConnectionStatus(status)) => {
                    self.ui.connection_status = Some(status);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // The worker died mid-request; release the loading gate.
                    if self.session.abandon_in_flight() {
                        error!("engine stopped before answering");
                        self.ui.should_auto_scroll = true;
                    }
                    self.restart_engine();
                    break;
                }
            }
        }
    }

    pub fn draw_message(&self, ui: &mut egui::Ui, msg: &Message) {
        ui.add_space(6.0);

        match msg.role {
            Role::System => {}
            Role::User => {
                let color = self.settings.color("user");
                ui.with_layout(Layout::right_to_left(egui::Align::TOP), |ui| {
                    bubble(ui, color, |ui| {
                        ui.label(egui::RichText::new(&msg.content).color(egui::Color32::WHITE).strong());
                    });
                });
            }
            Role::Assistant => {
                bubble(ui, self.settings.color("assistant"), |ui| {
                    for paragraph in msg.content.split('\n') {
                        ui.label(egui::RichText::new(paragraph).color(egui::Color32::WHITE));
                    }
                });
            }
        }
    }

    fn draw_world_screen(&mut self, ctx: &egui::Context) {
        let input_id = egui::Id::new("world_input_box");

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.heading(egui::RichText::new("✨ Create Your World").size(26.0));
                ui.label(
                    egui::RichText::new("Describe your world in 1-2 sentences. Be as creative as you want!")
                        .italics(),
                );
            });

            ui.add_space(12.0);

            let loading = self.session.loading();
            let enter = !loading
                && ctx.memory(|m| m.has_focus(input_id))
                && ui.input_mut(|i| !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));

            let response = ui.add_enabled(
                !loading,
                egui::TextEdit::multiline(&mut self.ui.world_input)
                    .id(input_id)
                    .hint_text("Describe your world...")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                self.session.set_world_prompt(self.ui.world_input.clone());
            }

            ui.label(
                egui::RichText::new(
                    "Example: \"a post-apocalyptic desert ruled by talking cacti\" or \"a medieval \
fantasy kingdom where magic is powered by music\"",
                )
                .small()
                .italics(),
            );

            if let Some(notice) = self.session.start_error() {
                ui.add_space(6.0);
                ui.colored_label(egui::Color32::LIGHT_RED, notice);
            }

            ui.add_space(12.0);

            let can_start = !loading && !self.ui.world_input.trim().is_empty();
            ui.vertical_centered_justified(|ui| {
                if loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Forging Your Realm...");
                    });
                } else if ui
                    .add_enabled(can_start, egui::Button::new("Begin Your Epic Adventure"))
                    .clicked()
                    || enter
                {
                    self.start_game();
                }
            });
        });
    }

    fn draw_reset_confirm(&mut self, ctx: &egui::Context) {
        let mut decision = None;

        egui::Window::new("Start a new game?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Are you sure you want to start a new game? Your current progress will be lost.");
                ui.horizontal(|ui| {
                    if ui.button("Yes, start over").clicked() {
                        decision = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                });
            });

        if let Some(confirmed) = decision {
            self.ui.show_reset_confirm = false;
            if self.session.reset(|| confirmed) {
                self.ui.world_input.clear();
                self.ui.input_text.clear();
                info!("player started a new quest");
            }
        }
    }
}

fn spawn_engine(
    settings: &UiSettings,
) -> (mpsc::Sender<EngineCommand>, mpsc::Receiver<EngineResponse>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let llm = settings.llm.clone();

    std::thread::spawn(move || {
        let mut engine = Engine::new(cmd_rx, resp_tx, &llm);
        engine.run();
    });

    (cmd_tx, resp_rx)
}

/* =========================
   egui App
   ========================= */

impl eframe::App for TextRpgApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.drain_responses();
        if self.session.loading() || self.ui.show_settings {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("Solo Text RPG").color(egui::Color32::from_rgb(251, 191, 36)));
                ui.label(egui::RichText::new("Worldbuilder Edition").italics());

                ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.ui.show_settings, "⚙ Settings");
                    if self.session.game_started() && ui.button("New Quest").clicked() {
                        self.ui.show_reset_confirm = true;
                    }
                });
            });
        });

        if self.ui.show_settings {
            draw_left_panel(ctx, self);
        }

        if self.session.game_started() {
            draw_center_panel(ctx, self);
        } else {
            self.draw_world_screen(ctx);
        }

        if self.ui.show_reset_confirm {
            self.draw_reset_confirm(ctx);
        }
    }
}

/* =========================
   UI Helpers
   ========================= */

fn bubble(ui: &mut egui::Ui, color: egui::Color32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, add_contents);
}
