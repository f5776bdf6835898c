use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::ui::app::TextRpgApp;
use crate::ui::settings_io::save_settings;

pub fn draw_left_panel(ctx: &egui::Context, app: &mut TextRpgApp) {
    egui::SidePanel::left("settings")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Settings");
            ui.separator();

            ui.label("UI Scale");
            ui.add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0));

            ui.separator();
            draw_colors(ui, app);

            ui.separator();
            draw_llm(ui, app);
        });
}

fn draw_colors(ui: &mut egui::Ui, app: &mut TextRpgApp) {
    ui.collapsing("Colors", |ui| {
        for (key, label) in [("assistant", "Game Master"), ("user", "Player")] {
            let mut color = app.settings.color(key);
            ui.horizontal(|ui| {
                if ui.color_edit_button_srgba(&mut color).changed() {
                    app.settings.set_color(key, color);
                }
                ui.label(label);
            });
        }
    });
}

fn draw_llm(ui: &mut egui::Ui, app: &mut TextRpgApp) {
    ui.label(egui::RichText::new("Language Model").strong());

    ui.label("Endpoint");
    ui.text_edit_singleline(&mut app.settings.llm.base_url);

    ui.label("Model");
    ui.text_edit_singleline(&mut app.settings.llm.model);

    ui.label("Temperature");
    ui.add(egui::Slider::new(&mut app.settings.llm.temperature, 0.0..=2.0));

    if app.settings.llm.api_key.is_some() {
        ui.label("API key: from environment");
    } else {
        ui.colored_label(
            egui::Color32::YELLOW,
            "API key: not set (SOLO_RPG_API_KEY or OPENAI_API_KEY)",
        );
    }

    ui.add_space(6.0);

    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            save_settings(&app.settings);
            let llm = app.settings.llm.clone();
            app.send_command(EngineCommand::Configure(llm));
        }

        if ui.button("Test Connection").clicked() {
            app.ui.connection_status = None;
            app.send_command(EngineCommand::TestConnection);
        }
    });

    match &app.ui.connection_status {
        Some(Ok(status)) => {
            ui.colored_label(egui::Color32::LIGHT_GREEN, status);
        }
        Some(Err(reason)) => {
            ui.colored_label(egui::Color32::LIGHT_RED, format!("Connection failed: {reason}"));
        }
        None => {}
    }
}
