use eframe::egui;

use super::app::TextRpgApp;

pub fn draw_center_panel(ctx: &egui::Context, app: &mut TextRpgApp) {
    let input_id = egui::Id::new("chat_input_box");
    let loading = app.session.loading();

    // ---------- Input bar ----------
    egui::TopBottomPanel::bottom("chat_input").show(ctx, |ui| {
        ui.add_space(4.0);

        // Enter sends, Shift+Enter falls through to the text box as a newline
        let mut send_now = !loading
            && ctx.memory(|m| m.has_focus(input_id))
            && ui.input_mut(|i| !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));

        ui.horizontal(|ui| {
            ui.add_enabled(
                !loading,
                egui::TextEdit::multiline(&mut app.ui.input_text)
                    .id(input_id)
                    .hint_text("What do you do?")
                    .desired_rows(2)
                    .desired_width(ui.available_width() - 60.0),
            );

            if loading {
                ui.spinner();
            } else if ui
                .add_enabled(!app.ui.input_text.trim().is_empty(), egui::Button::new("Send"))
                .clicked()
            {
                send_now = true;
            }
        });

        if send_now {
            app.submit_action();

            // Keep cursor focused
            ui.memory_mut(|m| m.request_focus(input_id));
        }

        ui.add_space(4.0);
    });

    // ---------- Transcript ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Your Adventure");
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for msg in app.session.messages() {
                    app.draw_message(ui, msg);
                }

                if loading {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(egui::RichText::new("The Game Master is weaving your fate...").italics());
                    });
                }

                if app.ui.should_auto_scroll {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    });

    app.ui.should_auto_scroll = false;
}
