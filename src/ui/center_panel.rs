use eframe::egui;

use crate::engine::interceptor::strip_directives;
use crate::engine::protocol::EngineCommand;
use crate::engine::response_parser::parse_response;
use crate::model::message::{Message, Role};
use crate::ui::settings::DisplaySettings;

use super::app::HudChronicleApp;

pub fn draw_center_panel(ctx: &egui::Context, app: &mut HudChronicleApp) {
    let input_id = egui::Id::new("action_input_box");
    let busy = app.view.busy;
    let mut command = None;

    // ---------- Choices + input ----------
    egui::TopBottomPanel::bottom("action_input").show(ctx, |ui| {
        if !app.view.choices.is_empty() {
            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                for choice in &app.view.choices {
                    if ui.add_enabled(!busy, egui::Button::new(choice)).clicked() {
                        command = Some(EngineCommand::SubmitAction(choice.clone()));
                    }
                }
            });
            ui.separator();
        }

        let mut send_now = false;
        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                !busy,
                egui::TextEdit::multiline(&mut app.ui.input_text)
                    .id(input_id)
                    .desired_rows(2)
                    .desired_width(ui.available_width() - 70.0)
                    .hint_text("직접 행동을 입력하세요…"),
            );

            // Enter sends, Shift+Enter breaks the line
            if response.has_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift)
            {
                send_now = true;
            }

            if ui.add_enabled(!busy, egui::Button::new("보내기")).clicked() {
                send_now = true;
            }
        });

        if send_now {
            let text = app.ui.input_text.trim().to_string();
            if !text.is_empty() {
                command = Some(EngineCommand::SubmitAction(text));
                app.ui.input_text.clear();
            }
            ui.memory_mut(|m| m.request_focus(input_id));
        }
    });

    if let Some(cmd) = command {
        app.send_command(cmd);
    }

    // ---------- Story log ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(app.ui.should_auto_scroll)
            .show(ui, |ui| {
                for msg in &app.view.messages {
                    draw_message(ui, &app.settings, msg);
                }
                if busy {
                    ui.add_space(6.0);
                    ui.spinner();
                }
            });
    });
}

fn draw_message(ui: &mut egui::Ui, settings: &DisplaySettings, msg: &Message) {
    let text = match msg.role {
        // HUD and control tokens live in the side panel, not the log
        Role::Model => parse_response(&strip_directives(&msg.content)).narrative,
        _ => msg.content.clone(),
    };
    if text.is_empty() {
        return;
    }

    ui.add_space(6.0);
    let fill = settings.color(msg.role);

    if msg.role == Role::User {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
            bubble(ui, fill, &text);
        });
    } else {
        bubble(ui, fill, &text);
    }
}

fn bubble(ui: &mut egui::Ui, fill: egui::Color32, text: &str) {
    egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
        ui.set_max_width(ui.available_width() * 0.85);
        ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
    });
}
