use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::model::phase::GamePhase;

use super::app::HudChronicleApp;

/// Save slot management.
pub fn draw_left_panel(ctx: &egui::Context, app: &mut HudChronicleApp) {
    let busy = app.view.busy;
    let can_save = !busy
        && !matches!(app.view.phase, GamePhase::Prologue { .. })
        && !app.view.messages.is_empty();
    let mut command = None;

    egui::SidePanel::left("slots")
        .resizable(false)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("저장 슬롯");
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (index, slot) in app.view.slots.iter().enumerate() {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(egui::RichText::new(format!("슬롯 {}", index + 1)).strong());

                        match slot {
                            Some(info) => {
                                ui.label(&info.summary);
                                ui.small(
                                    info.timestamp
                                        .with_timezone(&chrono::Local)
                                        .format("%Y-%m-%d %H:%M")
                                        .to_string(),
                                );
                            }
                            None => {
                                ui.weak("비어 있음");
                            }
                        }

                        ui.horizontal(|ui| {
                            if ui.add_enabled(can_save, egui::Button::new("저장")).clicked() {
                                command = Some(EngineCommand::SaveSlot(index));
                            }
                            let filled = slot.is_some();
                            if ui
                                .add_enabled(!busy && filled, egui::Button::new("불러오기"))
                                .clicked()
                            {
                                command = Some(EngineCommand::LoadSlot(index));
                            }
                            if ui
                                .add_enabled(!busy && filled, egui::Button::new("삭제"))
                                .clicked()
                            {
                                command = Some(EngineCommand::DeleteSlot(index));
                            }
                        });
                    });
                    ui.add_space(4.0);
                }
            });
        });

    if let Some(cmd) = command {
        app.send_command(cmd);
    }
}
