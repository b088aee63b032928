use eframe::egui;

use crate::model::game_state::GameState;

use super::app::HudChronicleApp;

pub fn draw_right_panel(ctx: &egui::Context, app: &mut HudChronicleApp) {
    egui::SidePanel::right("hud")
        .resizable(true)
        .default_width(280.0)
        .min_width(220.0)
        .show(ctx, |ui| {
            ui.heading("상태");
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                draw_hud(ui, &app.view.game_state);

                ui.separator();
                ui.label(egui::RichText::new("계승 특성").strong());
                ui.label(app.view.selected_perk.as_deref().unwrap_or("없음"));

                ui.collapsing(
                    format!("해금된 특성 ({})", app.view.unlocked_perks.len()),
                    |ui| {
                        if app.view.unlocked_perks.is_empty() {
                            ui.label("없음");
                        }
                        for perk in &app.view.unlocked_perks {
                            ui.label(format!("• {perk}"));
                        }
                    },
                );
            });
        });
}

fn draw_hud(ui: &mut egui::Ui, state: &GameState) {
    if state.is_empty() {
        ui.label("아직 상태 정보가 없습니다.");
        return;
    }

    egui::Grid::new("hud_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            row(ui, "HP", state.hp.as_deref());
            row(ui, "멘탈", state.mental.as_deref());
            row(ui, "능력치", state.stats.as_deref());
            row(ui, "장비", state.equipment.as_deref());
            row(ui, "메모", state.notes.as_deref());
        });

    if let Some(tags) = &state.tags {
        ui.add_space(6.0);
        ui.horizontal_wrapped(|ui| {
            for tag in tags {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.label(tag);
                });
            }
        });
    }
}

fn row(ui: &mut egui::Ui, label: &str, value: Option<&str>) {
    ui.label(egui::RichText::new(label).strong());
    ui.label(value.unwrap_or("-"));
    ui.end_row();
}
