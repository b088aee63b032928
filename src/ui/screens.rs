use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::model::phase::GamePhase;

use super::app::HudChronicleApp;

const BUTTON_SIZE: [f32; 2] = [260.0, 36.0];

/// Full-screen views for every phase before play starts.
pub fn draw_phase_screen(ctx: &egui::Context, app: &mut HudChronicleApp) {
    let mut command = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            match &app.view.phase {
                GamePhase::Intro => command = intro(ui),
                GamePhase::Selection => command = selection(ui, app.view.unlocked_perks.len()),
                GamePhase::PerkSelection => command = perk_selection(ui, &app.view.unlocked_perks),
                GamePhase::JobSelection => command = job_selection(ui, app),
                GamePhase::Prologue { opening_ready, .. } => {
                    prologue(ui, &app.view.prologue_lines, app.ui.prologue_shown, *opening_ready)
                }
                GamePhase::Playing => {}
            }
        });
    });

    if let Some(cmd) = command {
        app.send_command(cmd);
    }
}

fn intro(ui: &mut egui::Ui) -> Option<EngineCommand> {
    ui.heading("HUD Chronicle");
    ui.add_space(12.0);
    ui.label("무너진 도시에서 살아남으세요. 당신의 선택이 이야기를 만듭니다.");
    ui.add_space(24.0);

    ui.add_sized(BUTTON_SIZE, egui::Button::new("시작하기"))
        .clicked()
        .then_some(EngineCommand::Proceed)
}

fn selection(ui: &mut egui::Ui, perk_count: usize) -> Option<EngineCommand> {
    ui.heading("새로운 회차");
    ui.add_space(24.0);

    let mut command = None;
    if ui.add_sized(BUTTON_SIZE, egui::Button::new("처음부터 시작")).clicked() {
        command = Some(EngineCommand::ChooseFreshStart);
    }
    ui.add_space(8.0);
    let legacy = format!("계승하여 시작 (특성 {perk_count}개)");
    if ui.add_sized(BUTTON_SIZE, egui::Button::new(legacy)).clicked() {
        command = Some(EngineCommand::ChooseLegacy);
    }
    command
}

fn perk_selection(ui: &mut egui::Ui, perks: &[String]) -> Option<EngineCommand> {
    ui.heading("계승할 특성을 고르세요");
    ui.add_space(16.0);

    let mut command = None;
    egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
        for perk in perks {
            if ui.add_sized(BUTTON_SIZE, egui::Button::new(perk)).clicked() {
                command = Some(EngineCommand::ChoosePerk(perk.clone()));
            }
        }
    });

    ui.add_space(16.0);
    if ui.button("← 뒤로").clicked() {
        command = Some(EngineCommand::GoBack);
    }
    command
}

fn job_selection(ui: &mut egui::Ui, app: &HudChronicleApp) -> Option<EngineCommand> {
    let busy = app.view.busy;

    ui.heading("직업 선택");
    if let Some(perk) = &app.view.selected_perk {
        ui.label(format!("계승 특성: {perk}"));
    }
    ui.add_space(16.0);

    let mut command = None;
    for job in &app.view.jobs {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_max_width(420.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!busy, egui::Button::new(&job.name).min_size([90.0, 28.0].into()))
                    .clicked()
                {
                    command = Some(EngineCommand::ChooseJob(job.id.clone()));
                }
                ui.label(&job.description);
            });
        });
        ui.add_space(4.0);
    }

    if busy {
        ui.spinner();
    }

    ui.add_space(16.0);
    if ui.add_enabled(!busy, egui::Button::new("← 뒤로")).clicked() {
        command = Some(EngineCommand::GoBack);
    }
    command
}

fn prologue(ui: &mut egui::Ui, lines: &[String], shown: usize, opening_ready: bool) {
    for line in lines.iter().take(shown) {
        ui.label(egui::RichText::new(line).italics());
        ui.add_space(10.0);
    }

    if shown >= lines.len() && !opening_ready {
        ui.add_space(16.0);
        ui.spinner();
        ui.weak("이야기를 불러오는 중…");
    }
}
